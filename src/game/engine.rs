use std::time::Duration;

use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use super::{
    action::{Action, Direction},
    config::{ConfigError, GameConfig},
    state::{CollisionType, GameState, Position, RunState, Snake},
};

/// Information about a tick that did not end the game
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepInfo {
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// New tick interval, set when eating food sped the game up
    pub speed_change: Option<Duration>,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EndReason {
    Collision(CollisionType),
    /// The snake covers every cell, so no food can be placed
    BoardFull,
}

/// Result of a call to [`GameEngine::advance`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    /// The engine was not running; nothing changed
    Skipped,
    /// A normal tick; the snapshot in [`GameEngine::state`] is ready to draw
    Continue(StepInfo),
    /// The session is over and the run state is [`RunState::Ended`]
    Terminated(EndReason),
}

impl StepResult {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepResult::Terminated(_))
    }

    /// The interval the scheduler should switch to, if it changed
    pub fn speed_change(&self) -> Option<Duration> {
        match self {
            StepResult::Continue(info) => info.speed_change,
            _ => None,
        }
    }
}

/// What a presentation layer shows when a session ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameOverSummary {
    pub score: u32,
    pub length: usize,
    pub steps: u32,
    pub reason: EndReason,
}

/// Owns every piece of game state and advances it one tick at a time.
///
/// The engine never touches timers or I/O: a scheduler calls [`advance`]
/// while [`run_state`] is running and re-arms itself when a tick reports a
/// speed change.
///
/// [`advance`]: GameEngine::advance
/// [`run_state`]: GameEngine::run_state
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
    state: GameState,
    pending_direction: Direction,
    tick_interval: Duration,
}

impl GameEngine {
    /// Create an engine seeded from the OS
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an engine whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let snake = initial_snake(&config);
        let state = GameState::new(
            snake,
            Position::new(0, 0),
            config.grid_width,
            config.grid_height,
        );
        let mut engine = Self {
            pending_direction: Direction::Right,
            tick_interval: config.initial_tick(),
            config,
            rng,
            state,
        };
        engine.initialize();
        Ok(engine)
    }

    /// Put every entity back to its starting value and go idle
    pub fn initialize(&mut self) {
        let snake = initial_snake(&self.config);
        // A validated config always leaves a free cell next to the initial snake.
        let food = spawn_food(&mut self.rng, &self.config, &snake).unwrap_or(Position::new(0, 0));

        self.state = GameState::new(snake, food, self.config.grid_width, self.config.grid_height);
        self.pending_direction = Direction::Right;
        self.tick_interval = self.config.initial_tick();
        debug!("game initialized, food at ({}, {})", food.x, food.y);
    }

    /// Buffer a direction for the next tick.
    ///
    /// Returns false when the request would reverse the snake onto its neck.
    pub fn set_pending_direction(&mut self, direction: Direction) -> bool {
        if self.state.snake.direction.is_opposite(direction) {
            trace!("ignoring reversal from {} to {}", self.state.snake.direction, direction);
            return false;
        }
        self.pending_direction = direction;
        true
    }

    /// Execute one tick of the game
    pub fn advance(&mut self) -> StepResult {
        if self.state.run_state != RunState::Running {
            trace!("advance skipped while {:?}", self.state.run_state);
            return StepResult::Skipped;
        }

        self.state.snake.direction = self.pending_direction;
        let new_head = self.state.snake.push_head();
        self.state.steps += 1;

        let mut info = StepInfo::default();
        if new_head == self.state.food {
            info.ate_food = true;
            self.state.score += self.config.score_per_food;

            match spawn_food(&mut self.rng, &self.config, &self.state.snake) {
                Some(food) => self.state.food = food,
                None => return self.end(EndReason::BoardFull),
            }
            info.speed_change = self.speed_up();
            debug!(
                "food eaten, score {} length {}",
                self.state.score,
                self.state.snake.len()
            );
        } else {
            self.state.snake.pop_tail();
        }

        if let Some(collision) = self.collision() {
            return self.end(EndReason::Collision(collision));
        }

        StepResult::Continue(info)
    }

    /// True when the head is off the grid or on another segment
    pub fn check_collision(&self) -> bool {
        self.collision().is_some()
    }

    /// Classify the collision the current head is in, if any
    pub fn collision(&self) -> Option<CollisionType> {
        let head = self.state.snake.head();

        if !self.state.is_in_bounds(head) {
            return Some(CollisionType::Wall);
        }

        if self.state.snake.collides_with_body(head) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    pub fn start(&mut self) {
        if self.state.run_state == RunState::Idle {
            self.state.run_state = RunState::Running;
            debug!("game started");
        } else {
            trace!("start ignored while {:?}", self.state.run_state);
        }
    }

    pub fn pause(&mut self) {
        if self.state.run_state == RunState::Running {
            self.state.run_state = RunState::Paused;
            debug!("game paused");
        } else {
            trace!("pause ignored while {:?}", self.state.run_state);
        }
    }

    pub fn resume(&mut self) {
        if self.state.run_state == RunState::Paused {
            self.state.run_state = RunState::Running;
            debug!("game resumed");
        } else {
            trace!("resume ignored while {:?}", self.state.run_state);
        }
    }

    /// Pause when running, resume when paused
    pub fn toggle_pause(&mut self) {
        match self.state.run_state {
            RunState::Running => self.pause(),
            RunState::Paused => self.resume(),
            other => trace!("pause toggle ignored while {:?}", other),
        }
    }

    /// Valid from any state
    pub fn reset(&mut self) {
        self.initialize();
    }

    /// Route an input intent to the matching operation
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Move(direction) => {
                self.set_pending_direction(direction);
            }
            Action::Start => self.start(),
            Action::TogglePause => self.toggle_pause(),
            Action::Reset => self.reset(),
        }
    }

    /// Snapshot for rendering
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for scripted scenarios in tests
    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn run_state(&self) -> RunState {
        self.state.run_state
    }

    pub fn direction(&self) -> Direction {
        self.state.snake.direction
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn summary(&self, reason: EndReason) -> GameOverSummary {
        GameOverSummary {
            score: self.state.score,
            length: self.state.snake.len(),
            steps: self.state.steps,
            reason,
        }
    }

    fn end(&mut self, reason: EndReason) -> StepResult {
        self.state.run_state = RunState::Ended;
        info!(
            "game over ({:?}) score {} after {} steps",
            reason, self.state.score, self.state.steps
        );
        StepResult::Terminated(reason)
    }

    fn speed_up(&mut self) -> Option<Duration> {
        let floor = self.config.min_tick();
        if self.tick_interval <= floor {
            return None;
        }
        let next = self
            .tick_interval
            .saturating_sub(self.config.speed_step())
            .max(floor);
        if next == self.tick_interval {
            return None;
        }
        self.tick_interval = next;
        debug!("tick interval now {}ms", next.as_millis());
        Some(next)
    }
}

/// Horizontal snake centered on the grid, heading right
fn initial_snake(config: &GameConfig) -> Snake {
    let center_x = (config.grid_width / 2) as i32;
    let center_y = (config.grid_height / 2) as i32;
    Snake::new(
        Position::new(center_x, center_y),
        Direction::Right,
        config.initial_snake_length,
    )
}

/// Pick a cell uniformly among those the snake does not cover.
///
/// Rejection sampling is tried a bounded number of times, then the free
/// cells are enumerated. Returns `None` when the snake fills the grid.
fn spawn_food(rng: &mut StdRng, config: &GameConfig, snake: &Snake) -> Option<Position> {
    for _ in 0..config.max_food_attempts {
        let x = rng.gen_range(0..config.grid_width) as i32;
        let y = rng.gen_range(0..config.grid_height) as i32;
        let pos = Position::new(x, y);

        if !snake.occupies(pos) {
            return Some(pos);
        }
    }

    let free: Vec<Position> = (0..config.grid_height as i32)
        .flat_map(|y| (0..config.grid_width as i32).map(move |x| Position::new(x, y)))
        .filter(|pos| !snake.occupies(*pos))
        .collect();
    free.choose(rng).copied()
}

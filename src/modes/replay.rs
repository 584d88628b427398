//! Headless mode that plays a scripted sequence of moves
//!
//! Each character of the script is consumed on one tick:
//!
//! - `U`, `D`, `L`, `R` (any case): request that direction
//! - `.`: no input this tick
//! - whitespace: ignored
//!
//! Once the script runs out the snake keeps going straight until the game
//! ends or the tick limit is hit.

use anyhow::{Result, bail};
use log::{debug, info};
use serde::Serialize;

use crate::game::{Action, Direction, GameEngine, GameOverSummary, GameState, StepResult};
use crate::metrics::GameMetrics;
use crate::render::{Presentation, View};

/// Parse a move script into one optional direction per tick
pub fn parse_script(script: &str) -> Result<Vec<Option<Direction>>> {
    let mut moves = Vec::new();

    for (index, c) in script.chars().enumerate() {
        if c.is_whitespace() {
            continue;
        }
        if c == '.' {
            moves.push(None);
            continue;
        }
        match c.to_string().parse::<Direction>() {
            Ok(direction) => moves.push(Some(direction)),
            Err(_) => bail!("invalid move '{}' at position {} in script", c, index),
        }
    }

    Ok(moves)
}

/// Final report of a replay
#[derive(Debug, Clone, Serialize)]
pub struct ReplayOutcome {
    /// Set when the session ended before the tick limit
    pub game_over: Option<GameOverSummary>,
    pub ticks: u32,
    pub tick_interval_ms: u64,
    pub final_state: GameState,
}

pub struct ReplayMode<P: Presentation> {
    engine: GameEngine,
    presenter: P,
    metrics: GameMetrics,
    moves: Vec<Option<Direction>>,
    max_ticks: u32,
}

impl<P: Presentation> ReplayMode<P> {
    pub fn new(
        engine: GameEngine,
        presenter: P,
        moves: Vec<Option<Direction>>,
        max_ticks: u32,
    ) -> Self {
        Self {
            engine,
            presenter,
            metrics: GameMetrics::new(),
            moves,
            max_ticks,
        }
    }

    /// Play the script to completion. The engine is reset after a game over,
    /// so the returned snapshot is taken just before that.
    pub fn run(&mut self) -> Result<ReplayOutcome> {
        info!(
            "replaying {} scripted moves, limit {} ticks",
            self.moves.len(),
            self.max_ticks
        );
        self.engine.start();
        self.metrics.on_game_start();

        let mut game_over = None;
        let mut ticks = 0;

        while ticks < self.max_ticks {
            if let Some(Some(direction)) = self.moves.get(ticks as usize) {
                self.engine.apply(Action::from(*direction));
            }

            let result = self.engine.advance();
            ticks += 1;

            match result {
                StepResult::Continue(info) => {
                    if let Some(period) = info.speed_change {
                        debug!("tick {} sped up to {}ms", ticks, period.as_millis());
                    }
                    self.render()?;
                }
                StepResult::Terminated(reason) => {
                    let summary = self.engine.summary(reason);
                    self.metrics.on_game_over(summary.score);
                    self.presenter.notify_game_over(&summary)?;
                    game_over = Some(summary);
                    break;
                }
                StepResult::Skipped => break,
            }
        }

        let outcome = ReplayOutcome {
            game_over,
            ticks,
            tick_interval_ms: self.engine.tick_interval().as_millis() as u64,
            final_state: self.engine.state().clone(),
        };

        if outcome.game_over.is_some() {
            self.engine.reset();
        }

        Ok(outcome)
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    fn render(&mut self) -> Result<()> {
        self.metrics.update();
        self.presenter.render(&View {
            state: self.engine.state(),
            tick_interval: self.engine.tick_interval(),
            metrics: &self.metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CollisionType, EndReason, GameConfig, Position, RunState};
    use crate::render::ConsolePresenter;

    /// Records what it was asked to present
    #[derive(Default)]
    struct RecordingPresenter {
        frames: usize,
        game_overs: Vec<GameOverSummary>,
    }

    impl Presentation for RecordingPresenter {
        fn render(&mut self, _view: &View<'_>) -> Result<()> {
            self.frames += 1;
            Ok(())
        }

        fn notify_game_over(&mut self, summary: &GameOverSummary) -> Result<()> {
            self.game_overs.push(summary.clone());
            Ok(())
        }
    }

    fn engine() -> GameEngine {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 11).unwrap();
        engine.state_mut().food = Position::new(0, 0);
        engine
    }

    #[test]
    fn test_parse_script() {
        let moves = parse_script("uR. d\nL").unwrap();
        assert_eq!(
            moves,
            vec![
                Some(Direction::Up),
                Some(Direction::Right),
                None,
                Some(Direction::Down),
                Some(Direction::Left),
            ]
        );

        let err = parse_script("UUx").unwrap_err();
        assert!(err.to_string().contains("position 2"));
    }

    #[test]
    fn test_replay_stops_at_tick_limit() {
        let mut replay = ReplayMode::new(engine(), RecordingPresenter::default(), Vec::new(), 3);

        let outcome = replay.run().unwrap();

        assert!(outcome.game_over.is_none());
        assert_eq!(outcome.ticks, 3);
        assert_eq!(outcome.final_state.snake.head(), Position::new(13, 10));
        assert_eq!(outcome.final_state.run_state, RunState::Running);
        assert_eq!(replay.presenter().frames, 3);
        assert!(replay.presenter().game_overs.is_empty());
    }

    #[test]
    fn test_replay_reports_wall_collision_once() {
        let moves = parse_script("U").unwrap();
        let mut replay = ReplayMode::new(engine(), RecordingPresenter::default(), moves, 100);

        let outcome = replay.run().unwrap();

        // From (10,10) heading up, the 11th tick leaves the grid.
        assert_eq!(outcome.ticks, 11);
        assert_eq!(
            outcome.game_over.as_ref().map(|s| s.reason),
            Some(EndReason::Collision(CollisionType::Wall))
        );
        assert_eq!(outcome.final_state.run_state, RunState::Ended);
        assert_eq!(replay.presenter().game_overs.len(), 1);
        assert_eq!(replay.presenter().frames, 10);
    }

    #[test]
    fn test_reversal_in_script_is_ignored() {
        let moves = parse_script("L..").unwrap();
        let mut replay = ReplayMode::new(engine(), RecordingPresenter::default(), moves, 3);

        let outcome = replay.run().unwrap();

        assert!(outcome.game_over.is_none());
        assert_eq!(outcome.final_state.snake.head(), Position::new(13, 10));
    }

    #[test]
    fn test_outcome_serializes_to_json() {
        let mut replay = ReplayMode::new(engine(), ConsolePresenter::new(Vec::new()), Vec::new(), 1);
        let outcome = replay.run().unwrap();

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["ticks"], 1);
        assert_eq!(json["tick_interval_ms"], 150);
        assert_eq!(json["final_state"]["run_state"], "running");
        assert_eq!(json["final_state"]["snake"]["direction"], "right");
        assert_eq!(json["final_state"]["snake"]["body"][0]["x"], 11);
    }
}

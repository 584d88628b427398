use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use log::info;
use std::time::Duration;
use tokio::time::interval;

use crate::game::{Action, GameEngine, GameOverSummary, RunState, StepResult};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{Presentation, TerminalPresenter, View};
use crate::scheduler::TickScheduler;

/// Render at 30 FPS (33ms per frame)
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

pub struct HumanMode {
    engine: GameEngine,
    metrics: GameMetrics,
    input_handler: InputHandler,
    scheduler: TickScheduler,
    awaiting_ack: bool,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(engine: GameEngine) -> Self {
        Self {
            engine,
            metrics: GameMetrics::new(),
            input_handler: InputHandler::new(),
            scheduler: TickScheduler::new(),
            awaiting_ack: false,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut presenter = TerminalPresenter::enter()?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut presenter).await;

        presenter.leave()?;

        result
    }

    async fn run_game_loop(&mut self, presenter: &mut TerminalPresenter) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut render_timer = interval(FRAME_INTERVAL);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        if self.handle_event(event) {
                            presenter.acknowledge();
                        }
                    }
                }

                // Game logic tick, only armed while running
                _ = self.scheduler.tick() => {
                    if let Some(summary) = self.on_tick() {
                        presenter.notify_game_over(&summary)?;
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    presenter.render(&View {
                        state: self.engine.state(),
                        tick_interval: self.engine.tick_interval(),
                        metrics: &self.metrics,
                    })?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        info!(
            "session over: {} games, best score {}",
            self.metrics.games_played, self.metrics.high_score
        );
        Ok(())
    }

    /// Returns true when the event dismissed a game-over notice
    fn handle_event(&mut self, event: Event) -> bool {
        let action = match event {
            // Only process key press events, not release
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                self.input_handler.handle_key_event(key)
            }
            Event::Mouse(mouse) => self.input_handler.handle_mouse_event(mouse),
            _ => return false,
        };

        self.handle_key_action(action)
    }

    /// Gate an intent on the current run state and forward it to the engine.
    /// Returns true when a pending game-over notice was acknowledged.
    fn handle_key_action(&mut self, action: KeyAction) -> bool {
        let action = match action {
            KeyAction::Quit => {
                self.should_quit = true;
                return false;
            }
            KeyAction::None => return false,
            KeyAction::Game(action) => action,
        };

        if self.awaiting_ack {
            if matches!(action, Action::Start | Action::Reset) {
                self.awaiting_ack = false;
                self.reset_game();
                return true;
            }
            return false;
        }

        match (action, self.engine.run_state()) {
            (Action::Move(_), RunState::Running) => self.engine.apply(action),
            (Action::Start, RunState::Idle) => {
                self.engine.start();
                self.scheduler.arm(self.engine.tick_interval());
                self.metrics.on_game_start();
            }
            (Action::Start, RunState::Paused) | (Action::TogglePause, RunState::Paused) => {
                self.engine.resume();
                self.scheduler.arm(self.engine.tick_interval());
                self.metrics.on_resume();
            }
            (Action::TogglePause, RunState::Running) => {
                self.engine.pause();
                self.scheduler.disarm();
                self.metrics.on_pause();
            }
            (Action::Reset, _) => self.reset_game(),
            _ => {}
        }

        false
    }

    /// Advance the engine once; returns the summary when the game just ended
    fn on_tick(&mut self) -> Option<GameOverSummary> {
        match self.engine.advance() {
            StepResult::Continue(info) => {
                if let Some(period) = info.speed_change {
                    self.scheduler.reschedule(period);
                }
                None
            }
            StepResult::Terminated(reason) => {
                self.scheduler.disarm();
                self.metrics.on_game_over(self.engine.state().score);
                self.awaiting_ack = true;
                Some(self.engine.summary(reason))
            }
            StepResult::Skipped => None,
        }
    }

    fn reset_game(&mut self) {
        self.engine.reset();
        self.scheduler.disarm();
        self.metrics.on_reset();
    }
}

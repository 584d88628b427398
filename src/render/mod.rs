//! Presentation sinks for the engine's snapshots
//!
//! The engine does not know how it is displayed. After each tick a mode hands
//! a [`View`] to a [`Presentation`], and when a session ends it calls
//! [`Presentation::notify_game_over`] exactly once.

pub mod console;
pub mod renderer;
pub mod terminal;

use std::time::Duration;

use anyhow::Result;

use crate::game::{GameOverSummary, GameState};
use crate::metrics::GameMetrics;

pub use console::ConsolePresenter;
pub use renderer::Renderer;
pub use terminal::TerminalPresenter;

/// Everything needed to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    pub state: &'a GameState,
    pub tick_interval: Duration,
    pub metrics: &'a GameMetrics,
}

pub trait Presentation {
    /// Draw the latest snapshot
    fn render(&mut self, view: &View<'_>) -> Result<()>;

    /// Tell the player the session is over. The caller resets the engine once
    /// the player has acknowledged it.
    fn notify_game_over(&mut self, summary: &GameOverSummary) -> Result<()>;
}

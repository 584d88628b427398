use std::io::{Stderr, stderr};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use super::{Presentation, Renderer, View};
use crate::game::GameOverSummary;

/// Full-screen presentation on the controlling terminal.
///
/// The game-over panel stays up until [`TerminalPresenter::acknowledge`]
/// is called.
pub struct TerminalPresenter {
    terminal: Terminal<CrosstermBackend<Stderr>>,
    renderer: Renderer,
    game_over: Option<GameOverSummary>,
}

impl TerminalPresenter {
    /// Switch the terminal into raw mode on the alternate screen
    pub fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        execute!(stderr, EnableMouseCapture).context("Failed to enable mouse capture")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        Ok(Self {
            terminal,
            renderer: Renderer::new(),
            game_over: None,
        })
    }

    /// Dismiss the game-over notice
    pub fn acknowledge(&mut self) {
        self.game_over = None;
    }

    /// Restore the terminal to its normal mode
    pub fn leave(&mut self) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(self.terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        self.terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

impl Presentation for TerminalPresenter {
    fn render(&mut self, view: &View<'_>) -> Result<()> {
        let renderer = &self.renderer;
        let game_over = self.game_over.as_ref();
        self.terminal
            .draw(|frame| renderer.render(frame, view, game_over))
            .context("Failed to draw frame")?;
        Ok(())
    }

    fn notify_game_over(&mut self, summary: &GameOverSummary) -> Result<()> {
        self.game_over = Some(summary.clone());
        Ok(())
    }
}

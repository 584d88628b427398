use std::io::{self, Stdout, Write};

use anyhow::{Context, Result};
use log::trace;

use super::{Presentation, View};
use crate::game::{CollisionType, EndReason, GameOverSummary};

/// Line-oriented presentation for headless runs
pub struct ConsolePresenter<W: Write = Stdout> {
    out: W,
}

impl ConsolePresenter<Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsolePresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presentation for ConsolePresenter<W> {
    fn render(&mut self, view: &View<'_>) -> Result<()> {
        let state = view.state;
        let head = state.snake.head();
        trace!(
            "step {} head ({}, {}) food ({}, {}) score {}",
            state.steps, head.x, head.y, state.food.x, state.food.y, state.score
        );
        Ok(())
    }

    fn notify_game_over(&mut self, summary: &GameOverSummary) -> Result<()> {
        let cause = match summary.reason {
            EndReason::BoardFull => "board full",
            EndReason::Collision(CollisionType::Wall) => "hit the wall",
            EndReason::Collision(CollisionType::SelfCollision) => "hit itself",
        };
        writeln!(
            self.out,
            "Game over ({cause}): score {} length {} after {} steps",
            summary.score, summary.length, summary.steps
        )
        .context("Failed to write game-over notice")?;
        Ok(())
    }
}

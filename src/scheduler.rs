//! Periodic tick source for the simulation
//!
//! The engine only reports its current tick interval. `TickScheduler` owns
//! the timer that turns that interval into calls to `advance()`, and is
//! rebuilt whenever the interval changes or the game pauses.

use std::time::Duration;

use log::trace;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// A cancellable repeating timer
#[derive(Debug, Default)]
pub struct TickScheduler {
    timer: Option<Interval>,
    period: Option<Duration>,
}

impl TickScheduler {
    /// A scheduler that is not ticking
    pub fn new() -> Self {
        Self::default()
    }

    /// Start ticking every `period`, the first tick one period from now.
    /// Replaces any timer already running.
    pub fn arm(&mut self, period: Duration) {
        let mut timer = interval_at(Instant::now() + period, period);
        // A slow frame should push the next tick back, not fire a burst.
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.timer = Some(timer);
        self.period = Some(period);
        trace!("scheduler armed at {}ms", period.as_millis());
    }

    /// Cancel the timer
    pub fn disarm(&mut self) {
        if self.timer.take().is_some() {
            trace!("scheduler disarmed");
        }
        self.period = None;
    }

    /// Re-issue the timer at a new period if it is currently armed
    pub fn reschedule(&mut self, period: Duration) {
        if self.is_armed() && self.period != Some(period) {
            self.arm(period);
        }
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    /// The period of the armed timer
    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    /// Wait for the next tick. Never resolves while disarmed, so it can sit
    /// in a `tokio::select!` next to other event sources.
    pub async fn tick(&mut self) {
        match self.timer.as_mut() {
            Some(timer) => {
                timer.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

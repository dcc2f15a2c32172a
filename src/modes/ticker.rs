use std::time::Duration;

use tokio::time::{Interval, MissedTickBehavior, interval};

use crate::game::Ticker;

/// [`Ticker`] backed by a tokio interval.
///
/// Must be scheduled from inside a tokio runtime. While nothing is
/// scheduled, [`tick`](Self::tick) never completes, so it can sit in a
/// `tokio::select!` unconditionally.
#[derive(Debug, Default)]
pub struct IntervalTicker {
    interval: Option<Interval>,
}

impl IntervalTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the next tick of the active schedule
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

impl Ticker for IntervalTicker {
    fn schedule(&mut self, period: Duration) {
        let mut timer = interval(period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(timer);
    }

    fn cancel(&mut self) {
        self.interval = None;
    }

    fn is_active(&self) -> bool {
        self.interval.is_some()
    }
}

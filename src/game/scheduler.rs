//! Game loop scheduling.
//!
//! The loop does not own a clock. The host supplies a [`Ticker`] wired to
//! whatever timing primitive it has (a tokio interval, a test clock, an
//! animation callback) and calls [`GameLoop::on_tick`] whenever it fires.

use std::time::Duration;

use rand::Rng;
use rand::rngs::StdRng;

use super::{
    action::Direction,
    config::{GameConfig, LevelConfig},
    engine::{GameEngine, TickOutcome},
    error::GameError,
    events::GameListener,
    state::{Mode, WorldState},
};

/// A periodic invoker with at most one active schedule
pub trait Ticker {
    /// Begin firing every `period`, replacing any active schedule
    fn schedule(&mut self, period: Duration);

    /// Stop firing; safe to call when nothing is scheduled
    fn cancel(&mut self);

    fn is_active(&self) -> bool;
}

/// Ticker driven by hand, for tests and step-by-step hosts
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ManualTicker {
    period: Option<Duration>,
    schedules: usize,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    /// Number of times a schedule has been started
    pub fn schedules(&self) -> usize {
        self.schedules
    }

    /// Periodic processes currently alive (zero or one)
    pub fn active_processes(&self) -> usize {
        usize::from(self.period.is_some())
    }
}

impl Ticker for ManualTicker {
    fn schedule(&mut self, period: Duration) {
        self.period = Some(period);
        self.schedules += 1;
    }

    fn cancel(&mut self) {
        self.period = None;
    }

    fn is_active(&self) -> bool {
        self.period.is_some()
    }
}

/// Drives a [`GameEngine`] at the level's tick interval
pub struct GameLoop<T: Ticker, R: Rng = StdRng> {
    engine: GameEngine<R>,
    ticker: T,
}

impl<T: Ticker, R: Rng> GameLoop<T, R> {
    pub fn new(config: GameConfig, rng: R, ticker: T) -> Self {
        Self {
            engine: GameEngine::new(config, rng),
            ticker,
        }
    }

    pub fn engine(&self) -> &GameEngine<R> {
        &self.engine
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn ticker_mut(&mut self) -> &mut T {
        &mut self.ticker
    }

    pub fn world(&self) -> Option<&WorldState> {
        self.engine.world()
    }

    pub fn mode(&self) -> Option<Mode> {
        self.engine.mode()
    }

    pub fn subscribe(&mut self, listener: impl GameListener + 'static) {
        self.engine.subscribe(listener);
    }

    /// (Re)start `level`. Any running schedule is cancelled before the new
    /// world is built; on error nothing is left ticking.
    pub fn start(&mut self, level: LevelConfig) -> Result<(), GameError> {
        self.ticker.cancel();
        let period = Duration::from_millis(level.tick_interval_ms);
        self.engine.start(level)?;
        self.ticker.schedule(period);
        Ok(())
    }

    /// Like [`start`](Self::start) but on a prepared world
    pub fn start_with(&mut self, level: LevelConfig, world: WorldState) -> Result<(), GameError> {
        self.ticker.cancel();
        let period = Duration::from_millis(level.tick_interval_ms);
        self.engine.start_with(level, world)?;
        self.ticker.schedule(period);
        Ok(())
    }

    /// Stop ticking; the world is kept for display
    pub fn stop(&mut self) {
        self.ticker.cancel();
    }

    /// Stop ticking and discard the world
    pub fn reset(&mut self) {
        self.stop();
        self.engine.clear();
    }

    pub fn pause(&mut self) {
        self.engine.pause();
    }

    pub fn resume(&mut self) {
        self.engine.resume();
    }

    pub fn toggle_pause(&mut self) {
        self.engine.toggle_pause();
    }

    pub fn submit_direction(&mut self, direction: Direction) {
        self.engine.submit_direction(direction);
    }

    /// Called by the host each time the ticker fires.
    ///
    /// A win or loss cancels the schedule so the world stays frozen until
    /// the next start.
    pub fn on_tick(&mut self) -> TickOutcome {
        if !self.ticker.is_active() {
            return TickOutcome::Inactive;
        }

        let outcome = self.engine.tick();
        if outcome.is_terminal() {
            self.stop();
        }
        outcome
    }
}

//! Output events fired by the engine while a tick is applied.
//!
//! Rendering, audio and advisory collaborators subscribe here; they only
//! observe and never write back into the world.

use super::state::{Mistake, Token};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    ScoreGained(u32),
    /// Remaining tokens after a change, in placement order
    TokensChanged(Vec<Token>),
    Win,
    /// `None` for collisions, `Some` for a token eaten out of order
    Lose(Option<Mistake>),
}

/// Receives [`GameEvent`]s synchronously, at the point they occur
pub trait GameListener {
    fn on_event(&mut self, event: &GameEvent);
}

impl<F> GameListener for F
where
    F: FnMut(&GameEvent),
{
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Registered listeners, notified in subscription order
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Box<dyn GameListener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl GameListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn emit(&mut self, event: GameEvent) {
        for listener in &mut self.listeners {
            listener.on_event(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

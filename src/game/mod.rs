//! Core game logic module for Number Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The host drives it through [`GameLoop`] and observes it through [`GameEvent`]s.

pub mod action;
pub mod campaign;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod placement;
pub mod scheduler;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use campaign::{Campaign, CampaignStatus};
pub use config::{GameConfig, LevelConfig, Order};
pub use engine::{GameEngine, LossCause, TickOutcome};
pub use error::{ConfigError, GameError};
pub use events::{EventBus, GameEvent, GameListener};
pub use placement::PlacementGenerator;
pub use scheduler::{GameLoop, ManualTicker, Ticker};
pub use state::{CollisionType, Mistake, Mode, Position, Snake, SnakeSegment, Token, WorldState};

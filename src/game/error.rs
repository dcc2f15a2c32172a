//! Errors surfaced to the host when a level cannot be set up.
//!
//! Gameplay outcomes (wall, self, obstacle, wrong-order token) are never
//! errors; they are modelled as [`Mode::Lost`](super::Mode::Lost).

/// A malformed [`GameConfig`](super::GameConfig) or
/// [`LevelConfig`](super::LevelConfig).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Token value range has `min > max`.
    #[error("value range is empty (min: {min}, max: {max})")]
    EmptyRange { min: i32, max: i32 },

    /// A level must place at least one token.
    #[error("token count must be at least 1")]
    NoTokens,

    /// More tokens requested than distinct values available.
    #[error("token count {count} exceeds the {available} distinct values in range")]
    TooManyTokens { count: usize, available: u64 },

    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,

    #[error("grid {width}x{height} is too small (min side: {min})")]
    GridTooSmall {
        width: usize,
        height: usize,
        min: usize,
    },

    /// Snake must start with at least three segments and fit on the grid.
    #[error("initial snake length {length} is invalid (min: {min}, max: {max})")]
    InvalidSnakeLength {
        length: usize,
        min: usize,
        max: usize,
    },

    #[error("obstacle bounds are inverted (min: {min}, max: {max})")]
    InvalidObstacleRange { min: usize, max: usize },

    #[error("placement retry ceiling must be greater than zero")]
    ZeroRetryCeiling,

    #[error("campaign has no levels")]
    NoLevels,

    #[error("level {number} does not exist (campaign has {count})")]
    UnknownLevel { number: usize, count: usize },
}

/// Errors returned by [`GameEngine::start`](super::GameEngine::start).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Grid too full to place the requested entities within the retry ceiling.
    #[error("no free cell found after {attempts} attempts ({occupied} cells occupied)")]
    PlacementExhausted { attempts: u32, occupied: usize },
}

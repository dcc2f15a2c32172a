use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Smallest grid side that still leaves room to manoeuvre.
pub const MIN_GRID_SIDE: usize = 5;

/// Shortest snake a level may start with.
pub const MIN_SNAKE_LENGTH: usize = 3;

/// Configuration for the game board, shared by every level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Fewest obstacles placed per level (inclusive)
    pub min_obstacles: usize,
    /// Most obstacles placed per level (inclusive)
    pub max_obstacles: usize,
    /// Attempts the placement generator makes before giving up on one cell
    pub placement_retry_limit: u32,
    /// Points awarded for each token eaten in order
    pub points_per_token: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            initial_snake_length: 3,
            min_obstacles: 4,
            max_obstacles: 6,
            placement_retry_limit: 10_000,
            points_per_token: 10,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Square grid with side `size`
    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width < MIN_GRID_SIDE || self.grid_height < MIN_GRID_SIDE {
            return Err(ConfigError::GridTooSmall {
                width: self.grid_width,
                height: self.grid_height,
                min: MIN_GRID_SIDE,
            });
        }

        if self.initial_snake_length < MIN_SNAKE_LENGTH
            || self.initial_snake_length > self.grid_height
        {
            return Err(ConfigError::InvalidSnakeLength {
                length: self.initial_snake_length,
                min: MIN_SNAKE_LENGTH,
                max: self.grid_height,
            });
        }

        if self.min_obstacles > self.max_obstacles {
            return Err(ConfigError::InvalidObstacleRange {
                min: self.min_obstacles,
                max: self.max_obstacles,
            });
        }

        if self.placement_retry_limit == 0 {
            return Err(ConfigError::ZeroRetryCeiling);
        }

        Ok(())
    }
}

/// Order in which tokens must be eaten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Order {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Order::Ascending => "ascending",
            Order::Descending => "descending",
        }
    }
}

/// Immutable parameters for one playthrough of a level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub name: String,
    /// Inclusive `[min, max]` range token values are drawn from
    pub range: (i32, i32),
    /// Number of tokens placed
    pub count: usize,
    pub order: Order,
    /// Milliseconds between two ticks
    pub tick_interval_ms: u64,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self::new("Warm-up", (-10, 10), 5, Order::Ascending, 250)
    }
}

impl LevelConfig {
    pub fn new(
        name: impl Into<String>,
        range: (i32, i32),
        count: usize,
        order: Order,
        tick_interval_ms: u64,
    ) -> Self {
        Self {
            name: name.into(),
            range,
            count,
            order,
            tick_interval_ms,
        }
    }

    /// The five built-in levels, easiest first
    pub fn presets() -> Vec<LevelConfig> {
        vec![
            Self::new("Warm-up", (-10, 10), 5, Order::Ascending, 250),
            Self::new("Into the negatives", (-30, 5), 7, Order::Ascending, 220),
            Self::new("Reversal", (-20, 20), 8, Order::Descending, 200),
            Self::new("Chaos", (-50, 50), 10, Order::Ascending, 180),
            Self::new("Summit", (-100, 100), 12, Order::Descending, 160),
        ]
    }

    pub fn min(&self) -> i32 {
        self.range.0
    }

    pub fn max(&self) -> i32 {
        self.range.1
    }

    /// Number of distinct values in the range (zero when the range is empty)
    pub fn available_values(&self) -> u64 {
        let (min, max) = (i64::from(self.min()), i64::from(self.max()));
        if min > max { 0 } else { (max - min + 1) as u64 }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min() > self.max() {
            return Err(ConfigError::EmptyRange {
                min: self.min(),
                max: self.max(),
            });
        }

        if self.count == 0 {
            return Err(ConfigError::NoTokens);
        }

        let available = self.available_values();
        if self.count as u64 > available {
            return Err(ConfigError::TooManyTokens {
                count: self.count,
                available,
            });
        }

        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }

        Ok(())
    }
}

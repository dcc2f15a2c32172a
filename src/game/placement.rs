//! Random placement of obstacles and tokens on free grid cells.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::index;

use super::action::Direction;
use super::config::{GameConfig, LevelConfig};
use super::error::GameError;
use super::state::{Position, Snake, Token, WorldState};

/// Samples free cells uniformly, giving up after a bounded number of draws
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementGenerator {
    grid_width: usize,
    grid_height: usize,
    retry_limit: u32,
}

impl PlacementGenerator {
    pub fn new(grid_width: usize, grid_height: usize, retry_limit: u32) -> Self {
        Self {
            grid_width,
            grid_height,
            retry_limit,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.grid_width,
            config.grid_height,
            config.placement_retry_limit,
        )
    }

    /// Draw a random cell that is not in `occupied`
    pub fn place<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        occupied: &HashSet<Position>,
    ) -> Result<Position, GameError> {
        for _ in 0..self.retry_limit {
            let x = rng.gen_range(0..self.grid_width) as i32;
            let y = rng.gen_range(0..self.grid_height) as i32;
            let pos = Position::new(x, y);

            if !occupied.contains(&pos) {
                return Ok(pos);
            }
        }

        tracing::warn!(
            attempts = self.retry_limit,
            occupied = occupied.len(),
            "placement retry ceiling reached"
        );
        Err(GameError::PlacementExhausted {
            attempts: self.retry_limit,
            occupied: occupied.len(),
        })
    }

    /// Starting snake: middle column, three quarters down, facing up
    pub fn initial_snake(&self, length: usize) -> Snake {
        let head_x = (self.grid_width / 2) as i32;
        let head_y = (self.grid_height * 3 / 4).min(self.grid_height.saturating_sub(length)) as i32;

        Snake::new(Position::new(head_x, head_y), Direction::Up, length)
    }

    /// Build a fresh world for `level`: snake, then obstacles, then tokens.
    ///
    /// Both configs must already be validated.
    pub fn populate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        game: &GameConfig,
        level: &LevelConfig,
    ) -> Result<WorldState, GameError> {
        let snake = self.initial_snake(game.initial_snake_length);
        let mut occupied: HashSet<Position> = snake.positions().collect();

        let obstacle_count = rng.gen_range(game.min_obstacles..=game.max_obstacles);
        let mut obstacles = Vec::with_capacity(obstacle_count);
        for _ in 0..obstacle_count {
            let pos = self.place(rng, &occupied)?;
            occupied.insert(pos);
            obstacles.push(pos);
        }

        let values = sample_values(rng, level);
        let mut tokens = Vec::with_capacity(values.len());
        for value in values {
            let pos = self.place(rng, &occupied)?;
            occupied.insert(pos);
            tokens.push(Token::new(pos, value));
        }

        Ok(WorldState::new(
            snake,
            tokens,
            obstacles,
            self.grid_width,
            self.grid_height,
        ))
    }
}

/// Draw `level.count` distinct values from the level's range
pub fn sample_values<R: Rng + ?Sized>(rng: &mut R, level: &LevelConfig) -> Vec<i32> {
    let available = level.available_values() as usize;
    let amount = level.count.min(available);
    let min = i64::from(level.min());

    index::sample(rng, available, amount)
        .into_iter()
        .map(|offset| (min + offset as i64) as i32)
        .collect()
}

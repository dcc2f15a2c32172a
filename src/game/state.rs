use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::action::Direction;
use super::config::Order;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// One cell of the snake's body.
///
/// `value` is set on segments grown from a digested token and is only used
/// for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnakeSegment {
    pub position: Position,
    pub value: Option<i32>,
}

impl SnakeSegment {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            value: None,
        }
    }

    pub fn digested(position: Position, value: i32) -> Self {
        Self {
            position,
            value: Some(value),
        }
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<SnakeSegment>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let body = (0..length.max(1) as i32)
            .map(|i| SnakeSegment::new(head.moved_by(-dx * i, -dy * i)))
            .collect();

        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0].position
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.body.iter().map(|segment| segment.position)
    }

    /// Check if any segment, head and tail included, sits on `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.positions().any(|p| p == pos)
    }

    /// Push `head` onto the front; drop the tail unless growing
    pub fn advance(&mut self, head: SnakeSegment, grow: bool) {
        self.body.insert(0, head);

        if !grow {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// A numbered apple on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub position: Position,
    pub value: i32,
}

impl Token {
    pub fn new(position: Position, value: i32) -> Self {
        Self { position, value }
    }
}

/// Play-session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Level is set up; movement waits for the first direction command
    WaitingInput,
    Running,
    Paused,
    Won,
    Lost,
}

impl Mode {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Mode::Won | Mode::Lost)
    }
}

/// A token eaten out of order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mistake {
    /// Value that was eaten
    pub wrong: i32,
    /// Value that should have been eaten
    pub correct: i32,
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// Snake hit an obstacle
    Obstacle,
}

/// Complete snapshot of one level in play
#[derive(Debug, Clone, PartialEq)]
pub struct WorldState {
    pub snake: Snake,
    /// Remaining tokens, in placement order
    pub tokens: Vec<Token>,
    pub obstacles: Vec<Position>,
    /// Direction requested since the last tick
    pub pending_direction: Option<Direction>,
    /// False until the first movement tick has adopted a direction
    pub direction_established: bool,
    pub grid_width: usize,
    pub grid_height: usize,
    pub score: u32,
    pub ticks: u64,
    pub mode: Mode,
}

impl WorldState {
    /// Create a new world waiting for its first direction command
    pub fn new(
        snake: Snake,
        tokens: Vec<Token>,
        obstacles: Vec<Position>,
        grid_width: usize,
        grid_height: usize,
    ) -> Self {
        Self {
            snake,
            tokens,
            obstacles,
            pending_direction: None,
            direction_established: false,
            grid_width,
            grid_height,
            score: 0,
            ticks: 0,
            mode: Mode::WaitingInput,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    pub fn has_obstacle(&self, pos: Position) -> bool {
        self.obstacles.contains(&pos)
    }

    /// Index into `tokens` of the token at `pos`
    pub fn token_at(&self, pos: Position) -> Option<usize> {
        self.tokens.iter().position(|t| t.position == pos)
    }

    /// Every cell held by the snake, a token or an obstacle
    pub fn occupied_cells(&self) -> HashSet<Position> {
        self.snake
            .positions()
            .chain(self.tokens.iter().map(|t| t.position))
            .chain(self.obstacles.iter().copied())
            .collect()
    }

    pub fn token_values(&self) -> Vec<i32> {
        self.tokens.iter().map(|t| t.value).collect()
    }

    /// The value that must be eaten next, `None` once all tokens are gone
    pub fn target_value(&self, order: Order) -> Option<i32> {
        let values = self.tokens.iter().map(|t| t.value);
        match order {
            Order::Ascending => values.min(),
            Order::Descending => values.max(),
        }
    }
}

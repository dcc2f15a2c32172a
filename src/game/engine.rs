use rand::Rng;
use rand::rngs::StdRng;

use super::{
    action::Direction,
    config::{GameConfig, LevelConfig, Order},
    error::GameError,
    events::{EventBus, GameEvent, GameListener},
    placement::PlacementGenerator,
    state::{CollisionType, Mistake, Mode, Position, SnakeSegment, WorldState},
};

/// Why a level was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossCause {
    Collision(CollisionType),
    WrongOrder(Mistake),
}

/// What a single tick did to the world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No level is live
    Inactive,
    /// Level already won or lost; nothing changes until the next start
    Frozen,
    /// Paused or waiting for the first direction; positions unchanged
    Idle,
    /// Ordinary move, length unchanged
    Moved,
    /// Target token eaten, snake grew by one
    Ate { value: i32 },
    /// Last token eaten
    Won { value: i32 },
    Lost(LossCause),
}

impl TickOutcome {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TickOutcome::Won { .. } | TickOutcome::Lost(_))
    }
}

/// The game engine that handles all game logic.
///
/// Owns at most one live [`WorldState`]; every mutation goes through the
/// named operations below. Randomness is injected so a seeded generator
/// reproduces a level exactly.
pub struct GameEngine<R: Rng = StdRng> {
    config: GameConfig,
    placement: PlacementGenerator,
    rng: R,
    level: Option<LevelConfig>,
    world: Option<WorldState>,
    events: EventBus,
}

impl<R: Rng> GameEngine<R> {
    /// Create a new game engine with the given configuration and random source
    pub fn new(config: GameConfig, rng: R) -> Self {
        Self {
            placement: PlacementGenerator::from_config(&config),
            config,
            rng,
            level: None,
            world: None,
            events: EventBus::new(),
        }
    }

    pub fn subscribe(&mut self, listener: impl GameListener + 'static) {
        self.events.subscribe(listener);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn level(&self) -> Option<&LevelConfig> {
        self.level.as_ref()
    }

    pub fn world(&self) -> Option<&WorldState> {
        self.world.as_ref()
    }

    pub fn mode(&self) -> Option<Mode> {
        self.world.as_ref().map(|w| w.mode)
    }

    /// Value that must be eaten next in the live level
    pub fn target_value(&self) -> Option<i32> {
        let (world, level) = (self.world.as_ref()?, self.level.as_ref()?);
        world.target_value(level.order)
    }

    /// Validate both configs, build a fresh world and wait for input.
    ///
    /// Any previous world is discarded first, so a failed start leaves the
    /// engine without a live level.
    pub fn start(&mut self, level: LevelConfig) -> Result<(), GameError> {
        self.clear();
        self.config.validate()?;
        level.validate()?;

        let world = self
            .placement
            .populate(&mut self.rng, &self.config, &level)?;
        self.install(level, world);
        Ok(())
    }

    /// Start `level` on a prepared world instead of a generated one
    pub fn start_with(&mut self, level: LevelConfig, world: WorldState) -> Result<(), GameError> {
        self.clear();
        level.validate()?;
        self.install(level, world);
        Ok(())
    }

    fn install(&mut self, level: LevelConfig, mut world: WorldState) {
        world.mode = Mode::WaitingInput;
        world.pending_direction = None;
        world.direction_established = false;

        tracing::info!(
            level = %level.name,
            order = level.order.as_str(),
            tokens = world.tokens.len(),
            obstacles = world.obstacles.len(),
            "level started"
        );

        let tokens = world.tokens.clone();
        self.level = Some(level);
        self.world = Some(world);
        self.events.emit(GameEvent::TokensChanged(tokens));
    }

    /// Discard the live world, if any
    pub fn clear(&mut self) {
        self.world = None;
        self.level = None;
    }

    /// Buffer a direction for the next tick.
    ///
    /// The first command after a start also releases the level from
    /// [`Mode::WaitingInput`].
    pub fn submit_direction(&mut self, direction: Direction) {
        let Some(world) = self.world.as_mut() else {
            return;
        };

        match world.mode {
            Mode::WaitingInput => {
                world.mode = Mode::Running;
                world.pending_direction = Some(direction);
            }
            Mode::Running | Mode::Paused => world.pending_direction = Some(direction),
            Mode::Won | Mode::Lost => {}
        }
    }

    /// Suspend movement; repeated calls keep the level paused
    pub fn pause(&mut self) {
        if let Some(world) = self.world.as_mut() {
            if world.mode == Mode::Running {
                world.mode = Mode::Paused;
            }
        }
    }

    pub fn resume(&mut self) {
        if let Some(world) = self.world.as_mut() {
            if world.mode == Mode::Paused {
                world.mode = Mode::Running;
            }
        }
    }

    /// Pause when running, resume when paused
    pub fn toggle_pause(&mut self) {
        match self.mode() {
            Some(Mode::Running) => self.pause(),
            Some(Mode::Paused) => self.resume(),
            _ => {}
        }
    }

    /// Advance the live world by exactly one step and fire resulting events
    pub fn tick(&mut self) -> TickOutcome {
        let (Some(world), Some(level)) = (self.world.as_mut(), self.level.as_ref()) else {
            return TickOutcome::Inactive;
        };

        let mut fired = Vec::new();
        let outcome = step(world, level.order, self.config.points_per_token, &mut fired);

        match outcome {
            TickOutcome::Won { .. } => {
                tracing::info!(level = %level.name, score = world.score, "level won");
            }
            TickOutcome::Lost(cause) => {
                tracing::info!(level = %level.name, ?cause, "level lost");
            }
            _ => {}
        }

        for event in fired {
            self.events.emit(event);
        }

        outcome
    }
}

/// Apply one tick of movement, collision and ordering rules to `world`
fn step(world: &mut WorldState, order: Order, points: u32, fired: &mut Vec<GameEvent>) -> TickOutcome {
    match world.mode {
        Mode::Won | Mode::Lost => return TickOutcome::Frozen,
        Mode::Paused | Mode::WaitingInput => {
            world.ticks += 1;
            return TickOutcome::Idle;
        }
        Mode::Running => {}
    }

    world.ticks += 1;

    // Update direction (prevent 180° turns once a direction is established)
    if let Some(requested) = world.pending_direction.take() {
        let reversal = world.direction_established
            && world.snake.len() > 1
            && world.snake.direction.is_opposite(requested);

        if reversal {
            tracing::debug!(current = ?world.snake.direction, ?requested, "reversal ignored");
        } else {
            world.snake.direction = requested;
        }
    }
    world.direction_established = true;

    let new_head = world.snake.head().moved_in_direction(world.snake.direction);

    if let Some(collision) = check_collision(world, new_head) {
        world.mode = Mode::Lost;
        fired.push(GameEvent::Lose(None));
        return TickOutcome::Lost(LossCause::Collision(collision));
    }

    let Some(index) = world.token_at(new_head) else {
        world.snake.advance(SnakeSegment::new(new_head), false);
        return TickOutcome::Moved;
    };

    let eaten = world.tokens[index];
    // Token set is non-empty here, so a target always exists
    let target = world.target_value(order).unwrap_or(eaten.value);

    if eaten.value != target {
        let mistake = Mistake {
            wrong: eaten.value,
            correct: target,
        };
        world.mode = Mode::Lost;
        fired.push(GameEvent::Lose(Some(mistake)));
        return TickOutcome::Lost(LossCause::WrongOrder(mistake));
    }

    world.tokens.remove(index);
    world
        .snake
        .advance(SnakeSegment::digested(new_head, eaten.value), true);
    world.score += points;
    tracing::debug!(value = eaten.value, remaining = world.tokens.len(), "token eaten");

    fired.push(GameEvent::ScoreGained(points));
    fired.push(GameEvent::TokensChanged(world.tokens.clone()));

    if world.tokens.is_empty() {
        world.mode = Mode::Won;
        fired.push(GameEvent::Win);
        return TickOutcome::Won { value: eaten.value };
    }

    TickOutcome::Ate { value: eaten.value }
}

/// Wall, then own body, then obstacles
fn check_collision(world: &WorldState, pos: Position) -> Option<CollisionType> {
    if !world.is_in_bounds(pos) {
        return Some(CollisionType::Wall);
    }

    if world.snake.occupies(pos) {
        return Some(CollisionType::SelfCollision);
    }

    if world.has_obstacle(pos) {
        return Some(CollisionType::Obstacle);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{ConfigError, Snake, Token};
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn seeded_engine() -> GameEngine {
        GameEngine::new(GameConfig::default(), StdRng::seed_from_u64(11))
    }

    fn level(order: Order) -> LevelConfig {
        LevelConfig::new("test", (-10, 10), 3, order, 100)
    }

    fn world_with(snake: Snake, tokens: Vec<Token>, obstacles: Vec<Position>) -> WorldState {
        WorldState::new(snake, tokens, obstacles, 10, 10)
    }

    fn recorder(engine: &mut GameEngine) -> Rc<RefCell<Vec<GameEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        engine.subscribe(move |event: &GameEvent| sink.borrow_mut().push(event.clone()));
        log
    }

    #[test]
    fn test_start() {
        let mut engine = seeded_engine();
        let events = recorder(&mut engine);
        engine.start(LevelConfig::default()).unwrap();

        let world = engine.world().unwrap();
        assert_eq!(world.mode, Mode::WaitingInput);
        assert_eq!(world.score, 0);
        assert_eq!(world.ticks, 0);
        assert_eq!(world.snake.len(), 3);
        assert_eq!(world.tokens.len(), 5);
        assert_eq!(
            *events.borrow(),
            vec![GameEvent::TokensChanged(world.tokens.clone())]
        );
    }

    #[test]
    fn test_invalid_level_prevents_world() {
        let mut engine = seeded_engine();
        engine.start(LevelConfig::default()).unwrap();

        let bad = LevelConfig::new("bad", (0, 2), 4, Order::Ascending, 100);
        let err = engine.start(bad).unwrap_err();

        assert!(matches!(
            err,
            GameError::Config(ConfigError::TooManyTokens { .. })
        ));
        assert!(engine.world().is_none());
        assert_eq!(engine.tick(), TickOutcome::Inactive);
    }

    #[test]
    fn test_waiting_for_input_does_not_move() {
        let mut engine = seeded_engine();
        engine.start(LevelConfig::default()).unwrap();
        let head = engine.world().unwrap().snake.head();

        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert_eq!(engine.world().unwrap().snake.head(), head);
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = seeded_engine();
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        engine
            .start_with(level(Order::Ascending), world_with(snake, vec![], vec![]))
            .unwrap();

        engine.submit_direction(Direction::Right);
        assert_eq!(engine.mode(), Some(Mode::Running));
        assert_eq!(engine.tick(), TickOutcome::Moved);

        let world = engine.world().unwrap();
        assert_eq!(world.snake.head(), Position::new(6, 5));
        assert_eq!(world.snake.len(), 3);
        assert_eq!(world.ticks, 1);
    }

    #[test]
    fn test_first_direction_may_be_anything() {
        let mut engine = seeded_engine();
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        engine
            .start_with(level(Order::Ascending), world_with(snake, vec![], vec![]))
            .unwrap();

        // Reverse of the spawn direction is still adopted on the first move;
        // the head then runs into its own neck.
        engine.submit_direction(Direction::Left);
        assert_eq!(
            engine.tick(),
            TickOutcome::Lost(LossCause::Collision(CollisionType::SelfCollision))
        );
        assert_eq!(engine.world().unwrap().snake.direction, Direction::Left);
    }

    #[test]
    fn test_target_consumption() {
        let mut engine = seeded_engine();
        let events = recorder(&mut engine);
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        let tokens = vec![
            Token::new(Position::new(6, 5), -4),
            Token::new(Position::new(0, 9), 7),
        ];
        engine
            .start_with(level(Order::Ascending), world_with(snake, tokens, vec![]))
            .unwrap();

        engine.submit_direction(Direction::Right);
        assert_eq!(engine.tick(), TickOutcome::Ate { value: -4 });

        let world = engine.world().unwrap();
        assert_eq!(world.snake.len(), 4);
        assert_eq!(world.snake.body[0].value, Some(-4));
        assert_eq!(world.score, 10);
        assert_eq!(world.tokens.len(), 1);
        assert_eq!(engine.target_value(), Some(7));
        assert_eq!(
            events.borrow()[1..],
            [
                GameEvent::ScoreGained(10),
                GameEvent::TokensChanged(vec![Token::new(Position::new(0, 9), 7)]),
            ]
        );
    }

    #[test]
    fn test_wrong_order_loses_without_growth() {
        let mut engine = seeded_engine();
        let events = recorder(&mut engine);
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        let tokens = vec![
            Token::new(Position::new(6, 5), 2),
            Token::new(Position::new(0, 9), 7),
        ];
        engine
            .start_with(level(Order::Descending), world_with(snake, tokens, vec![]))
            .unwrap();

        engine.submit_direction(Direction::Right);
        let mistake = Mistake {
            wrong: 2,
            correct: 7,
        };
        assert_eq!(
            engine.tick(),
            TickOutcome::Lost(LossCause::WrongOrder(mistake))
        );

        let world = engine.world().unwrap();
        assert_eq!(world.mode, Mode::Lost);
        assert_eq!(world.snake.len(), 3);
        assert_eq!(world.snake.head(), Position::new(5, 5));
        assert_eq!(world.tokens.len(), 2);
        assert_eq!(events.borrow().last(), Some(&GameEvent::Lose(Some(mistake))));
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = seeded_engine();
        let snake = Snake::new(Position::new(0, 5), Direction::Left, 3);
        engine
            .start_with(level(Order::Ascending), world_with(snake, vec![], vec![]))
            .unwrap();

        engine.submit_direction(Direction::Left);
        assert_eq!(
            engine.tick(),
            TickOutcome::Lost(LossCause::Collision(CollisionType::Wall))
        );
        assert_eq!(engine.mode(), Some(Mode::Lost));
    }

    #[test]
    fn test_obstacle_collision() {
        let mut engine = seeded_engine();
        let events = recorder(&mut engine);
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        engine
            .start_with(
                level(Order::Ascending),
                world_with(snake, vec![], vec![Position::new(6, 5)]),
            )
            .unwrap();

        engine.submit_direction(Direction::Right);
        assert_eq!(
            engine.tick(),
            TickOutcome::Lost(LossCause::Collision(CollisionType::Obstacle))
        );
        assert_eq!(events.borrow().last(), Some(&GameEvent::Lose(None)));
    }

    #[test]
    fn test_self_collision() {
        let mut engine = seeded_engine();

        // Body: (5,5), (4,5), (3,5), (2,5)
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 4);
        engine
            .start_with(level(Order::Ascending), world_with(snake, vec![], vec![]))
            .unwrap();

        // Right: (6,5), (5,5), (4,5), (3,5)
        engine.submit_direction(Direction::Right);
        engine.tick();
        // Down: (6,6), (6,5), (5,5), (4,5)
        engine.submit_direction(Direction::Down);
        engine.tick();
        // Left: (5,6), (6,6), (6,5), (5,5)
        engine.submit_direction(Direction::Left);
        engine.tick();
        // Up: (5,5) is the tail
        engine.submit_direction(Direction::Up);

        assert_eq!(
            engine.tick(),
            TickOutcome::Lost(LossCause::Collision(CollisionType::SelfCollision))
        );
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = seeded_engine();
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        engine
            .start_with(level(Order::Ascending), world_with(snake, vec![], vec![]))
            .unwrap();

        engine.submit_direction(Direction::Right);
        engine.tick();

        engine.submit_direction(Direction::Left);
        assert_eq!(engine.tick(), TickOutcome::Moved);

        let world = engine.world().unwrap();
        assert_eq!(world.snake.direction, Direction::Right);
        assert_eq!(world.snake.head(), Position::new(7, 5));
    }

    #[test]
    fn test_pause_freezes_positions_and_resume_continues() {
        let mut engine = seeded_engine();
        let snake = Snake::new(Position::new(2, 5), Direction::Right, 3);
        engine
            .start_with(level(Order::Ascending), world_with(snake, vec![], vec![]))
            .unwrap();

        engine.submit_direction(Direction::Right);
        engine.tick();
        engine.pause();
        engine.pause();
        assert_eq!(engine.mode(), Some(Mode::Paused));

        let before = engine.world().unwrap().snake.clone();
        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert_eq!(engine.world().unwrap().snake, before);

        engine.toggle_pause();
        assert_eq!(engine.mode(), Some(Mode::Running));
        assert_eq!(engine.tick(), TickOutcome::Moved);
    }

    #[test]
    fn test_pause_ignored_while_waiting() {
        let mut engine = seeded_engine();
        engine.start(LevelConfig::default()).unwrap();
        engine.pause();
        assert_eq!(engine.mode(), Some(Mode::WaitingInput));
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = seeded_engine();
        let snake = Snake::new(Position::new(0, 5), Direction::Left, 3);
        engine
            .start_with(level(Order::Ascending), world_with(snake, vec![], vec![]))
            .unwrap();
        engine.submit_direction(Direction::Left);
        engine.tick();

        let ticks_before = engine.world().unwrap().ticks;
        engine.submit_direction(Direction::Up);
        engine.resume();

        assert_eq!(engine.tick(), TickOutcome::Frozen);
        let world = engine.world().unwrap();
        assert_eq!(world.ticks, ticks_before);
        assert_eq!(world.pending_direction, None);
        assert_eq!(world.mode, Mode::Lost);
    }
}

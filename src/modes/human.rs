use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use rand::rngs::StdRng;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tokio::time::interval;

use super::ticker::IntervalTicker;
use crate::advice::{Advisor, OfflineAdvisor};
use crate::game::{Campaign, CampaignStatus, GameConfig, GameEvent, GameLoop, LevelConfig};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{Renderer, Screen};

pub struct HumanMode {
    game: GameLoop<IntervalTicker, StdRng>,
    campaign: Campaign,
    events: UnboundedReceiver<GameEvent>,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    advisor: OfflineAdvisor,
    message: Option<String>,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, campaign: Campaign, rng: StdRng) -> Self {
        let mut game = GameLoop::new(config, rng, IntervalTicker::new());

        let (tx, events) = unbounded_channel();
        game.subscribe(move |event: &GameEvent| {
            // Fails only once the mode, and with it the receiver, is gone
            let _ = tx.send(event.clone());
        });

        Self {
            game,
            campaign,
            events,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            advisor: OfflineAdvisor,
            message: None,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                // Game logic tick, at the level's own cadence
                _ = self.game.ticker_mut().tick() => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    let screen = Screen {
                        campaign: &self.campaign,
                        world: self.game.world(),
                        metrics: &self.metrics,
                        message: self.message.as_deref(),
                    };
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &screen);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            let action = self.input_handler.handle_key_event(key);
            self.handle_action(action)?;
        }

        Ok(())
    }

    fn handle_action(&mut self, action: KeyAction) -> Result<()> {
        let playing = self.campaign.status() == CampaignStatus::Playing;

        match action {
            KeyAction::Steer(direction) if playing => {
                self.game.submit_direction(direction);
            }
            KeyAction::TogglePause if playing => self.game.toggle_pause(),
            KeyAction::Confirm => self.confirm()?,
            KeyAction::Hint if playing => {
                if let Some(world) = self.game.world() {
                    let hint = self
                        .advisor
                        .hint(self.campaign.current_level(), &world.token_values());
                    self.message = Some(hint);
                }
            }
            KeyAction::Restart => {
                if matches!(
                    self.campaign.status(),
                    CampaignStatus::Playing | CampaignStatus::GameOver
                ) {
                    let level = self.campaign.retry();
                    self.start_level(level)?;
                }
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            _ => {}
        }

        Ok(())
    }

    /// Enter: start, continue, retry or play again depending on status
    fn confirm(&mut self) -> Result<()> {
        let level = match self.campaign.status() {
            CampaignStatus::Menu => Some(self.campaign.begin()),
            CampaignStatus::LevelComplete => self.campaign.advance(),
            CampaignStatus::GameOver => Some(self.campaign.retry()),
            CampaignStatus::Victory => {
                self.campaign.reset();
                Some(self.campaign.begin())
            }
            CampaignStatus::Playing => None,
        };

        if let Some(level) = level {
            self.start_level(level)?;
        }
        Ok(())
    }

    fn start_level(&mut self, level: LevelConfig) -> Result<()> {
        self.game
            .start(level)
            .context("Failed to set up level")?;
        self.metrics.on_level_start();
        self.message = None;
        self.drain_events();
        Ok(())
    }

    fn update_game(&mut self) {
        self.game.on_tick();
        self.drain_events();
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.campaign.record(&event);

            match event {
                GameEvent::Win => {
                    self.metrics.on_level_cleared(self.campaign.total_score());
                    self.message = Some(self.advisor.praise());
                }
                GameEvent::Lose(mistake) => {
                    self.metrics.on_game_over(self.campaign.total_score());
                    self.message = Some(match mistake {
                        Some(mistake) => self
                            .advisor
                            .explain_mistake(self.campaign.current_level(), mistake),
                        None => "Ouch, you crashed!".to_string(),
                    });
                }
                GameEvent::ScoreGained(_) | GameEvent::TokensChanged(_) => {}
            }
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Mode, Ticker};
    use rand::SeedableRng;

    fn mode() -> HumanMode {
        HumanMode::new(
            GameConfig::default(),
            Campaign::new(LevelConfig::presets()).unwrap(),
            StdRng::seed_from_u64(8),
        )
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode();
        assert_eq!(mode.campaign.status(), CampaignStatus::Menu);
        assert!(mode.game.world().is_none());
        assert!(!mode.game.ticker().is_active());
    }

    #[test]
    fn test_steering_ignored_at_menu() {
        let mut mode = mode();
        mode.handle_action(KeyAction::Steer(Direction::Left)).unwrap();
        mode.handle_action(KeyAction::TogglePause).unwrap();
        assert!(mode.game.world().is_none());
    }

    #[tokio::test]
    async fn test_confirm_starts_first_level() {
        let mut mode = mode();
        mode.handle_action(KeyAction::Confirm).unwrap();

        assert_eq!(mode.campaign.status(), CampaignStatus::Playing);
        assert_eq!(mode.game.mode(), Some(Mode::WaitingInput));
        assert!(mode.game.ticker().is_active());

        mode.handle_action(KeyAction::Steer(Direction::Left)).unwrap();
        assert_eq!(mode.game.mode(), Some(Mode::Running));

        mode.handle_action(KeyAction::TogglePause).unwrap();
        assert_eq!(mode.game.mode(), Some(Mode::Paused));
    }

    #[tokio::test]
    async fn test_hint_sets_message() {
        let mut mode = mode();
        mode.handle_action(KeyAction::Confirm).unwrap();
        mode.handle_action(KeyAction::Hint).unwrap();

        let message = mode.message.clone().unwrap();
        assert!(message.starts_with("Eat "));
    }

    #[tokio::test]
    async fn test_crash_records_game_over() {
        let mut mode = mode();
        mode.handle_action(KeyAction::Confirm).unwrap();

        // Turning back into the neck on the first move is fatal
        mode.handle_action(KeyAction::Steer(Direction::Down)).unwrap();
        mode.update_game();

        assert_eq!(mode.game.mode(), Some(Mode::Lost));
        assert_eq!(mode.campaign.status(), CampaignStatus::GameOver);
        assert_eq!(mode.metrics.games_played, 1);
        assert_eq!(mode.message.as_deref(), Some("Ouch, you crashed!"));

        mode.handle_action(KeyAction::Restart).unwrap();
        assert_eq!(mode.campaign.status(), CampaignStatus::Playing);
        assert_eq!(mode.game.mode(), Some(Mode::WaitingInput));
        assert_eq!(mode.message, None);
    }
}

//! Level progression across a run and the running score.

use super::config::LevelConfig;
use super::error::ConfigError;
use super::events::GameEvent;
use super::state::Mistake;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignStatus {
    /// Nothing started yet, or back at the menu after a full reset
    Menu,
    Playing,
    /// Current level won and another one follows
    LevelComplete,
    GameOver,
    /// Last level won
    Victory,
}

#[derive(Debug, Clone)]
pub struct Campaign {
    levels: Vec<LevelConfig>,
    index: usize,
    total_score: u32,
    status: CampaignStatus,
    last_mistake: Option<Mistake>,
}

impl Campaign {
    pub fn new(levels: Vec<LevelConfig>) -> Result<Self, ConfigError> {
        Self::starting_at(levels, 1)
    }

    /// Campaign whose first level is `number` (1-based)
    pub fn starting_at(levels: Vec<LevelConfig>, number: usize) -> Result<Self, ConfigError> {
        if levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        if number == 0 || number > levels.len() {
            return Err(ConfigError::UnknownLevel {
                number,
                count: levels.len(),
            });
        }
        for level in &levels {
            level.validate()?;
        }

        Ok(Self {
            levels,
            index: number - 1,
            total_score: 0,
            status: CampaignStatus::Menu,
            last_mistake: None,
        })
    }

    pub fn current_level(&self) -> &LevelConfig {
        &self.levels[self.index]
    }

    /// 1-based number of the current level
    pub fn level_number(&self) -> usize {
        self.index + 1
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn status(&self) -> CampaignStatus {
        self.status
    }

    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    pub fn last_mistake(&self) -> Option<Mistake> {
        self.last_mistake
    }

    fn is_last_level(&self) -> bool {
        self.index + 1 == self.levels.len()
    }

    /// Mark the current level as in play and hand back its config
    pub fn begin(&mut self) -> LevelConfig {
        self.status = CampaignStatus::Playing;
        self.last_mistake = None;
        self.current_level().clone()
    }

    /// Fold an engine event into the run
    pub fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::ScoreGained(points) => self.total_score += points,
            GameEvent::Win => {
                self.status = if self.is_last_level() {
                    CampaignStatus::Victory
                } else {
                    CampaignStatus::LevelComplete
                };
            }
            GameEvent::Lose(mistake) => {
                self.status = CampaignStatus::GameOver;
                self.last_mistake = *mistake;
            }
            GameEvent::TokensChanged(_) => {}
        }
    }

    /// Move on after a completed level, keeping the score
    pub fn advance(&mut self) -> Option<LevelConfig> {
        if self.status != CampaignStatus::LevelComplete {
            return None;
        }
        self.index += 1;
        Some(self.begin())
    }

    /// Replay the current level from a zero score
    pub fn retry(&mut self) -> LevelConfig {
        self.total_score = 0;
        self.begin()
    }

    /// Back to the first level and the menu
    pub fn reset(&mut self) {
        self.index = 0;
        self.total_score = 0;
        self.status = CampaignStatus::Menu;
        self.last_mistake = None;
    }
}

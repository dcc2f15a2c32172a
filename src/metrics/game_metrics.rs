use std::time::{Duration, Instant};

pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub best_score: u32,
    pub games_played: u32,
    pub levels_cleared: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            best_score: 0,
            games_played: 0,
            levels_cleared: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_level_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_level_cleared(&mut self, total_score: u32) {
        self.levels_cleared += 1;
        self.best_score = self.best_score.max(total_score);
    }

    pub fn on_game_over(&mut self, total_score: u32) {
        self.games_played += 1;
        self.best_score = self.best_score.max(total_score);
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

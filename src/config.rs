use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::board::DEFAULT_COLUMNS;
use crate::engine::{DEFAULT_MATCH_BONUS, DEFAULT_MISMATCH_PENALTY, Scoring};
use crate::error::{GameError, GameResult};
use crate::timer::{TimeFormat, TimerDirection, TimerMode};
use crate::tokens::Theme;

pub const DEFAULT_RESOLVE_DELAY_MS: u32 = 500;

/// Settings for one game. Every browser variant is one of the presets below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub pair_count: usize,
    pub columns: usize,
    /// Seconds. `None` or `0` means no deadline.
    pub time_limit: Option<u32>,
    pub timer_direction: TimerDirection,
    pub scoring_enabled: bool,
    pub match_bonus: u32,
    pub mismatch_penalty: u32,
    pub resolve_delay_ms: u32,
    pub time_format: TimeFormat,
    pub theme: Theme,
}

impl GameConfig {
    /// Canvas variant with landmark photos and a ten second count-down.
    pub fn landmarks() -> Self {
        Self::default()
    }

    /// Landmark photos, scored, counting up to a one minute deadline.
    pub fn landmarks_scored() -> Self {
        Self {
            time_limit: Some(60),
            timer_direction: TimerDirection::Up,
            scoring_enabled: true,
            time_format: TimeFormat::Clock,
            ..Self::default()
        }
    }

    /// DOM variant with letter cards and an open-ended stopwatch.
    pub fn letters() -> Self {
        Self {
            pair_count: 8,
            time_limit: None,
            timer_direction: TimerDirection::Up,
            time_format: TimeFormat::Clock,
            theme: Theme::Letters,
            ..Self::default()
        }
    }

    /// Letter cards against a 45 second count-down, scored.
    pub fn letters_timed() -> Self {
        Self {
            pair_count: 8,
            time_limit: Some(45),
            scoring_enabled: true,
            theme: Theme::Letters,
            ..Self::default()
        }
    }

    pub fn preset(name: &str) -> GameResult<Self> {
        match name {
            "landmarks" => Ok(Self::landmarks()),
            "landmarks_scored" => Ok(Self::landmarks_scored()),
            "letters" => Ok(Self::letters()),
            "letters_timed" => Ok(Self::letters_timed()),
            other => Err(GameError::UnknownPreset(other.to_string())),
        }
    }

    /// Applies the settings screen's values. Zero seconds clears the limit.
    pub fn reconfigured(&self, pair_count: usize, time_limit: Option<u32>) -> GameResult<Self> {
        let next = Self {
            pair_count,
            time_limit: time_limit.filter(|&secs| secs > 0),
            ..self.clone()
        };
        next.validate()?;
        Ok(next)
    }

    pub fn validate(&self) -> GameResult<()> {
        if self.pair_count == 0 {
            return Err(GameError::InvalidPairCount);
        }
        if self.pair_count > self.theme.capacity() {
            return Err(GameError::NotEnoughTokens {
                requested: self.pair_count,
                available: self.theme.capacity(),
            });
        }
        if self.columns == 0 {
            return Err(GameError::InvalidColumns);
        }
        if self.resolve_delay_ms == 0 {
            return Err(GameError::InvalidConfig(
                "resolve delay must be positive so both faces are visible".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timer_mode(&self) -> TimerMode {
        TimerMode::from_config(self.timer_direction, self.time_limit)
    }

    pub fn scoring(&self) -> Option<Scoring> {
        self.scoring_enabled.then_some(Scoring {
            match_bonus: self.match_bonus,
            mismatch_penalty: self.mismatch_penalty,
        })
    }

    pub fn resolve_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.resolve_delay_ms))
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            pair_count: 6,
            columns: DEFAULT_COLUMNS,
            time_limit: Some(10),
            timer_direction: TimerDirection::Down,
            scoring_enabled: false,
            match_bonus: DEFAULT_MATCH_BONUS,
            mismatch_penalty: DEFAULT_MISMATCH_PENALTY,
            resolve_delay_ms: DEFAULT_RESOLVE_DELAY_MS,
            time_format: TimeFormat::Seconds,
            theme: Theme::Landmarks,
        }
    }
}

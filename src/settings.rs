//! Puzzle settings and difficulty presets
//!
//! Settings can be supplied as JSON by a host UI; missing fields take their
//! defaults.

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::gem::names;

/// Difficulty preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Training,
    #[default]
    Normal,
    Medium,
    Hard,
    /// Gem set supplied by a custom level
    Custom,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Training,
        Difficulty::Normal,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Training => "Training",
            Difficulty::Normal => "Normal",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Custom => "Custom",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "training" | "train" => Some(Difficulty::Training),
            "normal" => Some(Difficulty::Normal),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "custom" => Some(Difficulty::Custom),
            _ => None,
        }
    }

    /// Gems hidden at this difficulty, in placement order
    pub fn gem_set(&self) -> &'static [&'static str] {
        const BASIC: &[&str] = &[
            names::YELLOW,
            names::RED,
            names::BLUE,
            names::WHITE_DIAMOND,
            names::WHITE_TRIANGLE,
        ];
        const MEDIUM: &[&str] = &[
            names::YELLOW,
            names::RED,
            names::BLUE,
            names::WHITE_DIAMOND,
            names::WHITE_TRIANGLE,
            names::TRANSPARENT,
        ];
        const HARD: &[&str] = &[
            names::YELLOW,
            names::RED,
            names::BLUE,
            names::WHITE_DIAMOND,
            names::WHITE_TRIANGLE,
            names::TRANSPARENT,
            names::BLACK,
        ];

        match self {
            Difficulty::Training | Difficulty::Normal => BASIC,
            Difficulty::Medium => MEDIUM,
            Difficulty::Hard => HARD,
            Difficulty::Custom => &[],
        }
    }

    /// Upper probe counts for each rating tier, best tier first
    pub fn rating_limits(&self) -> &'static [u32] {
        match self {
            Difficulty::Training => &[8, 10, 20, u32::MAX],
            Difficulty::Normal => &[10, 13, 18, 23, u32::MAX],
            Difficulty::Medium => &[12, 15, 20, 25, u32::MAX],
            Difficulty::Hard | Difficulty::Custom => &[15, 18, 21, 25, u32::MAX],
        }
    }

    /// 1-based rating tier for a solve that took `probes` probes
    pub fn rating(&self, probes: u32) -> u32 {
        let limits = self.rating_limits();
        let tier = limits
            .iter()
            .position(|&limit| limit >= probes)
            .unwrap_or(limits.len() - 1);
        tier as u32 + 1
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(
        "board must be at least 1x1 and at most {max} cells, got {width}x{height}",
        max = MAX_BOARD_CELLS
    )]
    InvalidBoard { width: i32, height: i32 },
    #[error("{0} must be greater than zero")]
    ZeroBound(&'static str),
}

/// Puzzle settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Board width in cells
    pub width: i32,
    /// Board height in cells
    pub height: i32,
    /// Steps before a ray is reported as undetermined
    pub max_trace_steps: u32,
    /// Generator bounds
    pub layout_attempts: u32,
    pub gem_attempts: u32,
    pub difficulty: Difficulty,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            max_trace_steps: MAX_TRACE_STEPS,
            layout_attempts: MAX_LAYOUT_ATTEMPTS,
            gem_attempts: MAX_GEM_ATTEMPTS,
            difficulty: Difficulty::Normal,
        }
    }
}

impl Settings {
    /// Default settings at a difficulty
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Parse and validate JSON settings
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let area = self.width.checked_mul(self.height);
        if self.width < 1 || self.height < 1 || area.is_none_or(|cells| cells > MAX_BOARD_CELLS) {
            return Err(SettingsError::InvalidBoard {
                width: self.width,
                height: self.height,
            });
        }
        if self.max_trace_steps == 0 {
            return Err(SettingsError::ZeroBound("max_trace_steps"));
        }
        if self.layout_attempts == 0 {
            return Err(SettingsError::ZeroBound("layout_attempts"));
        }
        if self.gem_attempts == 0 {
            return Err(SettingsError::ZeroBound("gem_attempts"));
        }
        Ok(())
    }

    /// Board size (width, height)
    #[inline]
    pub fn board(&self) -> IVec2 {
        IVec2::new(self.width, self.height)
    }
}

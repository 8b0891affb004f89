use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn key(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("Unknown difficulty: {} (expected easy, medium or hard)", other)),
        }
    }
}

/// Tuning knobs of one difficulty tier. Probabilities are in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Chance of ignoring all strategy and playing a random cell.
    pub blunder_chance: f64,
    /// Chance of blocking an immediate opponent win when trying to win.
    pub block_chance: f64,
    /// Chance of blocking an immediate opponent win while playing casually.
    pub casual_block_chance: f64,
    /// Chance of running the full minimax search.
    pub deep_search_chance: f64,
    /// Long-run fraction of games the AI should win.
    pub target_win_rate: f64,
    pub think_min_ms: u64,
    pub think_max_ms: u64,
}

impl DifficultyProfile {
    pub fn easy() -> Self {
        Self {
            blunder_chance: 0.30,
            block_chance: 0.10,
            casual_block_chance: 0.0,
            deep_search_chance: 0.0,
            target_win_rate: 0.40,
            think_min_ms: 400,
            think_max_ms: 900,
        }
    }

    pub fn medium() -> Self {
        Self {
            blunder_chance: 0.15,
            block_chance: 0.60,
            casual_block_chance: 0.20,
            deep_search_chance: 0.0,
            target_win_rate: 0.60,
            think_min_ms: 600,
            think_max_ms: 1200,
        }
    }

    pub fn hard() -> Self {
        Self {
            blunder_chance: 0.05,
            block_chance: 0.95,
            casual_block_chance: 0.20,
            deep_search_chance: 0.90,
            target_win_rate: 0.80,
            think_min_ms: 800,
            think_max_ms: 1500,
        }
    }
}

impl Validate for DifficultyProfile {
    fn validate(&self) -> Result<(), String> {
        let probabilities = [
            ("blunder_chance", self.blunder_chance),
            ("block_chance", self.block_chance),
            ("casual_block_chance", self.casual_block_chance),
            ("deep_search_chance", self.deep_search_chance),
            ("target_win_rate", self.target_win_rate),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} must be between 0 and 1, got {}", name, value));
            }
        }
        if self.think_min_ms > self.think_max_ms {
            return Err(format!(
                "think_min_ms ({}) cannot exceed think_max_ms ({})",
                self.think_min_ms, self.think_max_ms
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfiles {
    pub easy: DifficultyProfile,
    pub medium: DifficultyProfile,
    pub hard: DifficultyProfile,
}

impl DifficultyProfiles {
    pub fn get(&self, difficulty: Difficulty) -> &DifficultyProfile {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }
}

impl Default for DifficultyProfiles {
    fn default() -> Self {
        Self {
            easy: DifficultyProfile::easy(),
            medium: DifficultyProfile::medium(),
            hard: DifficultyProfile::hard(),
        }
    }
}

impl Validate for DifficultyProfiles {
    fn validate(&self) -> Result<(), String> {
        for difficulty in Difficulty::ALL {
            self.get(difficulty)
                .validate()
                .map_err(|e| format!("{}: {}", difficulty, e))?;
        }
        Ok(())
    }
}

/// Latencies of the simulated online mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OnlineSettings {
    pub connect_delay_ms: u64,
    pub search_min_ms: u64,
    pub search_max_ms: u64,
    pub found_delay_ms: u64,
    pub opponent_reply_ms: u64,
}

impl OnlineSettings {
    pub fn connect_delay(&self) -> Duration {
        Duration::from_millis(self.connect_delay_ms)
    }

    pub fn found_delay(&self) -> Duration {
        Duration::from_millis(self.found_delay_ms)
    }

    pub fn opponent_reply_delay(&self) -> Duration {
        Duration::from_millis(self.opponent_reply_ms)
    }

    /// Longest time from `start_matchmaking` until the room is playable.
    pub fn max_matchmaking_time(&self) -> Duration {
        Duration::from_millis(self.connect_delay_ms + self.search_max_ms + self.found_delay_ms)
    }
}

impl Default for OnlineSettings {
    fn default() -> Self {
        Self {
            connect_delay_ms: 800,
            search_min_ms: 2000,
            search_max_ms: 4000,
            found_delay_ms: 1500,
            opponent_reply_ms: 1000,
        }
    }
}

impl Validate for OnlineSettings {
    fn validate(&self) -> Result<(), String> {
        if self.search_min_ms > self.search_max_ms {
            return Err(format!(
                "search_min_ms ({}) cannot exceed search_max_ms ({})",
                self.search_min_ms, self.search_max_ms
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TicTacToeSettings {
    pub human_turn_seconds: u64,
    pub difficulties: DifficultyProfiles,
    pub online: OnlineSettings,
}

impl TicTacToeSettings {
    pub fn human_turn_duration(&self) -> Duration {
        Duration::from_secs(self.human_turn_seconds)
    }
}

impl Default for TicTacToeSettings {
    fn default() -> Self {
        Self {
            human_turn_seconds: 10,
            difficulties: DifficultyProfiles::default(),
            online: OnlineSettings::default(),
        }
    }
}

impl Validate for TicTacToeSettings {
    fn validate(&self) -> Result<(), String> {
        if self.human_turn_seconds == 0 || self.human_turn_seconds > 300 {
            return Err(format!(
                "human_turn_seconds must be between 1 and 300, got {}",
                self.human_turn_seconds
            ));
        }
        self.difficulties.validate()?;
        self.online.validate()?;
        Ok(())
    }
}

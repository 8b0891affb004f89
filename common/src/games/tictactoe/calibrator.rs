use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigSerializer, YamlConfigSerializer};
use crate::games::RandomSource;
use crate::log;
use crate::storage::KeyValueStore;

use super::settings::{Difficulty, DifficultyProfiles};

/// Games required before the realized win rate starts steering the AI.
pub const MIN_GAMES_FOR_ADJUSTMENT: u32 = 5;
/// Allowed distance between realized and target rate before correcting.
pub const WIN_RATE_TOLERANCE: f64 = 0.1;
pub const CATCH_UP_WIN_CHANCE: f64 = 0.9;
pub const EASE_OFF_WIN_CHANCE: f64 = 0.3;

const STATS_KEY_PREFIX: &str = "tictactoe_stats_";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyStats {
    pub games_played: u32,
    pub ai_wins: u32,
    pub human_wins: u32,
    pub draws: u32,
}

impl DifficultyStats {
    pub fn win_rate(&self) -> Option<f64> {
        if self.games_played == 0 {
            return None;
        }
        Some(self.ai_wins as f64 / self.games_played as f64)
    }
}

/// Outcome of a finished game from the AI's side of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Ai,
    Human,
    Draw,
}

pub struct DifficultyCalibrator {
    store: Box<dyn KeyValueStore>,
    serializer: YamlConfigSerializer,
    profiles: DifficultyProfiles,
    stats: HashMap<Difficulty, DifficultyStats>,
}

impl DifficultyCalibrator {
    pub fn new(store: Box<dyn KeyValueStore>, profiles: DifficultyProfiles) -> Self {
        let serializer = YamlConfigSerializer::new();
        let mut stats = HashMap::new();

        for difficulty in Difficulty::ALL {
            let loaded = match load_stats(store.as_ref(), &serializer, difficulty) {
                Ok(loaded) => loaded.unwrap_or_default(),
                Err(e) => {
                    log!("Failed to load {} stats, starting fresh: {}", difficulty, e);
                    DifficultyStats::default()
                }
            };
            stats.insert(difficulty, loaded);
        }

        Self {
            store,
            serializer,
            profiles,
            stats,
        }
    }

    pub fn stats(&self, difficulty: Difficulty) -> DifficultyStats {
        self.stats.get(&difficulty).copied().unwrap_or_default()
    }

    pub fn should_try_to_win(&self, difficulty: Difficulty, rng: &mut impl RandomSource) -> bool {
        let target = self.profiles.get(difficulty).target_win_rate;
        let stats = self.stats(difficulty);

        if stats.games_played < MIN_GAMES_FOR_ADJUSTMENT {
            return rng.chance(target);
        }

        let realized = stats.win_rate().unwrap_or(target);
        if realized > target + WIN_RATE_TOLERANCE {
            rng.chance(EASE_OFF_WIN_CHANCE)
        } else if realized < target - WIN_RATE_TOLERANCE {
            rng.chance(CATCH_UP_WIN_CHANCE)
        } else {
            rng.chance(target)
        }
    }

    pub fn record_game_result(&mut self, difficulty: Difficulty, winner: Winner) {
        let stats = self.stats.entry(difficulty).or_default();
        stats.games_played += 1;
        match winner {
            Winner::Ai => stats.ai_wins += 1,
            Winner::Human => stats.human_wins += 1,
            Winner::Draw => stats.draws += 1,
        }
        let snapshot = *stats;

        if let Err(e) = self.save(difficulty, &snapshot) {
            log!("Failed to save {} stats: {}", difficulty, e);
        }
    }

    fn save(&self, difficulty: Difficulty, stats: &DifficultyStats) -> Result<(), String> {
        let content = self.serializer.serialize(stats)?;
        self.store.set(&stats_key(difficulty), &content)
    }
}

fn stats_key(difficulty: Difficulty) -> String {
    format!("{}{}", STATS_KEY_PREFIX, difficulty.key())
}

fn load_stats(
    store: &dyn KeyValueStore,
    serializer: &YamlConfigSerializer,
    difficulty: Difficulty,
) -> Result<Option<DifficultyStats>, String> {
    match store.get(&stats_key(difficulty))? {
        Some(content) => serializer.deserialize(&content).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileKeyValueStore, MemoryKeyValueStore};

    struct FixedRng(f64);

    impl RandomSource for FixedRng {
        fn next_f64(&mut self) -> f64 {
            self.0
        }

        fn next_index(&mut self, _len: usize) -> usize {
            0
        }
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, String> {
            Err("disk on fire".to_string())
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), String> {
            Err("disk on fire".to_string())
        }
    }

    fn calibrator() -> DifficultyCalibrator {
        DifficultyCalibrator::new(
            Box::new(MemoryKeyValueStore::new()),
            DifficultyProfiles::default(),
        )
    }

    fn record(
        calibrator: &mut DifficultyCalibrator,
        difficulty: Difficulty,
        ai_wins: u32,
        other: u32,
    ) {
        for _ in 0..ai_wins {
            calibrator.record_game_result(difficulty, Winner::Ai);
        }
        for _ in 0..other {
            calibrator.record_game_result(difficulty, Winner::Human);
        }
    }

    #[test]
    fn test_fresh_calibrator_uses_target_rate() {
        let calibrator = calibrator();

        // Medium targets 0.6, Easy 0.4.
        assert!(calibrator.should_try_to_win(Difficulty::Medium, &mut FixedRng(0.5)));
        assert!(!calibrator.should_try_to_win(Difficulty::Easy, &mut FixedRng(0.5)));
    }

    #[test]
    fn test_few_games_ignore_realized_rate() {
        let mut calibrator = calibrator();
        record(&mut calibrator, Difficulty::Medium, 4, 0);

        assert!(calibrator.should_try_to_win(Difficulty::Medium, &mut FixedRng(0.5)));
    }

    #[test]
    fn test_winning_too_often_eases_off() {
        let mut calibrator = calibrator();
        record(&mut calibrator, Difficulty::Medium, 9, 1);

        assert!(!calibrator.should_try_to_win(Difficulty::Medium, &mut FixedRng(0.5)));
        assert!(calibrator.should_try_to_win(Difficulty::Medium, &mut FixedRng(0.25)));
    }

    #[test]
    fn test_losing_too_often_catches_up() {
        let mut calibrator = calibrator();
        record(&mut calibrator, Difficulty::Medium, 2, 8);

        assert!(calibrator.should_try_to_win(Difficulty::Medium, &mut FixedRng(0.8)));
        assert!(!calibrator.should_try_to_win(Difficulty::Medium, &mut FixedRng(0.95)));
    }

    #[test]
    fn test_within_tolerance_uses_target_rate() {
        let mut calibrator = calibrator();
        record(&mut calibrator, Difficulty::Medium, 6, 4);

        assert!(calibrator.should_try_to_win(Difficulty::Medium, &mut FixedRng(0.55)));
        assert!(!calibrator.should_try_to_win(Difficulty::Medium, &mut FixedRng(0.65)));
    }

    #[test]
    fn test_results_are_counted_per_difficulty() {
        let mut calibrator = calibrator();
        calibrator.record_game_result(Difficulty::Hard, Winner::Ai);
        calibrator.record_game_result(Difficulty::Hard, Winner::Draw);
        calibrator.record_game_result(Difficulty::Easy, Winner::Human);

        let hard = calibrator.stats(Difficulty::Hard);
        assert_eq!(hard.games_played, 2);
        assert_eq!(hard.ai_wins, 1);
        assert_eq!(hard.draws, 1);
        assert_eq!(hard.win_rate(), Some(0.5));
        assert_eq!(calibrator.stats(Difficulty::Easy).human_wins, 1);
        assert_eq!(calibrator.stats(Difficulty::Medium).win_rate(), None);
    }

    #[test]
    fn test_broken_store_keeps_working_in_memory() {
        let mut calibrator =
            DifficultyCalibrator::new(Box::new(BrokenStore), DifficultyProfiles::default());
        calibrator.record_game_result(Difficulty::Easy, Winner::Ai);

        assert_eq!(calibrator.stats(Difficulty::Easy).games_played, 1);
    }

    #[test]
    fn test_corrupt_stats_start_fresh() {
        let store = MemoryKeyValueStore::new();
        store.set("tictactoe_stats_hard", "games_played: [not a number").unwrap();

        let calibrator =
            DifficultyCalibrator::new(Box::new(store), DifficultyProfiles::default());

        assert_eq!(calibrator.stats(Difficulty::Hard), DifficultyStats::default());
    }

    #[test]
    fn test_stats_survive_reload() {
        let directory = std::env::temp_dir()
            .join(format!("tictactoe_stats_test_{}", rand::random::<u64>()));

        {
            let mut calibrator = DifficultyCalibrator::new(
                Box::new(FileKeyValueStore::new(&directory)),
                DifficultyProfiles::default(),
            );
            record(&mut calibrator, Difficulty::Medium, 3, 2);
        }

        let calibrator = DifficultyCalibrator::new(
            Box::new(FileKeyValueStore::new(&directory)),
            DifficultyProfiles::default(),
        );
        let stats = calibrator.stats(Difficulty::Medium);
        assert_eq!(stats.games_played, 5);
        assert_eq!(stats.ai_wins, 3);
        assert_eq!(stats.human_wins, 2);

        let _ = std::fs::remove_dir_all(&directory);
    }
}

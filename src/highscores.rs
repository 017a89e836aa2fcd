//! High score leaderboard
//!
//! Keeps the top scores across sessions, sorted descending. Persisted to
//! LocalStorage in the browser and to a JSON file natively.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MAX_HIGH_SCORES;

/// Errors from the native high-score file
#[derive(Debug, Error)]
pub enum HighScoreError {
    #[error("high score file I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("high score file is corrupt: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Final score (may be negative after penalties)
    pub score: i64,
    /// Distance reached
    pub distance: f32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "pumpkin_run_high_scores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would make the leaderboard
    pub fn qualifies(&self, score: i64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Rank a score would achieve (1-indexed), None if it doesn't qualify
    pub fn potential_rank(&self, score: i64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a final score. Returns the rank achieved (1-indexed) or None if
    /// it didn't qualify.
    pub fn add_score(&mut self, score: i64, distance: f32, timestamp: f64) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                score,
                distance,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Scores only, best first
    pub fn top_scores(&self) -> Vec<i64> {
        self.entries.iter().map(|e| e.score).collect()
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<i64> {
        self.entries.first().map(|e| e.score)
    }

    /// Restore ordering and size after loading untrusted data
    fn normalize(mut self) -> Self {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
        self
    }

    /// Read a leaderboard file; a missing file is an empty leaderboard
    pub fn load_from(path: &std::path::Path) -> Result<Self, HighScoreError> {
        match std::fs::read_to_string(path) {
            Ok(json) => Ok(serde_json::from_str::<HighScores>(&json)?.normalize()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the leaderboard file
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), HighScoreError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(scores) = serde_json::from_str::<HighScores>(&json) {
                    log::info!("Loaded {} high scores", scores.entries.len());
                    return scores.normalize();
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("High scores saved ({} entries)", self.entries.len());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_top_three_descending() {
        let mut hs = HighScores::new();
        assert_eq!(hs.add_score(120, 3000.0, 1.0), Some(1));
        assert_eq!(hs.add_score(500, 9000.0, 2.0), Some(1));
        assert_eq!(hs.add_score(-40, 400.0, 3.0), Some(3));
        assert_eq!(hs.top_scores(), vec![500, 120, -40]);

        assert_eq!(hs.add_score(300, 6000.0, 4.0), Some(2));
        assert_eq!(hs.top_scores(), vec![500, 300, 120]);

        // Doesn't beat the lowest entry
        assert_eq!(hs.add_score(100, 100.0, 5.0), None);
        assert_eq!(hs.add_score(120, 100.0, 6.0), None);
        assert_eq!(hs.top_scores(), vec![500, 300, 120]);
        assert_eq!(hs.top_score(), Some(500));
    }

    #[test]
    fn test_ties_rank_below_existing() {
        let mut hs = HighScores::new();
        hs.add_score(200, 0.0, 1.0);
        assert_eq!(hs.potential_rank(200), Some(2));
        assert_eq!(hs.add_score(200, 0.0, 2.0), Some(2));
        assert_eq!(hs.entries[0].timestamp, 1.0);
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "pumpkin_run_scores_{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        // Missing file is an empty board
        assert!(HighScores::load_from(&path).unwrap().is_empty());

        let mut hs = HighScores::new();
        hs.add_score(42, 1234.0, 99.0);
        hs.save_to(&path).unwrap();
        assert_eq!(HighScores::load_from(&path).unwrap(), hs);

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            HighScores::load_from(&path),
            Err(HighScoreError::Parse(_))
        ));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_loaded_entries_are_normalized() {
        let json = r#"{"entries":[
            {"score":1,"distance":0.0,"timestamp":0.0},
            {"score":9,"distance":0.0,"timestamp":0.0},
            {"score":5,"distance":0.0,"timestamp":0.0},
            {"score":7,"distance":0.0,"timestamp":0.0}
        ]}"#;
        let hs = serde_json::from_str::<HighScores>(json).unwrap().normalize();
        assert_eq!(hs.top_scores(), vec![9, 7, 5]);
    }
}

//! Best-runs leaderboard
//!
//! Persisted to LocalStorage, keeps the 10 longest survivals.

use serde::{Deserialize, Serialize};

use crate::consts::SIM_DT;

/// Maximum number of runs to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Simulation ticks survived
    pub ticks: u64,
    /// Enemies that went past
    pub dodged: u32,
    /// Unix timestamp (ms) when recorded
    pub timestamp: f64,
}

impl RunRecord {
    pub fn seconds(&self) -> f32 {
        self.ticks as f32 * SIM_DT
    }
}

/// Leaderboard, longest run first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<RunRecord>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "cube_dodge_highscores";

    pub fn new() -> Self {
        Self::default()
    }

    /// Index a run of `ticks` would be inserted at; ties rank below older runs
    fn insertion_index(&self, ticks: u64) -> usize {
        self.entries.partition_point(|e| e.ticks >= ticks)
    }

    /// Whether a run would make the board
    pub fn qualifies(&self, ticks: u64) -> bool {
        ticks > 0 && self.insertion_index(ticks) < MAX_HIGH_SCORES
    }

    /// Record a run; returns its 1-based rank if it made the board
    pub fn add_run(&mut self, ticks: u64, dodged: u32, timestamp: f64) -> Option<usize> {
        if !self.qualifies(ticks) {
            return None;
        }
        let index = self.insertion_index(ticks);
        self.entries.insert(
            index,
            RunRecord {
                ticks,
                dodged,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(index + 1)
    }

    /// The longest run (if any)
    pub fn best(&self) -> Option<&RunRecord> {
        self.entries.first()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<HighScores>(&json) {
                    Ok(scores) => {
                        log::info!("Loaded {} high scores", scores.entries.len());
                        return scores;
                    }
                    Err(e) => log::warn!("Discarding unreadable high scores: {}", e),
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

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

/// Format a survival time as `m:ss.t`
pub fn format_duration(seconds: f32) -> String {
    let tenths = (seconds.max(0.0) * 10.0).floor() as u64;
    let minutes = tenths / 600;
    let secs = (tenths % 600) / 10;
    let frac = tenths % 10;
    format!("{}:{:02}.{}", minutes, secs, frac)
}

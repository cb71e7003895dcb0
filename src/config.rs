// 11.0 config.rs: feed and app settings in one place, with per-mode presets.
// the replay demo ticks every 10s; external and random poll hourly.

use crate::ledger::LedgerConfig;
use crate::source::ReplayEntry;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedMode {
    External,
    Replay,
    Random,
}

impl std::fmt::Display for FeedMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedMode::External => write!(f, "external"),
            FeedMode::Replay => write!(f, "replay"),
            FeedMode::Random => write!(f, "random"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub mode: FeedMode,
    // scheduler tick interval
    pub poll_interval_ms: u64,
    // raw-point cap for replay-mode history
    pub history_cap: usize,
    // cold-start backfill bound for replay mode
    pub backfill_limit: usize,
}

const ONE_HOUR_MS: u64 = 3_600_000;

impl Default for FeedConfig {
    fn default() -> Self {
        Self::replay_demo()
    }
}

impl FeedConfig {
    // 11.1: presets, one per source strategy.
    pub fn replay_demo() -> Self {
        Self {
            mode: FeedMode::Replay,
            poll_interval_ms: 10_000,
            history_cap: 50,
            backfill_limit: 20,
        }
    }

    pub fn live() -> Self {
        Self {
            mode: FeedMode::External,
            poll_interval_ms: ONE_HOUR_MS,
            history_cap: 50,
            backfill_limit: 20,
        }
    }

    pub fn synthetic() -> Self {
        Self {
            mode: FeedMode::Random,
            poll_interval_ms: ONE_HOUR_MS,
            history_cap: 50,
            backfill_limit: 20,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub ledger: LedgerConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidFeed {
                reason: "poll interval must be positive".to_string(),
            });
        }
        if self.feed.history_cap == 0 {
            return Err(ConfigError::InvalidFeed {
                reason: "history cap must be positive".to_string(),
            });
        }
        if self.feed.backfill_limit == 0 || self.feed.backfill_limit > 20 {
            return Err(ConfigError::InvalidFeed {
                reason: "backfill limit must be between 1 and 20".to_string(),
            });
        }
        if self.ledger.initial_grant.is_zero() {
            return Err(ConfigError::InvalidLedger {
                reason: "initial grant must be positive".to_string(),
            });
        }
        if self.ledger.default_expiry_hours < 1 {
            return Err(ConfigError::InvalidLedger {
                reason: "default expiry horizon must be at least one hour".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid feed config: {reason}")]
    InvalidFeed { reason: String },

    #[error("invalid ledger config: {reason}")]
    InvalidLedger { reason: String },
}

// 11.2: the bundled replay dataset. a short index path with a rally, a slump,
// and a recovery, so demo charts have visible movement.
pub fn demo_dataset() -> Vec<ReplayEntry> {
    vec![
        ReplayEntry { sub_a: dec!(22.0), sub_b: dec!(31.0) }, // 9931.5 -> 9932
        ReplayEntry { sub_a: dec!(20.5), sub_b: dec!(29.0) }, // 9936
        ReplayEntry { sub_a: dec!(18.0), sub_b: dec!(26.5) }, // 9942
        ReplayEntry { sub_a: dec!(15.5), sub_b: dec!(24.0) }, // 9948
        ReplayEntry { sub_a: dec!(13.0), sub_b: dec!(21.0) }, // 9956
        ReplayEntry { sub_a: dec!(16.0), sub_b: dec!(27.5) }, // 9943
        ReplayEntry { sub_a: dec!(24.0), sub_b: dec!(35.0) }, // 9924
        ReplayEntry { sub_a: dec!(31.0), sub_b: dec!(46.0) }, // 9900
        ReplayEntry { sub_a: dec!(36.5), sub_b: dec!(55.0) }, // 9881
        ReplayEntry { sub_a: dec!(33.0), sub_b: dec!(49.5) }, // 9893
        ReplayEntry { sub_a: dec!(27.0), sub_b: dec!(40.0) }, // 9913
        ReplayEntry { sub_a: dec!(21.0), sub_b: dec!(32.0) }, // 9931
    ]
}

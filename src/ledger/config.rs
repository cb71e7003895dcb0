//! Ledger configuration options.

use crate::types::Credits;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Credits granted to every account at registration.
    pub initial_grant: Credits,
    /// Expiry horizon applied when an open call does not specify one.
    pub default_expiry_hours: i64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            initial_grant: Credits::new_unchecked(dec!(1_000_000)),
            default_expiry_hours: 24,
        }
    }
}

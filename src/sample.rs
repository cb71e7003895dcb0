// 2.0: index sample and the composite derivation. the whole game prices off this one number.
// value = round(10000 - (subB * 1.5 + subA)); undefined when either sub-reading is missing.

use crate::types::{Price, Timestamp};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

// One stored point of the index series. Immutable once in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSample {
    pub value: Price,
    pub sub_a: Decimal,
    pub sub_b: Decimal,
    pub timestamp: Timestamp,
}

impl IndexSample {
    // None when the derivation is undefined; such readings never become samples.
    #[must_use]
    pub fn derive(sub_a: Decimal, sub_b: Decimal, timestamp: Timestamp) -> Option<Self> {
        let value = composite_index(sub_a, sub_b)?;
        Some(Self {
            value,
            sub_a,
            sub_b,
            timestamp,
        })
    }
}

// 2.1: the derivation itself. a zero or negative sub-reading means a dead or
// faulty sensor, so no index value exists for that reading.
pub fn composite_index(sub_a: Decimal, sub_b: Decimal) -> Option<Price> {
    if sub_a <= Decimal::ZERO || sub_b <= Decimal::ZERO {
        return None;
    }
    let raw = dec!(10000) - (sub_b * dec!(1.5) + sub_a);
    // nearest integer, halves away from zero
    let rounded = raw.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    Price::new(rounded)
}

// 1.0: all the primitives live here. nothing in the ledger works without these types.
// IDs, prices, credits, leverage, timestamps. each is a newtype so the compiler catches type mixups.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContractId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransactionId(pub u64);

// Long = profit when the index goes up. Short = profit when the index goes down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Long,
    Short,
}

impl Side {
    pub fn sign(&self) -> Decimal {
        match self {
            Side::Long => dec!(1),
            Side::Short => dec!(-1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Side::Long => Side::Short,
            Side::Short => Side::Long,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => write!(f, "long"),
            Side::Short => write!(f, "short"),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown side: {0:?}")]
pub struct InvalidSide(pub String);

// the wire layer sends sides as text. anything but "long"/"short" is rejected.
impl FromStr for Side {
    type Err = InvalidSide;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "long" => Ok(Side::Long),
            "short" => Ok(Side::Short),
            other => Err(InvalidSide(other.to_string())),
        }
    }
}

// 1.1: index price level. must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Price(Decimal);

impl Price {
    #[must_use]
    pub fn new(value: Decimal) -> Option<Self> {
        if value > Decimal::ZERO {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn new_unchecked(value: Decimal) -> Self {
        debug_assert!(value > Decimal::ZERO);
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// 1.2: credit amount. balances, margins, returned amounts. never negative;
// signed profit/loss stays a raw Decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Credits(Decimal);

impl Credits {
    #[must_use]
    pub fn new(value: Decimal) -> Option<Self> {
        if value >= Decimal::ZERO {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn new_unchecked(value: Decimal) -> Self {
        debug_assert!(value >= Decimal::ZERO);
        Self(value)
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn add(&self, other: Credits) -> Self {
        Self(self.0 + other.0)
    }

    // None when the subtraction would go negative
    #[must_use]
    pub fn checked_sub(&self, other: Credits) -> Option<Self> {
        let diff = self.0 - other.0;
        if diff >= Decimal::ZERO {
            Some(Self(diff))
        } else {
            None
        }
    }
}

impl fmt::Display for Credits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Sum for Credits {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, c| acc.add(c))
    }
}

impl<'a> Sum<&'a Credits> for Credits {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, c| acc.add(*c))
    }
}

// 1.3: leverage multiplier. whole multiples only, >= 1x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leverage(u32);

impl Leverage {
    #[must_use]
    pub fn new(value: u32) -> Option<Self> {
        if value >= 1 {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn as_decimal(&self) -> Decimal {
        Decimal::from(self.0)
    }
}

impl fmt::Display for Leverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.0)
    }
}

// 1.4: millisecond timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp_millis())
    }

    pub fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }

    pub fn add_millis(&self, ms: i64) -> Self {
        Self(self.0 + ms)
    }

    pub fn add_hours(&self, hours: i64) -> Self {
        Self(self.0 + hours * 3_600_000)
    }

    // start of the calendar hour (UTC) containing this instant
    pub fn hour_bucket(&self) -> Self {
        Self(self.0 - self.0.rem_euclid(3_600_000))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn side_parsing() {
        assert_eq!("long".parse::<Side>().unwrap(), Side::Long);
        assert_eq!("short".parse::<Side>().unwrap(), Side::Short);
        assert!("sideways".parse::<Side>().is_err());
        assert!("LONG".parse::<Side>().is_err());
    }

    #[test]
    fn price_rejects_non_positive() {
        assert!(Price::new(dec!(0)).is_none());
        assert!(Price::new(dec!(-10)).is_none());
        assert_eq!(Price::new(dec!(9935)).unwrap().value(), dec!(9935));
    }

    #[test]
    fn credits_never_negative() {
        assert!(Credits::new(dec!(-1)).is_none());

        let balance = Credits::new(dec!(100)).unwrap();
        let debit = Credits::new(dec!(40)).unwrap();
        assert_eq!(balance.checked_sub(debit).unwrap().value(), dec!(60));

        let too_much = Credits::new(dec!(101)).unwrap();
        assert!(balance.checked_sub(too_much).is_none());
    }

    #[test]
    fn leverage_must_be_at_least_one() {
        assert!(Leverage::new(0).is_none());
        assert_eq!(Leverage::new(5).unwrap().as_decimal(), dec!(5));
        assert_eq!(format!("{}", Leverage::new(10).unwrap()), "10x");
    }

    #[test]
    fn hour_bucket_floors_to_calendar_hour() {
        // 2h 59m 59.999s after epoch floors to hour 2
        let ts = Timestamp::from_millis(2 * 3_600_000 + 3_599_999);
        assert_eq!(ts.hour_bucket().as_millis(), 2 * 3_600_000);

        let exact = Timestamp::from_millis(5 * 3_600_000);
        assert_eq!(exact.hour_bucket(), exact);
    }
}

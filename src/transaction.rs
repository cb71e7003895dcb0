// 9.0: transaction log records. append-only audit trail, two records per
// contract: the open and its terminal event.

use crate::types::{AccountId, ContractId, Credits, Leverage, Price, Side, TransactionId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    OpenLong,
    OpenShort,
    CloseLong,
    CloseShort,
    Liquidation,
    Expiry,
}

impl TransactionKind {
    pub fn open_for(side: Side) -> Self {
        match side {
            Side::Long => TransactionKind::OpenLong,
            Side::Short => TransactionKind::OpenShort,
        }
    }

    pub fn close_for(side: Side) -> Self {
        match side {
            Side::Long => TransactionKind::CloseLong,
            Side::Short => TransactionKind::CloseShort,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionKind::OpenLong | TransactionKind::OpenShort)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::OpenLong => write!(f, "open_long"),
            TransactionKind::OpenShort => write!(f, "open_short"),
            TransactionKind::CloseLong => write!(f, "close_long"),
            TransactionKind::CloseShort => write!(f, "close_short"),
            TransactionKind::Liquidation => write!(f, "liquidation"),
            TransactionKind::Expiry => write!(f, "expiry"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: TransactionId,
    pub account_id: AccountId,
    pub contract_id: ContractId,
    pub kind: TransactionKind,
    pub size: u64,
    pub price: Price,
    pub margin: Credits,
    pub leverage: Leverage,
    // size x price at this event's price
    pub notional: Decimal,
    // always recorded, zero on opens
    pub profit_loss: Decimal,
    pub timestamp: Timestamp,
}

impl TransactionRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: TransactionId,
        account_id: AccountId,
        contract_id: ContractId,
        kind: TransactionKind,
        size: u64,
        price: Price,
        margin: Credits,
        leverage: Leverage,
        profit_loss: Decimal,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            account_id,
            contract_id,
            kind,
            size,
            price,
            margin,
            leverage,
            notional: Decimal::from(size) * price.value(),
            profit_loss,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn kind_for_side() {
        assert_eq!(TransactionKind::open_for(Side::Long), TransactionKind::OpenLong);
        assert_eq!(TransactionKind::open_for(Side::Short), TransactionKind::OpenShort);
        assert_eq!(TransactionKind::close_for(Side::Long), TransactionKind::CloseLong);
        assert_eq!(TransactionKind::close_for(Side::Short), TransactionKind::CloseShort);
    }

    #[test]
    fn terminal_kinds() {
        assert!(!TransactionKind::OpenLong.is_terminal());
        assert!(!TransactionKind::OpenShort.is_terminal());
        assert!(TransactionKind::CloseLong.is_terminal());
        assert!(TransactionKind::Liquidation.is_terminal());
        assert!(TransactionKind::Expiry.is_terminal());
    }

    #[test]
    fn record_stamps_notional() {
        let record = TransactionRecord::new(
            TransactionId(1),
            AccountId(1),
            ContractId(1),
            TransactionKind::OpenLong,
            10,
            Price::new_unchecked(dec!(9935)),
            Credits::new(dec!(9935)).unwrap(),
            Leverage::new(10).unwrap(),
            Decimal::ZERO,
            Timestamp::from_millis(0),
        );
        assert_eq!(record.notional, dec!(99350));
        assert_eq!(record.profit_loss, dec!(0));
    }

    #[test]
    fn kinds_serialize_snake_case() {
        assert_eq!(serde_json::to_string(&TransactionKind::OpenLong).unwrap(), "\"open_long\"");
        assert_eq!(serde_json::to_string(&TransactionKind::Liquidation).unwrap(), "\"liquidation\"");
        assert_eq!(format!("{}", TransactionKind::CloseShort), "close_short");
    }
}

// 8.0: leveraged contract and the settlement math. open -> closed, exactly
// once. pure calculation functions live at the bottom, 8.1 onward.

use crate::types::{AccountId, ContractId, Credits, Leverage, Price, Side, Timestamp};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Open,
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    pub account_id: AccountId,
    pub size: u64,
    pub entry_price: Price,
    pub margin: Credits,
    pub leverage: Leverage,
    pub side: Side,
    pub liquidation_price: Price,
    pub expiry_time: Timestamp,
    pub status: ContractStatus,
    pub opened_at: Timestamp,
    pub close_price: Option<Price>,
    pub profit_loss: Option<Decimal>,
    pub closed_at: Option<Timestamp>,
}

impl Contract {
    pub fn open(
        id: ContractId,
        account_id: AccountId,
        size: u64,
        entry_price: Price,
        leverage: Leverage,
        side: Side,
        expiry_time: Timestamp,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            account_id,
            size,
            entry_price,
            margin: required_margin(size, entry_price, leverage),
            leverage,
            side,
            liquidation_price: liquidation_price(entry_price, leverage, side),
            expiry_time,
            status: ContractStatus::Open,
            opened_at: timestamp,
            close_price: None,
            profit_loss: None,
            closed_at: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == ContractStatus::Open
    }

    pub fn notional(&self) -> Decimal {
        Decimal::from(self.size) * self.entry_price.value()
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expiry_time
    }

    // "liquidatable" is a predicate, not a stored state
    pub fn crossed_liquidation(&self, current_price: Price) -> bool {
        match self.side {
            Side::Long => current_price <= self.liquidation_price,
            Side::Short => current_price >= self.liquidation_price,
        }
    }
}

// 8.1: margin = notional / leverage.
pub fn required_margin(size: u64, price: Price, leverage: Leverage) -> Credits {
    Credits::new_unchecked(Decimal::from(size) * price.value() / leverage.as_decimal())
}

// 8.2: liquidation sits where adverse movement has consumed 90% of the
// leveraged price cushion, one tenth short of exhausting the margin.
pub fn liquidation_price(entry: Price, leverage: Leverage, side: Side) -> Price {
    let cushion = entry.value() / leverage.as_decimal() * dec!(0.9);
    match side {
        Side::Long => Price::new_unchecked(entry.value() - cushion),
        Side::Short => Price::new_unchecked(entry.value() + cushion),
    }
}

// 8.3: signed settlement pnl. long gains when the index rises.
pub fn settlement_pnl(side: Side, entry: Price, settlement: Price, size: u64) -> Decimal {
    side.sign() * (settlement.value() - entry.value()) * Decimal::from(size)
}

// 8.4: what comes back to the account at settlement. losses are capped at
// the margin already locked, so this never goes below zero.
pub fn return_amount(margin: Credits, profit_loss: Decimal) -> Credits {
    Credits::new(margin.value() + profit_loss).unwrap_or_else(Credits::zero)
}

// 10.0.2: result types and errors for ledger operations.

use crate::account::AccountError;
use crate::types::{AccountId, ContractId, Credits, Price};
use rust_decimal::Decimal;

// Outcome of a manual close or an expiry settlement.
#[derive(Debug, Clone)]
pub struct CloseResult {
    pub contract_id: ContractId,
    pub account_id: AccountId,
    pub settlement_price: Price,
    pub profit_loss: Decimal,
    pub returned: Credits,
}

// Outcome of a forced liquidation. The posted margin is lost in full, so
// nothing comes back to the account.
#[derive(Debug, Clone)]
pub struct LiquidationResult {
    pub contract_id: ContractId,
    pub account_id: AccountId,
    pub liquidation_price: Price,
    pub profit_loss: Decimal,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("account {0:?} not found")]
    AccountNotFound(AccountId),

    // unknown id and already-closed contract look the same to callers,
    // which is what makes settlement idempotent
    #[error("contract {0:?} not found or already closed")]
    ContractNotFound(ContractId),

    #[error("contract {contract_id:?} is not owned by account {account_id:?}")]
    Forbidden {
        contract_id: ContractId,
        account_id: AccountId,
    },

    #[error("account error: {0}")]
    Account(#[from] AccountError),
}

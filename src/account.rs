// 7.0: account balances. two operations only, debit and credit; the ledger
// pairs them with contract mutations so no partial state survives a failure.

use crate::types::{AccountId, Credits, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub balance: Credits,
    pub created_at: Timestamp,
}

impl Account {
    pub fn new(id: AccountId, initial_balance: Credits, timestamp: Timestamp) -> Self {
        Self {
            id,
            balance: initial_balance,
            created_at: timestamp,
        }
    }

    // 7.1: the balance check and the decrement are one step, so a debit can
    // never leave the balance negative.
    pub fn debit(&mut self, amount: Credits) -> Result<(), AccountError> {
        match self.balance.checked_sub(amount) {
            Some(remaining) => {
                self.balance = remaining;
                Ok(())
            }
            None => Err(AccountError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            }),
        }
    }

    pub fn credit(&mut self, amount: Credits) {
        self.balance = self.balance.add(amount);
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AccountError {
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Credits,
        available: Credits,
    },
}

//! Contract lifecycle operations: open, close, liquidate, expire.

use super::core::Ledger;
use super::results::{CloseResult, LedgerError, LiquidationResult};
use crate::contract::{required_margin, return_amount, settlement_pnl, Contract, ContractStatus};
use crate::transaction::TransactionKind;
use crate::types::{AccountId, ContractId, Credits, Leverage, Price, Side};
use rust_decimal::Decimal;
use tracing::info;

impl Ledger {
    // 10.3: open. margin is debited, the contract inserted, and the open
    // record appended as one unit; the debit is the last check and the first
    // mutation, so a failure changes nothing.
    pub fn open_contract(
        &mut self,
        account_id: AccountId,
        size: u64,
        price: Price,
        leverage: Leverage,
        side: Side,
        expiry_hours: Option<i64>,
    ) -> Result<Contract, LedgerError> {
        if size == 0 {
            return Err(LedgerError::InvalidInput {
                reason: "contract size must be positive".to_string(),
            });
        }
        let expiry_hours = expiry_hours.unwrap_or(self.config.default_expiry_hours);
        if expiry_hours < 1 {
            return Err(LedgerError::InvalidInput {
                reason: "expiry horizon must be at least one hour".to_string(),
            });
        }

        let margin = required_margin(size, price, leverage);
        let account = self
            .accounts
            .get_mut(&account_id)
            .ok_or(LedgerError::AccountNotFound(account_id))?;
        account.debit(margin)?;

        let contract_id = ContractId(self.next_contract_id);
        self.next_contract_id += 1;

        let contract = Contract::open(
            contract_id,
            account_id,
            size,
            price,
            leverage,
            side,
            self.current_time.add_hours(expiry_hours),
            self.current_time,
        );
        self.contracts.insert(contract_id, contract.clone());
        self.record_transaction(
            account_id,
            contract_id,
            TransactionKind::open_for(side),
            size,
            price,
            margin,
            leverage,
            Decimal::ZERO,
        );

        info!(
            contract = contract_id.0,
            account = account_id.0,
            %side,
            size,
            %price,
            %leverage,
            margin = %margin,
            liquidation = %contract.liquidation_price,
            "contract opened"
        );
        Ok(contract)
    }

    // 10.4: manual close. owner-only; pnl is settled against the supplied
    // price and the margin comes back capped at zero from below.
    pub fn close_contract(
        &mut self,
        account_id: AccountId,
        contract_id: ContractId,
        settlement_price: Price,
    ) -> Result<CloseResult, LedgerError> {
        let contract = self
            .contracts
            .get(&contract_id)
            .filter(|c| c.is_open())
            .ok_or(LedgerError::ContractNotFound(contract_id))?;
        if contract.account_id != account_id {
            return Err(LedgerError::Forbidden {
                contract_id,
                account_id,
            });
        }

        let profit_loss = settlement_pnl(contract.side, contract.entry_price, settlement_price, contract.size);
        let returned = return_amount(contract.margin, profit_loss);
        let kind = TransactionKind::close_for(contract.side);
        self.settle(contract_id, kind, settlement_price, profit_loss, returned)?;

        info!(
            contract = contract_id.0,
            account = account_id.0,
            price = %settlement_price,
            pnl = %profit_loss,
            returned = %returned,
            "contract closed"
        );
        Ok(CloseResult {
            contract_id,
            account_id,
            settlement_price,
            profit_loss,
            returned,
        })
    }

    // 10.5: forced liquidation. privileged path, no ownership check; the
    // whole margin is lost and nothing is credited back.
    pub fn liquidate_contract(
        &mut self,
        contract_id: ContractId,
        current_price: Price,
    ) -> Result<LiquidationResult, LedgerError> {
        let contract = self
            .contracts
            .get(&contract_id)
            .filter(|c| c.is_open())
            .ok_or(LedgerError::ContractNotFound(contract_id))?;

        let account_id = contract.account_id;
        let profit_loss = -contract.margin.value();
        self.settle(
            contract_id,
            TransactionKind::Liquidation,
            current_price,
            profit_loss,
            Credits::zero(),
        )?;

        info!(
            contract = contract_id.0,
            account = account_id.0,
            price = %current_price,
            pnl = %profit_loss,
            "contract liquidated"
        );
        Ok(LiquidationResult {
            contract_id,
            account_id,
            liquidation_price: current_price,
            profit_loss,
        })
    }

    // 10.6: expiry settlement. same economics as a manual close, but it is a
    // system call gated on the deadline rather than on ownership.
    pub fn expire_contract(
        &mut self,
        contract_id: ContractId,
        settlement_price: Price,
    ) -> Result<CloseResult, LedgerError> {
        let contract = self
            .contracts
            .get(&contract_id)
            .filter(|c| c.is_open())
            .ok_or(LedgerError::ContractNotFound(contract_id))?;
        if !contract.is_expired(self.current_time) {
            return Err(LedgerError::InvalidInput {
                reason: format!("contract {} has not reached expiry", contract_id.0),
            });
        }

        let account_id = contract.account_id;
        let profit_loss = settlement_pnl(contract.side, contract.entry_price, settlement_price, contract.size);
        let returned = return_amount(contract.margin, profit_loss);
        self.settle(contract_id, TransactionKind::Expiry, settlement_price, profit_loss, returned)?;

        info!(
            contract = contract_id.0,
            account = account_id.0,
            price = %settlement_price,
            pnl = %profit_loss,
            returned = %returned,
            "contract expired"
        );
        Ok(CloseResult {
            contract_id,
            account_id,
            settlement_price,
            profit_loss,
            returned,
        })
    }

    // the single terminal transition. caller has already verified the
    // contract is open and computed pnl and the return amount.
    fn settle(
        &mut self,
        contract_id: ContractId,
        kind: TransactionKind,
        price: Price,
        profit_loss: Decimal,
        returned: Credits,
    ) -> Result<(), LedgerError> {
        let now = self.current_time;
        let contract = self
            .contracts
            .get_mut(&contract_id)
            .ok_or(LedgerError::ContractNotFound(contract_id))?;

        contract.status = ContractStatus::Closed;
        contract.close_price = Some(price);
        contract.profit_loss = Some(profit_loss);
        contract.closed_at = Some(now);

        let account_id = contract.account_id;
        let size = contract.size;
        let margin = contract.margin;
        let leverage = contract.leverage;

        let account = self
            .accounts
            .get_mut(&account_id)
            .ok_or(LedgerError::AccountNotFound(account_id))?;
        if !returned.is_zero() {
            account.credit(returned);
        }

        self.record_transaction(account_id, contract_id, kind, size, price, margin, leverage, profit_loss);
        Ok(())
    }
}

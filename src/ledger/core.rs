// 10.1 ledger/core.rs: the ledger struct. accounts, contracts, and the
// transaction log all live here; the lifecycle ops are in contracts.rs.

use super::config::LedgerConfig;
use super::results::LedgerError;
use crate::account::Account;
use crate::contract::Contract;
use crate::transaction::{TransactionKind, TransactionRecord};
use crate::types::{AccountId, ContractId, Credits, Leverage, Price, Timestamp, TransactionId};
use rust_decimal::Decimal;
use std::collections::HashMap;

#[derive(Debug)]
pub struct Ledger {
    pub(super) config: LedgerConfig,
    pub(super) accounts: HashMap<AccountId, Account>,
    pub(super) contracts: HashMap<ContractId, Contract>,
    pub(super) transactions: Vec<TransactionRecord>,
    pub(super) next_contract_id: u64,
    pub(super) next_transaction_id: u64,
    pub(super) current_time: Timestamp,
}

// One account's trading picture in a single read.
#[derive(Debug, Clone)]
pub struct PortfolioSummary {
    pub account_id: AccountId,
    pub balance: Credits,
    pub open_contracts: Vec<Contract>,
    pub lifetime_profit_loss: Decimal,
}

impl Ledger {
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            accounts: HashMap::new(),
            contracts: HashMap::new(),
            transactions: Vec::new(),
            next_contract_id: 1,
            next_transaction_id: 1,
            current_time: Timestamp::from_millis(0),
        }
    }

    pub fn set_time(&mut self, timestamp: Timestamp) {
        self.current_time = timestamp;
    }

    pub fn time(&self) -> Timestamp {
        self.current_time
    }

    pub fn advance_time(&mut self, millis: i64) {
        self.current_time = self.current_time.add_millis(millis);
    }

    // 10.2: registration. every account starts with the configured grant,
    // the system's only capital injection.
    pub fn register_account(&mut self) -> AccountId {
        let id = AccountId(self.accounts.len() as u64 + 1);
        let account = Account::new(id, self.config.initial_grant, self.current_time);
        self.accounts.insert(id, account);
        tracing::info!(account = id.0, grant = %self.config.initial_grant, "account registered");
        id
    }

    pub fn get_account(&self, account_id: AccountId) -> Option<&Account> {
        self.accounts.get(&account_id)
    }

    pub fn get_balance(&self, account_id: AccountId) -> Result<Credits, LedgerError> {
        self.accounts
            .get(&account_id)
            .map(|account| account.balance)
            .ok_or(LedgerError::AccountNotFound(account_id))
    }

    pub fn get_contract(&self, contract_id: ContractId) -> Option<&Contract> {
        self.contracts.get(&contract_id)
    }

    pub fn accounts_iter(&self) -> impl Iterator<Item = (&AccountId, &Account)> {
        self.accounts.iter()
    }

    pub fn contracts_iter(&self) -> impl Iterator<Item = (&ContractId, &Contract)> {
        self.contracts.iter()
    }

    pub fn list_open_contracts(&self, account_id: AccountId) -> Vec<&Contract> {
        let mut open: Vec<&Contract> = self
            .contracts
            .values()
            .filter(|c| c.account_id == account_id && c.is_open())
            .collect();
        open.sort_by_key(|c| c.id);
        open
    }

    // newest first. the conventional page size is 20, the activity view uses 10.
    pub fn list_transactions(&self, account_id: AccountId, limit: usize) -> Vec<&TransactionRecord> {
        self.transactions
            .iter()
            .rev()
            .filter(|t| t.account_id == account_id)
            .take(limit)
            .collect()
    }

    pub fn transactions(&self) -> &[TransactionRecord] {
        &self.transactions
    }

    pub fn portfolio(&self, account_id: AccountId) -> Result<PortfolioSummary, LedgerError> {
        let balance = self.get_balance(account_id)?;
        let open_contracts = self
            .list_open_contracts(account_id)
            .into_iter()
            .cloned()
            .collect();
        let lifetime_profit_loss = self
            .transactions
            .iter()
            .filter(|t| t.account_id == account_id)
            .map(|t| t.profit_loss)
            .sum();

        Ok(PortfolioSummary {
            account_id,
            balance,
            open_contracts,
            lifetime_profit_loss,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub(super) fn record_transaction(
        &mut self,
        account_id: AccountId,
        contract_id: ContractId,
        kind: TransactionKind,
        size: u64,
        price: Price,
        margin: Credits,
        leverage: Leverage,
        profit_loss: Decimal,
    ) {
        let record = TransactionRecord::new(
            TransactionId(self.next_transaction_id),
            account_id,
            contract_id,
            kind,
            size,
            price,
            margin,
            leverage,
            profit_loss,
            self.current_time,
        );
        self.next_transaction_id += 1;
        self.transactions.push(record);
    }
}

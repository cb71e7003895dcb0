// 10.0: contract ledger. owns accounts, contracts, and the transaction log;
// every operation validates fully before the first mutation so failures leave
// no partial state.

mod config;
mod contracts;
mod core;
mod results;
mod sweeps;

pub use config::LedgerConfig;
pub use core::{Ledger, PortfolioSummary};
pub use results::{CloseResult, LedgerError, LiquidationResult};

// jcai-core: leveraged JCAI index trading game core.
// feed-first architecture: the index series drives everything downstream.
// ledger math is deterministic Decimal with no external I/O; the scheduler
// is the only background activity.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: AccountId, ContractId, Side, Price, Credits
//   2.x  sample.rs: IndexSample and the composite-index derivation
//   3.x  store.rs: append-only sample series, idempotent by timestamp
//   4.x  source.rs: external / replay / random source strategies
//   5.x  feed.rs: feed manager and the latest-sample snapshot cache
//   6.x  scheduler.rs: background tick thread
//   7.x  account.rs: balances, debit/credit
//   8.x  contract.rs: contract struct, margin/liquidation/pnl math
//   9.x  transaction.rs: append-only transaction log records
//   10.x ledger/: core ledger: lifecycle ops and settlement sweeps
//   11.x config.rs: feed/app presets and the bundled demo dataset

// index feed modules
pub mod feed;
pub mod sample;
pub mod scheduler;
pub mod source;
pub mod store;
pub mod types;

// ledger modules
pub mod account;
pub mod contract;
pub mod ledger;
pub mod transaction;

// integration modules
pub mod config;

// re exports for convenience
pub use account::*;
pub use contract::*;
pub use feed::*;
pub use ledger::*;
pub use sample::*;
pub use store::*;
pub use transaction::*;
pub use types::*;
pub use config::{demo_dataset, AppConfig, ConfigError, FeedConfig, FeedMode};
pub use source::{
    ExternalReading, MeasurementClient, MeasurementError, MockMeasurementClient, ReplayEntry,
    ReplaySource, RandomSource, SampleSource, SourceError,
};

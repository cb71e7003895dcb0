//! Periodic settlement sweeps. The host calls these each tick with the
//! current price; there is no autonomous monitor behind them.

use super::core::Ledger;
use super::results::{CloseResult, LiquidationResult};
use crate::types::{ContractId, Price};
use tracing::info;

impl Ledger {
    // 10.7: liquidation sweep. collect every open contract whose stored
    // liquidation price the current price has crossed, then settle each.
    pub fn sweep_liquidations(&mut self, current_price: Price) -> Vec<LiquidationResult> {
        let mut crossed: Vec<ContractId> = self
            .contracts
            .values()
            .filter(|c| c.is_open() && c.crossed_liquidation(current_price))
            .map(|c| c.id)
            .collect();
        crossed.sort();

        let results: Vec<LiquidationResult> = crossed
            .into_iter()
            .filter_map(|id| self.liquidate_contract(id, current_price).ok())
            .collect();

        if !results.is_empty() {
            info!(count = results.len(), price = %current_price, "liquidation sweep settled contracts");
        }
        results
    }

    // 10.8: expiry sweep. settles every open contract whose deadline has
    // passed at the supplied settlement price.
    pub fn sweep_expired(&mut self, settlement_price: Price) -> Vec<CloseResult> {
        let now = self.current_time;
        let mut due: Vec<ContractId> = self
            .contracts
            .values()
            .filter(|c| c.is_open() && c.is_expired(now))
            .map(|c| c.id)
            .collect();
        due.sort();

        let results: Vec<CloseResult> = due
            .into_iter()
            .filter_map(|id| self.expire_contract(id, settlement_price).ok())
            .collect();

        if !results.is_empty() {
            info!(count = results.len(), price = %settlement_price, "expiry sweep settled contracts");
        }
        results
    }
}

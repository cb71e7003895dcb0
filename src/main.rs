//! JCAI trading game core simulation.
//!
//! Walks the full lifecycle: feed bootstrap and history, contract round
//! trips, the loss cap, settlement sweeps, and a live scheduler run.

use jcai_core::*;
use parking_lot::Mutex;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("JCAI Index Feed & Contract Ledger Simulation");
    println!("Single Index, Leveraged Contracts, Full Lifecycle\n");

    scenario_1_replay_bootstrap();
    scenario_2_round_trip();
    scenario_3_loss_cap();
    scenario_4_liquidation_sweep();
    scenario_5_expiry_sweep();
    scenario_6_scheduler_run();

    println!("\nAll simulations completed successfully.");
}

/// Cold start in replay mode: backfill, cache, history.
fn scenario_1_replay_bootstrap() {
    println!("Scenario 1: Replay Bootstrap\n");

    let mut feed = FeedManager::new(FeedConfig::replay_demo(), SampleSource::replay(demo_dataset()));
    let now = Timestamp::now();
    feed.bootstrap(now).unwrap();

    let current = feed.current_sample().unwrap();
    println!("  Backfilled {} points, current index {}", feed.store().len(), current.value);

    let history = feed.history(now);
    println!(
        "  History has {} raw points, {} .. {}\n",
        history.len(),
        history.first().unwrap().value,
        history.last().unwrap().value
    );
}

/// Open then close at a moved price; margin plus pnl comes back.
fn scenario_2_round_trip() {
    println!("Scenario 2: Open/Close Round Trip\n");

    let mut ledger = Ledger::new(LedgerConfig::default());
    let alice = ledger.register_account();
    println!("  Alice registers, balance {}", ledger.get_balance(alice).unwrap());

    let entry = Price::new_unchecked(dec!(9935));
    let contract = ledger
        .open_contract(alice, 10, entry, Leverage::new(5).unwrap(), Side::Long, None)
        .unwrap();
    println!(
        "  Opens LONG 10 @ {} at 5x: margin {}, liquidation {}",
        entry, contract.margin, contract.liquidation_price
    );

    let exit = Price::new_unchecked(dec!(9960));
    let result = ledger.close_contract(alice, contract.id, exit).unwrap();
    println!(
        "  Closes @ {}: pnl {}, returned {}, balance {}\n",
        exit,
        result.profit_loss,
        result.returned,
        ledger.get_balance(alice).unwrap()
    );
}

/// A loss bigger than the margin never touches the rest of the balance.
fn scenario_3_loss_cap() {
    println!("Scenario 3: Loss Cap\n");

    let mut ledger = Ledger::new(LedgerConfig::default());
    let bob = ledger.register_account();

    let contract = ledger
        .open_contract(bob, 10, Price::new_unchecked(dec!(100)), Leverage::new(10).unwrap(), Side::Long, None)
        .unwrap();
    println!("  Bob opens LONG 10 @ 100 at 10x, margin {}", contract.margin);

    let result = ledger.close_contract(bob, contract.id, Price::new_unchecked(dec!(50))).unwrap();
    println!(
        "  Index halves: pnl {}, returned {} (loss capped at margin), balance {}\n",
        result.profit_loss,
        result.returned,
        ledger.get_balance(bob).unwrap()
    );
}

/// The per-tick liquidation sweep settles crossed contracts in one pass.
fn scenario_4_liquidation_sweep() {
    println!("Scenario 4: Liquidation Sweep\n");

    let mut ledger = Ledger::new(LedgerConfig::default());
    let carol = ledger.register_account();
    let dave = ledger.register_account();

    ledger
        .open_contract(carol, 5, Price::new_unchecked(dec!(10000)), Leverage::new(10).unwrap(), Side::Long, None)
        .unwrap();
    ledger
        .open_contract(dave, 5, Price::new_unchecked(dec!(10000)), Leverage::new(2).unwrap(), Side::Long, None)
        .unwrap();
    println!("  Carol longs at 10x (liq 9100), Dave at 2x (liq 5500)");

    let crash = Price::new_unchecked(dec!(9000));
    let results = ledger.sweep_liquidations(crash);
    println!("  Index crashes to {}: {} contract(s) liquidated", crash, results.len());
    for r in &results {
        println!("    contract {} of account {}: pnl {}", r.contract_id.0, r.account_id.0, r.profit_loss);
    }
    println!("  Dave still open: {}\n", !ledger.list_open_contracts(dave).is_empty());
}

/// The expiry sweep settles due contracts at the supplied price.
fn scenario_5_expiry_sweep() {
    println!("Scenario 5: Expiry Sweep\n");

    let mut ledger = Ledger::new(LedgerConfig::default());
    let erin = ledger.register_account();

    ledger
        .open_contract(erin, 4, Price::new_unchecked(dec!(9900)), Leverage::new(4).unwrap(), Side::Short, Some(6))
        .unwrap();
    println!("  Erin shorts 4 @ 9900 with a 6h horizon");

    ledger.advance_time(7 * 3_600_000);
    let results = ledger.sweep_expired(Price::new_unchecked(dec!(9850)));
    for r in &results {
        println!(
            "  7h later, settled @ {}: pnl {}, returned {}",
            r.settlement_price, r.profit_loss, r.returned
        );
    }
    println!("  Lifetime pnl: {}\n", ledger.portfolio(erin).unwrap().lifetime_profit_loss);
}

/// Synthetic feed under the background scheduler.
fn scenario_6_scheduler_run() {
    println!("Scenario 6: Scheduler Run (synthetic feed)\n");

    let config = FeedConfig {
        poll_interval_ms: 200,
        ..FeedConfig::synthetic()
    };
    let feed = Arc::new(Mutex::new(FeedManager::new(config, SampleSource::random())));
    let reader = feed.lock().reader();

    let handle = scheduler::spawn(Arc::clone(&feed), Duration::from_millis(200));
    std::thread::sleep(Duration::from_millis(900));
    handle.stop();

    let stored = feed.lock().store().len();
    let latest = reader.latest().unwrap();
    println!("  After ~0.9s at 200ms ticks: {} samples stored", stored);
    println!("  Latest index {} (subA {}, subB {})", latest.value, latest.sub_a, latest.sub_b);
}

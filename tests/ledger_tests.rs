//! Ledger invariant tests.
//!
//! The system is closed: credits only enter through registration grants, and
//! every settlement moves value between an account and its locked margin.
//! These tests drive random operation sequences against those invariants.

use jcai_core::*;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn price(v: i64) -> Price {
    Price::new_unchecked(Decimal::from(v))
}

#[derive(Debug, Clone)]
enum Op {
    Open { account_idx: usize, size: u64, leverage: u32, long: bool, price: i64 },
    Close { pick: usize, price: i64 },
    Liquidate { pick: usize, price: i64 },
    Expire { pick: usize, price: i64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..4usize, 1..50u64, 1..20u32, any::<bool>(), 50..20_000i64)
            .prop_map(|(account_idx, size, leverage, long, price)| Op::Open {
                account_idx,
                size,
                leverage,
                long,
                price
            }),
        (any::<usize>(), 50..20_000i64).prop_map(|(pick, price)| Op::Close { pick, price }),
        (any::<usize>(), 50..20_000i64).prop_map(|(pick, price)| Op::Liquidate { pick, price }),
        (any::<usize>(), 50..20_000i64).prop_map(|(pick, price)| Op::Expire { pick, price }),
    ]
}

proptest! {
    /// Sum of balances plus locked margins equals the grants plus the net of
    /// every settlement's (returned - margin), and no balance is ever negative.
    #[test]
    fn value_conserved_over_random_operations(ops in proptest::collection::vec(op_strategy(), 1..60)) {
        let mut ledger = Ledger::new(LedgerConfig::default());
        let accounts: Vec<AccountId> = (0..4).map(|_| ledger.register_account()).collect();
        let grants = dec!(1_000_000) * dec!(4);

        let mut open_ids: Vec<ContractId> = Vec::new();
        let mut settlement_net = Decimal::ZERO;

        for op in ops {
            ledger.advance_time(60_000);
            match op {
                Op::Open { account_idx, size, leverage, long, price: p } => {
                    let side = if long { Side::Long } else { Side::Short };
                    let result = ledger.open_contract(
                        accounts[account_idx],
                        size,
                        price(p),
                        Leverage::new(leverage).unwrap(),
                        side,
                        Some(1),
                    );
                    if let Ok(contract) = result {
                        open_ids.push(contract.id);
                    }
                }
                Op::Close { pick, price: p } => {
                    if open_ids.is_empty() { continue; }
                    let id = open_ids.remove(pick % open_ids.len());
                    let owner = ledger.get_contract(id).unwrap().account_id;
                    if let Ok(result) = ledger.close_contract(owner, id, price(p)) {
                        let margin = ledger.get_contract(id).unwrap().margin;
                        settlement_net += result.returned.value() - margin.value();
                    }
                }
                Op::Liquidate { pick, price: p } => {
                    if open_ids.is_empty() { continue; }
                    let id = open_ids.remove(pick % open_ids.len());
                    if ledger.liquidate_contract(id, price(p)).is_ok() {
                        let margin = ledger.get_contract(id).unwrap().margin;
                        settlement_net -= margin.value();
                    }
                }
                Op::Expire { pick, price: p } => {
                    if open_ids.is_empty() { continue; }
                    // contracts open with a 1h horizon; jump past it
                    ledger.advance_time(2 * 3_600_000);
                    let id = open_ids.remove(pick % open_ids.len());
                    if let Ok(result) = ledger.expire_contract(id, price(p)) {
                        let margin = ledger.get_contract(id).unwrap().margin;
                        settlement_net += result.returned.value() - margin.value();
                    }
                }
            }
        }

        let balances: Decimal = ledger
            .accounts_iter()
            .map(|(_, account)| account.balance.value())
            .sum();
        let locked: Decimal = ledger
            .contracts_iter()
            .filter(|(_, c)| c.is_open())
            .map(|(_, c)| c.margin.value())
            .sum();

        prop_assert_eq!(balances + locked, grants + settlement_net);
        // Credits enforces non-negativity by construction; check the numbers anyway
        for (_, account) in ledger.accounts_iter() {
            prop_assert!(account.balance.value() >= Decimal::ZERO);
        }
    }

    /// Every valid open debits exactly the margin and stores the right
    /// liquidation price for its side.
    #[test]
    fn open_debits_margin_and_prices_liquidation(
        size in 1..100u64,
        leverage in 1..25u32,
        entry in 100..20_000i64,
        long in any::<bool>(),
    ) {
        let mut ledger = Ledger::new(LedgerConfig::default());
        let account = ledger.register_account();
        let before = ledger.get_balance(account).unwrap().value();
        let side = if long { Side::Long } else { Side::Short };

        let contract = match ledger.open_contract(
            account,
            size,
            price(entry),
            Leverage::new(leverage).unwrap(),
            side,
            None,
        ) {
            Ok(c) => c,
            // margin above the grant is the one legitimate refusal
            Err(LedgerError::Account(AccountError::InsufficientFunds { .. })) => return Ok(()),
            Err(e) => return Err(TestCaseError::fail(format!("unexpected error: {e}"))),
        };

        let entry = Decimal::from(entry);
        let expected_margin = Decimal::from(size) * entry / Decimal::from(leverage);
        prop_assert_eq!(contract.margin.value(), expected_margin);
        prop_assert_eq!(ledger.get_balance(account).unwrap().value(), before - expected_margin);
        prop_assert!(contract.is_open());

        let cushion = entry / Decimal::from(leverage) * dec!(0.9);
        let expected_liq = if long { entry - cushion } else { entry + cushion };
        prop_assert_eq!(contract.liquidation_price.value(), expected_liq);
    }

    /// Open then close at the same price is value-neutral at any size,
    /// leverage, and side.
    #[test]
    fn round_trip_at_same_price_is_neutral(
        size in 1..100u64,
        leverage in 1..25u32,
        entry in 100..9_000i64,
        long in any::<bool>(),
    ) {
        let mut ledger = Ledger::new(LedgerConfig::default());
        let account = ledger.register_account();
        let side = if long { Side::Long } else { Side::Short };

        let contract = ledger
            .open_contract(account, size, price(entry), Leverage::new(leverage).unwrap(), side, None)
            .unwrap();
        let result = ledger.close_contract(account, contract.id, price(entry)).unwrap();

        prop_assert_eq!(result.profit_loss, Decimal::ZERO);
        prop_assert_eq!(result.returned, contract.margin);
        prop_assert_eq!(ledger.get_balance(account).unwrap().value(), dec!(1_000_000));
    }
}

mod deterministic {
    use super::*;

    #[test]
    fn liquidation_price_worked_example() {
        let mut ledger = Ledger::new(LedgerConfig::default());
        let account = ledger.register_account();

        let long = ledger
            .open_contract(account, 1, price(10_000), Leverage::new(5).unwrap(), Side::Long, None)
            .unwrap();
        assert_eq!(long.liquidation_price.value(), dec!(8200));

        let short = ledger
            .open_contract(account, 1, price(10_000), Leverage::new(5).unwrap(), Side::Short, None)
            .unwrap();
        assert_eq!(short.liquidation_price.value(), dec!(11800));
    }

    #[test]
    fn loss_cap_worked_example() {
        let mut ledger = Ledger::new(LedgerConfig::default());
        let account = ledger.register_account();

        let contract = ledger
            .open_contract(account, 10, price(100), Leverage::new(10).unwrap(), Side::Long, None)
            .unwrap();
        assert_eq!(contract.margin.value(), dec!(100));

        let result = ledger.close_contract(account, contract.id, price(50)).unwrap();
        assert_eq!(result.profit_loss, dec!(-500));
        assert!(result.returned.is_zero());
        assert_eq!(ledger.get_balance(account).unwrap().value(), dec!(999_900));
    }

    #[test]
    fn settlement_is_applied_at_most_once() {
        let mut ledger = Ledger::new(LedgerConfig::default());
        let account = ledger.register_account();
        let contract = ledger
            .open_contract(account, 10, price(10_000), Leverage::new(5).unwrap(), Side::Long, Some(1))
            .unwrap();

        ledger.close_contract(account, contract.id, price(10_100)).unwrap();
        let balance = ledger.get_balance(account).unwrap();

        // every terminal path refuses the already-closed contract
        assert!(matches!(
            ledger.close_contract(account, contract.id, price(10_100)),
            Err(LedgerError::ContractNotFound(_))
        ));
        assert!(matches!(
            ledger.liquidate_contract(contract.id, price(10_100)),
            Err(LedgerError::ContractNotFound(_))
        ));
        ledger.advance_time(2 * 3_600_000);
        assert!(matches!(
            ledger.expire_contract(contract.id, price(10_100)),
            Err(LedgerError::ContractNotFound(_))
        ));

        assert_eq!(ledger.get_balance(account).unwrap(), balance);
        // exactly two records: the open and the close
        assert_eq!(ledger.list_transactions(account, 20).len(), 2);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let mut ledger = Ledger::new(LedgerConfig::default());
        let account = ledger.register_account();

        assert!(matches!(
            ledger.close_contract(account, ContractId(99), price(10_000)),
            Err(LedgerError::ContractNotFound(_))
        ));
        assert!(matches!(
            ledger.get_balance(AccountId(99)),
            Err(LedgerError::AccountNotFound(_))
        ));
        assert!(matches!(
            ledger.open_contract(AccountId(99), 1, price(10_000), Leverage::new(1).unwrap(), Side::Long, None),
            Err(LedgerError::AccountNotFound(_))
        ));
    }

    #[test]
    fn short_profits_when_index_falls() {
        let mut ledger = Ledger::new(LedgerConfig::default());
        let account = ledger.register_account();

        let contract = ledger
            .open_contract(account, 10, price(10_000), Leverage::new(5).unwrap(), Side::Short, None)
            .unwrap();
        let result = ledger.close_contract(account, contract.id, price(9_500)).unwrap();

        assert_eq!(result.profit_loss, dec!(5000));
        assert_eq!(result.returned.value(), dec!(25000));
        assert_eq!(ledger.get_balance(account).unwrap().value(), dec!(1_005_000));
    }

    #[test]
    fn audit_trail_has_two_records_per_contract() {
        let mut ledger = Ledger::new(LedgerConfig::default());
        let account = ledger.register_account();

        let a = ledger
            .open_contract(account, 2, price(10_000), Leverage::new(2).unwrap(), Side::Long, None)
            .unwrap();
        let b = ledger
            .open_contract(account, 3, price(10_000), Leverage::new(3).unwrap(), Side::Short, None)
            .unwrap();
        ledger.close_contract(account, a.id, price(10_100)).unwrap();
        ledger.liquidate_contract(b.id, price(13_500)).unwrap();

        let records = ledger.transactions();
        assert_eq!(records.len(), 4);
        assert_eq!(records.iter().filter(|r| r.contract_id == a.id).count(), 2);
        assert_eq!(records.iter().filter(|r| r.contract_id == b.id).count(), 2);
        // opens record zero pnl, terminals carry the settlement
        assert!(records.iter().filter(|r| !r.kind.is_terminal()).all(|r| r.profit_loss.is_zero()));
        assert_eq!(
            records.iter().filter(|r| r.kind.is_terminal() && r.contract_id == b.id).count(),
            1
        );
    }

    #[test]
    fn contract_serialization_round_trips() {
        let mut ledger = Ledger::new(LedgerConfig::default());
        let account = ledger.register_account();
        let contract = ledger
            .open_contract(account, 7, price(9_935), Leverage::new(7).unwrap(), Side::Long, None)
            .unwrap();

        let json = serde_json::to_string(&contract).unwrap();
        let back: Contract = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, contract.id);
        assert_eq!(back.margin, contract.margin);
        assert_eq!(back.liquidation_price, contract.liquidation_price);
        assert!(json.contains("\"status\":\"open\""));
    }
}

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::models::{AlertType, RiskScore, TransactionKind, TransactionStatus};

const NOW: i64 = 1_750_000_000_000;
const DAY_MS: i64 = 86_400_000;

fn default_budgets() -> Vec<Budget> {
    vec![
        Budget::new(Category::Food, dec!(8000)).with_spent(dec!(3400)),
        Budget::new(Category::Travel, dec!(5000)).with_spent(dec!(1200)),
        Budget::new(Category::Investments, dec!(10000)).with_spent(dec!(4000)),
        Budget::new(Category::Shopping, dec!(6000)).with_spent(dec!(2100)),
    ]
}

fn make_engine() -> Engine<NullSink> {
    make_engine_with(Settings::default())
}

fn make_engine_with(settings: Settings) -> Engine<NullSink> {
    let ledger = Ledger::new(Wallet::new("Student".into(), dec!(42500)), default_budgets());
    Engine::new(ledger, AlertStore::default(), settings, NullSink)
}

fn no_round_up() -> Settings {
    Settings {
        round_up_enabled: false,
    }
}

fn make_txn(id: &str, amount: Decimal, recipient: &str, category: Category, timestamp: i64) -> Transaction {
    Transaction::new(
        id.into(),
        amount,
        recipient.into(),
        "Student".into(),
        category,
        timestamp,
    )
}

fn spent(engine: &Engine<impl LedgerSink>, category: Category) -> Decimal {
    engine
        .budgets()
        .iter()
        .find(|b| b.category == category)
        .map(|b| b.spent)
        .unwrap()
}

// ── Round-up ──────────────────────────────────────────────────

#[test]
fn test_round_up_swept_before_debit() {
    let mut engine = make_engine();
    let out = engine
        .submit_transaction_at(make_txn("t1", dec!(123), "Canteen", Category::Food, NOW), NOW)
        .unwrap();
    assert_eq!(out.transaction.round_up_amount, Some(dec!(7)));
    assert_eq!(engine.wallet().balance, dec!(42500) - dec!(123) - dec!(7));
    // The sweep does not count against the envelope.
    assert_eq!(spent(&engine, Category::Food), dec!(3523));
    assert_eq!(out.transaction.total_outflow(), dec!(130));
}

#[test]
fn test_round_up_skipped_on_multiple_of_ten() {
    let mut engine = make_engine();
    let out = engine
        .submit_transaction_at(make_txn("t1", dec!(120), "Canteen", Category::Food, NOW), NOW)
        .unwrap();
    assert!(out.transaction.round_up_amount.is_none());
    assert_eq!(engine.wallet().balance, dec!(42380));
}

#[test]
fn test_round_up_disabled_passes_through() {
    let mut engine = make_engine_with(no_round_up());
    let out = engine
        .submit_transaction_at(make_txn("t1", dec!(123), "Canteen", Category::Food, NOW), NOW)
        .unwrap();
    assert!(out.transaction.round_up_amount.is_none());
    assert_eq!(engine.wallet().balance, dec!(42377));
}

#[test]
fn test_round_up_only_for_completed() {
    let mut engine = make_engine();
    let tx = make_txn("t1", dec!(123), "Canteen", Category::Food, NOW)
        .with_status(TransactionStatus::Pending);
    let out = engine.submit_transaction_at(tx, NOW).unwrap();
    assert!(out.transaction.round_up_amount.is_none());
    assert_eq!(engine.wallet().balance, dec!(42500));
}

#[test]
fn test_round_up_applies_to_sells() {
    let mut engine = make_engine();
    let tx = make_txn("s1", dec!(995), "Sell Order: TCS", Category::Investments, NOW);
    let out = engine.submit_transaction_at(tx, NOW).unwrap();
    assert_eq!(out.transaction.round_up_amount, Some(dec!(5)));
    assert_eq!(out.settlement, Settlement::Credited(dec!(995)));
    assert_eq!(engine.wallet().balance, dec!(42500) + dec!(995) - dec!(5));
}

#[test]
fn test_toggle_round_up() {
    let mut engine = make_engine();
    engine.set_round_up(false);
    assert!(!engine.settings().round_up_enabled);
    engine
        .submit_transaction_at(make_txn("t1", dec!(5), "Canteen", Category::Food, NOW), NOW)
        .unwrap();
    assert_eq!(engine.wallet().balance, dec!(42495));
}

// ── Settlement ────────────────────────────────────────────────

#[test]
fn test_sell_order_credits() {
    let mut engine = make_engine_with(no_round_up());
    let tx = make_txn("s1", dec!(5000), "Sell Order: TCS", Category::Investments, NOW);
    let out = engine.submit_transaction_at(tx, NOW).unwrap();
    assert_eq!(out.settlement, Settlement::Credited(dec!(5000)));
    assert_eq!(engine.wallet().balance, dec!(47500));
    assert_eq!(spent(&engine, Category::Investments), dec!(4000));
}

#[test]
fn test_other_completed_debits() {
    let mut engine = make_engine_with(no_round_up());
    let tx = make_txn("b1", dec!(5000), "Buy Order: TCS", Category::Investments, NOW);
    let out = engine.submit_transaction_at(tx, NOW).unwrap();
    assert_eq!(
        out.settlement,
        Settlement::Debited {
            amount: dec!(5000),
            budget: Some(Category::Investments)
        }
    );
    assert_eq!(engine.wallet().balance, dec!(37500));
    assert_eq!(spent(&engine, Category::Investments), dec!(9000));
}

#[test]
fn test_explicit_kind_beats_recipient_text() {
    let mut engine = make_engine_with(no_round_up());
    let tx = make_txn("p1", dec!(200), "Sell Order Cafe", Category::Food, NOW)
        .with_kind(TransactionKind::Payment);
    engine.submit_transaction_at(tx, NOW).unwrap();
    assert_eq!(engine.wallet().balance, dec!(42300));
}

#[test]
fn test_fees_and_others_never_touch_budgets() {
    let mut engine = make_engine_with(no_round_up());
    let before: Vec<Decimal> = engine.budgets().iter().map(|b| b.spent).collect();
    engine
        .submit_transaction_at(make_txn("f1", dec!(9000), "Tuition", Category::Fees, NOW - DAY_MS), NOW)
        .unwrap();
    engine
        .submit_transaction_at(
            make_txn("o1", dec!(300), "Friend", Category::Others, NOW - 2 * DAY_MS),
            NOW,
        )
        .unwrap();
    let after: Vec<Decimal> = engine.budgets().iter().map(|b| b.spent).collect();
    assert_eq!(before, after);
    assert_eq!(engine.wallet().balance, dec!(33200));
}

#[test]
fn test_missing_budget_is_skipped() {
    let mut engine = make_engine_with(no_round_up());
    let out = engine
        .submit_transaction_at(make_txn("r1", dec!(7000), "Landlord", Category::Rent, NOW), NOW)
        .unwrap();
    assert_eq!(
        out.settlement,
        Settlement::Debited {
            amount: dec!(7000),
            budget: None
        }
    );
    assert!(engine.budgets().iter().all(|b| b.category != Category::Rent));
    assert_eq!(engine.wallet().balance, dec!(35500));
}

#[test]
fn test_pending_and_failed_only_recorded() {
    let mut engine = make_engine();
    for (id, status) in [("p1", TransactionStatus::Pending), ("x1", TransactionStatus::Failed)] {
        let tx = make_txn(id, dec!(555), "Campus Mart", Category::Shopping, NOW - DAY_MS)
            .with_status(status);
        let out = engine.submit_transaction_at(tx, NOW).unwrap();
        assert_eq!(out.settlement, Settlement::Recorded);
    }
    assert_eq!(engine.wallet().balance, dec!(42500));
    assert_eq!(spent(&engine, Category::Shopping), dec!(2100));
    let ids: Vec<&str> = engine.history().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["x1", "p1"]);
}

#[test]
fn test_overdraft_is_allowed() {
    let mut engine = make_engine_with(no_round_up());
    engine
        .submit_transaction_at(make_txn("t1", dec!(50000), "Laptop Store", Category::Shopping, NOW), NOW)
        .unwrap();
    assert_eq!(engine.wallet().balance, dec!(-7500));
    assert!(engine.wallet().is_overdrawn());
}

// ── History ───────────────────────────────────────────────────

#[test]
fn test_history_newest_first_by_submission() {
    let mut engine = make_engine();
    engine
        .submit_transaction_at(make_txn("a", dec!(10), "X", Category::Food, NOW - 5 * DAY_MS), NOW)
        .unwrap();
    engine
        .submit_transaction_at(make_txn("b", dec!(10), "Y", Category::Food, NOW - 9 * DAY_MS), NOW)
        .unwrap();
    let ids: Vec<&str> = engine.history().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
}

#[test]
fn test_analysis_sees_history_without_current() {
    let mut engine = make_engine();
    // Two prior transactions inside the minute: the third trips velocity.
    for (i, id) in ["a", "b"].iter().enumerate() {
        let out = engine
            .submit_transaction_at(make_txn(id, dec!(10), id, Category::Food, NOW - 1000 * (i as i64 + 1)), NOW)
            .unwrap();
        assert!(out.alert.is_none());
    }
    let out = engine
        .submit_transaction_at(make_txn("c", dec!(10), "c", Category::Food, NOW), NOW)
        .unwrap();
    assert_eq!(out.alert.unwrap().alert_type, AlertType::Velocity);
}

// ── Validation ────────────────────────────────────────────────

#[test]
fn test_rejects_non_positive_amount() {
    let mut engine = make_engine();
    assert!(engine
        .submit_transaction_at(make_txn("z", Decimal::ZERO, "X", Category::Food, NOW), NOW)
        .is_err());
    assert!(engine
        .submit_transaction_at(make_txn("n", dec!(-5), "X", Category::Food, NOW), NOW)
        .is_err());
    assert!(engine.history().is_empty());
    assert_eq!(engine.wallet().balance, dec!(42500));
}

#[test]
fn test_rejects_empty_id_and_recipient() {
    let mut engine = make_engine();
    assert!(engine
        .submit_transaction_at(make_txn(" ", dec!(5), "X", Category::Food, NOW), NOW)
        .is_err());
    assert!(engine
        .submit_transaction_at(make_txn("t", dec!(5), "", Category::Food, NOW), NOW)
        .is_err());
    assert!(engine.history().is_empty());
}

#[test]
fn test_rejects_duplicate_id() {
    let mut engine = make_engine_with(no_round_up());
    engine
        .submit_transaction_at(make_txn("t1", dec!(100), "X", Category::Food, NOW), NOW)
        .unwrap();
    let err = engine
        .submit_transaction_at(make_txn("t1", dec!(100), "X", Category::Food, NOW), NOW)
        .unwrap_err();
    assert!(err.to_string().contains("already submitted"));
    assert_eq!(engine.history().len(), 1);
    assert_eq!(engine.wallet().balance, dec!(42400));
}

// ── Extreme amounts ───────────────────────────────────────────

#[test]
fn test_round_up_past_max_rejected_untouched() {
    let mut engine = make_engine();
    let err = engine
        .submit_transaction_at(make_txn("huge", Decimal::MAX, "Canteen", Category::Others, NOW), NOW)
        .unwrap_err();
    assert!(err.to_string().contains("too large to round up"));
    assert!(engine.history().is_empty());
    assert!(engine.alerts().is_empty());
    assert_eq!(engine.wallet().balance, dec!(42500));
}

#[test]
fn test_budget_overflow_rejected_untouched() {
    let mut engine = make_engine_with(no_round_up());
    assert!(engine
        .submit_transaction_at(make_txn("huge", Decimal::MAX, "Canteen", Category::Food, NOW), NOW)
        .is_err());
    assert!(engine.history().is_empty());
    assert!(engine.alerts().is_empty());
    assert_eq!(engine.wallet().balance, dec!(42500));
    assert_eq!(spent(&engine, Category::Food), dec!(3400));
}

#[test]
fn test_wallet_overflow_rejected_untouched() {
    let mut engine = make_engine_with(no_round_up());
    engine
        .submit_transaction_at(make_txn("t1", Decimal::MAX, "Hostel", Category::Others, NOW), NOW)
        .unwrap();
    let balance = engine.wallet().balance;
    assert_eq!(balance, dec!(42500) - Decimal::MAX);

    assert!(engine
        .submit_transaction_at(
            make_txn("t2", dec!(100000), "Hostel", Category::Others, NOW + DAY_MS),
            NOW + DAY_MS
        )
        .is_err());
    assert_eq!(engine.wallet().balance, balance);
    assert_eq!(engine.history().len(), 1);
}

// ── Alerts ────────────────────────────────────────────────────

#[test]
fn test_alert_annotates_transaction() {
    let mut engine = make_engine();
    let out = engine
        .submit_transaction_at(make_txn("big", dec!(20000), "Laptop Store", Category::Shopping, NOW), NOW)
        .unwrap();
    let alert = out.alert.unwrap();
    assert_eq!(alert.alert_type, AlertType::Amount);
    assert_eq!(alert.tx_id, "big");
    assert_eq!(out.transaction.risk_score, RiskScore::Medium);
    assert_eq!(out.transaction.flagged_reason.as_deref(), Some(alert.description.as_str()));
    assert_eq!(engine.history()[0].flagged_reason, out.transaction.flagged_reason);
}

#[test]
fn test_alert_never_lowers_caller_risk() {
    let mut engine = make_engine();
    let mut tx = make_txn("big", dec!(20000), "Laptop Store", Category::Shopping, NOW);
    tx.risk_score = RiskScore::High;
    let out = engine.submit_transaction_at(tx, NOW).unwrap();
    assert_eq!(out.transaction.risk_score, RiskScore::High);
}

#[test]
fn test_alert_is_advisory() {
    let mut engine = make_engine_with(no_round_up());
    engine
        .submit_transaction_at(make_txn("big", dec!(20000), "Laptop Store", Category::Shopping, NOW), NOW)
        .unwrap();
    assert_eq!(engine.wallet().balance, dec!(22500));
    assert_eq!(spent(&engine, Category::Shopping), dec!(22100));
}

#[test]
fn test_pattern_alert_through_engine() {
    let mut engine = make_engine();
    engine
        .submit_transaction_at(
            make_txn("h1", dec!(100), "Campus Mart", Category::Food, NOW - 1_800_000),
            NOW - 1_800_000,
        )
        .unwrap();
    let out = engine
        .submit_transaction_at(make_txn("t", dec!(100), "Campus Mart", Category::Shopping, NOW), NOW)
        .unwrap();
    let alert = out.alert.unwrap();
    assert_eq!(alert.alert_type, AlertType::Pattern);
    assert_eq!(alert.severity, RiskScore::Low);
}

#[test]
fn test_alert_store_keeps_latest_twenty() {
    let mut engine = make_engine();
    for n in 0..25 {
        engine
            .submit_transaction_at(
                make_txn(&format!("t{n}"), dec!(20000), "Laptop Store", Category::Shopping, NOW + n),
                NOW + n,
            )
            .unwrap();
    }
    let alerts = engine.alerts();
    assert_eq!(alerts.len(), ALERT_CAPACITY);
    let expected: Vec<String> = (5..25).rev().map(|n| format!("t{n}")).collect();
    let got: Vec<String> = alerts.into_iter().map(|a| a.tx_id).collect();
    assert_eq!(got, expected);
    // History itself is not bounded.
    assert_eq!(engine.history().len(), 25);
}

#[test]
fn test_clear_alerts() {
    let mut engine = make_engine();
    engine
        .submit_transaction_at(make_txn("big", dec!(20000), "Laptop Store", Category::Shopping, NOW), NOW)
        .unwrap();
    assert_eq!(engine.alerts().len(), 1);
    engine.clear_alerts();
    assert!(engine.alerts().is_empty());
}

// ── Budgets ───────────────────────────────────────────────────

#[test]
fn test_set_budget_limit_updates_and_creates() {
    let mut engine = make_engine();
    let food = engine.set_budget_limit(Category::Food, dec!(9000)).unwrap();
    assert_eq!(food.limit_amount, dec!(9000));
    assert_eq!(food.spent, dec!(3400));

    let rent = engine.set_budget_limit(Category::Rent, dec!(12000)).unwrap();
    assert_eq!(rent.spent, Decimal::ZERO);
    assert_eq!(engine.budgets().len(), 5);
}

#[test]
fn test_set_budget_limit_rejects_exempt_and_non_positive() {
    let mut engine = make_engine();
    assert!(engine.set_budget_limit(Category::Fees, dec!(100)).is_err());
    assert!(engine.set_budget_limit(Category::Others, dec!(100)).is_err());
    assert!(engine.set_budget_limit(Category::Food, Decimal::ZERO).is_err());
    assert_eq!(engine.budgets().len(), 4);
}

// ── Orders ────────────────────────────────────────────────────

#[test]
fn test_buy_then_sell_adjusts_holdings() {
    let mut engine = make_engine_with(no_round_up());
    let out = engine.buy_stock_at("tcs", dec!(2), dec!(3500), NOW).unwrap();
    assert_eq!(out.transaction.kind, TransactionKind::StockBuy);
    assert_eq!(out.transaction.recipient, "Buy Order: TCS");
    assert_eq!(out.transaction.amount, dec!(7000));
    assert_eq!(out.transaction.category, Category::Investments);
    assert_eq!(out.transaction.sender, "Student");
    assert!(out.transaction.id.starts_with("buy-"));
    assert_eq!(engine.wallet().balance, dec!(35500));

    engine.buy_stock_at("TCS", dec!(2), dec!(4500), NOW + DAY_MS).unwrap();
    let holding = &engine.holdings()[0];
    assert_eq!(holding.quantity, dec!(4));
    assert_eq!(holding.avg_price, dec!(4000));
    assert_eq!(engine.invested(), dec!(16000));

    let out = engine.sell_stock_at("TCS", dec!(1), dec!(5000), NOW + 2 * DAY_MS).unwrap();
    assert_eq!(out.settlement, Settlement::Credited(dec!(5000)));
    assert_eq!(engine.holdings()[0].quantity, dec!(3));

    engine.sell_stock_at("TCS", dec!(10), dec!(5000), NOW + 3 * DAY_MS).unwrap();
    assert!(engine.holdings().is_empty());
}

#[test]
fn test_sell_unheld_symbol_still_credits() {
    let mut engine = make_engine_with(no_round_up());
    let out = engine.sell_stock_at("INFY", dec!(1), dec!(1500), NOW).unwrap();
    assert_eq!(out.settlement, Settlement::Credited(dec!(1500)));
    assert!(engine.holdings().is_empty());
    assert_eq!(engine.wallet().balance, dec!(44000));
}

#[test]
fn test_order_rejects_bad_input() {
    let mut engine = make_engine();
    assert!(engine.buy_stock_at("", dec!(1), dec!(10), NOW).is_err());
    assert!(engine.buy_stock_at("TCS", Decimal::ZERO, dec!(10), NOW).is_err());
    assert!(engine.sell_stock_at("TCS", dec!(1), dec!(-1), NOW).is_err());
    assert!(engine.holdings().is_empty());
    assert!(engine.history().is_empty());
}

#[test]
fn test_order_value_overflow_rejected() {
    let mut engine = make_engine_with(no_round_up());
    assert!(engine.buy_stock_at("TCS", Decimal::MAX, dec!(2), NOW).is_err());
    assert!(engine.sell_stock_at("TCS", Decimal::MAX, dec!(2), NOW).is_err());
    assert!(engine.holdings().is_empty());
    assert!(engine.history().is_empty());
    assert_eq!(engine.wallet().balance, dec!(42500));
}

#[test]
fn test_order_value_rounding_to_zero_rejected() {
    let mut engine = make_engine();
    let tiny = dec!(0.00000000000000000001);
    assert!(engine.buy_stock_at("TCS", tiny, tiny, NOW).is_err());
    assert!(engine.holdings().is_empty());
    assert!(engine.history().is_empty());
}

#[test]
fn test_rejected_orders_keep_existing_position() {
    let mut engine = make_engine_with(no_round_up());
    engine.buy_stock_at("TCS", dec!(1), dec!(100), NOW).unwrap();
    let before = engine.holdings().to_vec();

    // Investments spend would overflow.
    assert!(engine
        .buy_stock_at("TCS", Decimal::MAX, dec!(1), NOW + DAY_MS)
        .is_err());
    // Wallet credit would overflow.
    assert!(engine
        .sell_stock_at("TCS", Decimal::MAX, dec!(1), NOW + DAY_MS)
        .is_err());

    assert_eq!(engine.holdings(), before.as_slice());
    assert_eq!(engine.history().len(), 1);
    assert_eq!(engine.wallet().balance, dec!(42400));
}

#[test]
fn test_position_overflow_refuses_buy() {
    let ledger = Ledger::new(Wallet::new("Student".into(), dec!(42500)), default_budgets())
        .with_holdings(vec![Holding::new("TCS".into(), Decimal::MAX, dec!(1))]);
    let mut engine = Engine::new(ledger, AlertStore::default(), no_round_up(), NullSink);

    assert!(engine.buy_stock_at("TCS", dec!(1), dec!(1), NOW).is_err());
    assert_eq!(engine.holdings()[0].quantity, Decimal::MAX);
    assert!(engine.history().is_empty());
    assert_eq!(engine.wallet().balance, dec!(42500));
    assert_eq!(spent(&engine, Category::Investments), dec!(4000));
}

#[test]
fn test_fee_contribution() {
    let mut engine = make_engine();
    let out = engine
        .contribute_fee_at(dec!(1500), "Semester 4 Tuition", NOW)
        .unwrap();
    assert_eq!(out.transaction.kind, TransactionKind::FeeContribution);
    assert_eq!(out.transaction.category, Category::Fees);
    assert_eq!(out.settlement, Settlement::Debited { amount: dec!(1500), budget: None });
    assert_eq!(engine.wallet().balance, dec!(41000));
}

#[test]
fn test_pay_pending_is_recorded_only() {
    let mut engine = make_engine();
    let out = engine
        .pay(dec!(250), "Canteen", Category::Food, TransactionStatus::Pending)
        .unwrap();
    assert_eq!(out.settlement, Settlement::Recorded);
    assert!(out.transaction.id.starts_with("pay-"));
    assert_eq!(engine.wallet().balance, dec!(42500));
}

// ── Persistence port ──────────────────────────────────────────

#[derive(Default)]
struct RecordingSink {
    persisted: Vec<(String, Decimal, Option<AlertType>)>,
    budget_saves: usize,
    cleared: usize,
    settings: Option<Settings>,
}

impl LedgerSink for RecordingSink {
    fn persist(&mut self, ledger: &Ledger, tx: &Transaction, alert: Option<&FraudAlert>) -> Result<()> {
        self.persisted
            .push((tx.id.clone(), ledger.wallet.balance, alert.map(|a| a.alert_type)));
        Ok(())
    }

    fn save_budgets(&mut self, _: &[Budget]) -> Result<()> {
        self.budget_saves += 1;
        Ok(())
    }

    fn clear_alerts(&mut self) -> Result<()> {
        self.cleared += 1;
        Ok(())
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<()> {
        self.settings = Some(settings.clone());
        Ok(())
    }
}

struct FailingSink;

impl LedgerSink for FailingSink {
    fn persist(&mut self, _: &Ledger, _: &Transaction, _: Option<&FraudAlert>) -> Result<()> {
        anyhow::bail!("disk full")
    }

    fn save_budgets(&mut self, _: &[Budget]) -> Result<()> {
        anyhow::bail!("disk full")
    }

    fn clear_alerts(&mut self) -> Result<()> {
        anyhow::bail!("disk full")
    }

    fn save_settings(&mut self, _: &Settings) -> Result<()> {
        anyhow::bail!("disk full")
    }
}

#[test]
fn test_sink_sees_each_mutation() {
    let ledger = Ledger::new(Wallet::new("Student".into(), dec!(1000)), default_budgets());
    let mut engine = Engine::new(ledger, AlertStore::default(), Settings::default(), RecordingSink::default());
    engine
        .submit_transaction_at(make_txn("t1", dec!(123), "Canteen", Category::Food, NOW), NOW)
        .unwrap();
    engine
        .submit_transaction_at(make_txn("t2", dec!(20000), "Laptop", Category::Shopping, NOW - DAY_MS), NOW)
        .unwrap();
    engine.set_budget_limit(Category::Food, dec!(100)).unwrap();
    engine.set_round_up(false);
    engine.clear_alerts();

    let sink = engine.sink();
    assert_eq!(
        sink.persisted,
        vec![
            ("t1".to_string(), dec!(870), None),
            ("t2".to_string(), dec!(-19130), Some(AlertType::Amount)),
        ]
    );
    assert_eq!(sink.budget_saves, 1);
    assert_eq!(sink.cleared, 1);
    assert_eq!(sink.settings, Some(no_round_up()));
}

#[test]
fn test_sink_failure_keeps_state() {
    let ledger = Ledger::new(Wallet::new("Student".into(), dec!(1000)), default_budgets());
    let mut engine = Engine::new(ledger, AlertStore::default(), Settings::default(), FailingSink);
    let out = engine
        .submit_transaction_at(make_txn("t1", dec!(100), "Canteen", Category::Food, NOW), NOW)
        .unwrap();
    assert_eq!(out.settlement, Settlement::Debited { amount: dec!(100), budget: Some(Category::Food) });
    assert_eq!(engine.wallet().balance, dec!(900));
    assert!(engine.set_budget_limit(Category::Food, dec!(50)).is_ok());
    engine.set_round_up(false);
    assert!(!engine.settings().round_up_enabled);
}

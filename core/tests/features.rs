//! Account-level feature tests.

use chrono::NaiveDate;
use mule_eda_core::{
    features::aggregate_features,
    model::{LabeledTransaction, Transaction},
};

fn txn(
    account: &str,
    cp: Option<&str>,
    amount: f64,
    kind: Option<&str>,
    day: u32,
    hour: u32,
) -> LabeledTransaction {
    LabeledTransaction {
        txn: Transaction {
            account_id: Some(account.into()),
            counterparty_id: cp.map(str::to_string),
            amount: Some(amount),
            txn_type: kind.map(str::to_string),
            channel: Some("UPI".into()),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
        },
        is_mule: 0,
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// The reference scenario: one credit and one debit on the same day.
#[test]
fn credit_and_debit_same_day() {
    let txns = vec![
        txn("A1", Some("X"), 100.0, Some("C"), 1, 10),
        txn("A1", Some("Y"), 50.0, Some("D"), 1, 12),
    ];

    let features = aggregate_features(&txns);
    assert_eq!(features.len(), 1);
    let f = &features[0];

    assert_eq!(f.account_id, "A1");
    assert_eq!(f.txn_count, 2);
    assert!(close(f.avg_amount, 75.0));
    assert!(close(f.total_amount, 150.0));
    assert!(close(f.min_amount, 50.0));
    assert!(close(f.max_amount, 100.0));
    assert!(close(f.std_amount, 1250.0f64.sqrt()));
    assert_eq!(f.unique_counterparties, 2);
    assert!(close(f.avg_txn_hour, 11.0));
    assert!(close(f.credit_debit_ratio, 0.5));
    assert!(close(f.net_flow, 50.0));
    assert!(close(f.avg_txn_per_day, 2.0));
}

/// No debits: the +1 smoothing keeps the ratio finite.
#[test]
fn ratio_defined_without_debits() {
    let txns = vec![
        txn("A", Some("X"), 10.0, Some("C"), 1, 9),
        txn("A", Some("X"), 10.0, Some("C"), 2, 9),
        txn("A", Some("X"), 10.0, Some("C"), 3, 9),
    ];
    let features = aggregate_features(&txns);
    let f = &features[0];
    assert!(f.credit_debit_ratio.is_finite());
    assert!(close(f.credit_debit_ratio, 3.0));
}

#[test]
fn debit_only_account_has_negative_net_flow() {
    let txns = vec![
        txn("D1", Some("X"), 40.0, Some("D"), 5, 1),
        txn("D1", Some("Y"), 60.0, Some("D"), 6, 2),
    ];
    let features = aggregate_features(&txns);
    let f = &features[0];
    assert!(f.net_flow <= 0.0);
    assert!(close(f.net_flow, -100.0));
    assert!(close(f.credit_debit_ratio, 0.0));
}

/// Ratios and flows ignore rows that are neither C nor D.
#[test]
fn other_types_count_toward_totals_only() {
    let txns = vec![
        txn("O", Some("X"), 5.0, Some("R"), 1, 0),
        txn("O", Some("X"), 7.0, None, 1, 0),
        txn("O", Some("X"), 3.0, Some("D"), 1, 0),
    ];
    let features = aggregate_features(&txns);
    let f = &features[0];
    assert_eq!(f.txn_count, 3);
    assert!(close(f.total_amount, 15.0));
    assert!(close(f.net_flow, -3.0));
    assert!(close(f.credit_debit_ratio, 0.0));
}

#[test]
fn single_day_intensity_equals_day_count() {
    let txns: Vec<_> = (0..7)
        .map(|h| txn("S", Some("X"), 1.0, Some("C"), 9, h))
        .collect();
    let features = aggregate_features(&txns);
    let f = &features[0];
    assert!(close(f.avg_txn_per_day, 7.0));
}

/// Intensity is the mean of daily counts: 3 on day 1, 1 on day 2 -> 2.
#[test]
fn intensity_averages_over_active_days() {
    let txns = vec![
        txn("M", Some("X"), 1.0, Some("C"), 1, 1),
        txn("M", Some("X"), 1.0, Some("C"), 1, 2),
        txn("M", Some("X"), 1.0, Some("C"), 1, 3),
        txn("M", Some("X"), 1.0, Some("C"), 2, 3),
    ];
    let features = aggregate_features(&txns);
    let f = &features[0];
    assert!(close(f.avg_txn_per_day, 2.0));
}

/// Single-row groups have undefined std, filled with 0.
#[test]
fn single_transaction_std_is_filled() {
    let features = aggregate_features(&[txn("Q", None, 12.5, Some("C"), 1, 4)]);
    let f = &features[0];
    assert_eq!(f.std_amount, 0.0);
    assert_eq!(f.unique_counterparties, 0);
}

#[test]
fn one_row_per_account_sorted_by_id() {
    let txns = vec![
        txn("b", Some("X"), 1.0, Some("C"), 1, 1),
        txn("a", Some("X"), 1.0, Some("C"), 1, 1),
        txn("c", Some("X"), 1.0, Some("D"), 1, 1),
        txn("a", Some("Y"), 1.0, Some("D"), 1, 1),
    ];
    let ids: Vec<_> = aggregate_features(&txns)
        .into_iter()
        .map(|f| f.account_id)
        .collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

/// Amount statistics and `txn_count` cover rows with an amount; hour,
/// direction and per-day counts cover every row. Rows without an account
/// make no feature row.
#[test]
fn missing_amount_and_account_rows() {
    let mut no_amount = txn("E", Some("Y"), 0.0, Some("D"), 1, 20);
    no_amount.txn.amount = None;
    let mut no_account = txn("E", Some("Z"), 500.0, Some("C"), 1, 1);
    no_account.txn.account_id = None;
    let txns = vec![txn("E", Some("X"), 30.0, Some("C"), 1, 10), no_amount, no_account];

    let features = aggregate_features(&txns);
    assert_eq!(features.len(), 1);
    let f = &features[0];
    assert_eq!(f.txn_count, 1);
    assert!(close(f.avg_amount, 30.0));
    assert_eq!(f.std_amount, 0.0);
    assert!(close(f.total_amount, 30.0));
    assert_eq!(f.unique_counterparties, 2);
    assert!(close(f.avg_txn_hour, 15.0));
    assert!(close(f.credit_debit_ratio, 0.5));
    assert!(close(f.net_flow, 30.0));
    assert!(close(f.avg_txn_per_day, 2.0));
}

#[test]
fn account_with_no_amounts_is_filled() {
    let mut only = txn("N", Some("X"), 0.0, Some("C"), 1, 8);
    only.txn.amount = None;
    let features = aggregate_features(&[only]);
    let f = &features[0];
    assert_eq!(f.txn_count, 0);
    assert_eq!(f.avg_amount, 0.0);
    assert_eq!(f.min_amount, 0.0);
    assert_eq!(f.max_amount, 0.0);
    assert_eq!(f.total_amount, 0.0);
    assert!(close(f.avg_txn_per_day, 1.0));
}

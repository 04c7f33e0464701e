//! Label join tests: default fill, cardinality, duplicate rejection.

use chrono::NaiveDate;
use mule_eda_core::{
    error::EdaError,
    labeler::{label_transactions, LabelIndex},
    model::{Label, Transaction},
};

fn txn(account: &str, amount: f64) -> Transaction {
    Transaction {
        account_id: Some(account.into()),
        counterparty_id: Some("X".into()),
        amount: Some(amount),
        txn_type: Some("C".into()),
        channel: Some("UPI".into()),
        timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap(),
    }
}

fn label(account: &str, is_mule: u8) -> Label {
    Label {
        account_id: Some(account.into()),
        is_mule: Some(is_mule),
    }
}

/// Accounts missing from the label table are non-mule; every flag is 0 or 1.
#[test]
fn unlabeled_accounts_default_to_non_mule() {
    let index = LabelIndex::build(&[label("A1", 1), label("A2", 0)]).unwrap();
    let txns = vec![txn("A1", 10.0), txn("A3", 20.0), txn("A2", 30.0), txn("A3", 40.0)];

    let labeled = label_transactions(txns, &index);

    let flags: Vec<u8> = labeled.iter().map(|t| t.is_mule).collect();
    assert_eq!(flags, vec![1, 0, 0, 0]);
    assert!(labeled.iter().all(|t| t.is_mule <= 1));
}

/// Left join keeps every row, in order.
#[test]
fn join_preserves_row_count_and_order() {
    let index = LabelIndex::build(&[label("B", 1)]).unwrap();
    let txns: Vec<Transaction> = (0..50)
        .map(|i| txn(if i % 3 == 0 { "B" } else { "Z" }, i as f64))
        .collect();

    let labeled = label_transactions(txns.clone(), &index);

    assert_eq!(labeled.len(), txns.len());
    for (orig, out) in txns.iter().zip(&labeled) {
        assert_eq!(orig, &out.txn);
    }
}

#[test]
fn empty_label_table_marks_everything_non_mule() {
    let index = LabelIndex::build(&[]).unwrap();
    assert!(index.is_empty());
    let labeled = label_transactions(vec![txn("A", 1.0), txn("B", 2.0)], &index);
    assert!(labeled.iter().all(|t| t.is_mule == 0));
}

/// A second label row for the same account would fan the join out.
#[test]
fn duplicate_labels_are_rejected() {
    let err = LabelIndex::build(&[label("A1", 0), label("A2", 1), label("A1", 1)]).unwrap_err();
    match err {
        EdaError::DuplicateLabel { account_id } => assert_eq!(account_id, "A1"),
        other => panic!("expected DuplicateLabel, got {other:?}"),
    }
}

/// An empty flag leaves the account unlabeled; it still joins as non-mule.
#[test]
fn empty_flag_joins_as_non_mule() {
    let unflagged = Label {
        account_id: Some("A9".into()),
        is_mule: None,
    };
    let index = LabelIndex::build(&[unflagged, label("A1", 1)]).unwrap();
    assert_eq!(index.get("A9"), None);
    assert_eq!(index.flag_or_default("A9"), 0);

    let labeled = label_transactions(vec![txn("A9", 1.0), txn("A1", 2.0)], &index);
    let flags: Vec<u8> = labeled.iter().map(|t| t.is_mule).collect();
    assert_eq!(flags, vec![0, 1]);
}

/// Rows without an account_id are kept and never match a label.
#[test]
fn transactions_without_account_stay_non_mule() {
    let orphan_label = Label {
        account_id: None,
        is_mule: Some(1),
    };
    let index = LabelIndex::build(&[orphan_label.clone(), orphan_label, label("A1", 1)]).unwrap();
    assert_eq!(index.len(), 1);

    let mut orphan = txn("A1", 5.0);
    orphan.account_id = None;
    let labeled = label_transactions(vec![orphan, txn("A1", 6.0)], &index);

    assert_eq!(labeled.len(), 2);
    assert_eq!(labeled[0].is_mule, 0);
    assert_eq!(labeled[1].is_mule, 1);
}

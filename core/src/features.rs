//! Account-level feature engineering.
//!
//! One row per distinct `account_id` seen in the transactions, ordered by
//! `account_id`. Every transaction with an account lands in exactly one
//! accumulator, and every feature is derived from that accumulator alone.
//!
//! `txn_count` and the amount statistics cover rows with an amount; the
//! per-day, hour and direction counts cover every row.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    model::{Direction, LabeledTransaction},
    render::{fmt_num, TextTable},
    stats,
    types::AccountId,
};

/// Column names in the order `AccountFeature::values` returns them.
pub const FEATURE_COLUMNS: [&str; 11] = [
    "txn_count",
    "avg_amount",
    "std_amount",
    "min_amount",
    "max_amount",
    "total_amount",
    "unique_counterparties",
    "avg_txn_hour",
    "credit_debit_ratio",
    "net_flow",
    "avg_txn_per_day",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountFeature {
    pub account_id: AccountId,
    pub txn_count: usize,
    pub avg_amount: f64,
    pub std_amount: f64,
    pub min_amount: f64,
    pub max_amount: f64,
    pub total_amount: f64,
    pub unique_counterparties: usize,
    pub avg_txn_hour: f64,
    pub credit_debit_ratio: f64,
    pub net_flow: f64,
    pub avg_txn_per_day: f64,
}

impl AccountFeature {
    /// Numeric features in `FEATURE_COLUMNS` order.
    pub fn values(&self) -> [f64; 11] {
        [
            self.txn_count as f64,
            self.avg_amount,
            self.std_amount,
            self.min_amount,
            self.max_amount,
            self.total_amount,
            self.unique_counterparties as f64,
            self.avg_txn_hour,
            self.credit_debit_ratio,
            self.net_flow,
            self.avg_txn_per_day,
        ]
    }
}

/// Running per-account state built in a single pass over the transactions.
#[derive(Debug, Clone, Default)]
pub struct AccountAccumulator<'a> {
    pub rows: usize,
    pub amounts: Vec<f64>,
    pub counterparties: HashSet<&'a str>,
    pub hour_sum: u64,
    pub credit_count: usize,
    pub debit_count: usize,
    pub credit_amount: f64,
    pub debit_amount: f64,
    pub per_day: BTreeMap<NaiveDate, usize>,
}

impl<'a> AccountAccumulator<'a> {
    pub fn add(&mut self, t: &'a LabeledTransaction) {
        let txn = &t.txn;
        self.rows += 1;
        self.amounts.extend(txn.amount);
        if let Some(cp) = txn.counterparty_id.as_deref() {
            self.counterparties.insert(cp);
        }
        self.hour_sum += u64::from(txn.hour());
        match txn.direction() {
            Direction::Credit => {
                self.credit_count += 1;
                self.credit_amount += txn.amount.unwrap_or(0.0);
            }
            Direction::Debit => {
                self.debit_count += 1;
                self.debit_amount += txn.amount.unwrap_or(0.0);
            }
            Direction::Other => {}
        }
        *self.per_day.entry(txn.date()).or_insert(0) += 1;
    }

    /// Transactions with an amount.
    pub fn txn_count(&self) -> usize {
        self.amounts.len()
    }

    /// Every transaction row, with or without an amount.
    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn unique_counterparties(&self) -> usize {
        self.counterparties.len()
    }

    /// Credit count over debit count, with the debit side smoothed by one.
    pub fn credit_debit_ratio(&self) -> f64 {
        self.credit_count as f64 / (self.debit_count as f64 + 1.0)
    }

    pub fn net_flow(&self) -> f64 {
        self.credit_amount - self.debit_amount
    }

    /// Mean transactions per active calendar day.
    pub fn avg_txn_per_day(&self) -> Option<f64> {
        if self.per_day.is_empty() {
            return None;
        }
        Some(self.rows as f64 / self.per_day.len() as f64)
    }

    pub fn avg_txn_hour(&self) -> Option<f64> {
        if self.rows == 0 {
            return None;
        }
        Some(self.hour_sum as f64 / self.rows as f64)
    }

    /// Materialise the feature row. Undefined values are filled with 0.
    pub fn finish(&self, account_id: AccountId) -> AccountFeature {
        let amounts = &self.amounts;
        let fill = |v: Option<f64>| v.unwrap_or(0.0);
        AccountFeature {
            account_id,
            txn_count: self.txn_count(),
            avg_amount: fill(stats::mean(amounts)),
            std_amount: fill(stats::std_dev(amounts)),
            min_amount: fill(amounts.iter().copied().reduce(f64::min)),
            max_amount: fill(amounts.iter().copied().reduce(f64::max)),
            total_amount: amounts.iter().sum(),
            unique_counterparties: self.unique_counterparties(),
            avg_txn_hour: fill(self.avg_txn_hour()),
            credit_debit_ratio: self.credit_debit_ratio(),
            net_flow: self.net_flow(),
            avg_txn_per_day: fill(self.avg_txn_per_day()),
        }
    }
}

/// Per-account accumulators, keys ascending.
pub type AccountGroups<'a> = BTreeMap<&'a str, AccountAccumulator<'a>>;

/// Group transactions by account, keys ascending. Rows without an
/// account_id belong to no group.
pub fn group_by_account(txns: &[LabeledTransaction]) -> AccountGroups<'_> {
    let mut groups = AccountGroups::new();
    for t in txns {
        if let Some(account_id) = t.txn.account_id.as_deref() {
            groups.entry(account_id).or_default().add(t);
        }
    }
    groups
}

/// Group and aggregate in one call.
pub fn aggregate_features(txns: &[LabeledTransaction]) -> Vec<AccountFeature> {
    from_groups(&group_by_account(txns))
}

/// The feature aggregator stage, over groups built once by the driver.
pub fn from_groups(groups: &AccountGroups<'_>) -> Vec<AccountFeature> {
    let mut single_txn = 0usize;
    let features: Vec<AccountFeature> = groups
        .iter()
        .map(|(account_id, acc)| {
            if acc.txn_count() < 2 {
                single_txn += 1;
            }
            acc.finish(account_id.to_string())
        })
        .collect();

    log::info!("features: {} accounts aggregated", features.len());
    if single_txn > 0 {
        log::debug!("features: {single_txn} single-transaction accounts, std_amount filled with 0");
    }
    features
}

/// Preview of the first `n` feature rows.
pub fn feature_table(features: &[AccountFeature], n: usize) -> TextTable {
    let mut columns = vec!["account_id".to_string()];
    columns.extend(FEATURE_COLUMNS.iter().map(|c| c.to_string()));
    let mut table = TextTable::new("", columns);
    for (i, f) in features.iter().take(n).enumerate() {
        let mut cells = vec![f.account_id.clone(), f.txn_count.to_string()];
        cells.extend(f.values()[1..].iter().map(|v| fmt_num(Some(*v))));
        table.push(i.to_string(), cells);
    }
    table
}

//! Comparator: account features joined back to labels and contrasted by label.

use std::collections::BTreeMap;
use std::fmt;

use crate::{
    features::{AccountFeature, FEATURE_COLUMNS},
    labeler::LabelIndex,
    render::{fmt_num, TextTable},
    stats::ValueCounts,
    types::{MuleFlag, MULE},
};

/// A feature row after the final label merge and fill.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountLevelRow {
    pub feature: AccountFeature,
    pub is_mule: MuleFlag,
}

#[derive(Debug, Clone)]
pub struct Comparison {
    pub distribution: ValueCounts<MuleFlag>,
    /// Mean of every numeric feature, per label, labels ascending.
    pub means_by_label: Vec<(MuleFlag, [f64; 11])>,
    pub top_by_txn_count: Vec<AccountLevelRow>,
}

impl Comparison {
    pub fn means_for(&self, flag: MuleFlag) -> Option<&[f64; 11]> {
        self.means_by_label
            .iter()
            .find(|(f, _)| *f == flag)
            .map(|(_, m)| m)
    }
}

/// Left join on `account_id`; unmatched accounts are non-mule.
pub fn merge_labels(features: Vec<AccountFeature>, index: &LabelIndex) -> Vec<AccountLevelRow> {
    features
        .into_iter()
        .map(|feature| {
            let is_mule = index.flag_or_default(&feature.account_id);
            AccountLevelRow { feature, is_mule }
        })
        .collect()
}

/// Group means per label, in `FEATURE_COLUMNS` order.
pub fn means_by_label(rows: &[AccountLevelRow]) -> Vec<(MuleFlag, [f64; 11])> {
    let mut sums: BTreeMap<MuleFlag, ([f64; 11], usize)> = BTreeMap::new();
    for row in rows {
        let (acc, n) = sums.entry(row.is_mule).or_insert(([0.0; 11], 0));
        for (slot, v) in acc.iter_mut().zip(row.feature.values()) {
            *slot += v;
        }
        *n += 1;
    }
    sums.into_iter()
        .map(|(flag, (mut acc, n))| {
            for slot in acc.iter_mut() {
                *slot /= n as f64;
            }
            (flag, acc)
        })
        .collect()
}

/// The `n` rows with the most transactions, descending; ties keep input order.
pub fn top_by_txn_count(rows: &[AccountLevelRow], n: usize) -> Vec<AccountLevelRow> {
    let mut sorted: Vec<&AccountLevelRow> = rows.iter().collect();
    sorted.sort_by(|a, b| b.feature.txn_count.cmp(&a.feature.txn_count));
    sorted.into_iter().take(n).cloned().collect()
}

/// The comparator stage.
pub fn compare(rows: &[AccountLevelRow], top_n: usize) -> Comparison {
    let comparison = Comparison {
        distribution: ValueCounts::build("is_mule", rows.iter().map(|r| r.is_mule)),
        means_by_label: means_by_label(rows),
        top_by_txn_count: top_by_txn_count(rows, top_n),
    };
    log::info!(
        "comparator: {} accounts, {} mule",
        rows.len(),
        comparison.distribution.count_of(&MULE)
    );
    comparison
}

pub fn account_level_table(rows: &[AccountLevelRow]) -> TextTable {
    let mut columns = vec!["account_id".to_string()];
    columns.extend(FEATURE_COLUMNS.iter().map(|c| c.to_string()));
    columns.push("is_mule".into());
    let mut table = TextTable::new("", columns);
    for (i, row) in rows.iter().enumerate() {
        let f = &row.feature;
        let mut cells = vec![f.account_id.clone(), f.txn_count.to_string()];
        cells.extend(f.values()[1..].iter().map(|v| fmt_num(Some(*v))));
        cells.push(row.is_mule.to_string());
        table.push(i.to_string(), cells);
    }
    table
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nAccount-Level Mule Distribution:")?;
        write!(f, "{}", self.distribution.count_table())?;

        writeln!(f, "\n================ ACCOUNT LEVEL COMPARISON ================")?;
        let mut means = TextTable::new(
            "is_mule",
            FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
        );
        for (flag, m) in &self.means_by_label {
            means.push(flag.to_string(), m.iter().map(|v| fmt_num(Some(*v))).collect());
        }
        write!(f, "{means}")?;

        writeln!(
            f,
            "\nTop {} Accounts by Transaction Count:",
            self.top_by_txn_count.len()
        )?;
        write!(f, "{}", account_level_table(&self.top_by_txn_count))
    }
}

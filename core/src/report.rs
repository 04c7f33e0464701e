//! Descriptive reporter: read-only summaries of labels and labeled transactions.

use std::fmt;

use crate::{
    features::{AccountAccumulator, AccountGroups},
    labeler::LabelIndex,
    model::{Label, LabeledTransaction},
    stats::{CrossTab, GroupedDescribe, ValueCounts},
    types::MuleFlag,
};

#[derive(Debug, Clone)]
pub struct DescriptiveReport {
    /// `is_mule` distribution of the label table itself, empty flags left out.
    pub label_distribution: ValueCounts<MuleFlag>,
    /// `is_mule` distribution over transactions after the join.
    pub merged_distribution: ValueCounts<MuleFlag>,
    pub amount_by_label: GroupedDescribe<MuleFlag>,
    pub txn_type_by_label: CrossTab<String, MuleFlag>,
    /// Per-account transaction counts; unlabeled accounts are left out.
    pub txn_count_by_label: GroupedDescribe<MuleFlag>,
    pub channel_by_label: CrossTab<String, MuleFlag>,
    pub hour_by_label: GroupedDescribe<MuleFlag>,
    /// Per-account distinct counterparties; unlabeled accounts are left out.
    pub counterparties_by_label: GroupedDescribe<MuleFlag>,
}

/// Value counts of the label table's `is_mule`. Rows with an empty flag
/// are not counted.
pub fn label_distribution(labels: &[Label]) -> ValueCounts<MuleFlag> {
    ValueCounts::build("is_mule", labels.iter().filter_map(|l| l.is_mule))
}

/// The descriptive reporter stage. `groups` are the per-account
/// accumulators over the same `txns`.
pub fn describe(
    label_distribution: ValueCounts<MuleFlag>,
    index: &LabelIndex,
    txns: &[LabeledTransaction],
    groups: &AccountGroups<'_>,
) -> DescriptiveReport {
    let merged_distribution = ValueCounts::build("is_mule", txns.iter().map(|t| t.is_mule));

    let amount_by_label = GroupedDescribe::build(
        "amount",
        txns.iter()
            .filter_map(|t| t.txn.amount.map(|a| (t.is_mule, a))),
    );
    let hour_by_label = GroupedDescribe::build(
        "hour",
        txns.iter().map(|t| (t.is_mule, f64::from(t.txn.hour()))),
    );

    // Rows with a missing category are left out of the cross-tabs.
    let txn_type_by_label = CrossTab::build(
        "txn_type",
        "is_mule",
        txns.iter()
            .filter_map(|t| t.txn.txn_type.clone().map(|k| (k, t.is_mule))),
    );
    let channel_by_label = CrossTab::build(
        "channel",
        "is_mule",
        txns.iter()
            .filter_map(|t| t.txn.channel.clone().map(|k| (k, t.is_mule))),
    );

    let labeled_accounts: Vec<(MuleFlag, &AccountAccumulator<'_>)> = groups
        .iter()
        .filter_map(|(account_id, acc)| index.get(account_id).map(|flag| (flag, acc)))
        .collect();
    log::debug!(
        "report: {} of {} transacting accounts carry a label",
        labeled_accounts.len(),
        groups.len()
    );

    let txn_count_by_label = GroupedDescribe::build(
        "txn_count",
        labeled_accounts
            .iter()
            .map(|(flag, acc)| (*flag, acc.row_count() as f64)),
    );
    let counterparties_by_label = GroupedDescribe::build(
        "unique_counterparties",
        labeled_accounts
            .iter()
            .map(|(flag, acc)| (*flag, acc.unique_counterparties() as f64)),
    );

    DescriptiveReport {
        label_distribution,
        merged_distribution,
        amount_by_label,
        txn_type_by_label,
        txn_count_by_label,
        channel_by_label,
        hour_by_label,
        counterparties_by_label,
    }
}

/// Counts and percentages of the label table, printed with the input
/// previews before any transaction is read.
pub struct LabelSection<'a>(pub &'a ValueCounts<MuleFlag>);

impl fmt::Display for LabelSection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nFraud (Mule) Distribution:")?;
        write!(f, "{}", self.0.count_table())?;
        writeln!(f, "\nFraud Percentage:")?;
        write!(f, "{}", self.0.percent_table())
    }
}

/// The post-merge sections. The label table's own distribution is
/// rendered separately through `LabelSection`.
impl fmt::Display for DescriptiveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nAfter merge:")?;
        write!(f, "{}", self.merged_distribution.count_table())?;

        writeln!(f, "\nTransaction Amount Summary by Mule Flag:")?;
        write!(f, "{}", self.amount_by_label)?;

        writeln!(f, "\nTransaction Type vs Mule:")?;
        write!(f, "{}", self.txn_type_by_label.count_table())?;

        writeln!(f, "\nTransaction Count per Account:")?;
        write!(f, "{}", self.txn_count_by_label)?;

        writeln!(f, "\nChannel vs Mule Distribution:")?;
        write!(f, "{}", self.channel_by_label.count_table())?;
        writeln!(f, "\nChannel Percentage (Row-wise):")?;
        write!(f, "{}", self.channel_by_label.row_percent_table())?;

        writeln!(f, "\nAverage Hour of Transaction by Mule Flag:")?;
        write!(f, "{}", self.hour_by_label)?;

        writeln!(f, "\nUnique Counterparties per Account:")?;
        write!(f, "{}", self.counterparties_by_label)
    }
}

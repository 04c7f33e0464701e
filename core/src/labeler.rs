//! Label join: attaches the account-level mule flag to every transaction.
//!
//! RULE: one label row per account. Duplicates are rejected up front,
//! so the left join can never fan out. Label rows with an empty
//! account_id never join; rows with an empty flag join as unlabeled.

use std::collections::HashMap;

use crate::{
    error::{EdaError, EdaResult},
    model::{Label, LabeledTransaction, Transaction},
    types::{AccountId, MuleFlag, NON_MULE},
};

#[derive(Debug, Clone, Default)]
pub struct LabelIndex {
    by_account: HashMap<AccountId, Option<MuleFlag>>,
}

impl LabelIndex {
    pub fn build(labels: &[Label]) -> EdaResult<Self> {
        let mut by_account = HashMap::with_capacity(labels.len());
        for label in labels {
            let Some(account_id) = &label.account_id else {
                continue;
            };
            if by_account.insert(account_id.clone(), label.is_mule).is_some() {
                return Err(EdaError::DuplicateLabel {
                    account_id: account_id.clone(),
                });
            }
        }
        Ok(Self { by_account })
    }

    /// The raw lookup: `None` when the account has no label row or an
    /// empty flag.
    pub fn get(&self, account_id: &str) -> Option<MuleFlag> {
        self.by_account.get(account_id).copied().flatten()
    }

    /// Lookup with the default fill applied.
    pub fn flag_or_default(&self, account_id: &str) -> MuleFlag {
        self.get(account_id).unwrap_or(NON_MULE)
    }

    pub fn len(&self) -> usize {
        self.by_account.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_account.is_empty()
    }
}

/// Left join on `account_id`. Row order and count are preserved;
/// unlabeled accounts get `NON_MULE`.
pub fn label_transactions(txns: Vec<Transaction>, index: &LabelIndex) -> Vec<LabeledTransaction> {
    let mut unmatched = 0usize;
    let labeled: Vec<LabeledTransaction> = txns
        .into_iter()
        .map(|txn| {
            let is_mule = match txn.account_id.as_deref().and_then(|id| index.get(id)) {
                Some(flag) => flag,
                None => {
                    unmatched += 1;
                    NON_MULE
                }
            };
            LabeledTransaction { txn, is_mule }
        })
        .collect();

    if unmatched > 0 {
        log::warn!(
            "labeler: {unmatched} of {} transactions belong to unlabeled accounts, treated as non-mule",
            labeled.len()
        );
    }
    labeled
}

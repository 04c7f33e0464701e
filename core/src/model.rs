//! Typed records parsed out of the raw input tables.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::types::{AccountId, MuleFlag};

/// One row of the label table. Empty cells stay `None`: a row with no
/// flag is an unlabeled account, a row with no account never joins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub account_id: Option<AccountId>,
    pub is_mule: Option<MuleFlag>,
}

/// Direction of money movement, from the `txn_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Credit,
    Debit,
    Other,
}

impl Direction {
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("C") => Self::Credit,
            Some("D") => Self::Debit,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Rows without an account stay in row-level summaries only.
    pub account_id: Option<AccountId>,
    pub counterparty_id: Option<String>,
    /// Missing amounts are skipped by every amount statistic.
    pub amount: Option<f64>,
    pub txn_type: Option<String>,
    pub channel: Option<String>,
    pub timestamp: NaiveDateTime,
}

impl Transaction {
    pub fn direction(&self) -> Direction {
        Direction::from_code(self.txn_type.as_deref())
    }

    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// A transaction after the label join.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledTransaction {
    pub txn: Transaction,
    pub is_mule: MuleFlag,
}

//! CSV loading.
//!
//! RULE: Only loader.rs touches the input files.
//! Every later stage works on the in-memory tables returned here.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::{
    config::EdaConfig,
    error::{EdaError, EdaResult},
    model::{Label, Transaction},
    timestamp::parse_timestamp,
    types::{MULE, NON_MULE},
};

pub const LABEL_COLUMNS: [&str; 2] = ["account_id", "is_mule"];

pub const TRANSACTION_COLUMNS: [&str; 6] = [
    "account_id",
    "counterparty_id",
    "amount",
    "txn_type",
    "channel",
    "transaction_timestamp",
];

/// An untyped, row-oriented table: a header row plus text cells.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn from_path(path: impl AsRef<Path>) -> EdaResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| EdaError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_reader(name, file)
    }

    pub fn from_reader<R: Read>(name: impl Into<String>, reader: R) -> EdaResult<Self> {
        let name = name.into();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.iter().map(str::to_string).collect();
        let rows = rdr
            .records()
            .map(|r| r.map(|rec| rec.iter().map(str::to_string).collect()))
            .collect::<Result<Vec<Vec<String>>, _>>()?;

        log::debug!("loader: {name} -> {} rows", rows.len());
        Ok(Self { name, headers, rows })
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.headers.len())
    }

    pub fn columns(&self) -> &[String] {
        &self.headers
    }

    pub fn head(&self, n: usize) -> &[Vec<String>] {
        &self.rows[..n.min(self.rows.len())]
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    fn require_column(&self, column: &str) -> EdaResult<usize> {
        self.column_index(column).ok_or_else(|| EdaError::MissingColumn {
            table: self.name.clone(),
            column: column.to_string(),
        })
    }

    fn require_columns<const N: usize>(&self, columns: [&str; N]) -> EdaResult<[usize; N]> {
        let mut idx = [0usize; N];
        for (slot, column) in idx.iter_mut().zip(columns) {
            *slot = self.require_column(column)?;
        }
        Ok(idx)
    }
}

fn optional_cell(cell: &str) -> Option<String> {
    if cell.is_empty() {
        None
    } else {
        Some(cell.to_string())
    }
}

fn parse_mule_flag(raw: &str) -> Option<u8> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" => Some(MULE),
        "0" | "0.0" | "false" => Some(NON_MULE),
        _ => None,
    }
}

/// Typed view of the label table. Row numbers in errors are 1-based data rows.
/// Empty cells are kept as `None`; only a non-empty flag that fails to parse
/// is fatal.
pub fn parse_labels(table: &RawTable) -> EdaResult<Vec<Label>> {
    let [account_col, mule_col] = table.require_columns(LABEL_COLUMNS)?;

    let labels: Vec<Label> = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| -> EdaResult<Label> {
            let raw = &row[mule_col];
            let is_mule = match raw.as_str() {
                "" => None,
                _ => Some(parse_mule_flag(raw).ok_or_else(|| EdaError::InvalidLabel {
                    row: i + 1,
                    value: raw.clone(),
                })?),
            };
            Ok(Label {
                account_id: optional_cell(&row[account_col]),
                is_mule,
            })
        })
        .collect::<EdaResult<_>>()?;

    let unflagged = labels.iter().filter(|l| l.is_mule.is_none()).count();
    if unflagged > 0 {
        log::warn!("loader: {unflagged} label rows have an empty is_mule, treated as unlabeled");
    }
    Ok(labels)
}

/// Typed view of the transaction table. Only a bad timestamp or a non-empty
/// amount that fails to parse is fatal.
pub fn parse_transactions(table: &RawTable) -> EdaResult<Vec<Transaction>> {
    let [account_col, cp_col, amount_col, type_col, channel_col, ts_col] =
        table.require_columns(TRANSACTION_COLUMNS)?;

    let txns: Vec<Transaction> = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| -> EdaResult<Transaction> {
            let amount_raw = &row[amount_col];
            let amount = match amount_raw.as_str() {
                "" => None,
                _ => Some(
                    amount_raw
                        .parse::<f64>()
                        .ok()
                        .filter(|a| a.is_finite())
                        .ok_or_else(|| EdaError::InvalidAmount {
                            row: i + 1,
                            value: amount_raw.clone(),
                        })?,
                ),
            };

            let ts_raw = &row[ts_col];
            let timestamp = parse_timestamp(ts_raw).ok_or_else(|| EdaError::InvalidTimestamp {
                row: i + 1,
                value: ts_raw.clone(),
            })?;

            Ok(Transaction {
                account_id: optional_cell(&row[account_col]),
                counterparty_id: optional_cell(&row[cp_col]),
                amount,
                txn_type: optional_cell(&row[type_col]),
                channel: optional_cell(&row[channel_col]),
                timestamp,
            })
        })
        .collect::<EdaResult<_>>()?;

    let no_account = txns.iter().filter(|t| t.account_id.is_none()).count();
    let no_amount = txns.iter().filter(|t| t.amount.is_none()).count();
    if no_account > 0 || no_amount > 0 {
        log::warn!(
            "loader: {no_account} transactions without account_id, {no_amount} without amount"
        );
    }
    Ok(txns)
}

/// Everything the analysis reads from disk.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub customers: RawTable,
    pub accounts: RawTable,
    pub linkage: RawTable,
    pub labels_raw: RawTable,
    pub transactions_raw: RawTable,
    pub labels: Vec<Label>,
    pub transactions: Vec<Transaction>,
}

impl Dataset {
    pub fn load(config: &EdaConfig) -> EdaResult<Self> {
        log::info!("loader: reading reference tables from {}", config.data_dir.display());
        let customers = RawTable::from_path(config.customers_path())?;
        let accounts = RawTable::from_path(config.accounts_path())?;
        let linkage = RawTable::from_path(config.linkage_path())?;
        let labels_raw = RawTable::from_path(config.labels_path())?;
        let labels = parse_labels(&labels_raw)?;

        log::info!("loader: reading transactions from {}", config.transactions_path().display());
        let transactions_raw = RawTable::from_path(config.transactions_path())?;
        let transactions = parse_transactions(&transactions_raw)?;

        Ok(Self {
            customers,
            accounts,
            linkage,
            labels_raw,
            transactions_raw,
            labels,
            transactions,
        })
    }
}

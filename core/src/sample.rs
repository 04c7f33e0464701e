//! Synthetic sample dataset.
//!
//! Writes the five input tables with the same file names and columns the
//! loader expects, so the analysis can be exercised without real data.
//! Mule accounts are generated with the pattern the report looks for:
//! many counterparties, bursts of activity on few days, late-night hours,
//! and credits followed by near-equal debits.

use std::path::Path;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{
    config::EdaConfig,
    error::{EdaError, EdaResult},
    loader::{LABEL_COLUMNS, TRANSACTION_COLUMNS},
    rng::{RngBank, SampleRng, TableSlot},
};

const CHANNELS: &[&str] = &["UPI", "IMPS", "NEFT", "ATM", "CARD", "BRANCH"];
const MULE_CHANNELS: &[&str] = &["UPI", "IMPS", "ATM"];
const SEGMENTS: &[&str] = &["retail", "salaried", "student", "small_business"];
const ACCOUNT_TYPES: &[&str] = &["savings", "current", "salary"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleSpec {
    pub seed: u64,
    pub accounts: usize,
    /// Fraction of accounts that get a row in the label table.
    pub labeled_fraction: f64,
    /// Probability that a labeled account is a mule.
    pub mule_rate: f64,
    pub start_date: NaiveDate,
    pub days: u64,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            seed: 42,
            accounts: 200,
            labeled_fraction: 0.8,
            mule_rate: 0.1,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            days: 30,
        }
    }
}

/// Summary of what was written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleSummary {
    pub customers: usize,
    pub accounts: usize,
    pub labels: usize,
    pub mules: usize,
    pub transactions: usize,
}

struct AccountPlan {
    account_id: String,
    label: Option<u8>,
}

pub fn write_sample_dataset(dir: impl AsRef<Path>, spec: &SampleSpec) -> EdaResult<SampleSummary> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).map_err(|source| EdaError::Io {
        path: dir.display().to_string(),
        source,
    })?;
    let config = EdaConfig::default_test(dir);
    let bank = RngBank::new(spec.seed);
    let mut summary = SampleSummary::default();

    let n_customers = spec.accounts.div_ceil(2).max(1);

    // ── customers.csv ──────────────────────────────────────────
    let mut rng = bank.for_table(TableSlot::Customers);
    let mut w = csv::Writer::from_path(config.customers_path())?;
    w.write_record(["customer_id", "segment", "age"])?;
    for i in 0..n_customers {
        let age = rng.between(18, 75).to_string();
        w.write_record([format!("C{i:05}").as_str(), *rng.pick(SEGMENTS), age.as_str()])?;
    }
    w.flush().map_err(|source| io_err(&config.customers_path(), source))?;
    summary.customers = n_customers;

    // ── accounts.csv + customer_account_linkage.csv ────────────
    let mut rng = bank.for_table(TableSlot::Accounts);
    let mut accounts = csv::Writer::from_path(config.accounts_path())?;
    let mut linkage = csv::Writer::from_path(config.linkage_path())?;
    accounts.write_record(["account_id", "account_type", "open_date"])?;
    linkage.write_record(["customer_id", "account_id"])?;
    for i in 0..spec.accounts {
        let open = spec.start_date - Duration::days(rng.between(30, 3_000) as i64);
        let account_id = format!("A{i:06}");
        accounts.write_record([
            account_id.as_str(),
            *rng.pick(ACCOUNT_TYPES),
            open.format("%Y-%m-%d").to_string().as_str(),
        ])?;
        let customer = format!("C{:05}", i % n_customers);
        linkage.write_record([customer.as_str(), account_id.as_str()])?;
    }
    accounts.flush().map_err(|source| io_err(&config.accounts_path(), source))?;
    linkage.flush().map_err(|source| io_err(&config.linkage_path(), source))?;
    summary.accounts = spec.accounts;

    // ── train_labels.csv ───────────────────────────────────────
    let mut rng = bank.for_table(TableSlot::Labels);
    let mut plans = Vec::with_capacity(spec.accounts);
    let mut w = csv::Writer::from_path(config.labels_path())?;
    w.write_record(LABEL_COLUMNS)?;
    for i in 0..spec.accounts {
        let account_id = format!("A{i:06}");
        let label = if rng.chance(spec.labeled_fraction) {
            let flag = u8::from(rng.chance(spec.mule_rate));
            w.write_record([account_id.as_str(), if flag == 1 { "1" } else { "0" }])?;
            summary.labels += 1;
            summary.mules += usize::from(flag);
            Some(flag)
        } else {
            None
        };
        plans.push(AccountPlan { account_id, label });
    }
    w.flush().map_err(|source| io_err(&config.labels_path(), source))?;

    // ── transactions_part_0.csv ────────────────────────────────
    let mut rng = bank.for_table(TableSlot::Transactions);
    let mut w = csv::Writer::from_path(config.transactions_path())?;
    w.write_record(TRANSACTION_COLUMNS)?;
    for plan in &plans {
        let rows = if plan.label == Some(1) {
            mule_activity(&mut rng, spec)
        } else {
            regular_activity(&mut rng, spec)
        };
        for row in rows {
            w.write_record([
                plan.account_id.as_str(),
                row.counterparty.as_str(),
                format!("{:.2}", row.amount).as_str(),
                row.txn_type,
                row.channel,
                row.at.format("%Y-%m-%d %H:%M:%S").to_string().as_str(),
            ])?;
            summary.transactions += 1;
        }
    }
    w.flush().map_err(|source| io_err(&config.transactions_path(), source))?;

    log::info!(
        "sample: wrote {} accounts ({} labeled, {} mule), {} transactions to {}",
        summary.accounts,
        summary.labels,
        summary.mules,
        summary.transactions,
        dir.display()
    );
    Ok(summary)
}

struct TxnRow {
    counterparty: String,
    amount: f64,
    txn_type: &'static str,
    channel: &'static str,
    at: NaiveDateTime,
}

fn at(spec: &SampleSpec, day: u64, hour: u64, minute: u64) -> NaiveDateTime {
    let date = spec.start_date + Duration::days(day as i64);
    date.and_hms_opt(hour as u32, minute as u32, 0).unwrap_or_default()
}

fn regular_activity(rng: &mut SampleRng, spec: &SampleSpec) -> Vec<TxnRow> {
    let n = rng.between(3, 25);
    let pool = rng.between(2, 8);
    (0..n)
        .map(|_| {
            let day = rng.next_u64_below(spec.days.max(1));
            let hour = rng.between(8, 21);
            TxnRow {
                counterparty: format!("P{:05}", rng.next_u64_below(pool * 97)),
                amount: rng.pareto(50.0, 2.2).min(50_000.0),
                txn_type: if rng.chance(0.45) { "C" } else { "D" },
                channel: *rng.pick(CHANNELS),
                at: at(spec, day, hour, rng.next_u64_below(60)),
            }
        })
        .collect()
}

/// Bursts: each credit is followed within the hour by a debit of most of it.
fn mule_activity(rng: &mut SampleRng, spec: &SampleSpec) -> Vec<TxnRow> {
    let bursts = rng.between(3, 10);
    let active_days = rng.between(1, 4);
    let mut rows = Vec::new();
    for _ in 0..bursts {
        let day = rng.next_u64_below(active_days.min(spec.days.max(1)));
        let hour = rng.between(20, 28) % 24;
        let amount = rng.pareto(2_000.0, 1.8).min(200_000.0);
        rows.push(TxnRow {
            counterparty: format!("M{:06}", rng.next_u64_below(1_000_000)),
            amount,
            txn_type: "C",
            channel: *rng.pick(MULE_CHANNELS),
            at: at(spec, day, hour, rng.next_u64_below(30)),
        });
        rows.push(TxnRow {
            counterparty: format!("M{:06}", rng.next_u64_below(1_000_000)),
            amount: amount * (0.9 + rng.next_f64() * 0.09),
            txn_type: "D",
            channel: *rng.pick(MULE_CHANNELS),
            at: at(spec, day, hour, 30 + rng.next_u64_below(30)),
        });
    }
    rows
}

fn io_err(path: &Path, source: std::io::Error) -> EdaError {
    EdaError::Io {
        path: path.display().to_string(),
        source,
    }
}

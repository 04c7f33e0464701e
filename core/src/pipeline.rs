//! The analysis driver.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Loader               reference tables + transaction shard
//!   2. Labeler              left join on account_id, default non-mule
//!   3. Descriptive reporter value counts, describe, cross-tabs
//!   4. Feature aggregator   one row per transacting account, from the
//!                           same account groups the reporter read
//!   5. Comparator           final label merge, means by label, top-N
//!
//! RULES:
//!   - Each stage reads only the outputs of earlier stages.
//!   - Only the loader touches the filesystem.
//!   - The report goes to the supplied writer; diagnostics go to the log.

use std::io::Write;

use crate::{
    comparator::{self, AccountLevelRow, Comparison},
    config::EdaConfig,
    error::{EdaError, EdaResult},
    features::{self, AccountFeature},
    labeler::{self, LabelIndex},
    loader::{Dataset, RawTable},
    model::LabeledTransaction,
    render::preview_table,
    report::{self, DescriptiveReport, LabelSection},
    stats::ValueCounts,
    types::MuleFlag,
};

const FEATURE_BANNER: &str =
    "================ ACCOUNT LEVEL FEATURE ENGINEERING ================";

/// Everything the run derived, kept for callers that want more than the text.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub labeled: Vec<LabeledTransaction>,
    pub report: DescriptiveReport,
    pub features: Vec<AccountFeature>,
    pub account_level: Vec<AccountLevelRow>,
    pub comparison: Comparison,
}

pub struct EdaPipeline {
    pub config: EdaConfig,
}

impl EdaPipeline {
    pub fn new(config: EdaConfig) -> Self {
        Self { config }
    }

    /// Load from disk, then analyse.
    pub fn run<W: Write>(&self, out: &mut W) -> EdaResult<PipelineOutput> {
        writeln!(out, "Loading small datasets...").map_err(io_err)?;
        let dataset = Dataset::load(&self.config)?;
        self.analyse(dataset, out)
    }

    /// Stages 2-5 over an already loaded dataset.
    pub fn analyse<W: Write>(&self, dataset: Dataset, out: &mut W) -> EdaResult<PipelineOutput> {
        let preview = self.config.preview_rows;
        let label_distribution = report::label_distribution(&dataset.labels);
        self.print_inputs(&dataset, &label_distribution, out).map_err(io_err)?;

        // ── 2. Labeler ──────────────────────────────────────────
        log::info!(
            "labeler: joining {} transactions to {} labels",
            dataset.transactions.len(),
            dataset.labels.len()
        );
        let index = LabelIndex::build(&dataset.labels)?;
        let labeled = labeler::label_transactions(dataset.transactions, &index);

        // ── 3. Descriptive reporter ─────────────────────────────
        log::info!("report: summarising labeled transactions");
        let groups = features::group_by_account(&labeled);
        let report = report::describe(label_distribution, &index, &labeled, &groups);
        write!(out, "{report}").map_err(io_err)?;

        // ── 4. Feature aggregator ───────────────────────────────
        writeln!(out, "\n{FEATURE_BANNER}").map_err(io_err)?;
        let features = features::from_groups(&groups);
        writeln!(out, "\nAccount Features Shape:").map_err(io_err)?;
        let width = features::FEATURE_COLUMNS.len() + 1;
        writeln!(out, "({}, {width})", features.len()).map_err(io_err)?;
        writeln!(out, "Adding Transaction Intensity Feature...").map_err(io_err)?;
        writeln!(out, "\nFirst {preview} rows of Account Features:").map_err(io_err)?;
        write!(out, "{}", features::feature_table(&features, preview)).map_err(io_err)?;

        // ── 5. Comparator ───────────────────────────────────────
        writeln!(out, "\nMerging Account Features with Mule Labels...").map_err(io_err)?;
        let account_level = comparator::merge_labels(features.clone(), &index);
        let comparison = comparator::compare(&account_level, self.config.top_n);
        write!(out, "{comparison}").map_err(io_err)?;

        Ok(PipelineOutput {
            labeled,
            report,
            features,
            account_level,
            comparison,
        })
    }

    fn print_inputs<W: Write>(
        &self,
        dataset: &Dataset,
        label_distribution: &ValueCounts<MuleFlag>,
        out: &mut W,
    ) -> std::io::Result<()> {
        let preview = self.config.preview_rows;
        print_shape(out, "Customers", &dataset.customers)?;
        print_shape(out, "Accounts", &dataset.accounts)?;
        print_shape(out, "Linkage", &dataset.linkage)?;
        print_shape(out, "Labels", &dataset.labels_raw)?;

        writeln!(out, "\nLabels columns:")?;
        writeln!(out, "{:?}", dataset.labels_raw.columns())?;
        writeln!(out, "\nFirst {preview} rows of labels:")?;
        let labels = &dataset.labels_raw;
        write!(out, "{}", preview_table(&labels.headers, labels.head(preview)))?;
        write!(out, "{}", LabelSection(label_distribution))?;

        writeln!(out, "\nLoading transactions sample...")?;
        print_shape(out, "Transactions", &dataset.transactions_raw)?;
        writeln!(out, "\nTransactions columns:")?;
        writeln!(out, "{:?}", dataset.transactions_raw.columns())?;
        writeln!(out, "\nFirst {preview} transactions:")?;
        let txns = &dataset.transactions_raw;
        write!(out, "{}", preview_table(&txns.headers, txns.head(preview)))?;
        writeln!(out, "\nMerging transactions with mule labels...")
    }
}

fn print_shape<W: Write>(out: &mut W, label: &str, table: &RawTable) -> std::io::Result<()> {
    let (rows, cols) = table.shape();
    writeln!(out, "{label} shape: ({rows}, {cols})")
}

fn io_err(source: std::io::Error) -> EdaError {
    EdaError::Io {
        path: "<report output>".into(),
        source,
    }
}

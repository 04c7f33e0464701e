use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{EdaError, EdaResult};

/// Name of the optional override file looked up inside the data directory.
pub const CONFIG_FILE: &str = "eda_config.json";

pub const DEFAULT_PREVIEW_ROWS: usize = 5;
pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EdaConfig {
    pub data_dir: PathBuf,
    pub customers_file: String,
    pub accounts_file: String,
    pub linkage_file: String,
    pub labels_file: String,
    pub transactions_file: String,
    /// Rows shown by every `head` preview.
    pub preview_rows: usize,
    /// Rows shown in the "top accounts by transaction count" listing.
    pub top_n: usize,
}

impl Default for EdaConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            customers_file: "customers.csv".into(),
            accounts_file: "accounts.csv".into(),
            linkage_file: "customer_account_linkage.csv".into(),
            labels_file: "train_labels.csv".into(),
            transactions_file: "transactions_part_0.csv".into(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl EdaConfig {
    /// Load from the data directory.
    /// `<data_dir>/eda_config.json` is optional; absent keys keep their defaults.
    /// The data directory always wins over a `data_dir` key in the file.
    /// In tests, use EdaConfig::default_test().
    pub fn load(data_dir: impl AsRef<Path>) -> EdaResult<Self> {
        let data_dir = data_dir.as_ref();
        let path = data_dir.join(CONFIG_FILE);

        let mut config = if path.is_file() {
            let content = std::fs::read_to_string(&path).map_err(|source| EdaError::Io {
                path: path.display().to_string(),
                source,
            })?;
            let parsed: EdaConfig = serde_json::from_str(&content)?;
            log::info!("config: loaded overrides from {}", path.display());
            parsed
        } else {
            log::debug!("config: no {CONFIG_FILE} in {}, using defaults", data_dir.display());
            EdaConfig::default()
        };

        config.data_dir = data_dir.to_path_buf();
        Ok(config)
    }

    pub fn customers_path(&self) -> PathBuf {
        self.data_dir.join(&self.customers_file)
    }

    pub fn accounts_path(&self) -> PathBuf {
        self.data_dir.join(&self.accounts_file)
    }

    pub fn linkage_path(&self) -> PathBuf {
        self.data_dir.join(&self.linkage_file)
    }

    pub fn labels_path(&self) -> PathBuf {
        self.data_dir.join(&self.labels_file)
    }

    pub fn transactions_path(&self) -> PathBuf {
        self.data_dir.join(&self.transactions_file)
    }

    /// Defaults rooted at `data_dir`, without touching the filesystem.
    pub fn default_test(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }
}

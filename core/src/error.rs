use thiserror::Error;

#[derive(Error, Debug)]
pub enum EdaError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Table '{table}' is missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("Row {row}: invalid transaction_timestamp '{value}'")]
    InvalidTimestamp { row: usize, value: String },

    #[error("Row {row}: invalid amount '{value}'")]
    InvalidAmount { row: usize, value: String },

    #[error("Row {row}: invalid is_mule label '{value}'")]
    InvalidLabel { row: usize, value: String },

    #[error("Duplicate label rows for account '{account_id}'")]
    DuplicateLabel { account_id: String },
}

pub type EdaResult<T> = Result<T, EdaError>;

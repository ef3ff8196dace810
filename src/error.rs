use std::io;
use std::path::PathBuf;

use crate::inequality::InequalityError;

/// Errors surfaced by the input/output layer and the `gini` binary.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("error opening {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error creating {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The requested income column is not in the CSV header.
    #[error("column '{column}' not found, columns in file: {found}")]
    MissingColumn { column: String, found: String },

    #[error("no valid numeric income values found")]
    NoValidValues,

    #[error(transparent)]
    Inequality(#[from] InequalityError),
}

pub type Result<T> = std::result::Result<T, Error>;

//! File-backed product catalog and export helpers.

use std::path::PathBuf;

use thiserror::Error;

pub mod catalog;
pub mod export;

pub use catalog::CatalogStore;
pub use export::{export_file_name, to_csv, to_json, ExportFormat};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("product {id} not found")]
    NotFound { id: i64 },

    #[error("product title is required")]
    MissingTitle,

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog file {} is not valid JSON: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize products: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("unknown export format \"{0}\" (expected json or csv)")]
    UnknownFormat(String),
}

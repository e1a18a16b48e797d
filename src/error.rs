//! Error types for ecoscope.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the backend data fetch layer.
///
/// The three variants are deliberately distinct so callers can decide the UI
/// consequence per failure class instead of collapsing everything into one
/// logged string.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, refused, timeout).
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("server returned {status} for {url}")]
    Server { url: String, status: u16 },

    /// The response body was not the expected JSON shape.
    #[error("invalid JSON from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Errors that can occur when exporting metric reports.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failed to create the output file.
    #[error("failed to create file '{path}': {source}")]
    FileCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write data to the file.
    #[error("failed to write data: {message}")]
    WriteError { message: String },

    /// Failed to serialize data to JSON.
    #[error("JSON serialization failed: {source}")]
    JsonSerialize {
        #[from]
        source: serde_json::Error,
    },

    /// Failed to write CSV data.
    #[error("CSV write failed: {source}")]
    CsvWrite {
        #[from]
        source: csv::Error,
    },
}

//! Error types for the extraction pipeline and the spreadsheet sink.
//!
//! A malformed model reply is kept apart from a failed model call so the bot
//! can ask for a clearer picture instead of reporting a generic failure.

use thiserror::Error;

/// Failure to obtain a reply from the vision model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("vision model request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("vision model API error {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("vision model returned an unreadable body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("vision model reply contained no text")]
    EmptyReply,
}

/// Failure of a single extraction attempt.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error(transparent)]
    ExternalService(#[from] ModelError),

    /// The unwrapped reply is not a JSON array of objects.
    #[error("model reply is not a JSON array of rows: {source}")]
    Malformed {
        payload: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure talking to the spreadsheet.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("spreadsheet authentication failed: {0}")]
    Auth(String),

    #[error("spreadsheet request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("spreadsheet API error {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("sheet '{0}' was not found in the spreadsheet")]
    MissingSheet(String),

    #[error("cannot build spreadsheet URL from '{0}'")]
    InvalidUrl(String),
}

/// Failure of one upload, from model call to append.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Sheet(#[from] SheetError),
}

impl ProcessError {
    /// True when the model answered but its reply could not be read as rows.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            ProcessError::Extraction(ExtractionError::Malformed { .. })
        )
    }
}

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// A product type as returned by the file manager.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductTypeRecord {
    pub name: String,
}

/// Everything needed for one ingest call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestRequest {
    /// File to upload. `None` is accepted here and fails at upload time.
    pub file: Option<PathBuf>,
    pub product_type: String,
    pub product_structure: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReceipt {
    pub product_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceEvent {
    ProductTypesLoaded(Result<Vec<ProductTypeRecord>, ServiceError>),
    UploadProgress { loaded: u64, total: u64 },
    IngestCompleted(Result<IngestReceipt, ServiceError>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ServiceError {
    pub kind: FailureKind,
    pub message: String,
}

impl ServiceError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    MissingFile,
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "unexpected response"),
            FailureKind::MissingFile => write!(f, "no file selected"),
            FailureKind::Io => write!(f, "io error"),
        }
    }
}

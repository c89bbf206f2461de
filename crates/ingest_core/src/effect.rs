use std::fmt;

use crate::SelectedFile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the directory service for the available product types.
    FetchProductTypes,
    /// Upload `file` with the chosen metadata. `file` may be absent: the form
    /// does not require a selection before submitting.
    Ingest {
        file: Option<SelectedFile>,
        product_type: String,
        product_structure: String,
    },
    /// Show a notification the user has to dismiss.
    Notify(Notification),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Failure,
}

/// User-facing outcome of an ingest attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn ingested(product_id: &str) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: format!("Successfully Ingested Product ID :{product_id}"),
        }
    }

    pub fn ingest_failed(error: &str) -> Self {
        Self {
            kind: NotificationKind::Failure,
            message: format!("Product Ingestion Failed : {error}"),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

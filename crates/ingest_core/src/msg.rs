#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The form was shown for the first time.
    Mounted,
    /// Directory service answered with the product types, in display order.
    ProductTypesLoaded(Vec<crate::ProductType>),
    /// Directory service request failed.
    ProductTypesFailed(String),
    /// User picked files; only the first one is kept.
    FileSelected(Vec<crate::SelectedFile>),
    /// User changed the product type selector.
    ProductTypeChanged(String),
    /// User changed the product structure selector.
    ProductStructureChanged(String),
    /// User clicked "Ingest Product".
    IngestClicked,
    /// Transport reported upload progress for the in-flight request.
    UploadProgress { loaded: u64, total: u64 },
    /// Ingestion service accepted the product.
    IngestSucceeded { product_id: String },
    /// Ingestion failed; `error` is shown to the user verbatim.
    IngestFailed { error: String },
    /// User acknowledged the last notification.
    NotificationDismissed,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}

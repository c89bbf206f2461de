//! Product ingest engine: file manager REST client and effect execution.
mod client;
mod engine;
mod types;

pub use client::{
    ChannelProgressSink, ClientSettings, Ingestor, ProductTypeDirectory, ProgressSink,
    ReqwestFileManagerClient, FILE_FIELD,
};
pub use engine::EngineHandle;
pub use types::{
    FailureKind, IngestReceipt, IngestRequest, ProductTypeRecord, ServiceError, ServiceEvent,
};

use std::sync::{mpsc, Arc};
use std::thread;

use ingest_logging::{ingest_debug, ingest_warn};

use crate::client::{ChannelProgressSink, ClientSettings, Ingestor, ProductTypeDirectory};
use crate::{FailureKind, IngestRequest, ReqwestFileManagerClient, ServiceError, ServiceEvent};

enum EngineCommand {
    FetchProductTypes,
    Ingest(IngestRequest),
}

/// Front door to the background runtime that talks to the file manager.
///
/// Commands run concurrently on a tokio runtime owned by a dedicated thread;
/// their results arrive on the event receiver returned by the constructor, so
/// a single UI loop can apply them in order. Dropping every handle stops the
/// worker thread and abandons requests still in flight.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(
        settings: ClientSettings,
    ) -> Result<(Self, mpsc::Receiver<ServiceEvent>), ServiceError> {
        let client = Arc::new(ReqwestFileManagerClient::new(settings)?);
        Self::with_services(client.clone(), client)
    }

    pub fn with_services(
        directory: Arc<dyn ProductTypeDirectory>,
        ingestor: Arc<dyn Ingestor>,
    ) -> Result<(Self, mpsc::Receiver<ServiceEvent>), ServiceError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .map_err(|err| ServiceError::new(FailureKind::Io, err.to_string()))?;

        thread::Builder::new()
            .name("ingest-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let directory = directory.clone();
                    let ingestor = ingestor.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(directory.as_ref(), ingestor.as_ref(), command, event_tx)
                            .await;
                    });
                }
                ingest_debug!("Engine command channel closed");
            })
            .map_err(|err| ServiceError::new(FailureKind::Io, err.to_string()))?;

        Ok((Self { cmd_tx }, event_rx))
    }

    pub fn fetch_product_types(&self) {
        self.send(EngineCommand::FetchProductTypes);
    }

    pub fn ingest(&self, request: IngestRequest) {
        self.send(EngineCommand::Ingest(request));
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            ingest_warn!("Engine worker is gone; command dropped");
        }
    }
}

async fn handle_command(
    directory: &dyn ProductTypeDirectory,
    ingestor: &dyn Ingestor,
    command: EngineCommand,
    event_tx: mpsc::Sender<ServiceEvent>,
) {
    let event = match command {
        EngineCommand::FetchProductTypes => {
            ServiceEvent::ProductTypesLoaded(directory.list_product_types().await)
        }
        EngineCommand::Ingest(request) => {
            let sink = Arc::new(ChannelProgressSink::new(event_tx.clone()));
            ServiceEvent::IngestCompleted(ingestor.ingest(&request, sink).await)
        }
    };
    let _ = event_tx.send(event);
}

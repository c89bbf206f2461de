use std::sync::mpsc;
use std::thread;

use ingest_core::{Effect, Msg, Notification, ProductType};
use ingest_engine::{ClientSettings, EngineHandle, IngestRequest, ServiceError, ServiceEvent};
use ingest_logging::{ingest_debug, ingest_info};

use super::app::LoopEvent;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(
        settings: ClientSettings,
        loop_tx: mpsc::Sender<LoopEvent>,
    ) -> Result<Self, ServiceError> {
        let (engine, events) = EngineHandle::new(settings)?;
        spawn_event_pump(events, loop_tx);
        Ok(Self { engine })
    }

    /// Starts the service calls among `effects` and hands back the notifications
    /// the UI has to show.
    pub fn enqueue(&self, effects: Vec<Effect>) -> Vec<Notification> {
        let mut notifications = Vec::new();
        for effect in effects {
            match effect {
                Effect::FetchProductTypes => {
                    ingest_debug!("Fetching product types");
                    self.engine.fetch_product_types();
                }
                Effect::Ingest {
                    file,
                    product_type,
                    product_structure,
                } => {
                    ingest_info!(
                        "Ingest file={:?} type={} structure={}",
                        file.as_ref().map(|file| &file.file_name),
                        product_type,
                        product_structure
                    );
                    self.engine.ingest(IngestRequest {
                        file: file.map(|file| file.path),
                        product_type,
                        product_structure,
                    });
                }
                Effect::Notify(notification) => notifications.push(notification),
            }
        }
        notifications
    }
}

fn spawn_event_pump(events: mpsc::Receiver<ServiceEvent>, loop_tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        while let Ok(event) = events.recv() {
            if loop_tx.send(LoopEvent::Msg(map_event(event))).is_err() {
                break;
            }
        }
    });
}

pub(crate) fn map_event(event: ServiceEvent) -> Msg {
    match event {
        ServiceEvent::ProductTypesLoaded(Ok(records)) => Msg::ProductTypesLoaded(
            records
                .into_iter()
                .map(|record| ProductType::new(record.name))
                .collect(),
        ),
        ServiceEvent::ProductTypesLoaded(Err(err)) => Msg::ProductTypesFailed(err.to_string()),
        ServiceEvent::UploadProgress { loaded, total } => Msg::UploadProgress { loaded, total },
        ServiceEvent::IngestCompleted(Ok(receipt)) => Msg::IngestSucceeded {
            product_id: receipt.product_id,
        },
        ServiceEvent::IngestCompleted(Err(err)) => Msg::IngestFailed {
            error: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ingest_engine::{FailureKind, IngestReceipt, ProductTypeRecord};
    use pretty_assertions::assert_eq;

    #[test]
    fn service_events_map_to_messages() {
        assert_eq!(
            map_event(ServiceEvent::ProductTypesLoaded(Ok(vec![
                ProductTypeRecord {
                    name: "GenericFile".to_string()
                },
                ProductTypeRecord {
                    name: "Met".to_string()
                },
            ]))),
            Msg::ProductTypesLoaded(vec![ProductType::new("GenericFile"), ProductType::new("Met")])
        );
        assert_eq!(
            map_event(ServiceEvent::UploadProgress {
                loaded: 5,
                total: 10
            }),
            Msg::UploadProgress {
                loaded: 5,
                total: 10
            }
        );
        assert_eq!(
            map_event(ServiceEvent::IngestCompleted(Ok(IngestReceipt {
                product_id: "urn:1234".to_string()
            }))),
            Msg::IngestSucceeded {
                product_id: "urn:1234".to_string()
            }
        );
    }

    #[test]
    fn failures_carry_the_raw_reason() {
        let err = ServiceError {
            kind: FailureKind::HttpStatus(500),
            message: "catalog unavailable".to_string(),
        };
        assert_eq!(
            map_event(ServiceEvent::IngestCompleted(Err(err.clone()))),
            Msg::IngestFailed {
                error: "http status 500: catalog unavailable".to_string()
            }
        );
        assert_eq!(
            map_event(ServiceEvent::ProductTypesLoaded(Err(err))),
            Msg::ProductTypesFailed("http status 500: catalog unavailable".to_string())
        );
    }
}

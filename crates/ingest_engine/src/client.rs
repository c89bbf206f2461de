use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use ingest_logging::{ingest_debug, ingest_info};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Url};
use serde::Deserialize;
use tokio_util::io::ReaderStream;

use crate::{
    FailureKind, IngestReceipt, IngestRequest, ProductTypeRecord, ServiceError, ServiceEvent,
};

/// Multipart field that carries the uploaded file.
pub const FILE_FIELD: &str = "productFile";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Root of the file manager REST API, e.g. `http://host:8080/fmprod/jaxrs`.
    pub base_url: String,
    pub product_types_path: String,
    pub ingest_path: String,
    pub connect_timeout: Option<Duration>,
    /// `None` leaves uploads unbounded; failures then come only from the transport.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/fmprod/jaxrs".to_string(),
            product_types_path: "productTypes".to_string(),
            ingest_path: "productWithFile".to_string(),
            connect_timeout: Some(Duration::from_secs(10)),
            request_timeout: None,
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ServiceEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<ServiceEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<ServiceEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: ServiceEvent) {
        let _ = self.tx.send(event);
    }
}

#[async_trait::async_trait]
pub trait ProductTypeDirectory: Send + Sync {
    async fn list_product_types(&self) -> Result<Vec<ProductTypeRecord>, ServiceError>;
}

#[async_trait::async_trait]
pub trait Ingestor: Send + Sync {
    /// Uploads the request's file, reporting `UploadProgress` events to `sink`.
    async fn ingest(
        &self,
        request: &IngestRequest,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<IngestReceipt, ServiceError>;
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProductTypeListing {
    Bare(Vec<ProductTypeRecord>),
    Wrapped {
        #[serde(rename = "productTypes")]
        product_types: Vec<ProductTypeRecord>,
    },
}

#[derive(Deserialize)]
struct IngestResponse {
    #[serde(rename = "productId")]
    product_id: String,
}

#[derive(Debug, Clone)]
pub struct ReqwestFileManagerClient {
    settings: ClientSettings,
    client: reqwest::Client,
}

impl ReqwestFileManagerClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ServiceError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ServiceError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        let raw = format!(
            "{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&raw).map_err(|err| ServiceError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    fn ingest_url(&self, request: &IngestRequest) -> Result<Url, ServiceError> {
        let mut url = self.endpoint(&self.settings.ingest_path)?;
        url.query_pairs_mut()
            .append_pair("productType", &request.product_type)
            .append_pair("productStructure", &request.product_structure);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl ProductTypeDirectory for ReqwestFileManagerClient {
    async fn list_product_types(&self) -> Result<Vec<ProductTypeRecord>, ServiceError> {
        let url = self.endpoint(&self.settings.product_types_path)?;
        ingest_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body = read_success_body(response).await?;

        let listing: ProductTypeListing = serde_json::from_slice(&body)
            .map_err(|err| ServiceError::new(FailureKind::Decode, err.to_string()))?;
        Ok(match listing {
            ProductTypeListing::Bare(product_types) => product_types,
            ProductTypeListing::Wrapped { product_types } => product_types,
        })
    }
}

#[async_trait::async_trait]
impl Ingestor for ReqwestFileManagerClient {
    async fn ingest(
        &self,
        request: &IngestRequest,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<IngestReceipt, ServiceError> {
        let path = request
            .file
            .as_deref()
            .ok_or_else(|| ServiceError::new(FailureKind::MissingFile, "select a file to ingest"))?;
        let url = self.ingest_url(request)?;
        let part = file_part(path, sink).await?;
        let form = Form::new().part(FILE_FIELD, part);

        ingest_info!(
            "POST {} file={} type={} structure={}",
            url,
            path.display(),
            request.product_type,
            request.product_structure
        );
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body = read_success_body(response).await?;
        parse_receipt(&body)
    }
}

/// Streams `path` from disk, emitting cumulative progress for every chunk handed to the transport.
async fn file_part(path: &Path, sink: Arc<dyn ProgressSink>) -> Result<Part, ServiceError> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|err| io_error(path, err))?;
    let total = file
        .metadata()
        .await
        .map_err(|err| io_error(path, err))?
        .len();

    let mut loaded = 0u64;
    let stream = ReaderStream::new(file).map(move |chunk| {
        if let Ok(bytes) = &chunk {
            loaded += bytes.len() as u64;
            sink.emit(ServiceEvent::UploadProgress { loaded, total });
        }
        chunk
    });

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Part::stream_with_length(Body::wrap_stream(stream), total)
        .file_name(file_name)
        .mime_str("application/octet-stream")
        .map_err(|err| ServiceError::new(FailureKind::Network, err.to_string()))
}

async fn read_success_body(response: reqwest::Response) -> Result<bytes::Bytes, ServiceError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    if !status.is_success() {
        let text = String::from_utf8_lossy(&body).trim().to_string();
        let message = if text.is_empty() {
            status.to_string()
        } else {
            text
        };
        return Err(ServiceError::new(
            FailureKind::HttpStatus(status.as_u16()),
            message,
        ));
    }
    Ok(body)
}

fn parse_receipt(body: &[u8]) -> Result<IngestReceipt, ServiceError> {
    if let Ok(response) = serde_json::from_slice::<IngestResponse>(body) {
        return Ok(IngestReceipt {
            product_id: response.product_id,
        });
    }
    // Some deployments answer with the bare identifier.
    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() || text.starts_with('{') || text.starts_with('[') {
        return Err(ServiceError::new(
            FailureKind::Decode,
            "response carries no product id",
        ));
    }
    Ok(IngestReceipt { product_id: text })
}

fn io_error(path: &Path, err: std::io::Error) -> ServiceError {
    ServiceError::new(FailureKind::Io, format!("{}: {}", path.display(), err))
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return ServiceError::new(FailureKind::InvalidUrl, err.to_string());
    }
    ServiceError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_accepts_json_and_plain_text() {
        assert_eq!(
            parse_receipt(br#"{"productId":"urn:1234"}"#).unwrap().product_id,
            "urn:1234"
        );
        assert_eq!(parse_receipt(b" urn:5678\n").unwrap().product_id, "urn:5678");
    }

    #[test]
    fn receipt_rejects_empty_or_foreign_json() {
        assert_eq!(parse_receipt(b"").unwrap_err().kind, FailureKind::Decode);
        assert_eq!(
            parse_receipt(br#"{"id":"x"}"#).unwrap_err().kind,
            FailureKind::Decode
        );
    }

    #[test]
    fn endpoints_join_without_double_slashes() {
        let client = ReqwestFileManagerClient::new(ClientSettings {
            base_url: "http://fm.example.org/fmprod/jaxrs/".to_string(),
            ..ClientSettings::default()
        })
        .unwrap();
        let request = IngestRequest {
            file: None,
            product_type: "Generic File".to_string(),
            product_structure: "Flat".to_string(),
        };

        let url = client.ingest_url(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "http://fm.example.org/fmprod/jaxrs/productWithFile?productType=Generic+File&productStructure=Flat"
        );
    }

    #[test]
    fn bad_base_url_is_reported() {
        let client = ReqwestFileManagerClient::new(ClientSettings {
            base_url: "not a url".to_string(),
            ..ClientSettings::default()
        })
        .unwrap();
        let err = client.endpoint("productTypes").unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }
}

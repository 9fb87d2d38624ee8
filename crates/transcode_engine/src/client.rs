use std::time::Duration;

use serde::de::DeserializeOwned;
use session_logging::session_warn;
use transcode_core::{PollEntry, TreeNode};
use url::Url;

use crate::ingest::{ingest_queue, ingest_tree};
use crate::types::EnqueueRequest;
use crate::{ApiError, FailureKind, WireDirectory, WireQueueItem};

const TREE_PATH: &str = "api/files/source";
const QUEUE_PATH: &str = "api/queue";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl ClientSettings {
    /// Settings with default timeouts. The base path gets a trailing slash
    /// so endpoint paths resolve beneath it.
    pub fn new(mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            base_url,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    async fn fetch_tree(&self) -> Result<TreeNode, ApiError>;

    async fn fetch_queue(&self) -> Result<Vec<PollEntry>, ApiError>;

    /// Any 2xx response counts as acceptance.
    async fn enqueue(&self, path: &str) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApiClient {
    settings: ClientSettings,
    client: reqwest::Client,
}

impl ReqwestApiClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.settings.endpoint(path)?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        check_status(&response)?;

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body).map_err(decode_error)
    }
}

#[async_trait::async_trait]
impl ApiClient for ReqwestApiClient {
    async fn fetch_tree(&self) -> Result<TreeNode, ApiError> {
        let wire: WireDirectory = self.get_json(TREE_PATH).await?;
        Ok(ingest_tree(wire))
    }

    async fn fetch_queue(&self) -> Result<Vec<PollEntry>, ApiError> {
        let wire: Option<Vec<WireQueueItem>> = self.get_json(QUEUE_PATH).await?;
        Ok(ingest_queue(wire))
    }

    async fn enqueue(&self, path: &str) -> Result<(), ApiError> {
        let url = self.settings.endpoint(QUEUE_PATH)?;
        let response = self
            .client
            .post(url)
            .json(&EnqueueRequest { path })
            .send()
            .await
            .map_err(map_reqwest_error)?;
        check_status(&response)
    }
}

fn check_status(response: &reqwest::Response) -> Result<(), ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(ApiError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ))
    }
}

/// serde_json stops at 128 nested values, which caps a directory tree at
/// about 63 levels. That case is named so it does not read as a corrupt payload.
fn decode_error(err: serde_json::Error) -> ApiError {
    let message = err.to_string();
    if message.contains("recursion limit exceeded") {
        session_warn!("Payload nesting exceeds the decoder limit: {}", message);
        return ApiError::new(
            FailureKind::Decode,
            format!("payload nested too deeply to decode: {message}"),
        );
    }
    ApiError::new(FailureKind::Decode, message)
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}

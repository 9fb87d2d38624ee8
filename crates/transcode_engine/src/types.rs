use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use transcode_core::{PollEntry, TreeNode};

/// Directory payload of `GET /api/files/source`. Lists may arrive as `null`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireDirectory {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub children: Vec<WireDirectory>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub files: Vec<WireFile>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireFile {
    pub name: String,
    pub path: String,
}

/// One entry of `GET /api/queue`. Progress is optional on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireQueueItem {
    pub name: String,
    #[serde(default)]
    pub progress: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct EnqueueRequest<'a> {
    pub path: &'a str,
}

/// Text frame of the push channel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatusUpdate {
    pub name: String,
    pub progress: f64,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    Connected,
    Status(StatusUpdate),
    Unavailable(String),
    Closed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    TreeFetched(Result<TreeNode, ApiError>),
    QueueFetched(Result<Vec<PollEntry>, ApiError>),
    Enqueued {
        path: String,
        result: Result<(), ApiError>,
    },
    Push(PushEvent),
    PollTick,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
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
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed payload"),
        }
    }
}

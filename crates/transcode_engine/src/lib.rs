//! Transcode console engine: server I/O and effect execution.
mod client;
mod engine;
mod ingest;
mod push;
mod sink;
mod types;

pub use client::{ApiClient, ClientSettings, ReqwestApiClient};
pub use engine::{EngineError, EngineHandle, EngineSettings};
pub use ingest::{ingest_queue, ingest_tree};
pub use push::{parse_status, run_push_channel, status_url};
pub use sink::{ChannelEventSink, EventSink};
pub use types::{
    ApiError, EngineEvent, FailureKind, PushEvent, StatusUpdate, WireDirectory, WireFile,
    WireQueueItem,
};

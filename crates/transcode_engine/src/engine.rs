use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use session_logging::{session_debug, session_info, session_warn};
use thiserror::Error;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::client::{ApiClient, ClientSettings, ReqwestApiClient};
use crate::push::{run_push_channel, status_url};
use crate::sink::{ChannelEventSink, EventSink};
use crate::{ApiError, EngineEvent};

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub client: ClientSettings,
    pub poll_interval: Duration,
}

impl EngineSettings {
    pub fn new(client: ClientSettings) -> Self {
        Self {
            client,
            poll_interval: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("could not start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("could not set up server client: {0}")]
    Client(#[from] ApiError),
}

#[derive(Debug)]
enum EngineCommand {
    FetchTree,
    FetchQueue,
    Enqueue { path: String },
    OpenPushChannel,
    StartPolling,
    Shutdown,
}

/// Everything a spawned command needs, cloned per command.
#[derive(Clone)]
struct Worker {
    client: Arc<dyn ApiClient>,
    sink: ChannelEventSink,
    cancel: CancellationToken,
    status_url: Url,
    poll_interval: Duration,
}

/// Handle to the background thread that runs all network I/O.
///
/// Dropping the handle or calling [`EngineHandle::shutdown`] cancels the
/// poll timer and the push channel.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn spawn(
        settings: EngineSettings,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>), EngineError> {
        let client = Arc::new(ReqwestApiClient::new(settings.client.clone())?);
        let status_url = status_url(&settings.client)?;
        Self::with_client(client, status_url, settings.poll_interval)
    }

    pub fn with_client(
        client: Arc<dyn ApiClient>,
        status_url: Url,
        poll_interval: Duration,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>), EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;
        let worker = Worker {
            client,
            sink: ChannelEventSink::new(event_tx),
            cancel: CancellationToken::new(),
            status_url,
            poll_interval,
        };

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                if matches!(command, EngineCommand::Shutdown) {
                    break;
                }
                let worker = worker.clone();
                runtime.spawn(async move {
                    handle_command(worker, command).await;
                });
            }
            session_info!("Engine stopping");
            worker.cancel.cancel();
            runtime.shutdown_timeout(Duration::from_secs(1));
        });

        Ok((Self { cmd_tx }, event_rx))
    }

    pub fn fetch_tree(&self) {
        self.send(EngineCommand::FetchTree);
    }

    pub fn fetch_queue(&self) {
        self.send(EngineCommand::FetchQueue);
    }

    pub fn enqueue(&self, path: impl Into<String>) {
        self.send(EngineCommand::Enqueue { path: path.into() });
    }

    pub fn open_push_channel(&self) {
        self.send(EngineCommand::OpenPushChannel);
    }

    pub fn start_polling(&self) {
        self.send(EngineCommand::StartPolling);
    }

    pub fn shutdown(&self) {
        self.send(EngineCommand::Shutdown);
    }

    fn send(&self, command: EngineCommand) {
        if let Err(err) = self.cmd_tx.send(command) {
            session_warn!("Engine is gone; dropping {:?}", err.0);
        }
    }
}

async fn handle_command(worker: Worker, command: EngineCommand) {
    match command {
        EngineCommand::FetchTree => {
            let result = worker.client.fetch_tree().await;
            if let Err(err) = &result {
                session_warn!("Tree fetch failed: {}", err);
            }
            worker.sink.emit(EngineEvent::TreeFetched(result));
        }
        EngineCommand::FetchQueue => {
            let result = worker.client.fetch_queue().await;
            match &result {
                Ok(entries) => session_debug!("Queue listing has {} items", entries.len()),
                Err(err) => session_warn!("Queue poll failed: {}", err),
            }
            worker.sink.emit(EngineEvent::QueueFetched(result));
        }
        EngineCommand::Enqueue { path } => {
            let result = worker.client.enqueue(&path).await;
            match &result {
                Ok(()) => session_info!("Queued {}", path),
                Err(err) => session_warn!("Queueing {} failed: {}", path, err),
            }
            worker.sink.emit(EngineEvent::Enqueued { path, result });
        }
        EngineCommand::OpenPushChannel => {
            run_push_channel(worker.status_url.clone(), &worker.sink, worker.cancel.clone()).await;
        }
        EngineCommand::StartPolling => {
            run_poll_timer(worker.poll_interval, &worker.sink, worker.cancel.clone()).await;
        }
        EngineCommand::Shutdown => {}
    }
}

/// Emits a tick every `interval`, first one after a full interval.
async fn run_poll_timer(interval: Duration, sink: &dyn EventSink, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => sink.emit(EngineEvent::PollTick),
        }
    }
}

use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use transcode_core::{FileEntry, PollEntry, TreeNode};
use transcode_engine::{ApiClient, ApiError, EngineEvent, EngineHandle, FailureKind, PushEvent};
use url::Url;

struct FakeClient;

#[async_trait::async_trait]
impl ApiClient for FakeClient {
    async fn fetch_tree(&self) -> Result<TreeNode, ApiError> {
        Ok(TreeNode::new("/", Vec::new(), vec![FileEntry::new("a.mkv", "/a.mkv")]).unwrap())
    }

    async fn fetch_queue(&self) -> Result<Vec<PollEntry>, ApiError> {
        Ok(vec![PollEntry::new("a.mkv", Some(1.0))])
    }

    async fn enqueue(&self, _path: &str) -> Result<(), ApiError> {
        Err(ApiError {
            kind: FailureKind::HttpStatus(409),
            message: "409 Conflict".to_string(),
        })
    }
}

fn unreachable_status_url() -> Url {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("ws://{addr}/api/queue/status")).unwrap()
}

fn spawn(poll_interval: Duration) -> (EngineHandle, mpsc::Receiver<EngineEvent>) {
    EngineHandle::with_client(Arc::new(FakeClient), unreachable_status_url(), poll_interval)
        .expect("engine")
}

fn next_event(rx: &mpsc::Receiver<EngineEvent>) -> EngineEvent {
    rx.recv_timeout(Duration::from_secs(5)).expect("engine event")
}

#[test]
fn commands_report_results_as_events() {
    let (engine, rx) = spawn(Duration::from_secs(3600));

    engine.fetch_tree();
    assert!(matches!(next_event(&rx), EngineEvent::TreeFetched(Ok(_))));

    engine.fetch_queue();
    assert_eq!(
        next_event(&rx),
        EngineEvent::QueueFetched(Ok(vec![PollEntry::new("a.mkv", Some(1.0))]))
    );

    engine.enqueue("/a.mkv");
    match next_event(&rx) {
        EngineEvent::Enqueued { path, result } => {
            assert_eq!(path, "/a.mkv");
            assert_eq!(result.unwrap_err().kind, FailureKind::HttpStatus(409));
        }
        other => panic!("unexpected event {other:?}"),
    }

    engine.shutdown();
}

#[test]
fn push_channel_degrades_to_unavailable() {
    let (engine, rx) = spawn(Duration::from_secs(3600));

    engine.open_push_channel();
    assert!(matches!(
        next_event(&rx),
        EngineEvent::Push(PushEvent::Unavailable(_))
    ));

    engine.shutdown();
}

#[test]
fn poll_timer_ticks_until_shutdown() {
    let (engine, rx) = spawn(Duration::from_millis(20));
    let started = Instant::now();

    engine.start_polling();
    assert_eq!(next_event(&rx), EngineEvent::PollTick);
    assert_eq!(next_event(&rx), EngineEvent::PollTick);
    assert!(started.elapsed() >= Duration::from_millis(40));

    engine.shutdown();
    // Once the engine thread is gone every sender is dropped.
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(EngineEvent::PollTick) => assert!(Instant::now() < deadline),
            Ok(other) => panic!("unexpected event {other:?}"),
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
            Err(mpsc::RecvTimeoutError::Timeout) => assert!(Instant::now() < deadline),
        }
    }
}

use std::sync::{Arc, Mutex};

use futures_util::SinkExt;
use pretty_assertions::assert_eq;
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use transcode_engine::{run_push_channel, EngineEvent, EventSink, PushEvent, StatusUpdate};
use url::Url;

#[derive(Default)]
struct TestSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl TestSink {
    fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl EventSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Accepts one WebSocket client, sends `frames`, then closes.
async fn serve_frames(frames: Vec<Message>) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut socket = tokio_tungstenite::accept_async(stream).await.unwrap();
        for frame in frames {
            socket.send(frame).await.unwrap();
        }
        let _ = socket.close(None).await;
    });
    Url::parse(&format!("ws://{addr}/api/queue/status")).unwrap()
}

#[tokio::test]
async fn forwards_status_frames_and_reports_close() {
    let url = serve_frames(vec![
        Message::Text(r#"{"Name":"a.mkv","Progress":12.5}"#.to_string()),
        Message::Text("not json".to_string()),
        Message::Binary(vec![1, 2, 3]),
        Message::Text(r#"{"Name":"b.avi","Progress":99.999}"#.to_string()),
    ])
    .await;
    let sink = TestSink::default();

    run_push_channel(url, &sink, CancellationToken::new()).await;

    assert_eq!(
        sink.take(),
        vec![
            EngineEvent::Push(PushEvent::Connected),
            EngineEvent::Push(PushEvent::Status(StatusUpdate {
                name: "a.mkv".to_string(),
                progress: 12.5,
            })),
            EngineEvent::Push(PushEvent::Status(StatusUpdate {
                name: "b.avi".to_string(),
                progress: 99.999,
            })),
            EngineEvent::Push(PushEvent::Closed),
        ]
    );
}

#[tokio::test]
async fn reports_unavailable_when_nothing_listens() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let url = Url::parse(&format!("ws://{addr}/api/queue/status")).unwrap();
    let sink = TestSink::default();

    run_push_channel(url, &sink, CancellationToken::new()).await;

    let events = sink.take();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        events[0],
        EngineEvent::Push(PushEvent::Unavailable(_))
    ));
}

#[tokio::test]
async fn cancellation_stops_without_reporting_close() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (accepted_tx, accepted_rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let socket = tokio_tungstenite::accept_async(stream).await.unwrap();
        let _ = accepted_tx.send(());
        // Keep the connection open until the client goes away.
        let _socket = socket;
        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
    });
    let url = Url::parse(&format!("ws://{addr}/api/queue/status")).unwrap();
    let sink = TestSink::default();
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        let _ = accepted_rx.await;
        trigger.cancel();
    });
    run_push_channel(url, &sink, cancel).await;

    assert_eq!(sink.take(), vec![EngineEvent::Push(PushEvent::Connected)]);
}

use std::sync::mpsc;
use std::thread;

use session_logging::{session_debug, session_info};
use transcode_core::{Effect, Msg};
use transcode_engine::{EngineEvent, EngineHandle, PushEvent};

use super::app::LoopEvent;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    /// Starts forwarding engine events into the control loop.
    pub fn new(
        engine: EngineHandle,
        events: mpsc::Receiver<EngineEvent>,
        loop_tx: mpsc::Sender<LoopEvent>,
    ) -> Self {
        spawn_event_forwarder(events, loop_tx);
        Self { engine }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            session_debug!("Running effect {:?}", effect);
            match effect {
                Effect::FetchTree => self.engine.fetch_tree(),
                Effect::FetchQueue => self.engine.fetch_queue(),
                Effect::Enqueue { path } => {
                    session_info!("Enqueue path={}", path);
                    self.engine.enqueue(path);
                }
                Effect::OpenPushChannel => self.engine.open_push_channel(),
                Effect::StartPolling => self.engine.start_polling(),
                Effect::Teardown => self.engine.shutdown(),
            }
        }
    }
}

fn spawn_event_forwarder(events: mpsc::Receiver<EngineEvent>, loop_tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        for event in events {
            if loop_tx.send(LoopEvent::Core(map_event(event))).is_err() {
                break;
            }
        }
    });
}

pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::TreeFetched(Ok(tree)) => Msg::TreeLoaded(tree),
        EngineEvent::TreeFetched(Err(err)) => Msg::TreeFailed(err.to_string()),
        EngineEvent::QueueFetched(Ok(listing)) => Msg::QueueListed(listing),
        EngineEvent::QueueFetched(Err(err)) => Msg::QueueFailed(err.to_string()),
        EngineEvent::Enqueued { path, result } => match result {
            Ok(()) => Msg::SubmissionAccepted { path },
            Err(err) => Msg::SubmissionFailed {
                path,
                reason: err.to_string(),
            },
        },
        EngineEvent::Push(PushEvent::Connected) => Msg::PushConnected,
        EngineEvent::Push(PushEvent::Status(update)) => Msg::PushReceived {
            name: update.name,
            progress: update.progress,
        },
        EngineEvent::Push(PushEvent::Unavailable(reason)) => Msg::PushUnavailable(reason),
        EngineEvent::Push(PushEvent::Closed) => Msg::PushClosed,
        EngineEvent::PollTick => Msg::PollTick,
    }
}

#[cfg(test)]
mod tests {
    use transcode_core::PollEntry;
    use transcode_engine::{ApiError, FailureKind, StatusUpdate};

    use super::*;

    fn http_error(code: u16) -> ApiError {
        ApiError {
            kind: FailureKind::HttpStatus(code),
            message: format!("{code}"),
        }
    }

    #[test]
    fn fetch_results_become_messages() {
        assert_eq!(
            map_event(EngineEvent::QueueFetched(Ok(vec![PollEntry::new("a", None)]))),
            Msg::QueueListed(vec![PollEntry::new("a", None)])
        );
        assert_eq!(
            map_event(EngineEvent::QueueFetched(Err(http_error(502)))),
            Msg::QueueFailed("http status 502: 502".to_string())
        );
        assert_eq!(
            map_event(EngineEvent::TreeFetched(Err(http_error(404)))),
            Msg::TreeFailed("http status 404: 404".to_string())
        );
    }

    #[test]
    fn enqueue_results_become_submission_messages() {
        assert_eq!(
            map_event(EngineEvent::Enqueued {
                path: "/a.mkv".to_string(),
                result: Ok(()),
            }),
            Msg::SubmissionAccepted {
                path: "/a.mkv".to_string()
            }
        );
        assert_eq!(
            map_event(EngineEvent::Enqueued {
                path: "/a.mkv".to_string(),
                result: Err(http_error(500)),
            }),
            Msg::SubmissionFailed {
                path: "/a.mkv".to_string(),
                reason: "http status 500: 500".to_string(),
            }
        );
    }

    #[test]
    fn push_events_become_messages() {
        assert_eq!(
            map_event(EngineEvent::Push(PushEvent::Status(StatusUpdate {
                name: "a".to_string(),
                progress: 3.5,
            }))),
            Msg::PushReceived {
                name: "a".to_string(),
                progress: 3.5,
            }
        );
        assert_eq!(
            map_event(EngineEvent::Push(PushEvent::Closed)),
            Msg::PushClosed
        );
        assert_eq!(map_event(EngineEvent::PollTick), Msg::PollTick);
    }
}

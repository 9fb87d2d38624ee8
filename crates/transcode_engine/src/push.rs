//! WebSocket push channel for progress events.
//!
//! The channel is opened once. If it cannot be opened, or closes later, the
//! condition is reported a single time and the session carries on with
//! polling alone; there is no reconnect loop.

use futures_util::StreamExt;
use session_logging::{session_debug, session_info, session_warn};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::client::ClientSettings;
use crate::sink::EventSink;
use crate::{ApiError, EngineEvent, FailureKind, PushEvent, StatusUpdate};

const STATUS_PATH: &str = "api/queue/status";

/// WebSocket address of the status channel for an HTTP base URL.
pub fn status_url(settings: &ClientSettings) -> Result<Url, ApiError> {
    let mut url = settings.endpoint(STATUS_PATH)?;
    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("unsupported scheme {other}"),
            ))
        }
    };
    url.set_scheme(scheme).map_err(|()| {
        ApiError::new(FailureKind::InvalidUrl, format!("cannot use scheme {scheme}"))
    })?;
    Ok(url)
}

pub fn parse_status(text: &str) -> Result<StatusUpdate, serde_json::Error> {
    serde_json::from_str(text)
}

/// Connects and forwards status frames until the peer closes, an error
/// occurs, or `cancel` fires.
pub async fn run_push_channel(url: Url, sink: &dyn EventSink, cancel: CancellationToken) {
    let connect = tokio::select! {
        _ = cancel.cancelled() => return,
        result = connect_async(url.as_str()) => result,
    };
    let mut socket = match connect {
        Ok((socket, _response)) => socket,
        Err(err) => {
            session_warn!(
                "Push channel unavailable at {}: {}; continuing with polling only",
                url,
                err
            );
            sink.emit(EngineEvent::Push(PushEvent::Unavailable(err.to_string())));
            return;
        }
    };
    session_info!("Push channel connected to {}", url);
    sink.emit(EngineEvent::Push(PushEvent::Connected));

    loop {
        let frame = tokio::select! {
            _ = cancel.cancelled() => {
                let _ = socket.close(None).await;
                return;
            }
            frame = socket.next() => frame,
        };
        match frame {
            Some(Ok(Message::Text(text))) => match parse_status(&text) {
                Ok(update) => sink.emit(EngineEvent::Push(PushEvent::Status(update))),
                Err(err) => session_debug!("Skipping malformed status frame {:?}: {}", text, err),
            },
            Some(Ok(Message::Close(_))) | None => break,
            Some(Ok(_)) => {}
            Some(Err(err)) => {
                session_warn!("Push channel error: {}", err);
                break;
            }
        }
    }

    session_warn!("Push channel closed; continuing with polling only");
    sink.emit(EngineEvent::Push(PushEvent::Closed));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(base: &str) -> ClientSettings {
        ClientSettings::new(Url::parse(base).unwrap())
    }

    #[test]
    fn status_url_follows_http_scheme() {
        let url = status_url(&settings("http://media.local:5000")).unwrap();
        assert_eq!(url.as_str(), "ws://media.local:5000/api/queue/status");

        let url = status_url(&settings("https://media.local/transcode")).unwrap();
        assert_eq!(url.as_str(), "wss://media.local/transcode/api/queue/status");
    }

    #[test]
    fn status_url_rejects_other_schemes() {
        let err = status_url(&settings("ftp://media.local")).unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }

    #[test]
    fn parse_status_reads_pascal_case_fields() {
        let update = parse_status(r#"{"Name":"movie.mkv","Progress":12.5}"#).unwrap();
        assert_eq!(update.name, "movie.mkv");
        assert_eq!(update.progress, 12.5);
        assert!(parse_status(r#"{"Name":"movie.mkv"}"#).is_err());
    }
}

use std::time::Duration;
use async_std::{future::timeout, task};
use dioxus::logger::tracing::{error, info, warn};
use futures_util::StreamExt;
use reqwest::{header::ACCEPT, StatusCode};
use tokio::sync::mpsc::UnboundedSender;

use super::{
  events::StreamEvent,
  monitor::StreamSignal,
  server::{AppError, BotId},
  sse::SseDecoder
};

pub const HEARTBEAT_TIMEOUT: Duration = Duration::from_secs(120);
pub const RETRY_DELAY: Duration = Duration::from_secs(3);
const LAST_EVENT_ID: &str = "Last-Event-ID";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEndpoint {
  Bot(BotId),
  /// Server-side demo feed, not tied to a bot.
  Demo
}

impl StreamEndpoint {
  pub fn url(&self, base: &str) -> String {
    let base = base.trim_end_matches('/');
    match self {
      Self::Bot(id) => format!("{}/api/stream/tradings/{}", base, id),
      Self::Demo => format!("{}/api/stream/demo-tradings", base),
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreamConfig {
  pub url: String,
  pub access_token: String,
  pub heartbeat_timeout: Duration,
  pub retry_delay: Duration
}

impl StreamConfig {
  pub fn new(endpoint: StreamEndpoint, base: &str, access_token: String) -> Self {
    Self {
      url: endpoint.url(base),
      access_token,
      heartbeat_timeout: HEARTBEAT_TIMEOUT,
      retry_delay: RETRY_DELAY
    }
  }
}

// 4xx answers will not change by asking again with the same token
fn is_rejection(err: &AppError) -> bool {
  match err {
    AppError::Unauthorized(_) => true,
    AppError::RequestFailed { status, .. } => (400..500).contains(status),
    _ => false
  }
}

/// Keeps a bot's event stream open until `sender`'s receiver is dropped.
///
/// Every frame is forwarded as [`StreamSignal::Event`]. A failed connect, a
/// 5xx answer, a body error, a silent connection or a server close is
/// reported once as [`StreamSignal::TransportError`] before reconnecting.
/// A 4xx answer is reported as [`StreamSignal::Rejected`] and ends the loop.
pub async fn handle_event_stream(config: StreamConfig, client: reqwest::Client, sender: UnboundedSender<StreamSignal>) {
  let mut decoder = SseDecoder::new();

  loop {
    let outcome = read_stream(&config, &client, &mut decoder, &sender).await;
    if sender.is_closed() {
      info!("event stream consumer gone, leaving {}", config.url);
      return;
    }

    let reason = match outcome {
      Ok(()) => "stream closed by server".to_string(),
      Err(e) if is_rejection(&e) => {
        error!("event stream {} refused: {}", config.url, e);
        let _ = sender.send(StreamSignal::Rejected(e.to_string()));
        return;
      },
      Err(e) => e.to_string()
    };

    warn!("event stream {} interrupted: {}", config.url, reason);
    if sender.send(StreamSignal::TransportError(reason)).is_err() {
      return;
    }

    decoder.reset();
    let delay = decoder.retry().map(Duration::from_millis).unwrap_or(config.retry_delay);
    task::sleep(delay).await;
    if sender.is_closed() {
      return;
    }
  }
}

async fn read_stream(config: &StreamConfig, client: &reqwest::Client, decoder: &mut SseDecoder, sender: &UnboundedSender<StreamSignal>) -> Result<(), AppError> {
  let mut request = client.get(&config.url)
    .bearer_auth(&config.access_token)
    .header(ACCEPT, "text/event-stream");
  if let Some(id) = decoder.last_event_id() {
    request = request.header(LAST_EVENT_ID, id);
  }

  let response = request.send().await.map_err(|e| AppError::StreamConnectionError(e.to_string()))?;
  match response.status() {
    StatusCode::UNAUTHORIZED => return Err(AppError::Unauthorized("stream rejected the access token".to_string())),
    status if !status.is_success() => {
      return Err(AppError::RequestFailed {
        status: status.as_u16(),
        message: status.canonical_reason().unwrap_or("unexpected status").to_string()
      })
    },
    _ => info!("event stream connected: {}", config.url)
  }

  let mut body = Box::pin(response.bytes_stream());
  loop {
    let next = timeout(config.heartbeat_timeout, body.next()).await
      .map_err(|_| AppError::HeartbeatTimeout(config.heartbeat_timeout.as_secs()))?;
    let Some(chunk) = next else {
      return Ok(());
    };
    let chunk = chunk.map_err(|e| AppError::StreamConnectionError(e.to_string()))?;

    for frame in decoder.feed(&chunk) {
      if sender.send(StreamSignal::Event(StreamEvent::from(frame))).is_err() {
        return Ok(());
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::{io::{BufRead, BufReader, Write}, net::TcpListener, thread};
  use tokio::sync::mpsc;
  use super::*;

  // answers the first request with `status_line`, then stops accepting
  fn one_shot_server(status_line: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    thread::spawn(move || {
      if let Ok((stream, _)) = listener.accept() {
        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        while reader.read_line(&mut line).map(|n| n > 0).unwrap_or(false) && line != "\r\n" {
          line.clear();
        }
        let mut stream = reader.into_inner();
        let _ = write!(stream, "{}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n", status_line);
      }
      // keep the listener alive so a retry would hang instead of failing fast
      thread::sleep(Duration::from_secs(10));
      drop(listener);
    });
    format!("http://{}", addr)
  }

  fn quick_config(base: &str) -> StreamConfig {
    StreamConfig {
      heartbeat_timeout: Duration::from_secs(1),
      retry_delay: Duration::from_millis(10),
      ..StreamConfig::new(StreamEndpoint::Bot(42), base, "expired".to_string())
    }
  }

  #[tokio::test]
  async fn test_unauthorized_stream_is_not_retried() {
    let base = one_shot_server("HTTP/1.1 401 Unauthorized");
    let (tx, mut rx) = mpsc::unbounded_channel();

    timeout(Duration::from_secs(5), handle_event_stream(quick_config(&base), reqwest::Client::new(), tx)).await
      .expect("gives up after the first refusal");

    let mut signals = Vec::new();
    while let Ok(signal) = rx.try_recv() {
      signals.push(signal);
    }
    assert_eq!(signals.len(), 1);
    assert!(matches!(signals[0], StreamSignal::Rejected(_)));
  }

  #[test]
  fn test_rejection_classes() {
    assert!(is_rejection(&AppError::Unauthorized("expired".to_string())));
    assert!(is_rejection(&AppError::RequestFailed { status: 404, message: "Not Found".to_string() }));
    assert!(!is_rejection(&AppError::RequestFailed { status: 503, message: "Service Unavailable".to_string() }));
    assert!(!is_rejection(&AppError::HeartbeatTimeout(120)));
  }

  #[test]
  fn test_endpoint_urls() {
    assert_eq!(StreamEndpoint::Bot(42).url("https://api.example.com"), "https://api.example.com/api/stream/tradings/42");
    assert_eq!(StreamEndpoint::Bot(42).url("https://api.example.com/"), "https://api.example.com/api/stream/tradings/42");
    assert_eq!(StreamEndpoint::Demo.url("http://localhost:8080"), "http://localhost:8080/api/stream/demo-tradings");
  }

  #[test]
  fn test_config_defaults() {
    let config = StreamConfig::new(StreamEndpoint::Bot(7), "http://localhost:8080", "token".to_string());
    assert_eq!(config.url, "http://localhost:8080/api/stream/tradings/7");
    assert_eq!(config.heartbeat_timeout, Duration::from_secs(120));
    assert_eq!(config.retry_delay, Duration::from_secs(3));
  }
}

use super::sse::SseFrame;

pub const INIT_EVENT: &str = "INIT";
pub const MARKET_INFO_EVENT: &str = "market.info";
pub const TRADING_EVENTS_EVENT: &str = "trading.events";
pub const HEARTBEAT_EVENT: &str = "heartbeat";
const DEFAULT_EVENT: &str = "message";

/// Inbound event on a bot's stream, keyed by the wire event name.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
  Init(String),
  MarketInfo(String),
  TradingEvent(String),
  Heartbeat(String),
  /// Unnamed event, shown only by the single-log display.
  Message(String),
  Unknown { name: String, payload: String }
}

impl StreamEvent {
  pub fn from_wire(name: Option<&str>, payload: String) -> Self {
    match name {
      None | Some(DEFAULT_EVENT) => Self::Message(payload),
      Some(INIT_EVENT) => Self::Init(payload),
      Some(MARKET_INFO_EVENT) => Self::MarketInfo(payload),
      Some(TRADING_EVENTS_EVENT) => Self::TradingEvent(payload),
      Some(HEARTBEAT_EVENT) => Self::Heartbeat(payload),
      Some(other) => Self::Unknown { name: other.to_string(), payload }
    }
  }

  pub fn render(&self) -> String {
    match self {
      Self::Init(payload) => format!("Connection established: {}", payload),
      Self::MarketInfo(payload) => format!("Market Info: {}", payload),
      Self::TradingEvent(payload) => format!("Trading Event: {}", payload),
      Self::Heartbeat(payload) => format!("Heartbeat: {}", payload),
      Self::Message(payload) => payload.clone(),
      Self::Unknown { name, payload } => format!("{}: {}", name, payload),
    }
  }
}

impl From<SseFrame> for StreamEvent {
  fn from(frame: SseFrame) -> Self {
    StreamEvent::from_wire(frame.event.as_deref(), frame.data)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_names_are_case_sensitive() {
    assert_eq!(StreamEvent::from_wire(Some("INIT"), "ok".into()), StreamEvent::Init("ok".into()));
    assert_eq!(
      StreamEvent::from_wire(Some("init"), "ok".into()),
      StreamEvent::Unknown { name: "init".into(), payload: "ok".into() }
    );
    assert!(matches!(StreamEvent::from_wire(Some("Market.Info"), "x".into()), StreamEvent::Unknown { .. }));
  }

  #[test]
  fn test_default_event_names() {
    assert_eq!(StreamEvent::from_wire(None, "raw".into()), StreamEvent::Message("raw".into()));
    assert_eq!(StreamEvent::from_wire(Some("message"), "raw".into()), StreamEvent::Message("raw".into()));
  }

  #[test]
  fn test_render() {
    assert_eq!(StreamEvent::Init("ok".into()).render(), "Connection established: ok");
    assert_eq!(StreamEvent::MarketInfo("BTC 65000".into()).render(), "Market Info: BTC 65000");
    assert_eq!(StreamEvent::TradingEvent("buy".into()).render(), "Trading Event: buy");
    assert_eq!(StreamEvent::Heartbeat("1".into()).render(), "Heartbeat: 1");
    assert_eq!(StreamEvent::Message("plain".into()).render(), "plain");
  }

  #[test]
  fn test_from_frame() {
    let frame = SseFrame { event: Some("heartbeat".into()), data: "tick".into(), id: None };
    assert_eq!(StreamEvent::from(frame), StreamEvent::Heartbeat("tick".into()));
  }
}

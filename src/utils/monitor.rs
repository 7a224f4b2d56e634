//! State behind the live trading monitor.
//!
//! A [`StreamMonitor`] owns the per-channel logs of one monitoring session.
//! Every session is identified by a [`SessionId`]; opening a new session (or
//! closing the current one) retires the old id, so anything still in flight
//! from a previous connection is dropped in [`StreamMonitor::handle`] instead
//! of leaking into the logs of another bot.

use std::collections::{BTreeMap, VecDeque};
use chrono::{DateTime, Utc};
use dioxus::logger::tracing::{debug, info, warn};

use super::{events::StreamEvent, server::{AppError, BotId}};

pub const DEFAULT_LOG_CAPACITY: usize = 1_000;
pub const CONNECTION_LOST: &str = "Connection lost. Attempting to reconnect...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
  MarketInfo,
  TradingEvents,
  /// The undifferentiated log of the single-log display.
  Stream
}

impl Channel {
  pub fn title(&self) -> &'static str {
    match self {
      Self::MarketInfo => "Market Info",
      Self::TradingEvents => "Trading Events",
      Self::Stream => "Live Updates",
    }
  }

  /// DOM id of the scrollable container rendering this channel.
  pub fn container_id(&self) -> &'static str {
    match self {
      Self::MarketInfo => "monitor-log-market-info",
      Self::TradingEvents => "monitor-log-trading-events",
      Self::Stream => "monitor-log-stream",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
  #[default]
  Channels,
  Single
}

impl DisplayMode {
  pub fn channels(&self) -> &'static [Channel] {
    match self {
      Self::Channels => &[Channel::MarketInfo, Channel::TradingEvents],
      Self::Single => &[Channel::Stream],
    }
  }
}

/// One rendered line of a channel log. `seq` is unique within a log and
/// shared by the copies of a broadcast entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
  pub seq: u64,
  pub received_at: DateTime<Utc>,
  pub text: String
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelLog {
  channel: Channel,
  entries: VecDeque<LogEntry>,
  capacity: usize,
  evicted: u64
}

impl ChannelLog {
  pub fn new(channel: Channel, capacity: usize) -> Self {
    Self { channel, entries: VecDeque::new(), capacity: capacity.max(1), evicted: 0 }
  }

  pub fn channel(&self) -> Channel {
    self.channel
  }

  pub fn entries(&self) -> &VecDeque<LogEntry> {
    &self.entries
  }

  pub fn texts(&self) -> Vec<&str> {
    self.entries.iter().map(|e| e.text.as_str()).collect()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Number of entries dropped from the front to stay within capacity.
  pub fn evicted(&self) -> u64 {
    self.evicted
  }

  fn push(&mut self, entry: LogEntry) {
    if self.entries.len() == self.capacity {
      self.entries.pop_front();
      self.evicted += 1;
    }
    self.entries.push_back(entry);
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
  Idle,
  Connecting,
  Active,
  Closed
}

impl ConnectionState {
  pub fn label(&self) -> &'static str {
    match self {
      Self::Idle => "idle",
      Self::Connecting => "connecting",
      Self::Active => "active",
      Self::Closed => "closed",
    }
  }

  pub fn is_live(&self) -> bool {
    matches!(self, Self::Connecting | Self::Active)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SessionId(u64);

/// Handed out by a successful [`StreamMonitor::open`]; carries what the transport needs.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamTicket {
  pub session: SessionId,
  pub bot_id: BotId,
  pub access_token: String
}

#[derive(Debug, Clone, PartialEq)]
pub enum StreamSignal {
  Event(StreamEvent),
  TransportError(String),
  /// The server refused the subscription; the transport has given up.
  Rejected(String)
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreamMonitor {
  mode: DisplayMode,
  capacity: usize,
  state: ConnectionState,
  bot_id: Option<BotId>,
  session: SessionId,
  next_seq: u64,
  logs: Vec<ChannelLog>,
  auto_scroll: BTreeMap<Channel, bool>,
  failure: Option<String>
}

impl StreamMonitor {
  pub fn new(mode: DisplayMode, capacity: usize) -> Self {
    Self {
      mode,
      capacity,
      state: ConnectionState::Idle,
      bot_id: None,
      session: SessionId::default(),
      next_seq: 0,
      logs: Self::empty_logs(mode, capacity),
      auto_scroll: mode.channels().iter().map(|&c| (c, true)).collect(),
      failure: None
    }
  }

  fn empty_logs(mode: DisplayMode, capacity: usize) -> Vec<ChannelLog> {
    mode.channels().iter().map(|&c| ChannelLog::new(c, capacity)).collect()
  }

  pub fn mode(&self) -> DisplayMode {
    self.mode
  }

  pub fn state(&self) -> ConnectionState {
    self.state
  }

  pub fn bot_id(&self) -> Option<BotId> {
    self.bot_id
  }

  pub fn session(&self) -> SessionId {
    self.session
  }

  pub fn logs(&self) -> &[ChannelLog] {
    &self.logs
  }

  pub fn log(&self, channel: Channel) -> Option<&ChannelLog> {
    self.logs.iter().find(|log| log.channel == channel)
  }

  /// Why the server refused the current session, if it did.
  pub fn failure(&self) -> Option<&str> {
    self.failure.as_deref()
  }

  /// Starts a fresh session for `bot_id`, tearing down the current one first.
  pub fn open(&mut self, bot_id: BotId, access_token: Option<String>) -> Result<StreamTicket, AppError> {
    self.retire();
    self.bot_id = Some(bot_id);
    self.logs = Self::empty_logs(self.mode, self.capacity);
    self.failure = None;

    let Some(access_token) = access_token.filter(|t| !t.is_empty()) else {
      self.state = ConnectionState::Idle;
      warn!("no access token available, not opening stream for bot {}", bot_id);
      return Err(AppError::MissingCredential);
    };

    self.state = ConnectionState::Connecting;
    info!("opening stream session {:?} for bot {}", self.session, bot_id);
    Ok(StreamTicket { session: self.session, bot_id, access_token })
  }

  /// Ends the session and discards its logs.
  pub fn close(&mut self) {
    self.retire();
    self.logs = Self::empty_logs(self.mode, self.capacity);
    if self.state != ConnectionState::Idle {
      info!("stream for bot {:?} closed", self.bot_id);
      self.state = ConnectionState::Closed;
    }
  }

  fn retire(&mut self) {
    self.session = SessionId(self.session.0 + 1);
  }

  pub fn auto_scroll(&self, channel: Channel) -> bool {
    self.auto_scroll.get(&channel).copied().unwrap_or(true)
  }

  pub fn toggle_auto_scroll(&mut self, channel: Channel) -> bool {
    let enabled = !self.auto_scroll(channel);
    self.auto_scroll.insert(channel, enabled);
    enabled
  }

  /// Applies one signal of `session`. Returns the channels that received an
  /// entry and want to be scrolled to their end.
  pub fn handle(&mut self, session: SessionId, signal: StreamSignal) -> Vec<Channel> {
    if session != self.session || !self.state.is_live() {
      debug!("dropping signal from retired stream session {:?}", session);
      return Vec::new();
    }

    match signal {
      StreamSignal::Event(event) => self.apply_event(event),
      StreamSignal::TransportError(reason) => {
        warn!("stream for bot {:?} lost: {}", self.bot_id, reason);
        self.append(self.mode.channels(), CONNECTION_LOST.to_string())
      },
      StreamSignal::Rejected(reason) => {
        warn!("stream for bot {:?} rejected: {}", self.bot_id, reason);
        self.retire();
        self.state = ConnectionState::Closed;
        self.failure = Some(reason);
        Vec::new()
      }
    }
  }

  fn apply_event(&mut self, event: StreamEvent) -> Vec<Channel> {
    let text = event.render();
    match (&event, self.mode) {
      (StreamEvent::Init(_), _) => {
        if self.state == ConnectionState::Connecting {
          info!("stream for bot {:?} acknowledged", self.bot_id);
          self.state = ConnectionState::Active;
        }
        self.append(self.mode.channels(), text)
      },
      (StreamEvent::Heartbeat(_), _) => self.append(self.mode.channels(), text),
      (StreamEvent::Unknown { name, .. }, _) => {
        warn!("ignoring unknown stream event '{}'", name);
        Vec::new()
      },
      (StreamEvent::MarketInfo(_), DisplayMode::Channels) => self.append(&[Channel::MarketInfo], text),
      (StreamEvent::TradingEvent(_), DisplayMode::Channels) => self.append(&[Channel::TradingEvents], text),
      (StreamEvent::Message(_), DisplayMode::Channels) => {
        warn!("ignoring unnamed stream message in channel display");
        Vec::new()
      },
      (_, DisplayMode::Single) => self.append(&[Channel::Stream], text),
    }
  }

  // one sequence number per logical event so broadcast markers line up across logs
  fn append(&mut self, channels: &[Channel], text: String) -> Vec<Channel> {
    let seq = self.next_seq;
    self.next_seq += 1;
    let received_at = Utc::now();

    let mut scroll_targets = Vec::new();
    for log in self.logs.iter_mut().filter(|log| channels.contains(&log.channel)) {
      log.push(LogEntry { seq, received_at, text: text.clone() });
      if self.auto_scroll.get(&log.channel).copied().unwrap_or(true) {
        scroll_targets.push(log.channel);
      }
    }
    scroll_targets
  }
}

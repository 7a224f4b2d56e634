#![allow(non_snake_case)]

use std::time::Duration;
use async_std::task::sleep;
use chrono::Local;
use dioxus::{logger::tracing::info, prelude::*};
use tokio::sync::mpsc;

use crate::utils::{
  api::ApiClient,
  monitor::{Channel, DisplayMode, LogEntry, StreamMonitor, DEFAULT_LOG_CAPACITY},
  server::BotId,
  stream_handler::{handle_event_stream, StreamConfig, StreamEndpoint}
};

const SCROLL_DELAY: Duration = Duration::from_millis(100);

// give the new entry a frame to render before scrolling to it
fn scroll_to_end(channel: Channel) {
  spawn(async move {
    sleep(SCROLL_DELAY).await;
    document::eval(&format!(r#"
      var el = document.getElementById("{}");
      if (el) {{ el.scrollTo({{ top: el.scrollHeight, behavior: "smooth" }}); }}
    "#, channel.container_id()));
  });
}

fn clock(entry: &LogEntry) -> String {
  entry.received_at.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// Live view of a bot's event stream.
///
/// A new session is started whenever `open` or `bot_id` change; the previous
/// connection task is cancelled first. Nothing is rendered while closed.
#[component]
pub fn TradingMonitor(
  open: ReadOnlySignal<bool>,
  bot_id: ReadOnlySignal<Option<BotId>>,
  #[props(default)] mode: DisplayMode,
  on_close: EventHandler<()>
) -> Element {
  let api = use_context::<ApiClient>();
  let mut monitor = use_signal(|| StreamMonitor::new(mode, DEFAULT_LOG_CAPACITY));
  let mut stream_task: Signal<Option<Task>> = use_signal(|| None);
  let mut setup_error: Signal<Option<String>> = use_signal(|| None);

  use_effect(move || {
    let (open, bot_id) = (open(), bot_id());

    if let Some(task) = stream_task.write().take() {
      task.cancel();
    }
    monitor.write().close();
    setup_error.set(None);

    let (true, Some(bot_id)) = (open, bot_id) else {
      return;
    };

    let ticket = match monitor.write().open(bot_id, api.session().access_token()) {
      Ok(ticket) => ticket,
      Err(e) => {
        setup_error.set(Some(e.to_string()));
        return;
      }
    };

    let config = StreamConfig::new(StreamEndpoint::Bot(bot_id), api.base_url(), ticket.access_token);
    let client = api.http().clone();
    let session = ticket.session;
    let (signal_tx, mut signal_rx) = mpsc::unbounded_channel();

    let task = spawn(async move {
      let transport = handle_event_stream(config, client, signal_tx);
      let consumer = async move {
        while let Some(signal) = signal_rx.recv().await {
          let scroll_targets = monitor.write().handle(session, signal);
          for channel in scroll_targets {
            scroll_to_end(channel);
          }
        }
      };
      futures::join!(transport, consumer);
    });
    stream_task.set(Some(task));
  });

  use_drop(move || {
    if let Ok(mut task) = stream_task.try_write() {
      if let Some(task) = task.take() {
        info!("monitor unmounted, cancelling stream task");
        task.cancel();
      }
    }
  });

  if !open() {
    return rsx! {};
  }

  let state_label = monitor.read().state().label();
  let channels = monitor.read().mode().channels();
  let failure = monitor.read().failure().map(str::to_string);

  rsx! {
    div {
      class: "monitor",
      div {
        class: "monitor-header",
        h3 { "Trading Monitor" },
        if let Some(id) = bot_id() {
          span { class: "monitor-bot", "Bot #{id}" }
        },
        span { class: "monitor-state state-{state_label}", "{state_label}" },
        button {
          class: "button",
          onclick: move |_| on_close.call(()),
          "Close"
        }
      },
      if let Some(err) = setup_error() {
        p { class: "error-text", "{err}" }
      },
      if let Some(reason) = failure {
        p { class: "error-text", "The stream was refused ({reason}). Sign in again to keep monitoring." }
      },
      div {
        class: "monitor-channels",
        for channel in channels.iter().copied() {
          ChannelPanel { key: "{channel:?}", monitor, channel }
        }
      }
    }
  }
}

#[component]
fn ChannelPanel(monitor: Signal<StreamMonitor>, channel: Channel) -> Element {
  let guard = monitor.read();
  let Some(log) = guard.log(channel) else {
    return rsx! {};
  };
  let auto_scroll = guard.auto_scroll(channel);
  let evicted = log.evicted();
  let title = channel.title();

  rsx! {
    div {
      class: "monitor-panel",
      div {
        class: "monitor-panel-header",
        h4 { "{title}" },
        label {
          input {
            r#type: "checkbox",
            checked: auto_scroll,
            onchange: move |_| {
              monitor.write().toggle_auto_scroll(channel);
            }
          },
          "Auto-scroll"
        }
      },
      if evicted > 0 {
        p { class: "monitor-evicted", "{evicted} older entries dropped" }
      },
      div {
        id: channel.container_id(),
        class: "monitor-log",
        for entry in log.entries().iter() {
          div {
            key: "{entry.seq}",
            class: "monitor-entry",
            span { class: "monitor-time", {clock(entry)} },
            span { class: "monitor-text", "{entry.text}" }
          }
        }
      }
    }
  }
}

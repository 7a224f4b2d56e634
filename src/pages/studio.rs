#![allow(non_snake_case)]

use dioxus::prelude::*;

use crate::components::{
  apikeys::ApiKeysTab, backtest::BacktestTab, bots::TradingBotsTab, strategies::MyStrategiesTab, template::AuthState
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StudioTab {
  Strategies,
  ApiKeys,
  TradingBots,
  Backtest
}

impl StudioTab {
  const ALL: [StudioTab; 4] = [StudioTab::Strategies, StudioTab::ApiKeys, StudioTab::TradingBots, StudioTab::Backtest];

  fn label(&self) -> &'static str {
    match self {
      Self::Strategies => "My Strategies",
      Self::ApiKeys => "Exchange Keys",
      Self::TradingBots => "Trading Bots",
      Self::Backtest => "Backtesting",
    }
  }
}

#[component]
pub fn Studio() -> Element {
  let auth = use_context::<AuthState>();
  let mut active = use_signal(|| StudioTab::Strategies);

  if !(auth.signed_in)() {
    return rsx! {
      div {
        class: "studio-page",
        h2 { "Studio" },
        p { "Sign in to manage your strategies, exchange keys and trading bots." }
      }
    };
  }

  let panel = match active() {
    StudioTab::Strategies => rsx! { MyStrategiesTab {} },
    StudioTab::ApiKeys => rsx! { ApiKeysTab {} },
    StudioTab::TradingBots => rsx! { TradingBotsTab {} },
    StudioTab::Backtest => rsx! { BacktestTab {} },
  };

  rsx! {
    div {
      class: "studio-page",
      h2 { "Studio" },
      div {
        class: "tabs",
        for tab in StudioTab::ALL {
          button {
            class: if tab == active() { "tab tab-active" } else { "tab" },
            onclick: move |_| active.set(tab),
            {tab.label()}
          }
        }
      },
      {panel}
    }
  }
}

use dioxus::prelude::*;
use crate::Route;

#[component]
pub fn Home() -> Element {
  rsx! {
    div {
      class: "home-page",
      section {
        class : "hero",
        h1 { "Trade with strategies built by quants" },
        p { "Browse the strategy marketplace, backtest what you own, and put it to work with trading bots you can watch live." },
        Link {
          class: "cta-button",
          to: Route::Market { },
          "Explore the Market"
        }
      },
      section {
        class: "features",
        div {
          class: "feature-card",
          h3 {
            class: "feature-card-title",
            span {"🛒"}
            "Strategy Marketplace"
          }
          p { "Search and sort published strategies, then buy them with points charged through card checkout." }
        },
        div {
          class: "feature-card",
          h3 {
            class: "feature-card-title",
            span {"📈"}
            "Backtesting"
          }
          p { "Replay an owned strategy over any date range and review return, drawdown and every simulated trade." }
        },
        div {
          class: "feature-card",
          h3 {
            class: "feature-card-title",
            span {"🤖"}
            "Live Trading Bots"
          }
          p { "Connect exchange keys, launch bots in dry-run or live mode and follow market data and executions as they stream in." }
        }
      }
    }
  }
}

#![allow(non_snake_case)]

use std::str::FromStr;
use dioxus::{logger::tracing::{error, info}, prelude::*};
use rust_decimal::Decimal;

use crate::{
  components::{form::{field, flag, FormValues}, monitor::TradingMonitor, toast::{show_toast, Toast}},
  utils::{
    api::ApiClient,
    server::{AppError, BotId, ExchangeApiKey, NewTradingBot, OwnedStrategy, TradingBot},
    status::BotStatus
  }
};

const BOTS_TOAST_ID: &str = "bots-toast";

fn parse_cash(input: &str) -> Result<Decimal, AppError> {
  let cash = Decimal::from_str(input.trim())
    .map_err(|_| AppError::InvalidInput(format!("'{}' is not a valid amount", input.trim())))?;
  if cash.is_sign_negative() {
    return Err(AppError::InvalidInput("cash cannot be negative".to_string()));
  }
  Ok(cash)
}

fn parse_id(input: &str, what: &str) -> Result<i64, AppError> {
  input.parse::<i64>().map_err(|_| AppError::InvalidInput(format!("select a {}", what)))
}

fn new_bot_from(values: &FormValues) -> Result<NewTradingBot, AppError> {
  let name = field(values, "name");
  if name.is_empty() {
    return Err(AppError::InvalidInput("the bot needs a name".to_string()));
  }
  Ok(NewTradingBot {
    name,
    dry_run: flag(values, "dry_run"),
    cash: parse_cash(&field(values, "cash"))?,
    status: BotStatus::from_wire(&field(values, "status")).unwrap_or(BotStatus::Pending),
    exchange_api_key_id: parse_id(&field(values, "exchange_api_key_id"), "exchange API key")?,
    strategy_id: parse_id(&field(values, "strategy_id"), "strategy")?
  })
}

#[derive(Debug, Clone, PartialEq)]
struct BotsData {
  bots: Vec<TradingBot>,
  keys: Vec<ExchangeApiKey>,
  strategies: Vec<OwnedStrategy>
}

impl BotsData {
  fn exchange_of(&self, key_id: i64) -> String {
    self.keys.iter().find(|k| k.id == key_id).map_or_else(|| key_id.to_string(), |k| k.exchange.to_string())
  }

  fn strategy_name(&self, strategy_id: i64) -> String {
    self.strategies.iter().find(|s| s.id == strategy_id).map_or_else(|| strategy_id.to_string(), |s| s.name.clone())
  }
}

#[component]
pub fn TradingBotsTab() -> Element {
  let api = use_context::<ApiClient>();
  let mut data = {
    let api = api.clone();
    use_resource(move || {
      let api = api.clone();
      async move {
        let (bots, keys, strategies) = futures::join!(api.trading_bots(), api.exchange_api_keys(), api.owned_strategies());
        Ok::<_, AppError>(BotsData { bots: bots?, keys: keys?, strategies: strategies? })
      }
    })
  };
  let mut action_error: Signal<Option<String>> = use_signal(|| None);
  let mut toast_msg = use_signal(String::new);
  let mut monitor_open = use_signal(|| false);
  let mut monitored: Signal<Option<BotId>> = use_signal(|| None);

  let mut notify = move |msg: &str| {
    toast_msg.set(msg.to_string());
    show_toast(BOTS_TOAST_ID);
  };

  let on_create = {
    let api = api.clone();
    move |evt: FormEvent| {
      let bot = match new_bot_from(&evt.values()) {
        Ok(bot) => bot,
        Err(e) => {
          action_error.set(Some(e.to_string()));
          return;
        }
      };
      let api = api.clone();
      spawn(async move {
        match api.create_trading_bot(&bot).await {
          Ok(()) => {
            info!("trading bot '{}' created", bot.name);
            action_error.set(None);
            notify("Trading bot created");
            data.restart();
          },
          Err(e) => {
            error!("unable to create trading bot: {}", e);
            action_error.set(Some(e.to_string()));
          }
        }
      });
    }
  };

  let on_delete = move |id: BotId| {
    let api = api.clone();
    spawn(async move {
      match api.delete_trading_bot(id).await {
        Ok(()) => {
          if monitored() == Some(id) {
            monitor_open.set(false);
          }
          notify("Trading bot deleted");
          data.restart();
        },
        Err(e) => action_error.set(Some(e.to_string()))
      }
    });
  };

  let content = match &*data.read() {
    None => rsx! { p { class: "muted", "Loading trading bots..." } },
    Some(Err(e)) => rsx! { p { class: "error-text", "{e}" } },
    Some(Ok(loaded)) => {
      let rows = loaded.bots.iter().map(|bot| {
        let id = bot.id;
        let exchange = loaded.exchange_of(bot.exchange_api_key_id);
        let strategy = loaded.strategy_name(bot.strategy_id);
        let dry_run = if bot.dry_run { "Yes" } else { "No" };
        let mut on_delete = on_delete.clone();
        rsx! {
          tr {
            key: "{id}",
            td { "{bot.name}" },
            td { "{dry_run}" },
            td { "{bot.cash}" },
            td { "{bot.status}" },
            td { "{exchange}" },
            td { "{strategy}" },
            td {
              button {
                class: "button",
                onclick: move |_| {
                  monitored.set(Some(id));
                  monitor_open.set(true);
                },
                "Monitor"
              },
              button {
                class: "button button-danger",
                onclick: move |_| on_delete(id),
                "Delete"
              }
            }
          }
        }
      });

      rsx! {
        if loaded.bots.is_empty() {
          p { "No trading bots registered." }
        } else {
          table {
            class: "data-table",
            thead {
              tr {
                th { "Name" },
                th { "Dry run" },
                th { "Cash" },
                th { "Status" },
                th { "Exchange" },
                th { "Strategy" },
                th { "" },
              }
            }
            tbody { {rows} }
          }
        }
        form {
          class: "inline-form",
          onsubmit: on_create,
          h4 { "New trading bot" },
          input { name: "name", placeholder: "Name" },
          label {
            input { name: "dry_run", r#type: "checkbox", value: "true" },
            "Dry run"
          },
          input { name: "cash", r#type: "number", min: "0", placeholder: "Cash", initial_value: "0" },
          select {
            name: "exchange_api_key_id",
            option { value: "", "Exchange API key" },
            for key in loaded.keys.iter() {
              option { value: "{key.id}", "{key.exchange} - {key.api_key}" }
            }
          },
          select {
            name: "strategy_id",
            option { value: "", "Strategy" },
            for strategy in loaded.strategies.iter() {
              option { value: "{strategy.id}", "{strategy.name}" }
            }
          },
          select {
            name: "status",
            for status in BotStatus::ALL {
              option { value: status.wire_name(), "{status}" }
            }
          },
          button { class: "button button-primary", r#type: "submit", "Add" }
        }
      }
    }
  };

  rsx! {
    section {
      class: "tab-panel",
      h3 { "Trading Bots" },
      {content},
      if let Some(err) = action_error() {
        p { class: "error-text", "{err}" }
      },
      // mounted once a bot was picked so closing runs through the monitor's teardown
      if monitored().is_some() {
        TradingMonitor {
          open: monitor_open(),
          bot_id: monitored(),
          on_close: move |_| monitor_open.set(false)
        }
      }
    }
    Toast { id: BOTS_TOAST_ID.to_string(), message: toast_msg(), success: true }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn test_parse_cash() {
    assert_eq!(parse_cash(" 1500000 "), Ok(dec!(1500000)));
    assert_eq!(parse_cash("0.5"), Ok(dec!(0.5)));
    assert!(parse_cash("-1").is_err());
    assert!(parse_cash("lots").is_err());
  }

  #[test]
  fn test_parse_id_requires_selection() {
    assert_eq!(parse_id("12", "strategy"), Ok(12));
    assert_eq!(parse_id("", "strategy"), Err(AppError::InvalidInput("select a strategy".to_string())));
  }
}

#![allow(non_snake_case)]

use dioxus::{logger::tracing::{error, info}, prelude::*};

use crate::{
  components::form::{field, FormValues},
  utils::{api::ApiClient, backtest::BacktestResult, server::{AppError, BacktestRequest}}
};

const DEFAULT_CASH: &str = "1000000";
const DEFAULT_COMMISSION: &str = "0.0004";

fn backtest_request_from(values: &FormValues) -> Result<BacktestRequest, AppError> {
  let (start_date, end_date, strategy_id) = (field(values, "start_date"), field(values, "end_date"), field(values, "strategy_id"));
  let cash = field(values, "cash");
  if start_date.is_empty() || end_date.is_empty() || strategy_id.is_empty() || cash.is_empty() {
    return Err(AppError::InvalidInput("fill in every field".to_string()));
  }
  if end_date < start_date {
    return Err(AppError::InvalidInput("the end date is before the start date".to_string()));
  }
  let cash = cash.parse::<f64>().map_err(|_| AppError::InvalidInput(format!("'{}' is not a valid amount", cash)))?;
  let commission = field(values, "commission");
  let commission = if commission.is_empty() {
    0.0
  } else {
    commission.parse::<f64>().map_err(|_| AppError::InvalidInput(format!("'{}' is not a valid commission", commission)))?
  };
  Ok(BacktestRequest { start_date, end_date, strategy_id, cash, commission })
}

#[component]
pub fn BacktestTab() -> Element {
  let api = use_context::<ApiClient>();
  let strategies = {
    let api = api.clone();
    use_resource(move || {
      let api = api.clone();
      async move { api.owned_strategies().await }
    })
  };
  let mut result: Signal<Option<BacktestResult>> = use_signal(|| None);
  let mut run_error: Signal<Option<String>> = use_signal(|| None);
  let mut running = use_signal(|| false);

  let on_run = move |evt: FormEvent| {
    let request = match backtest_request_from(&evt.values()) {
      Ok(request) => request,
      Err(e) => {
        run_error.set(Some(e.to_string()));
        return;
      }
    };
    let api = api.clone();
    running.set(true);
    run_error.set(None);
    spawn(async move {
      match api.run_backtest(&request).await {
        Ok(outcome) => {
          info!("backtest of strategy {} finished with {} trades", outcome.strategy_id, outcome.total_trades);
          result.set(Some(outcome));
        },
        Err(e) => {
          error!("backtest failed: {}", e);
          run_error.set(Some(e.to_string()));
        }
      }
      running.set(false);
    });
  };

  let strategy_options = match &*strategies.read() {
    Some(Ok(list)) => list.iter().map(|s| (s.id.to_string(), s.name.clone())).collect::<Vec<_>>(),
    _ => Vec::new()
  };

  rsx! {
    section {
      class: "tab-panel",
      h3 { "Backtesting" },
      form {
        class: "inline-form",
        onsubmit: on_run,
        label { "Start", input { name: "start_date", r#type: "date" } },
        label { "End", input { name: "end_date", r#type: "date" } },
        select {
          name: "strategy_id",
          option { value: "", "Strategy" },
          for (id, name) in strategy_options {
            option { value: "{id}", "{name}" }
          }
        },
        label { "Cash", input { name: "cash", r#type: "number", min: "0", initial_value: DEFAULT_CASH } },
        label { "Commission", input { name: "commission", r#type: "number", step: "0.0001", initial_value: DEFAULT_COMMISSION } },
        button {
          class: "button button-primary",
          r#type: "submit",
          disabled: running(),
          if running() { "Running..." } else { "Run backtest" }
        }
      },
      if let Some(err) = run_error() {
        p { class: "error-text", "{err}" }
      },
      if let Some(outcome) = result() {
        BacktestReport { outcome }
      }
    }
  }
}

#[component]
fn BacktestReport(outcome: BacktestResult) -> Element {
  let metrics = outcome.metrics();
  let curve = outcome.equity_curve();
  let trades = outcome.trade_list();

  rsx! {
    div {
      class: "backtest-report",
      h4 { "{outcome.strategy_name} ({outcome.start_date} ~ {outcome.end_date})" },
      div {
        class: "metric-grid",
        for metric in metrics {
          div {
            class: if metric.favorable { "metric-card favorable" } else { "metric-card unfavorable" },
            span { class: "metric-label", "{metric.label}" },
            span { class: "metric-value", "{metric.value}" }
          }
        }
      },
      h4 { "Trades" },
      if trades.is_empty() {
        p { class: "muted", "No trades to show." }
      } else {
        table {
          class: "data-table",
          thead {
            tr { th { "Entry" }, th { "Size" }, th { "Entry price" }, th { "Exit price" }, th { "PnL" }, th { "Return" } }
          }
          tbody {
            for (idx, t) in trades.iter().enumerate() {
              tr {
                key: "trade-row{idx}",
                class: if t.is_profit() { "profit" } else { "loss" },
                td { "{t.date}" },
                td { "{t.size}" },
                td { "{t.entry_price:.2}" },
                td { "{t.exit_price:.2}" },
                td { "{t.pnl:.2}" },
                td { {format!("{:.2}%", t.return_pct * 100.0)} }
              }
            }
          }
        }
      },
      h4 { "Equity curve" },
      if curve.is_empty() {
        p { class: "muted", "No equity data to show." }
      } else {
        table {
          class: "data-table",
          thead {
            tr { th { "Date" }, th { "Equity" }, th { "Drawdown" } }
          }
          tbody {
            for (idx, point) in curve.iter().enumerate() {
              tr {
                key: "equity-row{idx}",
                td { "{point.date}" },
                td { "{point.equity:.0}" },
                td { "{point.drawdown:.2}%" }
              }
            }
          }
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn values(pairs: &[(&str, &str)]) -> FormValues {
    pairs.iter().map(|(k, v)| (k.to_string(), FormValue(vec![v.to_string()]))).collect()
  }

  #[test]
  fn test_request_from_complete_form() {
    let form = values(&[
      ("start_date", "2024-01-01"), ("end_date", "2024-03-01"), ("strategy_id", "7"),
      ("cash", DEFAULT_CASH), ("commission", DEFAULT_COMMISSION)
    ]);
    let request = backtest_request_from(&form).expect("complete form should build a request");
    assert_eq!(request.strategy_id, "7");
    assert_eq!(request.cash, 1_000_000.0);
    assert_eq!(request.commission, 0.0004);
  }

  #[test]
  fn test_request_rejects_missing_or_reversed_dates() {
    let missing = values(&[("start_date", "2024-01-01"), ("strategy_id", "7"), ("cash", "100")]);
    assert!(backtest_request_from(&missing).is_err());

    let reversed = values(&[("start_date", "2024-03-01"), ("end_date", "2024-01-01"), ("strategy_id", "7"), ("cash", "100")]);
    assert!(backtest_request_from(&reversed).is_err());
  }
}

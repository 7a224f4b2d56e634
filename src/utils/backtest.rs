use dioxus::logger::tracing::warn;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BacktestResult {
  #[serde(default)]
  pub id: Option<i64>,
  pub strategy_id: String,
  #[serde(default)]
  pub strategy_name: String,
  pub start_date: String,
  pub end_date: String,
  pub initial_capital: f64,
  pub final_equity: f64,
  pub total_return: f64,
  pub max_drawdown: f64,
  pub win_rate: f64,
  pub profit_factor: f64,
  pub total_trades: i64,
  // JSON-encoded series as produced by the backtest engine
  #[serde(default)]
  pub trades: String,
  #[serde(default)]
  pub equity_curve: String
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
struct RawEquityPoint {
  equity: f64,
  drawdown_pct: f64,
  drawdown_duration: String
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
struct RawTrade {
  #[serde(rename = "Size")]
  size: f64,
  #[serde(rename = "EntryPrice")]
  entry_price: f64,
  #[serde(rename = "ExitPrice")]
  exit_price: f64,
  #[serde(rename = "PnL")]
  pnl: f64,
  #[serde(rename = "ReturnPct")]
  return_pct: f64,
  #[serde(rename = "EntryTime")]
  entry_time: String,
  #[serde(rename = "ExitTime", default)]
  exit_time: String
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
  pub date: String,
  pub equity: f64,
  /// Percent, already scaled from the engine's fraction.
  pub drawdown: f64
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeSummary {
  pub date: String,
  pub size: f64,
  pub entry_price: f64,
  pub exit_price: f64,
  pub pnl: f64,
  pub return_pct: f64,
  pub exit_time: String
}

impl TradeSummary {
  pub fn is_profit(&self) -> bool {
    self.pnl >= 0.0
  }
}

/// Headline figure of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
  pub label: &'static str,
  pub value: String,
  pub favorable: bool
}

fn date_part(timestamp: &str) -> &str {
  timestamp.split(|c| c == ' ' || c == 'T').next().unwrap_or(timestamp)
}

impl BacktestResult {
  pub fn metrics(&self) -> Vec<Metric> {
    vec![
      Metric { label: "Total return", value: format!("{:.2}%", self.total_return), favorable: self.total_return >= 0.0 },
      Metric { label: "Win rate", value: format!("{:.2}%", self.win_rate), favorable: true },
      Metric { label: "Max drawdown", value: format!("{:.2}%", self.max_drawdown), favorable: false },
      Metric { label: "Profit factor", value: format!("{:.2}", self.profit_factor), favorable: true },
      Metric { label: "Total trades", value: self.total_trades.to_string(), favorable: true },
      Metric { label: "Final equity", value: format!("₩{:.0}", self.final_equity), favorable: self.final_equity >= self.initial_capital },
    ]
  }

  /// Equity series; malformed payloads yield an empty series.
  pub fn equity_curve(&self) -> Vec<EquityPoint> {
    let raw: Vec<RawEquityPoint> = match serde_json::from_str(&self.equity_curve) {
      Ok(raw) => raw,
      Err(e) => {
        warn!("unable to parse equity curve of backtest {:?}: {}", self.id, e);
        return Vec::new();
      }
    };

    raw.into_iter().map(|point| {
      // the first point carries NaT instead of a duration
      let date = if point.drawdown_duration == "NaT" {
        self.start_date.clone()
      } else {
        date_part(&point.drawdown_duration).to_string()
      };
      EquityPoint { date, equity: point.equity, drawdown: point.drawdown_pct * 100.0 }
    }).collect()
  }

  pub fn trade_list(&self) -> Vec<TradeSummary> {
    let raw: Vec<RawTrade> = match serde_json::from_str(&self.trades) {
      Ok(raw) => raw,
      Err(e) => {
        warn!("unable to parse trades of backtest {:?}: {}", self.id, e);
        return Vec::new();
      }
    };

    raw.into_iter().map(|trade| TradeSummary {
      date: date_part(&trade.entry_time).to_string(),
      size: trade.size,
      entry_price: trade.entry_price,
      exit_price: trade.exit_price,
      pnl: trade.pnl,
      return_pct: trade.return_pct,
      exit_time: trade.exit_time
    }).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn result(trades: &str, equity_curve: &str) -> BacktestResult {
    BacktestResult {
      id: Some(1),
      strategy_id: "3".to_string(),
      strategy_name: "sma cross".to_string(),
      start_date: "2024-01-01".to_string(),
      end_date: "2024-03-01".to_string(),
      initial_capital: 1_000_000.0,
      final_equity: 1_100_000.0,
      total_return: 10.0,
      max_drawdown: -4.5,
      win_rate: 55.0,
      profit_factor: 1.4,
      total_trades: 2,
      trades: trades.to_string(),
      equity_curve: equity_curve.to_string()
    }
  }

  #[test]
  fn test_equity_curve_parsing() {
    let curve = r#"[
      {"Equity":1000000.0,"DrawdownPct":0.0,"DrawdownDuration":"NaT"},
      {"Equity":990000.0,"DrawdownPct":0.01,"DrawdownDuration":"2024-01-05 00:00:00"}
    ]"#;
    let points = result("[]", curve).equity_curve();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].date, "2024-01-01");
    assert_eq!(points[1].date, "2024-01-05");
    assert!((points[1].drawdown - 1.0).abs() < 1e-9);
  }

  #[test]
  fn test_trades_parsing() {
    let trades = r#"[{"Size":0.5,"EntryBar":1,"ExitBar":4,"EntryPrice":42000.0,"ExitPrice":41000.0,"PnL":-500.0,
      "ReturnPct":-0.023,"EntryTime":"2024-01-02T09:00:00","ExitTime":"2024-01-05T09:00:00","Duration":"3 days"}]"#;
    let list = result(trades, "[]").trade_list();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].date, "2024-01-02");
    assert!(!list[0].is_profit());
  }

  #[test]
  fn test_metrics() {
    let metrics = result("[]", "[]").metrics();
    assert_eq!(metrics[0].value, "10.00%");
    assert!(metrics[0].favorable);
    assert_eq!(metrics[5].value, "₩1100000");
    assert!(metrics[5].favorable);
  }

  #[test]
  fn test_malformed_series_fall_back_to_empty() {
    let broken = result("not json", "{\"Equity\":1}");
    assert!(broken.trade_list().is_empty());
    assert!(broken.equity_curve().is_empty());
    assert!(result("", "").trade_list().is_empty());
  }

  #[test]
  fn test_result_deserialization() {
    let raw = r#"{"id":4,"strategyId":"3","strategyName":"sma","startDate":"2024-01-01","endDate":"2024-02-01",
      "initialCapital":1000000,"finalEquity":1050000.5,"totalReturn":5.0,"maxDrawdown":-2.1,"winRate":60.0,
      "profitFactor":1.8,"totalTrades":12,"trades":"[]","equityCurve":"[]"}"#;
    let parsed: BacktestResult = serde_json::from_str(raw).expect("result should deserialize");
    assert_eq!(parsed.total_trades, 12);
    assert!(parsed.trade_list().is_empty());
  }
}

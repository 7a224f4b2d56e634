use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::status::{BotStatus, Exchange, OrderStatus, PaymentStatus, PointStatus};

pub type BotId = i64;

/* Server Requests */
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthLoginRequest {
  pub code: String,
  pub redirect_uri: String
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeRequest {
  pub payment_key: String,
  pub order_id: String,
  pub amount: u64
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewExchangeApiKey {
  pub exchange: Exchange,
  pub api_key: String,
  pub secret_key: String
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewTradingBot {
  pub name: String,
  pub dry_run: bool,
  #[serde(with = "rust_decimal::serde::float")]
  pub cash: Decimal,
  pub status: BotStatus,
  pub exchange_api_key_id: i64,
  pub strategy_id: i64
}

impl Default for NewTradingBot {
  fn default() -> Self {
    Self {
      name: String::new(),
      dry_run: false,
      cash: Decimal::ZERO,
      status: BotStatus::Pending,
      exchange_api_key_id: 0,
      strategy_id: 0
    }
  }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BacktestRequest {
  pub start_date: String,
  pub end_date: String,
  pub strategy_id: String,
  pub cash: f64,
  pub commission: f64
}

/* Server Responses */
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
  pub access_token: String,
  pub refresh_token: String
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
  #[serde(default)]
  pub id: Option<i64>,
  pub nickname: String,
  pub email: String,
  pub oauth_provider: String,
  #[serde(default)]
  pub point: i64
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PointTransaction {
  pub id: i64,
  pub user_id: i64,
  pub point: i64,
  pub status: PointStatus,
  pub created_at: String,
  pub updated_at: String
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointTxnsResponse {
  #[serde(default)]
  pub point_txns: Vec<PointTransaction>
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTransaction {
  pub id: i64,
  pub user_id: i64,
  pub amount: Decimal,
  pub status: PaymentStatus,
  pub created_at: String,
  pub updated_at: String
}

impl PaymentTransaction {
  /// Signed amount as shown in the payment history.
  pub fn signed_amount(&self) -> String {
    if self.status.is_credit() {
      format!("+{} KRW", self.amount)
    } else {
      format!("-{} KRW", self.amount)
    }
  }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTxnsResponse {
  #[serde(default)]
  pub payment_txns: Vec<PaymentTransaction>
}

/// A strategy listed on the marketplace.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketStrategy {
  pub id: i64,
  pub name: String,
  pub description: String,
  pub price: i64,
  #[serde(default)]
  pub path: Option<String>
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StrategiesResponse {
  pub total_strategy_count: i64,
  pub total_page: u32,
  pub strategies: Vec<MarketStrategy>
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StrategyItem {
  pub id: i64,
  pub name: String,
  pub description: String,
  pub price: i64
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderedItemRef {
  pub id: i64,
  pub name: String
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
  pub id: i64,
  pub strategy_item: OrderedItemRef
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: i64,
  pub status: OrderStatus,
  pub total_price: i64,
  #[serde(default)]
  pub order_item: Option<OrderItem>,
  pub created_at: String,
  #[serde(default)]
  pub canceled_at: Option<String>
}

/// A strategy owned by the current user, usable by trading bots and backtests.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OwnedStrategy {
  pub id: i64,
  pub name: String,
  pub description: String,
  pub leverage: f64,
  pub exclusive_orders: bool,
  pub hedge_mode: bool,
  pub timeframe: String,
  pub symbol: String,
  pub exchange: String
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserStrategyResponse {
  #[serde(default)]
  pub strategies: Vec<OwnedStrategy>
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeApiKey {
  pub id: i64,
  pub exchange: Exchange,
  pub api_key: String,
  pub secret_key: String,
  #[serde(default)]
  pub user_id: Option<i64>
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TradingBot {
  pub id: BotId,
  pub name: String,
  pub dry_run: bool,
  pub cash: Decimal,
  pub status: BotStatus,
  pub user_id: i64,
  pub exchange_api_key_id: i64,
  pub strategy_id: i64,
  #[serde(default)]
  pub version: i64
}

// App Errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
  #[error("Login required: no access token available")]
  MissingCredential,
  #[error("Stream connection error: {0}")]
  StreamConnectionError(String),
  #[error("No data received for {0} seconds")]
  HeartbeatTimeout(u64),
  #[error("Reqwest error: {0}")]
  ReqwestError(String),
  #[error("Request failed with status {status}: {message}")]
  RequestFailed { status: u16, message: String },
  #[error("Unauthorized: {0}")]
  Unauthorized(String),
  #[error("Serialize error: {0}")]
  SerializeError(String),
  #[error("Deserialize error: {0}")]
  DeserializeError(String),
  #[error("Storage error: {0}")]
  StorageError(String),
  #[error("Invalid input: {0}")]
  InvalidInput(String),
  #[error("Wasm error: {0}")]
  WasmError(String),
}

impl From<reqwest::Error> for AppError {
  fn from(err: reqwest::Error) -> Self {
    if err.is_decode() {
      AppError::DeserializeError(err.to_string())
    } else {
      AppError::ReqwestError(err.to_string())
    }
  }
}

impl From<serde_json::Error> for AppError {
  fn from(err: serde_json::Error) -> Self {
    AppError::DeserializeError(err.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn test_trading_bot_deserialization() {
    let raw = r#"{"id":7,"name":"grid","dryRun":true,"cash":1500000,"status":"RUNNING","userId":3,"exchangeApiKeyId":2,"strategyId":11,"version":4}"#;
    let bot: TradingBot = serde_json::from_str(raw).expect("bot should deserialize");
    assert_eq!(bot.id, 7);
    assert!(bot.dry_run);
    assert_eq!(bot.cash, dec!(1500000));
    assert_eq!(bot.status, BotStatus::Running);
  }

  #[test]
  fn test_new_bot_serializes_camel_case() {
    let bot = NewTradingBot { name: "alpha".to_string(), exchange_api_key_id: 2, strategy_id: 5, ..NewTradingBot::default() };
    let json = serde_json::to_string(&bot).expect("bot should serialize");
    assert!(json.contains("\"exchangeApiKeyId\":2"));
    assert!(json.contains("\"dryRun\":false"));
    assert!(json.contains("\"status\":\"PENDING\""));
  }

  #[test]
  fn test_payment_amount_sign_follows_status() {
    let raw = r#"{"paymentTxns":[
      {"id":1,"userId":1,"amount":"5000.00","status":"DONE","createdAt":"2024-05-01T10:00:00","updatedAt":"2024-05-01T10:00:00"},
      {"id":2,"userId":1,"amount":"10000","status":"CANCELED","createdAt":"2024-05-02T10:00:00","updatedAt":"2024-05-02T10:00:00"}
    ]}"#;
    let resp: PaymentTxnsResponse = serde_json::from_str(raw).expect("payment txns should deserialize");
    assert_eq!(resp.payment_txns[0].signed_amount(), "+5000.00 KRW");
    assert_eq!(resp.payment_txns[1].signed_amount(), "-10000 KRW");
  }

  #[test]
  fn test_order_without_item_or_cancel_time() {
    let raw = r#"{"id":9,"status":"ORDERED","totalPrice":300,"createdAt":"2024-05-01T10:00:00"}"#;
    let order: Order = serde_json::from_str(raw).expect("order should deserialize");
    assert_eq!(order.status, OrderStatus::Ordered);
    assert!(order.order_item.is_none());
    assert!(order.canceled_at.is_none());
  }

  #[test]
  fn test_error_display() {
    let err = AppError::RequestFailed { status: 500, message: "boom".to_string() };
    assert_eq!(err.to_string(), "Request failed with status 500: boom");
    assert_eq!(AppError::HeartbeatTimeout(120).to_string(), "No data received for 120 seconds");
  }
}

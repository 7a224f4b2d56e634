//! Bearer-authenticated JSON calls against the trading backend.

use dioxus::logger::tracing::{info, warn};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use super::{
  backtest::BacktestResult,
  config::OAuthProvider,
  server::{
    AppError, BacktestRequest, BotId, ChargeRequest, ExchangeApiKey, MarketStrategy, NewExchangeApiKey, NewTradingBot,
    OAuthLoginRequest, Order, OwnedStrategy, PaymentTransaction, PaymentTxnsResponse, PointTransaction, PointTxnsResponse,
    StrategiesResponse, StrategyItem, TokenPair, TradingBot, UserInfo, UserStrategyResponse
  },
  session::Session,
  status::SortOption
};

pub const PAGE_SIZE: u32 = 10;

/// One page of the marketplace listing. Pages start at 1.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyQuery {
  pub page: u32,
  pub size: u32,
  pub sort: SortOption,
  pub keyword: Option<String>
}

impl Default for StrategyQuery {
  fn default() -> Self {
    Self { page: 1, size: PAGE_SIZE, sort: SortOption::Default, keyword: None }
  }
}

impl StrategyQuery {
  fn keyword(&self) -> Option<&str> {
    self.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty())
  }

  pub fn url(&self, base: &str) -> Result<Url, AppError> {
    let path = if self.keyword().is_some() { "/api/strategies/search" } else { "/api/strategies/paging" };
    let mut params = vec![
      ("page", self.page.max(1).to_string()),
      ("size", self.size.to_string()),
      ("sortOption", self.sort.as_query().to_string()),
    ];
    if let Some(keyword) = self.keyword() {
      params.push(("keyword", keyword.to_string()));
    }
    Url::parse_with_params(&format!("{}{}", base.trim_end_matches('/'), path), params)
      .map_err(|e| AppError::InvalidInput(e.to_string()))
  }
}

#[derive(Clone)]
pub struct ApiClient {
  client: reqwest::Client,
  base_url: String,
  session: Session
}

impl ApiClient {
  pub fn new(base_url: &str, session: Session) -> Self {
    Self { client: reqwest::Client::new(), base_url: base_url.trim_end_matches('/').to_string(), session }
  }

  pub fn session(&self) -> &Session {
    &self.session
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  pub fn http(&self) -> &reqwest::Client {
    &self.client
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }

  fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, AppError> {
    let token = self.session.access_token().ok_or(AppError::MissingCredential)?;
    Ok(self.client.request(method, self.url(path)).bearer_auth(token))
  }

  async fn check(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
      return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    warn!("request failed with {}: {}", status, message);
    if status == StatusCode::UNAUTHORIZED {
      Err(AppError::Unauthorized(message))
    } else {
      Err(AppError::RequestFailed { status: status.as_u16(), message })
    }
  }

  async fn fetch<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, AppError> {
    let response = Self::check(request.send().await?).await?;
    Ok(response.json::<T>().await?)
  }

  async fn execute(request: RequestBuilder) -> Result<(), AppError> {
    Self::check(request.send().await?).await?;
    Ok(())
  }

  /* Auth */
  pub async fn exchange_oauth_code(&self, provider: OAuthProvider, code: &str, redirect_uri: &str) -> Result<TokenPair, AppError> {
    let body = OAuthLoginRequest { code: code.to_string(), redirect_uri: redirect_uri.to_string() };
    let request = self.client.post(self.url(&format!("/api/login/oauth/{}", provider))).json(&body);
    let tokens: TokenPair = Self::fetch(request).await?;
    self.session.store_tokens(&tokens)?;
    info!("signed in with {}", provider.label());
    Ok(tokens)
  }

  /// Invalidates the server session; local credentials are dropped either way.
  pub async fn logout(&self) -> Result<(), AppError> {
    let outcome = match self.authorized(Method::DELETE, "/api/logout") {
      Ok(request) => Self::execute(request).await,
      Err(e) => Err(e)
    };
    self.session.clear()?;
    outcome
  }

  pub async fn user_info(&self) -> Result<UserInfo, AppError> {
    Self::fetch(self.authorized(Method::GET, "/api/users")?).await
  }

  /* Points and payments */
  pub async fn point_transactions(&self) -> Result<Vec<PointTransaction>, AppError> {
    let resp: PointTxnsResponse = Self::fetch(self.authorized(Method::GET, "/api/points/txns")?).await?;
    Ok(resp.point_txns)
  }

  pub async fn payment_transactions(&self) -> Result<Vec<PaymentTransaction>, AppError> {
    let resp: PaymentTxnsResponse = Self::fetch(self.authorized(Method::GET, "/api/payment/txns")?).await?;
    Ok(resp.payment_txns)
  }

  pub async fn confirm_charge(&self, charge: &ChargeRequest) -> Result<(), AppError> {
    Self::execute(self.authorized(Method::POST, "/api/points/charge")?.json(charge)).await
  }

  /* Marketplace */
  pub async fn strategies(&self, query: &StrategyQuery) -> Result<StrategiesResponse, AppError> {
    let token = self.session.access_token().ok_or(AppError::MissingCredential)?;
    Self::fetch(self.client.get(query.url(&self.base_url)?).bearer_auth(token)).await
  }

  pub async fn strategy(&self, id: i64) -> Result<MarketStrategy, AppError> {
    Self::fetch(self.authorized(Method::GET, &format!("/api/strategies/{}", id))?).await
  }

  pub async fn buy_strategy(&self, id: i64) -> Result<(), AppError> {
    Self::execute(self.authorized(Method::POST, &format!("/api/strategies/{}/buy", id))?).await
  }

  pub async fn strategy_item(&self, id: i64) -> Result<StrategyItem, AppError> {
    Self::fetch(self.authorized(Method::GET, &format!("/api/strategy-items/{}", id))?).await
  }

  pub async fn order_strategy_item(&self, id: i64) -> Result<Order, AppError> {
    Self::fetch(self.authorized(Method::POST, &format!("/api/orders/strategy-items/{}", id))?).await
  }

  pub async fn orders(&self) -> Result<Vec<Order>, AppError> {
    Self::fetch(self.authorized(Method::GET, "/api/orders")?).await
  }

  pub async fn owned_strategies(&self) -> Result<Vec<OwnedStrategy>, AppError> {
    let resp: UserStrategyResponse = Self::fetch(self.authorized(Method::GET, "/api/users/strategies")?).await?;
    Ok(resp.strategies)
  }

  /* Exchange keys */
  pub async fn exchange_api_keys(&self) -> Result<Vec<ExchangeApiKey>, AppError> {
    Self::fetch(self.authorized(Method::GET, "/api/exchange-api-keys/list")?).await
  }

  pub async fn create_exchange_api_key(&self, key: &NewExchangeApiKey) -> Result<(), AppError> {
    Self::execute(self.authorized(Method::POST, "/api/exchange-api-keys")?.json(key)).await
  }

  pub async fn update_exchange_api_key(&self, key: &ExchangeApiKey) -> Result<(), AppError> {
    Self::execute(self.authorized(Method::PATCH, &format!("/api/exchange-api-keys/{}", key.id))?.json(key)).await
  }

  pub async fn delete_exchange_api_key(&self, id: i64) -> Result<(), AppError> {
    Self::execute(self.authorized(Method::DELETE, &format!("/api/exchange-api-keys/{}", id))?).await
  }

  /* Trading bots */
  pub async fn trading_bots(&self) -> Result<Vec<TradingBot>, AppError> {
    Self::fetch(self.authorized(Method::GET, "/api/users/trading-bots")?).await
  }

  pub async fn create_trading_bot(&self, bot: &NewTradingBot) -> Result<(), AppError> {
    Self::execute(self.authorized(Method::POST, "/api/trading-bots")?.json(bot)).await
  }

  pub async fn delete_trading_bot(&self, id: BotId) -> Result<(), AppError> {
    Self::execute(self.authorized(Method::DELETE, &format!("/api/trading-bots/{}", id))?).await
  }

  /* Backtesting */
  pub async fn run_backtest(&self, request: &BacktestRequest) -> Result<BacktestResult, AppError> {
    Self::fetch(self.authorized(Method::POST, "/api/backtestings/run")?.json(request)).await
  }
}

#[cfg(test)]
mod tests {
  use futures::executor::block_on;
  use super::*;

  fn params(url: &Url) -> Vec<(String, String)> {
    url.query_pairs().into_owned().collect()
  }

  #[test]
  fn test_paging_url() {
    let url = StrategyQuery::default().url("http://localhost:8080/").expect("valid url");
    assert_eq!(url.path(), "/api/strategies/paging");
    assert_eq!(params(&url), vec![
      ("page".to_string(), "1".to_string()),
      ("size".to_string(), "10".to_string()),
      ("sortOption".to_string(), "DEFAULT".to_string()),
    ]);
  }

  #[test]
  fn test_search_url_carries_keyword() {
    let query = StrategyQuery { page: 3, sort: SortOption::PriceAsc, keyword: Some(" grid bot ".to_string()), ..StrategyQuery::default() };
    let url = query.url("http://localhost:8080").expect("valid url");
    assert_eq!(url.path(), "/api/strategies/search");
    assert!(params(&url).contains(&("keyword".to_string(), "grid bot".to_string())));
    assert!(params(&url).contains(&("sortOption".to_string(), "PRICE_ASC".to_string())));
  }

  #[test]
  fn test_blank_keyword_falls_back_to_paging() {
    let query = StrategyQuery { keyword: Some("   ".to_string()), ..StrategyQuery::default() };
    assert_eq!(query.url("http://localhost:8080").expect("valid url").path(), "/api/strategies/paging");
  }

  #[test]
  fn test_missing_credential_fails_before_request() {
    // nothing listens on this port; the credential check must short-circuit first
    let api = ApiClient::new("http://127.0.0.1:9", Session::in_memory());
    assert_eq!(block_on(api.trading_bots()), Err(AppError::MissingCredential));
    assert_eq!(block_on(api.user_info()), Err(AppError::MissingCredential));
    assert_eq!(block_on(api.strategies(&StrategyQuery::default())), Err(AppError::MissingCredential));
  }
}

use std::{collections::HashMap, fmt, str::FromStr};
use reqwest::Url;
use web_sys::window;

use super::server::AppError;

pub const BACKEND_URL: &str = env!("BACKEND_URL");
pub const KAKAO_CLIENT_ID: &str = env!("KAKAO_CLIENT_ID");
pub const KAKAO_AUTH_SERVER_URL: &str = env!("KAKAO_AUTH_SERVER_URL");
pub const GOOGLE_CLIENT_ID: &str = env!("GOOGLE_CLIENT_ID");
pub const TOSS_CLIENT_KEY: &str = env!("TOSS_CLIENT_KEY");

const GOOGLE_AUTH_SERVER_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_SCOPES: [&str; 2] = [
  "https://www.googleapis.com/auth/userinfo.profile",
  "https://www.googleapis.com/auth/userinfo.email",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
  Kakao,
  Google
}

impl OAuthProvider {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Kakao => "kakao",
      Self::Google => "google",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Self::Kakao => "Kakao",
      Self::Google => "Google",
    }
  }

  pub fn redirect_uri(&self, origin: &str) -> String {
    format!("{}/oauth/callback/{}", origin.trim_end_matches('/'), self.as_str())
  }

  /// Provider consent page that sends the user back to `/oauth/callback/{provider}`.
  pub fn authorize_url(&self, origin: &str) -> Result<String, AppError> {
    let redirect_uri = self.redirect_uri(origin);
    let url = match self {
      Self::Kakao => {
        let base = format!("{}/oauth/authorize", KAKAO_AUTH_SERVER_URL.trim_end_matches('/'));
        Url::parse_with_params(&base, [
          ("response_type", "code"),
          ("client_id", KAKAO_CLIENT_ID),
          ("redirect_uri", redirect_uri.as_str()),
        ])
      },
      Self::Google => {
        let scope = GOOGLE_SCOPES.join(" ");
        Url::parse_with_params(GOOGLE_AUTH_SERVER_URL, [
          ("client_id", GOOGLE_CLIENT_ID),
          ("redirect_uri", redirect_uri.as_str()),
          ("response_type", "code"),
          ("scope", scope.as_str()),
        ])
      }
    };
    url.map(String::from).map_err(|e| AppError::InvalidInput(e.to_string()))
  }
}

impl fmt::Display for OAuthProvider {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for OAuthProvider {
  type Err = AppError;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "kakao" => Ok(Self::Kakao),
      "google" => Ok(Self::Google),
      other => Err(AppError::InvalidInput(format!("unsupported oauth provider: {}", other)))
    }
  }
}

pub fn payment_success_url(origin: &str) -> String {
  format!("{}/toss-payment-success", origin.trim_end_matches('/'))
}

pub fn payment_fail_url(origin: &str) -> String {
  format!("{}/toss-payment-fail", origin.trim_end_matches('/'))
}

pub fn window_origin() -> Result<String, AppError> {
  let window = window().ok_or_else(|| AppError::WasmError("global window should exist".to_string()))?;
  window.location().origin().map_err(|e| AppError::WasmError(format!("{:?}", e)))
}

fn window_href() -> Result<String, AppError> {
  let window = window().ok_or_else(|| AppError::WasmError("global window should exist".to_string()))?;
  window.location().href().map_err(|e| AppError::WasmError(format!("{:?}", e)))
}

pub fn navigate_external(url: &str) -> Result<(), AppError> {
  let window = window().ok_or_else(|| AppError::WasmError("global window should exist".to_string()))?;
  window.location().set_href(url).map_err(|e| AppError::WasmError(format!("{:?}", e)))
}

/// Decoded query parameters of `href`; later duplicates win.
pub fn query_params(href: &str) -> Result<HashMap<String, String>, AppError> {
  let url = Url::parse(href).map_err(|e| AppError::InvalidInput(e.to_string()))?;
  Ok(url.query_pairs().into_owned().collect())
}

pub fn current_query() -> Result<HashMap<String, String>, AppError> {
  query_params(&window_href()?)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_provider_parse() {
    assert_eq!("kakao".parse::<OAuthProvider>(), Ok(OAuthProvider::Kakao));
    assert_eq!("google".parse::<OAuthProvider>(), Ok(OAuthProvider::Google));
    assert!("github".parse::<OAuthProvider>().is_err());
  }

  #[test]
  fn test_redirect_uri() {
    assert_eq!(OAuthProvider::Kakao.redirect_uri("https://app.example.com/"), "https://app.example.com/oauth/callback/kakao");
  }

  #[test]
  fn test_google_authorize_url() {
    let url = OAuthProvider::Google.authorize_url("https://app.example.com").expect("valid url");
    assert!(url.starts_with(GOOGLE_AUTH_SERVER_URL));
    let params = query_params(&url).expect("parsable");
    assert_eq!(params.get("response_type").map(String::as_str), Some("code"));
    assert_eq!(params.get("redirect_uri").map(String::as_str), Some("https://app.example.com/oauth/callback/google"));
    assert_eq!(params.get("scope").map(String::as_str), Some(GOOGLE_SCOPES.join(" ").as_str()));
  }

  #[test]
  fn test_kakao_authorize_url() {
    let url = OAuthProvider::Kakao.authorize_url("https://app.example.com").expect("valid url");
    let parsed = Url::parse(&url).expect("parsable");
    assert_eq!(parsed.path(), "/oauth/authorize");
    let params = query_params(&url).expect("parsable");
    assert_eq!(params.get("redirect_uri").map(String::as_str), Some("https://app.example.com/oauth/callback/kakao"));
  }

  #[test]
  fn test_query_params() {
    let params = query_params("https://app.example.com/toss-payment-success?paymentKey=pk_1&orderId=POINT-CHARGE-1&amount=5000").expect("parsable");
    assert_eq!(params.get("paymentKey").map(String::as_str), Some("pk_1"));
    assert_eq!(params.get("amount").map(String::as_str), Some("5000"));
    assert!(query_params("not a url").is_err());
  }

  #[test]
  fn test_payment_urls() {
    assert_eq!(payment_success_url("https://app.example.com"), "https://app.example.com/toss-payment-success");
    assert_eq!(payment_fail_url("https://app.example.com/"), "https://app.example.com/toss-payment-fail");
  }
}

use serde::Serialize;
use uuid::Uuid;

use super::{config::{payment_fail_url, payment_success_url}, server::AppError};

pub const MIN_CHARGE_AMOUNT: u64 = 5_000;
pub const CHARGE_STEPS: [u64; 3] = [5_000, 10_000, 50_000];
pub const TOSS_SCRIPT_URL: &str = "https://js.tosspayments.com/v1/payment";
const ORDER_NAME: &str = "포인트 충전";
const PAYMENT_METHOD: &str = "카드";

pub fn charge_order_id() -> String {
  format!("POINT-CHARGE-{}", Uuid::new_v4())
}

/// Digits only; an empty field reads as zero.
pub fn parse_charge_input(input: &str) -> Result<u64, AppError> {
  let input = input.trim();
  if input.is_empty() {
    return Ok(0);
  }
  if !input.bytes().all(|b| b.is_ascii_digit()) {
    return Err(AppError::InvalidInput("charge amount must be a whole number".to_string()));
  }
  input.parse().map_err(|_| AppError::InvalidInput("charge amount is too large".to_string()))
}

pub fn validate_charge_amount(amount: u64) -> Result<u64, AppError> {
  if amount < MIN_CHARGE_AMOUNT {
    return Err(AppError::InvalidInput(format!("the minimum charge is {} KRW", MIN_CHARGE_AMOUNT)));
  }
  Ok(amount)
}

/// Options handed to the hosted checkout widget.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
  pub amount: u64,
  pub order_id: String,
  pub order_name: String,
  pub customer_name: String,
  pub success_url: String,
  pub fail_url: String
}

impl CheckoutRequest {
  pub fn new(amount: u64, nickname: Option<&str>, origin: &str) -> Result<Self, AppError> {
    Ok(Self {
      amount: validate_charge_amount(amount)?,
      order_id: charge_order_id(),
      order_name: ORDER_NAME.to_string(),
      customer_name: nickname.filter(|n| !n.is_empty()).unwrap_or("사용자").to_string(),
      success_url: payment_success_url(origin),
      fail_url: payment_fail_url(origin)
    })
  }

  /// Script that loads the widget on demand and opens the card checkout.
  pub fn script(&self, client_key: &str) -> Result<String, AppError> {
    let options = serde_json::to_string(self).map_err(|e| AppError::SerializeError(e.to_string()))?;
    let client_key = serde_json::to_string(client_key).map_err(|e| AppError::SerializeError(e.to_string()))?;
    Ok(format!(r#"
      function openCheckout() {{
        window.TossPayments({client_key})
          .requestPayment('{method}', {options})
          .catch(function(err) {{
            if (err.name !== 'USER_CANCEL') {{ console.error('payment error', err); }}
          }});
      }}
      if (window.TossPayments) {{
        openCheckout();
      }} else {{
        var script = document.createElement('script');
        script.src = '{src}';
        script.async = true;
        script.onload = openCheckout;
        document.head.appendChild(script);
      }}
    "#, client_key = client_key, method = PAYMENT_METHOD, options = options, src = TOSS_SCRIPT_URL))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_minimum_charge() {
    assert!(validate_charge_amount(4_999).is_err());
    assert_eq!(validate_charge_amount(5_000), Ok(5_000));
  }

  #[test]
  fn test_parse_charge_input() {
    assert_eq!(parse_charge_input(""), Ok(0));
    assert_eq!(parse_charge_input(" 15000 "), Ok(15_000));
    assert!(parse_charge_input("5,000").is_err());
    assert!(parse_charge_input("-5000").is_err());
  }

  #[test]
  fn test_order_ids_are_unique() {
    let a = charge_order_id();
    let b = charge_order_id();
    assert!(a.starts_with("POINT-CHARGE-"));
    assert_ne!(a, b);
  }

  #[test]
  fn test_checkout_request() {
    let request = CheckoutRequest::new(10_000, None, "https://app.example.com").expect("valid amount");
    assert_eq!(request.customer_name, "사용자");
    assert_eq!(request.success_url, "https://app.example.com/toss-payment-success");
    assert!(CheckoutRequest::new(1_000, Some("kim"), "https://app.example.com").is_err());

    let script = request.script("test_ck").expect("script");
    assert!(script.contains("\"orderName\":\"포인트 충전\""));
    assert!(script.contains("requestPayment('카드'"));
    assert!(script.contains("window.TossPayments(\"test_ck\")"));
  }
}

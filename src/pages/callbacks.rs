#![allow(non_snake_case)]

use std::collections::HashMap;
use dioxus::{logger::tracing::{error, info, warn}, prelude::*};

use crate::{
  components::template::AuthState,
  utils::{
    api::ApiClient,
    config::{current_query, window_origin, OAuthProvider},
    server::{AppError, ChargeRequest}
  },
  Route
};

fn required<'a>(params: &'a HashMap<String, String>, name: &str) -> Result<&'a str, AppError> {
  params.get(name)
    .map(|v| v.trim())
    .filter(|v| !v.is_empty())
    .ok_or_else(|| AppError::InvalidInput(format!("missing '{}' in the callback", name)))
}

fn oauth_code(params: &HashMap<String, String>) -> Result<String, AppError> {
  if let Some(reason) = params.get("error") {
    let detail = params.get("error_description").unwrap_or(reason);
    return Err(AppError::InvalidInput(format!("sign-in was not completed: {}", detail)));
  }
  required(params, "code").map(str::to_string)
}

fn charge_request_from(params: &HashMap<String, String>) -> Result<ChargeRequest, AppError> {
  let amount = required(params, "amount")?;
  let amount = amount.parse::<u64>()
    .map_err(|_| AppError::InvalidInput(format!("'{}' is not a valid amount", amount)))?;
  Ok(ChargeRequest {
    payment_key: required(params, "paymentKey")?.to_string(),
    order_id: required(params, "orderId")?.to_string(),
    amount
  })
}

async fn complete_sign_in(api: &ApiClient, provider: &str) -> Result<(), AppError> {
  let provider = provider.parse::<OAuthProvider>()?;
  let code = oauth_code(&current_query()?)?;
  let redirect_uri = provider.redirect_uri(&window_origin()?);
  api.exchange_oauth_code(provider, &code, &redirect_uri).await?;
  Ok(())
}

#[component]
pub fn OAuthCallback(provider: String) -> Element {
  let api = use_context::<ApiClient>();
  let auth = use_context::<AuthState>();
  let router = navigator();
  let outcome = use_resource(move || {
    let api = api.clone();
    let provider = provider.clone();
    let mut signed_in = auth.signed_in;
    async move {
      let result = complete_sign_in(&api, &provider).await;
      match &result {
        Ok(()) => {
          signed_in.set(true);
          router.replace(Route::Home {});
        },
        Err(e) => error!("{} sign-in failed: {}", provider, e)
      }
      result
    }
  });

  let body = match &*outcome.read() {
    None | Some(Ok(())) => rsx! { p { "Signing you in..." } },
    Some(Err(e)) => rsx! {
      p { class: "error-text", "{e}" },
      Link { to: Route::Home {}, "Back to home" }
    }
  };

  rsx! {
    div {
      class: "callback-page",
      h2 { "Sign in" },
      {body}
    }
  }
}

#[component]
pub fn PaymentSuccess() -> Element {
  let api = use_context::<ApiClient>();
  let outcome = use_resource(move || {
    let api = api.clone();
    async move {
      let charge = charge_request_from(&current_query()?)?;
      api.confirm_charge(&charge).await?;
      info!("charge of {} confirmed for order {}", charge.amount, charge.order_id);
      Ok::<_, AppError>(charge.amount)
    }
  });

  let body = match &*outcome.read() {
    None => rsx! { p { "Confirming your payment..." } },
    Some(Ok(amount)) => rsx! {
      p { "{amount} points have been added to your balance." }
    },
    Some(Err(e)) => rsx! {
      p { class: "error-text", "The payment could not be confirmed: {e}" }
    }
  };

  rsx! {
    div {
      class: "callback-page",
      h2 { "Point charge" },
      {body},
      Link { to: Route::MyPage {}, "Go to My Page" }
    }
  }
}

#[component]
pub fn PaymentFail() -> Element {
  let params = use_hook(|| {
    let params = current_query().unwrap_or_else(|e| {
      warn!("unable to read payment failure details: {}", e);
      HashMap::new()
    });
    warn!("payment failed: {:?}", params);
    params
  });
  let code = params.get("code").cloned().unwrap_or_else(|| "UNKNOWN".to_string());
  let message = params.get("message").cloned().unwrap_or_else(|| "The payment was not completed.".to_string());

  rsx! {
    div {
      class: "callback-page",
      h2 { "Payment failed" },
      p { class: "error-text", "{message}" },
      p { class: "muted", "Code: {code}" },
      Link { to: Route::MyPage {}, "Back to My Page" }
    }
  }
}

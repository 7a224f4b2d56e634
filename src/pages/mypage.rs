#![allow(non_snake_case)]

use dioxus::prelude::*;

use crate::{
  components::{charge::ChargeDialog, history::{OrderHistory, PaymentHistory, PointHistory}, template::AuthState},
  utils::api::ApiClient
};

#[component]
pub fn MyPage() -> Element {
  let api = use_context::<ApiClient>();
  let auth = use_context::<AuthState>();
  let mut charging = use_signal(|| false);
  let profile = use_resource(move || {
    let api = api.clone();
    async move { api.user_info().await }
  });

  if !(auth.signed_in)() {
    return rsx! {
      div {
        class: "mypage",
        h2 { "My Page" },
        p { "Sign in to see your profile and point balance." }
      }
    };
  }

  let (summary, nickname) = match &*profile.read() {
    None => (rsx! { p { class: "muted", "Loading profile..." } }, String::new()),
    Some(Err(e)) => (rsx! { p { class: "error-text", "{e}" } }, String::new()),
    Some(Ok(user)) => (rsx! {
      div {
        class: "profile-card",
        h3 { "{user.nickname}" },
        p { "{user.email}" },
        p { class: "muted", "Signed in with {user.oauth_provider}" },
        div {
          class: "point-balance",
          span { "{user.point} P" },
          button {
            class: "button button-primary",
            onclick: move |_| charging.set(true),
            "Charge"
          }
        }
      }
    }, user.nickname.clone())
  };

  rsx! {
    div {
      class: "mypage",
      h2 { "My Page" },
      {summary},
      PointHistory {},
      OrderHistory {},
      PaymentHistory {},
      if charging() {
        ChargeDialog { nickname, on_close: move |_| charging.set(false) }
      }
    }
  }
}

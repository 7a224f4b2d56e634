#![allow(non_snake_case)]

use dioxus::{logger::tracing::{error, info}, prelude::*};

use crate::{
  components::toast::{show_toast, Toast},
  utils::{api::ApiClient, config::{navigate_external, window_origin, OAuthProvider}, server::AppError},
  Route
};

const LOGIN_DIALOG_ID: &str = "login-dialog";
const LOGIN_TOAST_ID: &str = "login-toast";

/// Sign-in state shared by the header and the pages behind it.
#[derive(Clone, Copy)]
pub struct AuthState {
  pub signed_in: Signal<bool>
}

#[component]
pub fn Template() -> Element {
  static CSS: Asset = asset!("/assets/main.css");

  rsx! {
    document::Stylesheet { href: CSS },
    Header { }
    main {
      class: "page",
      Outlet::<Route> {}
    }
    Footer { }
  }
}

fn start_login(provider: OAuthProvider) -> Result<(), AppError> {
  let url = provider.authorize_url(&window_origin()?)?;
  info!("redirecting to {} sign-in", provider.label());
  navigate_external(&url)
}

#[component]
fn Header() -> Element {
  let api = use_context::<ApiClient>();
  let auth = use_context::<AuthState>();
  let mut signed_in = auth.signed_in;
  let mut toast_msg = use_signal(String::new);
  let router = navigator();

  let logout = move |_| {
    let api = api.clone();
    spawn(async move {
      if let Err(e) = api.logout().await {
        error!("logout request failed: {}", e);
      }
      signed_in.set(false);
      router.push(Route::Home {});
    });
  };

  let mut login_with = move |provider: OAuthProvider| {
    if let Err(e) = start_login(provider) {
      error!("unable to start sign-in: {}", e);
      toast_msg.set(e.to_string());
      show_toast(LOGIN_TOAST_ID);
    }
  };

  rsx! {
    nav {
      div {
        class: "nav-container",
        Link {
          class: "logo",
          to: Route::Home { },
          "QuantCraft"
        },
        div {
          class: "nav-links",
          Link { active_class: "nav-active", to: Route::Market { }, "Market" },
          Link { active_class: "nav-active", to: Route::Studio { }, "Studio" },
          if signed_in() {
            Link { active_class: "nav-active", to: Route::MyPage { }, "My Page" },
            button { class: "button", onclick: logout, "Logout" }
          } else {
            button {
              class: "button button-primary",
              onclick: move |_| {
                document::eval(&format!("document.getElementById('{}').showModal();", LOGIN_DIALOG_ID));
              },
              "Login"
            }
          }
        }
      }
    }
    dialog {
      id: LOGIN_DIALOG_ID,
      h3 { "Sign in" },
      p { "Choose how you want to sign in." },
      div {
        class: "dialog-actions",
        button { class: "button button-kakao", onclick: move |_| login_with(OAuthProvider::Kakao), "Kakao" },
        button { class: "button button-google", onclick: move |_| login_with(OAuthProvider::Google), "Google" },
        button {
          class: "button",
          onclick: move |_| {
            document::eval(&format!("document.getElementById('{}').close();", LOGIN_DIALOG_ID));
          },
          "Cancel"
        }
      }
    }
    Toast { id: LOGIN_TOAST_ID.to_string(), message: toast_msg() }
  }
}

#[component]
fn Footer() -> Element {
  rsx! {
    footer {
      div {
        class: "footer-container",
        div {
          class: "copyright",
          p { "© 2025 QuantCraft" }
        }
      }
    }
  }
}

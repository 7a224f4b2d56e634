#![allow(non_snake_case)]

use dioxus::{logger::tracing::{error, info}, prelude::*};

use crate::{
  components::{form::{field, FormValues}, toast::{show_toast, Toast}},
  utils::{api::ApiClient, server::{AppError, ExchangeApiKey, NewExchangeApiKey}, status::Exchange}
};

const KEYS_TOAST_ID: &str = "apikeys-toast";

fn new_key_from(values: &FormValues) -> Result<NewExchangeApiKey, AppError> {
  let exchange = Exchange::from_wire(&field(values, "exchange"))
    .ok_or_else(|| AppError::InvalidInput("select an exchange".to_string()))?;
  let (api_key, secret_key) = (field(values, "api_key"), field(values, "secret_key"));
  if api_key.is_empty() || secret_key.is_empty() {
    return Err(AppError::InvalidInput("both the API key and the secret are required".to_string()));
  }
  Ok(NewExchangeApiKey { exchange, api_key, secret_key })
}

fn mask(secret: &str) -> String {
  let visible: String = secret.chars().take(4).collect();
  format!("{}****", visible)
}

#[component]
pub fn ApiKeysTab() -> Element {
  let api = use_context::<ApiClient>();
  let mut keys = {
    let api = api.clone();
    use_resource(move || {
      let api = api.clone();
      async move { api.exchange_api_keys().await }
    })
  };
  let mut editing: Signal<Option<ExchangeApiKey>> = use_signal(|| None);
  let mut action_error: Signal<Option<String>> = use_signal(|| None);
  let mut toast_msg = use_signal(String::new);

  let mut notify = move |msg: &str| {
    toast_msg.set(msg.to_string());
    show_toast(KEYS_TOAST_ID);
  };

  let on_create = {
    let api = api.clone();
    move |evt: FormEvent| {
      let new_key = match new_key_from(&evt.values()) {
        Ok(key) => key,
        Err(e) => {
          action_error.set(Some(e.to_string()));
          return;
        }
      };
      let api = api.clone();
      spawn(async move {
        match api.create_exchange_api_key(&new_key).await {
          Ok(()) => {
            info!("exchange key for {} registered", new_key.exchange);
            action_error.set(None);
            notify("API key registered");
            keys.restart();
          },
          Err(e) => {
            error!("unable to register exchange key: {}", e);
            action_error.set(Some(e.to_string()));
          }
        }
      });
    }
  };

  let on_update = {
    let api = api.clone();
    move |evt: FormEvent| {
      let Some(mut key) = editing() else {
        return;
      };
      let values = evt.values();
      key.api_key = field(&values, "api_key");
      key.secret_key = field(&values, "secret_key");
      let api = api.clone();
      spawn(async move {
        match api.update_exchange_api_key(&key).await {
          Ok(()) => {
            editing.set(None);
            action_error.set(None);
            notify("API key updated");
            keys.restart();
          },
          Err(e) => action_error.set(Some(e.to_string()))
        }
      });
    }
  };

  let on_delete = move |id: i64| {
    let api = api.clone();
    spawn(async move {
      match api.delete_exchange_api_key(id).await {
        Ok(()) => {
          notify("API key deleted");
          keys.restart();
        },
        Err(e) => action_error.set(Some(e.to_string()))
      }
    });
  };

  let list = match &*keys.read() {
    None => rsx! { p { class: "muted", "Loading API keys..." } },
    Some(Err(e)) => rsx! { p { class: "error-text", "{e}" } },
    Some(Ok(list)) if list.is_empty() => rsx! { p { "No exchange API keys registered." } },
    Some(Ok(list)) => rsx! {
      table {
        class: "data-table",
        thead {
          tr {
            th { "Exchange" },
            th { "API key" },
            th { "Secret" },
            th { "" },
          }
        }
        tbody {
          for key in list.iter().cloned() {
            tr {
              key: "{key.id}",
              td { "{key.exchange}" },
              td { "{key.api_key}" },
              td { {mask(&key.secret_key)} },
              td {
                button {
                  class: "button",
                  onclick: {
                    let key = key.clone();
                    move |_| editing.set(Some(key.clone()))
                  },
                  "Edit"
                },
                button {
                  class: "button button-danger",
                  onclick: {
                    let mut on_delete = on_delete.clone();
                    move |_| on_delete(key.id)
                  },
                  "Delete"
                }
              }
            }
          }
        }
      }
    }
  };

  rsx! {
    section {
      class: "tab-panel",
      h3 { "Exchange API Keys" },
      {list},
      if let Some(err) = action_error() {
        p { class: "error-text", "{err}" }
      },
      if let Some(key) = editing() {
        form {
          class: "inline-form",
          onsubmit: on_update,
          h4 { "Edit {key.exchange} key" },
          input { name: "api_key", placeholder: "API key", initial_value: "{key.api_key}" },
          input { name: "secret_key", r#type: "password", placeholder: "Secret key", initial_value: "{key.secret_key}" },
          button { class: "button button-primary", r#type: "submit", "Save" },
          button { class: "button", r#type: "button", onclick: move |_| editing.set(None), "Cancel" }
        }
      } else {
        form {
          class: "inline-form",
          onsubmit: on_create,
          h4 { "Register a new key" },
          select {
            name: "exchange",
            for exchange in Exchange::ALL {
              option { value: exchange.wire_name(), "{exchange}" }
            }
          },
          input { name: "api_key", placeholder: "API key" },
          input { name: "secret_key", r#type: "password", placeholder: "Secret key" },
          button { class: "button button-primary", r#type: "submit", "Add" }
        }
      }
    }
    Toast { id: KEYS_TOAST_ID.to_string(), message: toast_msg(), success: true }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_mask_keeps_prefix() {
    assert_eq!(mask("abcdefgh"), "abcd****");
    assert_eq!(mask("ab"), "ab****");
  }
}

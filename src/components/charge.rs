#![allow(non_snake_case)]

use dioxus::{logger::tracing::{error, info}, prelude::*};

use crate::utils::{
  config::{window_origin, TOSS_CLIENT_KEY},
  payment::{parse_charge_input, CheckoutRequest, CHARGE_STEPS, MIN_CHARGE_AMOUNT},
  server::AppError
};

fn open_checkout(amount: u64, nickname: Option<&str>) -> Result<(), AppError> {
  let origin = window_origin()?;
  let request = CheckoutRequest::new(amount, nickname, &origin)?;
  info!("opening checkout for order {}", request.order_id);
  document::eval(&request.script(TOSS_CLIENT_KEY)?);
  Ok(())
}

/// Point charge dialog; the hosted checkout redirects back to the payment callback routes.
#[component]
pub fn ChargeDialog(nickname: String, on_close: EventHandler<()>) -> Element {
  let mut amount = use_signal(|| 0u64);
  let mut input_error: Signal<Option<String>> = use_signal(|| None);

  let below_minimum = amount() < MIN_CHARGE_AMOUNT;
  let amount_text = if amount() == 0 { String::new() } else { amount().to_string() };

  rsx! {
    div {
      class: "modal-backdrop",
      div {
        class: "modal",
        h3 { "Charge points" },
        input {
          class: "charge-input",
          inputmode: "numeric",
          placeholder: "Amount (KRW)",
          value: "{amount_text}",
          oninput: move |evt| {
            match parse_charge_input(&evt.value()) {
              Ok(parsed) => {
                amount.set(parsed);
                input_error.set(None);
              },
              Err(e) => input_error.set(Some(e.to_string()))
            }
          }
        },
        div {
          class: "charge-steps",
          for step in CHARGE_STEPS {
            button {
              class: "button",
              onclick: move |_| amount.set(amount().saturating_add(step)),
              "+{step}"
            }
          }
        },
        if let Some(err) = input_error() {
          p { class: "error-text", "{err}" }
        } else if below_minimum {
          p { class: "error-text", "The minimum charge is {MIN_CHARGE_AMOUNT} KRW." }
        },
        div {
          class: "modal-actions",
          button {
            class: "button button-primary",
            disabled: below_minimum,
            onclick: move |_| {
              if let Err(e) = open_checkout(amount(), Some(nickname.as_str())) {
                error!("unable to open checkout: {}", e);
                input_error.set(Some(e.to_string()));
              }
            },
            "Charge"
          },
          button { class: "button", onclick: move |_| on_close.call(()), "Cancel" }
        }
      }
    }
  }
}

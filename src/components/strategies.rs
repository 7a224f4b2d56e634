#![allow(non_snake_case)]

use dioxus::prelude::*;

use crate::utils::api::ApiClient;

fn yes_no(flag: bool) -> &'static str {
  if flag { "Yes" } else { "No" }
}

#[component]
pub fn MyStrategiesTab() -> Element {
  let api = use_context::<ApiClient>();
  let strategies = use_resource(move || {
    let api = api.clone();
    async move { api.owned_strategies().await }
  });

  let body = match &*strategies.read() {
    None => rsx! { p { class: "muted", "Loading strategies..." } },
    Some(Err(e)) => rsx! { p { class: "error-text", "{e}" } },
    Some(Ok(list)) if list.is_empty() => rsx! { p { "You do not own any strategies yet." } },
    Some(Ok(list)) => rsx! {
      table {
        class: "data-table",
        thead {
          tr {
            th { "Name" },
            th { "Description" },
            th { "Leverage" },
            th { "Exclusive orders" },
            th { "Hedge mode" },
            th { "Timeframe" },
            th { "Symbol" },
            th { "Exchange" },
          }
        }
        tbody {
          for s in list.iter() {
            tr {
              key: "{s.id}",
              td { "{s.name}" },
              td { "{s.description}" },
              td { "{s.leverage}" },
              td { {yes_no(s.exclusive_orders)} },
              td { {yes_no(s.hedge_mode)} },
              td { "{s.timeframe}" },
              td { "{s.symbol}" },
              td { "{s.exchange}" },
            }
          }
        }
      }
    }
  };

  rsx! {
    section {
      class: "tab-panel",
      h3 { "My Strategies" },
      {body}
    }
  }
}

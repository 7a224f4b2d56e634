#![allow(non_snake_case)]

use chrono::{DateTime, NaiveDateTime};
use dioxus::prelude::*;

use crate::{utils::{api::ApiClient, server::Order}, Route};

/// Renders server timestamps as `YYYY-MM-DD HH:MM`, leaving unknown formats untouched.
fn display_time(raw: &str) -> String {
  if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
    return ts.format("%Y-%m-%d %H:%M").to_string();
  }
  match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
    Ok(ts) => ts.format("%Y-%m-%d %H:%M").to_string(),
    Err(_) => raw.to_string()
  }
}

fn ordered_item(order: &Order) -> Element {
  match &order.order_item {
    Some(item) => rsx! {
      Link { to: Route::StrategyItemDetail { id: item.strategy_item.id }, "{item.strategy_item.name}" }
    },
    None => rsx! { "-" }
  }
}

#[component]
pub fn PointHistory() -> Element {
  let api = use_context::<ApiClient>();
  let txns = use_resource(move || {
    let api = api.clone();
    async move { api.point_transactions().await }
  });

  let body = match &*txns.read() {
    None => rsx! { p { class: "muted", "Loading point history..." } },
    Some(Err(e)) => rsx! { p { class: "error-text", "{e}" } },
    Some(Ok(list)) if list.is_empty() => rsx! { p { "No point transactions yet." } },
    Some(Ok(list)) => rsx! {
      table {
        class: "data-table",
        thead {
          tr { th { "Date" }, th { "Type" }, th { "Points" } }
        }
        tbody {
          for txn in list.iter() {
            tr {
              key: "{txn.id}",
              td { {display_time(&txn.created_at)} },
              td { "{txn.status}" },
              td { {format!("{}{}", txn.status.sign(), txn.point)} }
            }
          }
        }
      }
    }
  };

  rsx! {
    section {
      class: "history",
      h3 { "Point history" },
      {body}
    }
  }
}

#[component]
pub fn PaymentHistory() -> Element {
  let api = use_context::<ApiClient>();
  let txns = use_resource(move || {
    let api = api.clone();
    async move { api.payment_transactions().await }
  });

  let body = match &*txns.read() {
    None => rsx! { p { class: "muted", "Loading payments..." } },
    Some(Err(e)) => rsx! { p { class: "error-text", "{e}" } },
    Some(Ok(list)) if list.is_empty() => rsx! { p { "No payments yet." } },
    Some(Ok(list)) => rsx! {
      table {
        class: "data-table",
        thead {
          tr { th { "Date" }, th { "Status" }, th { "Amount" } }
        }
        tbody {
          for txn in list.iter() {
            tr {
              key: "{txn.id}",
              td { {display_time(&txn.created_at)} },
              td { "{txn.status}" },
              td {
                class: if txn.status.is_credit() { "profit" } else { "loss" },
                {txn.signed_amount()}
              }
            }
          }
        }
      }
    }
  };

  rsx! {
    section {
      class: "history",
      h3 { "Payments" },
      {body}
    }
  }
}

#[component]
pub fn OrderHistory() -> Element {
  let api = use_context::<ApiClient>();
  let orders = use_resource(move || {
    let api = api.clone();
    async move { api.orders().await }
  });

  let body = match &*orders.read() {
    None => rsx! { p { class: "muted", "Loading orders..." } },
    Some(Err(e)) => rsx! { p { class: "error-text", "{e}" } },
    Some(Ok(list)) if list.is_empty() => rsx! { p { "No orders yet." } },
    Some(Ok(list)) => rsx! {
      table {
        class: "data-table",
        thead {
          tr { th { "Ordered" }, th { "Item" }, th { "Price" }, th { "Status" }, th { "Canceled" } }
        }
        tbody {
          for order in list.iter() {
            tr {
              key: "{order.id}",
              td { {display_time(&order.created_at)} },
              td { {ordered_item(order)} },
              td { "{order.total_price}" },
              td { "{order.status}" },
              td { {order.canceled_at.as_deref().map_or_else(|| "-".to_string(), display_time)} }
            }
          }
        }
      }
    }
  };

  rsx! {
    section {
      class: "history",
      h3 { "Orders" },
      {body}
    }
  }
}

#![allow(non_snake_case)]

use dioxus::{logger::tracing::{error, info}, prelude::*};

use crate::{
  components::toast::{show_toast, Toast},
  utils::{api::{ApiClient, StrategyQuery}, status::SortOption},
  Route
};

const MARKET_TOAST_ID: &str = "market-toast";

/// Page numbers shown around the current page, clamped to `[1, total]`.
fn page_window(current: u32, total: u32, width: u32) -> Vec<u32> {
  if total == 0 {
    return Vec::new();
  }
  let current = current.clamp(1, total);
  let start = current.saturating_sub(width / 2).max(1);
  let end = (start + width - 1).min(total);
  let start = end.saturating_sub(width - 1).max(1);
  (start..=end).collect()
}

#[component]
pub fn Market() -> Element {
  let api = use_context::<ApiClient>();
  let mut page = use_signal(|| 1u32);
  let mut sort = use_signal(SortOption::default);
  let mut keyword = use_signal(String::new);
  let mut draft = use_signal(String::new);

  let listing = use_resource(move || {
    let api = api.clone();
    let query = StrategyQuery {
      page: page(),
      sort: sort(),
      keyword: Some(keyword()),
      ..StrategyQuery::default()
    };
    async move { api.strategies(&query).await }
  });

  let body = match &*listing.read() {
    None => rsx! { p { class: "muted", "Loading strategies..." } },
    Some(Err(e)) => rsx! { p { class: "error-text", "{e}" } },
    Some(Ok(resp)) if resp.strategies.is_empty() => rsx! { p { "No strategies found." } },
    Some(Ok(resp)) => {
      let pages = page_window(page(), resp.total_page, 5);
      let last = resp.total_page;
      rsx! {
        p { class: "muted", "{resp.total_strategy_count} strategies" },
        div {
          class: "strategy-grid",
          for strategy in resp.strategies.iter() {
            Link {
              key: "{strategy.id}",
              class: "strategy-card",
              to: Route::StrategyDetail { id: strategy.id },
              h3 { "{strategy.name}" },
              p { "{strategy.description}" },
              span { class: "price", "{strategy.price} P" }
            }
          }
        },
        div {
          class: "pagination",
          button {
            class: "button",
            disabled: page() <= 1,
            onclick: move |_| page.set(page().saturating_sub(1).max(1)),
            "Prev"
          },
          for n in pages {
            button {
              class: if n == page() { "button button-primary" } else { "button" },
              onclick: move |_| page.set(n),
              "{n}"
            }
          },
          button {
            class: "button",
            disabled: page() >= last,
            onclick: move |_| page.set((page() + 1).min(last)),
            "Next"
          }
        }
      }
    }
  };

  rsx! {
    div {
      class: "market-page",
      h2 { "Strategy Market" },
      form {
        class: "inline-form",
        onsubmit: move |_| {
          keyword.set(draft());
          page.set(1);
        },
        input {
          r#type: "search",
          placeholder: "Search strategies",
          value: "{draft}",
          oninput: move |evt| draft.set(evt.value())
        },
        button { class: "button button-primary", r#type: "submit", "Search" },
        select {
          onchange: move |evt| {
            if let Some(chosen) = SortOption::from_query(&evt.value()) {
              sort.set(chosen);
              page.set(1);
            }
          },
          for opt in SortOption::ALL {
            option { value: opt.as_query(), selected: opt == sort(), "{opt}" }
          }
        }
      },
      {body}
    }
  }
}

#[component]
pub fn StrategyDetail(id: i64) -> Element {
  let api = use_context::<ApiClient>();
  let strategy = {
    let api = api.clone();
    use_resource(move || {
      let api = api.clone();
      async move { api.strategy(id).await }
    })
  };
  let mut toast_msg = use_signal(String::new);
  let mut toast_ok = use_signal(|| true);
  let mut buying = use_signal(|| false);

  let buy = move |_| {
    let api = api.clone();
    buying.set(true);
    spawn(async move {
      match api.buy_strategy(id).await {
        Ok(()) => {
          info!("bought strategy {}", id);
          toast_ok.set(true);
          toast_msg.set("Purchase complete. Find it under Studio.".to_string());
        },
        Err(e) => {
          error!("purchase of strategy {} failed: {}", id, e);
          toast_ok.set(false);
          toast_msg.set(e.to_string());
        }
      }
      buying.set(false);
      show_toast(MARKET_TOAST_ID);
    });
  };

  let body = match &*strategy.read() {
    None => rsx! { p { class: "muted", "Loading strategy..." } },
    Some(Err(e)) => rsx! { p { class: "error-text", "{e}" } },
    Some(Ok(s)) => rsx! {
      article {
        class: "strategy-detail",
        h2 { "{s.name}" },
        p { "{s.description}" },
        p { class: "price", "{s.price} P" },
        button {
          class: "button button-primary",
          disabled: buying(),
          onclick: buy,
          "Buy"
        }
      }
    }
  };

  rsx! {
    div {
      class: "market-page",
      Link { to: Route::Market { }, "← Back to market" },
      {body}
    }
    Toast { id: MARKET_TOAST_ID.to_string(), message: toast_msg(), success: toast_ok() }
  }
}

#[component]
pub fn StrategyItemDetail(id: i64) -> Element {
  let api = use_context::<ApiClient>();
  let item = {
    let api = api.clone();
    use_resource(move || {
      let api = api.clone();
      async move { api.strategy_item(id).await }
    })
  };
  let mut toast_msg = use_signal(String::new);
  let mut toast_ok = use_signal(|| true);

  let order = move |_| {
    let api = api.clone();
    spawn(async move {
      match api.order_strategy_item(id).await {
        Ok(placed) => {
          info!("order {} placed for item {}", placed.id, id);
          toast_ok.set(true);
          toast_msg.set(format!("Order #{} placed", placed.id));
        },
        Err(e) => {
          error!("order for item {} failed: {}", id, e);
          toast_ok.set(false);
          toast_msg.set(e.to_string());
        }
      }
      show_toast(MARKET_TOAST_ID);
    });
  };

  let body = match &*item.read() {
    None => rsx! { p { class: "muted", "Loading item..." } },
    Some(Err(e)) => rsx! { p { class: "error-text", "{e}" } },
    Some(Ok(it)) => rsx! {
      article {
        class: "strategy-detail",
        h2 { "{it.name}" },
        p { "{it.description}" },
        p { class: "price", "{it.price} P" },
        button { class: "button button-primary", onclick: order, "Order" }
      }
    }
  };

  rsx! {
    div {
      class: "market-page",
      Link { to: Route::Market { }, "← Back to market" },
      {body}
    }
    Toast { id: MARKET_TOAST_ID.to_string(), message: toast_msg(), success: toast_ok() }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_page_window() {
    assert_eq!(page_window(1, 0, 5), Vec::<u32>::new());
    assert_eq!(page_window(1, 3, 5), vec![1, 2, 3]);
    assert_eq!(page_window(1, 10, 5), vec![1, 2, 3, 4, 5]);
    assert_eq!(page_window(6, 10, 5), vec![4, 5, 6, 7, 8]);
    assert_eq!(page_window(10, 10, 5), vec![6, 7, 8, 9, 10]);
  }
}

#![allow(non_snake_case)]

use dioxus::prelude::*;

/// Flashes the toast with the given id for two seconds.
pub fn show_toast(id: &str) {
  document::eval(&format!(r#"
    var x = document.getElementById("{id}");
    if (x) {{
      x.classList.add("show");
      setTimeout(function(){{x.classList.remove("show");}}, 2000);
    }}
  "#));
}

#[component]
pub fn Toast(id: String, message: String, #[props(default = false)] success: bool) -> Element {
  let class = if success { "toast toast-success" } else { "toast toast-error" };
  rsx! {
    div {
      id: "{id}",
      class: "{class}",
      "{message}"
    }
  }
}

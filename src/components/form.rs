use std::collections::HashMap;
use dioxus::prelude::FormValue;

pub type FormValues = HashMap<String, FormValue>;

pub fn field(values: &FormValues, name: &str) -> String {
  values.get(name).map(|v| v.as_value().trim().to_string()).unwrap_or_default()
}

// unchecked boxes are absent from the submission
pub fn flag(values: &FormValues, name: &str) -> bool {
  values.get(name).map_or(false, |v| v.as_value() == "true")
}

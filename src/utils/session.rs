use std::{cell::RefCell, collections::HashMap, rc::Rc};
use dioxus::logger::tracing::info;
use web_sys::{window, Storage};

use super::server::{AppError, TokenPair};

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Key/value persistence for credentials.
pub trait TokenStore {
  fn get(&self, key: &str) -> Option<String>;
  fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
  fn remove(&self, key: &str) -> Result<(), AppError>;
}

/// `window.localStorage`, shared across tabs of the same origin.
pub struct BrowserStore;

impl BrowserStore {
  fn storage() -> Result<Storage, AppError> {
    let window = window().ok_or_else(|| AppError::WasmError("global window should exist".to_string()))?;
    window.local_storage()
      .map_err(|e| AppError::StorageError(format!("{:?}", e)))?
      .ok_or_else(|| AppError::StorageError("localStorage is not available".to_string()))
  }
}

impl TokenStore for BrowserStore {
  fn get(&self, key: &str) -> Option<String> {
    Self::storage().ok()?.get_item(key).ok().flatten()
  }

  fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
    Self::storage()?.set_item(key, value).map_err(|e| AppError::StorageError(format!("{:?}", e)))
  }

  fn remove(&self, key: &str) -> Result<(), AppError> {
    Self::storage()?.remove_item(key).map_err(|e| AppError::StorageError(format!("{:?}", e)))
  }
}

#[derive(Default)]
pub struct MemoryStore {
  items: RefCell<HashMap<String, String>>
}

impl TokenStore for MemoryStore {
  fn get(&self, key: &str) -> Option<String> {
    self.items.borrow().get(key).cloned()
  }

  fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
    self.items.borrow_mut().insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<(), AppError> {
    self.items.borrow_mut().remove(key);
    Ok(())
  }
}

/// Credential context shared by the API client and the live monitor.
#[derive(Clone)]
pub struct Session {
  store: Rc<dyn TokenStore>
}

impl PartialEq for Session {
  fn eq(&self, other: &Self) -> bool {
    Rc::ptr_eq(&self.store, &other.store)
  }
}

impl Session {
  pub fn new(store: impl TokenStore + 'static) -> Self {
    Self { store: Rc::new(store) }
  }

  pub fn browser() -> Self {
    Self::new(BrowserStore)
  }

  pub fn in_memory() -> Self {
    Self::new(MemoryStore::default())
  }

  pub fn access_token(&self) -> Option<String> {
    self.store.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty())
  }

  pub fn refresh_token(&self) -> Option<String> {
    self.store.get(REFRESH_TOKEN_KEY).filter(|t| !t.is_empty())
  }

  pub fn is_authenticated(&self) -> bool {
    self.access_token().is_some()
  }

  pub fn store_tokens(&self, tokens: &TokenPair) -> Result<(), AppError> {
    self.store.set(ACCESS_TOKEN_KEY, &tokens.access_token)?;
    self.store.set(REFRESH_TOKEN_KEY, &tokens.refresh_token)?;
    info!("session tokens stored");
    Ok(())
  }

  pub fn clear(&self) -> Result<(), AppError> {
    self.store.remove(ACCESS_TOKEN_KEY)?;
    self.store.remove(REFRESH_TOKEN_KEY)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn tokens() -> TokenPair {
    TokenPair { access_token: "access".to_string(), refresh_token: "refresh".to_string() }
  }

  #[test]
  fn test_store_and_clear() {
    let session = Session::in_memory();
    assert!(!session.is_authenticated());

    session.store_tokens(&tokens()).expect("memory store never fails");
    assert_eq!(session.access_token().as_deref(), Some("access"));
    assert_eq!(session.refresh_token().as_deref(), Some("refresh"));

    session.clear().expect("memory store never fails");
    assert_eq!(session.access_token(), None);
    assert_eq!(session.refresh_token(), None);
  }

  #[test]
  fn test_empty_token_is_absent() {
    let session = Session::in_memory();
    session.store_tokens(&TokenPair { access_token: String::new(), refresh_token: String::new() }).expect("store");
    assert!(!session.is_authenticated());
  }

  #[test]
  fn test_clones_share_store() {
    let session = Session::in_memory();
    let other = session.clone();
    session.store_tokens(&tokens()).expect("store");
    assert_eq!(other.access_token().as_deref(), Some("access"));
    assert!(session == other);
    assert!(session != Session::in_memory());
  }
}

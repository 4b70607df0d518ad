//! Where progress documents live between visits.

use std::collections::HashMap;

use crate::error::StoreError;
use crate::progress::GameProgress;

pub const DEFAULT_KEY_PREFIX: &str = "taiwanscript.progress.";

/// Load/save of one progress document per user. Saves overwrite; the last write wins.
pub trait ProgressStore {
    fn load(&self, user_id: &str) -> Result<Option<GameProgress>, StoreError>;
    fn save(&mut self, user_id: &str, progress: &GameProgress) -> Result<(), StoreError>;
}

/// JSON documents kept in memory. Can be switched offline to exercise the
/// degraded paths.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    docs: HashMap<String, String>,
    offline: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Raw stored document, for inspection.
    pub fn document(&self, user_id: &str) -> Option<&str> {
        self.docs.get(user_id).map(String::as_str)
    }

    pub fn insert_raw(&mut self, user_id: &str, json: impl Into<String>) {
        self.docs.insert(user_id.to_string(), json.into());
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.offline {
            return Err(StoreError::Unavailable("store is offline".into()));
        }
        Ok(())
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self, user_id: &str) -> Result<Option<GameProgress>, StoreError> {
        self.check()?;
        match self.docs.get(user_id) {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, user_id: &str, progress: &GameProgress) -> Result<(), StoreError> {
        self.check()?;
        let json = serde_json::to_string(progress)?;
        self.docs.insert(user_id.to_string(), json);
        Ok(())
    }
}

/// `window.localStorage`, one key per user.
#[derive(Clone, Debug)]
pub struct BrowserStore {
    prefix: String,
}

impl BrowserStore {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    fn key(&self, user_id: &str) -> String {
        format!("{}{}", self.prefix, user_id)
    }

    fn storage() -> Result<web_sys::Storage, StoreError> {
        let window = web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".into()))?;
        window
            .local_storage()
            .map_err(|_| StoreError::Unavailable("localStorage access denied".into()))?
            .ok_or_else(|| StoreError::Unavailable("no localStorage".into()))
    }
}

impl Default for BrowserStore {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_PREFIX)
    }
}

impl ProgressStore for BrowserStore {
    fn load(&self, user_id: &str) -> Result<Option<GameProgress>, StoreError> {
        let raw = Self::storage()?
            .get_item(&self.key(user_id))
            .map_err(|_| StoreError::Unavailable("localStorage read failed".into()))?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, user_id: &str, progress: &GameProgress) -> Result<(), StoreError> {
        let json = serde_json::to_string(progress)?;
        Self::storage()?
            .set_item(&self.key(user_id), &json)
            .map_err(|_| StoreError::Unavailable("localStorage write failed (quota?)".into()))
    }
}

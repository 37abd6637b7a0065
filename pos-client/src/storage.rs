//! Client storage - JSON key-value file
//!
//! Plays the role browser local storage plays for a web POS: active venue,
//! theme layers, send options, device id and hardware configuration.

use crate::ClientResult;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::Venue;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Storage keys
pub mod keys {
    /// Active venue object (current key)
    pub const ACTIVE_VENUE: &str = "pos.activeVenue";
    /// Active venue id (older builds)
    pub const ACTIVE_VENUE_ID: &str = "activeVenueId";
    /// Selected venue id (oldest builds)
    pub const SELECTED_VENUE_ID: &str = "selected_venue_id";

    pub const THEME_ENGINE: &str = "pos.theme.engine";
    pub const THEME_USER_PREFIX: &str = "pos.theme.user.";

    pub const SEND_OPTIONS: &str = "pos.sendOptions";
    pub const DEVICE_ID: &str = "pos.deviceId";
    pub const HARDWARE: &str = "pos.hardware";
}

/// Checkboxes controlling what a send triggers server-side
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendOptions {
    pub do_print: bool,
    pub do_kds: bool,
    pub do_stock: bool,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            do_print: true,
            do_kds: true,
            do_stock: true,
        }
    }
}

/// Printer / peripheral configuration of this terminal
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HardwareConfig {
    #[serde(default)]
    pub receipt_printer: Option<String>,
    #[serde(default)]
    pub kitchen_printer: Option<String>,
    #[serde(default)]
    pub cash_drawer: bool,
    #[serde(default)]
    pub customer_display: bool,
}

/// JSON-file backed key-value storage
#[derive(Debug)]
pub struct ClientStorage {
    /// None = in-memory only
    path: Option<PathBuf>,
    data: Mutex<BTreeMap<String, Value>>,
}

impl ClientStorage {
    /// Open (or lazily create) the storage file at `path`
    ///
    /// A corrupt file is logged and replaced by an empty store on next write.
    pub fn open(path: impl Into<PathBuf>) -> ClientResult<Self> {
        let path = path.into();
        let data = if path.exists() {
            let content = fs::read_to_string(&path)?;
            match serde_json::from_str(&content) {
                Ok(data) => data,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Corrupt client storage, starting empty");
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path: Some(path),
            data: Mutex::new(data),
        })
    }

    /// Storage that never touches disk
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Value>> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, data: &BTreeMap<String, Value>) -> ClientResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(data)?)?;
        Ok(())
    }

    /// Read a typed value; missing or mistyped entries yield `None`
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.lock().get(key).cloned()?;
        serde_json::from_value(value).ok()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> ClientResult<()> {
        let value = serde_json::to_value(value)?;
        let mut data = self.lock();
        data.insert(key.to_string(), value);
        self.persist(&data)
    }

    pub fn remove(&self, key: &str) -> ClientResult<()> {
        let mut data = self.lock();
        if data.remove(key).is_some() {
            self.persist(&data)?;
        }
        Ok(())
    }

    // ========== Active venue ==========

    /// Persisted venue id, looking at every historical key
    pub fn active_venue_id(&self) -> Option<String> {
        if let Some(venue) = self.get::<Venue>(keys::ACTIVE_VENUE) {
            return Some(venue.id);
        }
        // Some builds stored only `{ "id": ... }` under the object key
        if let Some(Value::Object(obj)) = self.get::<Value>(keys::ACTIVE_VENUE)
            && let Some(Value::String(id)) = obj.get("id")
        {
            return Some(id.clone());
        }
        self.get::<String>(keys::ACTIVE_VENUE_ID)
            .or_else(|| self.get::<String>(keys::SELECTED_VENUE_ID))
    }

    /// Persist the venue under all three keys
    pub fn set_active_venue(&self, venue: &Venue) -> ClientResult<()> {
        let mut data = self.lock();
        data.insert(keys::ACTIVE_VENUE.to_string(), serde_json::to_value(venue)?);
        data.insert(keys::ACTIVE_VENUE_ID.to_string(), Value::String(venue.id.clone()));
        data.insert(keys::SELECTED_VENUE_ID.to_string(), Value::String(venue.id.clone()));
        self.persist(&data)
    }

    // ========== Send options ==========

    pub fn send_options(&self) -> SendOptions {
        self.get(keys::SEND_OPTIONS).unwrap_or_default()
    }

    pub fn set_send_options(&self, options: SendOptions) -> ClientResult<()> {
        self.set(keys::SEND_OPTIONS, &options)
    }

    // ========== Device ==========

    /// Stable device id, generated on first use
    pub fn device_id(&self) -> ClientResult<String> {
        if let Some(id) = self.get::<String>(keys::DEVICE_ID) {
            return Ok(id);
        }
        let id = uuid::Uuid::new_v4().to_string();
        self.set(keys::DEVICE_ID, &id)?;
        tracing::info!(device_id = %id, "Generated device id");
        Ok(id)
    }

    pub fn hardware_config(&self) -> HardwareConfig {
        self.get(keys::HARDWARE).unwrap_or_default()
    }

    pub fn set_hardware_config(&self, config: &HardwareConfig) -> ClientResult<()> {
        self.set(keys::HARDWARE, config)
    }
}

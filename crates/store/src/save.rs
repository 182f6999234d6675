//! Save-file model and on-disk storage.
//!
//! The save file is a single JSON document. Only fields explicitly opted in
//! are written: the `was_applied` flag captured by the snapshot pass, plus
//! any per-kind fields a binding chose to persist. Everything else resets
//! to construction-time defaults on load.
//!
//! # Example save file
//!
//! ```json
//! {
//!   "version": 1,
//!   "bindings": [
//!     { "id": "nail::NailBinding", "was_applied": true },
//!     { "id": "lantern::LanternBinding", "was_applied": false, "fields": { "fuel": 40 } }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use bind_core::BindingId;

use crate::error::StoreError;

/// Current save data format version.
pub const SAVE_DATA_VERSION: u32 = 1;

/// Persisted record for a single binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingRecord {
  /// The binding's stable kind id.
  pub id: BindingId,
  /// Whether the binding was applied when the save was written.
  pub was_applied: bool,
  /// Opt-in per-kind fields. Omitted entirely when empty.
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub fields: BTreeMap<String, Value>,
}

/// The complete persisted binding set, in registry insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
  pub version: u32,
  pub bindings: Vec<BindingRecord>,
}

impl SaveData {
  pub fn new() -> Self {
    Self {
      version: SAVE_DATA_VERSION,
      bindings: Vec::new(),
    }
  }
}

impl Default for SaveData {
  fn default() -> Self {
    Self::new()
  }
}

/// The save file on disk.
///
/// Uses atomic write operations (write to temp, then rename) to prevent
/// corruption.
#[derive(Debug, Clone)]
pub struct SaveStore {
  path: PathBuf,
}

impl SaveStore {
  /// Create a store backed by the given file path.
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Write save data, creating the parent directory if needed.
  pub fn save(&self, data: &SaveData) -> Result<(), StoreError> {
    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent).map_err(StoreError::CreateDir)?;
    }

    let content = serde_json::to_string_pretty(data).map_err(StoreError::Serialize)?;

    let temp_path = self.path.with_extension("tmp");
    fs::write(&temp_path, &content).map_err(StoreError::Write)?;
    fs::rename(&temp_path, &self.path).map_err(StoreError::Write)?;

    info!(
      path = %self.path.display(),
      bindings = data.bindings.len(),
      "save data written"
    );
    Ok(())
  }

  /// Load save data.
  ///
  /// Returns `Ok(None)` if the file doesn't exist (no save yet).
  pub fn load(&self) -> Result<Option<SaveData>, StoreError> {
    let content = match fs::read_to_string(&self.path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %self.path.display(), "no save file");
        return Ok(None);
      }
      Err(e) => return Err(StoreError::Read(e)),
    };

    let data: SaveData = serde_json::from_str(&content).map_err(StoreError::Parse)?;
    if data.version != SAVE_DATA_VERSION {
      return Err(StoreError::UnsupportedVersion(data.version));
    }

    debug!(
      path = %self.path.display(),
      bindings = data.bindings.len(),
      "save data loaded"
    );
    Ok(Some(data))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn store_in(temp: &TempDir) -> SaveStore {
    SaveStore::new(temp.path().join("saves").join("bindings.json"))
  }

  fn sample_data() -> SaveData {
    let mut data = SaveData::new();
    data.bindings.push(BindingRecord {
      id: BindingId("nail::NailBinding".to_string()),
      was_applied: true,
      fields: BTreeMap::new(),
    });
    data.bindings.push(BindingRecord {
      id: BindingId("lantern::LanternBinding".to_string()),
      was_applied: false,
      fields: BTreeMap::from([("fuel".to_string(), Value::from(40))]),
    });
    data
  }

  #[test]
  fn save_and_load_roundtrip() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);

    let data = sample_data();
    store.save(&data).unwrap();

    let loaded = store.load().unwrap().unwrap();
    assert_eq!(data, loaded);
  }

  #[test]
  fn load_nonexistent_returns_none() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);
    assert!(store.load().unwrap().is_none());
  }

  #[test]
  fn save_overwrites_previous_data() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);

    store.save(&sample_data()).unwrap();
    store.save(&SaveData::new()).unwrap();

    let loaded = store.load().unwrap().unwrap();
    assert!(loaded.bindings.is_empty());
  }

  #[test]
  fn empty_fields_are_omitted_from_the_file() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);

    let mut data = SaveData::new();
    data.bindings.push(BindingRecord {
      id: BindingId("nail::NailBinding".to_string()),
      was_applied: true,
      fields: BTreeMap::new(),
    });
    store.save(&data).unwrap();

    let raw = std::fs::read_to_string(store.path()).unwrap();
    assert!(!raw.contains("\"fields\""));
  }

  #[test]
  fn load_rejects_unsupported_version() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);

    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(store.path(), r#"{"version": 99, "bindings": []}"#).unwrap();

    match store.load() {
      Err(StoreError::UnsupportedVersion(99)) => {}
      other => panic!("expected UnsupportedVersion, got {other:?}"),
    }
  }

  // Corrupt save handling tests

  #[test]
  fn load_handles_invalid_json() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);

    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(store.path(), "{ this is not valid json }").unwrap();

    match store.load() {
      Err(StoreError::Parse(_)) => {}
      other => panic!("expected Parse error, got {other:?}"),
    }
  }

  #[test]
  fn load_handles_wrong_schema() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);

    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(store.path(), r#"{"unexpected": "structure"}"#).unwrap();

    assert!(store.load().is_err());
  }

  #[test]
  fn load_handles_empty_file() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);

    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(store.path(), "").unwrap();

    assert!(store.load().is_err());
  }

  #[test]
  fn load_handles_null_json() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);

    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(store.path(), "null").unwrap();

    assert!(store.load().is_err());
  }

  #[test]
  fn load_handles_array_instead_of_object() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);

    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(store.path(), r#"["item1", "item2"]"#).unwrap();

    assert!(store.load().is_err());
  }
}

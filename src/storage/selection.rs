//! Persisted selection state.
//!
//! A small JSON object of named values. Reads never fail: a missing or
//! unreadable file, or a key holding the wrong shape, yields the default.

use std::fs;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::StorageError;
use crate::models::{RawDataset, Selection};

/// Key holding the chosen sizes, speeds, and handicaps.
pub const SIZES_SPEEDS_HANDICAPS_KEY: &str = "sizes_speeds_handicaps";

/// Key holding the ordered list of chosen dataset names.
pub const SELECTED_DATASETS_KEY: &str = "selected_datasets";

/// File-backed key/value store for the presentation layer's choices.
#[derive(Debug, Clone)]
pub struct SelectionStore {
    path: PathBuf,
}

impl SelectionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn read_map(&self) -> Map<String, Value> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(_) => return Map::new(),
        };

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                warn!("Ignoring unreadable selection state in {:?}", self.path);
                Map::new()
            }
        }
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(map)?)?;
        fs::rename(&tmp, &self.path)?;

        debug!("Wrote selection state to {:?}", self.path);
        Ok(())
    }

    /// Stored value for `key`, or `default` when absent or malformed.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.read_map()
            .remove(key)
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or(default)
    }

    /// Store `value` under `key` and return what was stored.
    pub fn set<T: Serialize + DeserializeOwned>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<T, StorageError> {
        let mut map = self.read_map();
        let json = serde_json::to_value(value)?;
        map.insert(key.to_string(), json.clone());
        self.write_map(&map)?;
        Ok(serde_json::from_value(json)?)
    }

    /// The chosen sizes, speeds, and handicaps (empty means "all").
    pub fn selection(&self) -> Selection {
        self.get(SIZES_SPEEDS_HANDICAPS_KEY, Selection::default())
    }

    pub fn set_selection(&self, selection: &Selection) -> Result<Selection, StorageError> {
        info!(
            "Selection: sizes {:?}, speeds {:?}, handicaps {:?}",
            selection.sizes, selection.speeds, selection.handicaps
        );
        self.set(SIZES_SPEEDS_HANDICAPS_KEY, selection)
    }

    /// Chosen dataset names, falling back to the newest dataset when none
    /// are stored or any stored name is missing from `corpus`.
    pub fn selected_datasets(&self, corpus: &RawDataset) -> Vec<String> {
        let stored: Vec<String> = self.get(SELECTED_DATASETS_KEY, Vec::new());

        if !stored.is_empty() && stored.iter().all(|name| corpus.contains(name)) {
            return stored;
        }

        if !stored.is_empty() {
            debug!("Stored dataset selection is stale, using latest dataset");
        }

        corpus
            .latest_name()
            .map(|name| vec![name.to_string()])
            .unwrap_or_default()
    }

    pub fn set_selected_datasets(&self, names: &[String]) -> Result<Vec<String>, StorageError> {
        self.set(SELECTED_DATASETS_KEY, &names.to_vec())
    }
}

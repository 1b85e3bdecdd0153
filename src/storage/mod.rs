//! Filesystem operations.
//!
//! Handles the two files the explorer touches:
//! - The tally corpus (JSON, loaded once)
//! - The persisted selection state (JSON key/value file)

mod dataset;
mod selection;

pub use dataset::{load_dataset, save_dataset};
pub use selection::{SelectionStore, SELECTED_DATASETS_KEY, SIZES_SPEEDS_HANDICAPS_KEY};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Default location of the tally corpus.
    pub fn dataset_path(&self) -> PathBuf {
        self.data_dir.join("data.json")
    }

    pub fn state_dir(&self) -> PathBuf {
        self.data_dir.join("state")
    }

    /// Persisted selection state.
    pub fn selection_path(&self) -> PathBuf {
        self.state_dir().join("selection.json")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_paths() {
        let config = StorageConfig::new(PathBuf::from("/data"));

        assert_eq!(config.dataset_path(), PathBuf::from("/data/data.json"));
        assert_eq!(config.state_dir(), PathBuf::from("/data/state"));
        assert_eq!(
            config.selection_path(),
            PathBuf::from("/data/state/selection.json")
        );
    }

    #[test]
    fn test_storage_config_default() {
        let config = StorageConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }
}

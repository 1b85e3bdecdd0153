use std::sync::Arc;

use crate::models::RawDataset;
use crate::storage::SelectionStore;

#[derive(Clone)]
pub struct AppState {
    /// Loaded once at startup and only ever read
    pub corpus: Arc<RawDataset>,
    pub selection: Arc<tokio::sync::RwLock<SelectionStore>>,
    pub default_band_width: u32,
}

impl AppState {
    pub fn new(corpus: RawDataset, selection: SelectionStore, default_band_width: u32) -> Self {
        Self {
            corpus: Arc::new(corpus),
            selection: Arc::new(tokio::sync::RwLock::new(selection)),
            default_band_width,
        }
    }
}

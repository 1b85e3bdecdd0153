//! User choice of board sizes, game speeds, and handicaps.

use serde::{Deserialize, Serialize};

/// Chosen values per dimension. An empty list means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub sizes: Vec<u32>,

    #[serde(default)]
    pub speeds: Vec<u32>,

    #[serde(default)]
    pub handicaps: Vec<u32>,
}

impl Selection {
    pub fn new(sizes: Vec<u32>, speeds: Vec<u32>, handicaps: Vec<u32>) -> Self {
        Self {
            sizes,
            speeds,
            handicaps,
        }
    }

    /// Selection that reads only the pre-aggregated `ALL` buckets.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_sizes(mut self, sizes: Vec<u32>) -> Self {
        self.sizes = sizes;
        self
    }

    pub fn with_speeds(mut self, speeds: Vec<u32>) -> Self {
        self.speeds = speeds;
        self
    }

    pub fn with_handicaps(mut self, handicaps: Vec<u32>) -> Self {
        self.handicaps = handicaps;
        self
    }
}

//! Turns a user selection into concrete lookup coordinates.

use crate::models::{Coord, Selection};

/// Coordinates for one dimension. An empty selection reads the
/// pre-aggregated `ALL` bucket; anything else passes through unchanged.
pub fn resolve(selected: &[u32]) -> Vec<Coord> {
    if selected.is_empty() {
        vec![Coord::All]
    } else {
        selected.iter().copied().map(Coord::from_raw).collect()
    }
}

/// A selection with every dimension resolved. Never empty along any axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSelection {
    pub sizes: Vec<Coord>,
    pub speeds: Vec<Coord>,
    pub handicaps: Vec<Coord>,
}

impl ResolvedSelection {
    pub fn from_selection(selection: &Selection) -> Self {
        Self {
            sizes: resolve(&selection.sizes),
            speeds: resolve(&selection.speeds),
            handicaps: resolve(&selection.handicaps),
        }
    }

    /// Every (size, speed, handicap) combination to read.
    pub fn triples(&self) -> impl Iterator<Item = (Coord, Coord, Coord)> + '_ {
        self.sizes.iter().flat_map(move |&size| {
            self.speeds.iter().flat_map(move |&speed| {
                self.handicaps
                    .iter()
                    .map(move |&handicap| (size, speed, handicap))
            })
        })
    }
}

//! Lookup coordinates for the tally tables.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Raw key the data producers use for a pre-aggregated "every value" bucket.
pub const ALL_SENTINEL: u32 = 999;

/// Number of rank buckets in every table and histogram.
pub const NUM_RANKS: u32 = 40;

/// Handicap stones tracked per table (0 through 9).
pub const NUM_HANDICAPS: u32 = 10;

/// Board sizes the producers tally.
pub const BOARD_SIZES: [u32; 3] = [9, 13, 19];

/// Game speeds: 1 = blitz, 2 = live, 3 = correspondence.
pub const GAME_SPEEDS: [u32; 3] = [1, 2, 3];

/// One coordinate along a table dimension.
///
/// `All` addresses the bucket the producer pre-aggregated over every value
/// of the dimension. It is a separate table entry, never a runtime sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Coord {
    Specific(u32),
    All,
}

impl Coord {
    /// Map a raw integer to a coordinate, treating the sentinel as `All`.
    pub fn from_raw(value: u32) -> Self {
        if value == ALL_SENTINEL {
            Coord::All
        } else {
            Coord::Specific(value)
        }
    }

    /// Raw integer as written in the dataset file.
    pub fn raw(&self) -> u32 {
        match self {
            Coord::Specific(v) => *v,
            Coord::All => ALL_SENTINEL,
        }
    }

    /// Decode a table key. Returns `None` for keys that are not integers.
    pub fn parse_key(key: &str) -> Option<Self> {
        key.trim().parse::<u32>().ok().map(Self::from_raw)
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Coord::All)
    }
}

impl From<u32> for Coord {
    fn from(value: u32) -> Self {
        Self::from_raw(value)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Coord::Specific(v) => write!(f, "{}", v),
            Coord::All => write!(f, "all"),
        }
    }
}

impl Serialize for Coord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.raw())
    }
}

impl<'de> Deserialize<'de> for Coord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(Coord::from_raw)
    }
}

/// Human label for a game speed code.
pub fn speed_label(speed: u32) -> &'static str {
    match speed {
        1 => "Blitz",
        2 => "Live",
        3 => "Correspondence",
        _ => "Unknown",
    }
}

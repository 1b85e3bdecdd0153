//! Raw tally corpus as produced by the rating-system analysis runs.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use super::coordinate::Coord;

/// Address of one cell in a tally table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub size: Coord,
    pub speed: Coord,
    pub rank: Coord,
    pub handicap: Coord,
}

impl CellKey {
    pub fn new(size: Coord, speed: Coord, rank: Coord, handicap: Coord) -> Self {
        Self {
            size,
            speed,
            rank,
            handicap,
        }
    }
}

/// On-disk shape: size -> speed -> rank -> handicap -> value.
/// Any level may be absent or null.
type NestedTable<T> =
    HashMap<String, Option<HashMap<String, Option<HashMap<String, Option<HashMap<String, Option<T>>>>>>>>;

/// A tally table flattened to a single map keyed by [`CellKey`].
///
/// Missing cells read as zero, so sparse data never needs a chain of
/// existence checks.
#[derive(Debug, Clone, PartialEq)]
pub struct CountTable<T> {
    cells: HashMap<CellKey, T>,
}

impl<T> Default for CountTable<T> {
    fn default() -> Self {
        Self {
            cells: HashMap::new(),
        }
    }
}

impl<T: Copy + Default> CountTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value at `key`, or zero when the producer never wrote the cell.
    pub fn get(&self, key: CellKey) -> T {
        self.lookup(key).unwrap_or_default()
    }

    pub fn lookup(&self, key: CellKey) -> Option<T> {
        self.cells.get(&key).copied()
    }

    pub fn insert(&mut self, key: CellKey, value: T) {
        self.cells.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CellKey, &T)> {
        self.cells.iter()
    }

    fn from_nested(nested: NestedTable<T>) -> Self {
        let mut table = Self::new();
        let mut skipped = 0usize;

        for (size_key, speeds) in nested {
            let Some(size) = Coord::parse_key(&size_key) else {
                skipped += 1;
                continue;
            };
            for (speed_key, ranks) in speeds.into_iter().flatten() {
                let Some(speed) = Coord::parse_key(&speed_key) else {
                    skipped += 1;
                    continue;
                };
                for (rank_key, handicaps) in ranks.into_iter().flatten() {
                    // Producers also emit pre-banded keys like "5+5"; the
                    // aggregator re-bands from single ranks instead.
                    let Some(rank) = Coord::parse_key(&rank_key) else {
                        skipped += 1;
                        continue;
                    };
                    for (handicap_key, value) in handicaps.into_iter().flatten() {
                        let Some(handicap) = Coord::parse_key(&handicap_key) else {
                            skipped += 1;
                            continue;
                        };
                        if let Some(value) = value {
                            table.insert(CellKey::new(size, speed, rank, handicap), value);
                        }
                    }
                }
            }
        }

        if skipped > 0 {
            debug!("Skipped {} non-numeric table keys", skipped);
        }

        table
    }
}

impl<'de, T> Deserialize<'de> for CountTable<T>
where
    T: Deserialize<'de> + Copy + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let nested = NestedTable::<T>::deserialize(deserializer)?;
        Ok(Self::from_nested(nested))
    }
}

impl<T: Serialize> Serialize for CountTable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut nested: BTreeMap<u32, BTreeMap<u32, BTreeMap<u32, BTreeMap<u32, &T>>>> =
            BTreeMap::new();
        for (key, value) in &self.cells {
            nested
                .entry(key.size.raw())
                .or_default()
                .entry(key.speed.raw())
                .or_default()
                .entry(key.rank.raw())
                .or_default()
                .insert(key.handicap.raw(), value);
        }
        nested.serialize(serializer)
    }
}

/// Tallies for one rating-system run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Creation time, seconds since the epoch
    #[serde(default)]
    pub timestamp: i64,

    /// Games dropped by the producer
    #[serde(default)]
    pub ignored: u64,

    #[serde(default)]
    pub count: CountTable<u64>,

    #[serde(default)]
    pub black_wins: CountTable<u64>,

    /// Sum of predicted black win probabilities per cell
    #[serde(default)]
    pub predictions: CountTable<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unexpected_rank_changes: Option<CountTable<u64>>,

    /// Player count per rank (index = rank)
    #[serde(default)]
    pub rank_distribution: Vec<u64>,
}

impl DatasetRecord {
    pub fn new(timestamp: i64) -> Self {
        Self {
            timestamp,
            ..Default::default()
        }
    }

    /// Add games to one cell of the count, win, and prediction tables.
    pub fn add_games(&mut self, key: CellKey, games: u64, black_wins: u64, predicted: f64) {
        let count = self.count.get(key);
        self.count.insert(key, count + games);

        let wins = self.black_wins.get(key);
        self.black_wins.insert(key, wins + black_wins);

        let predictions = self.predictions.get(key);
        self.predictions.insert(key, predictions + predicted);
    }

    /// Add unexpected rank changes to one cell, creating the table on first use.
    pub fn add_rank_changes(&mut self, key: CellKey, changes: u64) {
        let table = self.unexpected_rank_changes.get_or_insert_with(CountTable::new);
        let current = table.get(key);
        table.insert(key, current + changes);
    }
}

/// Every dataset in the corpus, keyed by its encoded name.
///
/// Loaded once and never mutated afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawDataset {
    records: BTreeMap<String, DatasetRecord>,
}

impl RawDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, record: DatasetRecord) {
        self.records.insert(name.into(), record);
    }

    pub fn get(&self, name: &str) -> Option<&DatasetRecord> {
        self.records.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DatasetRecord)> {
        self.records.iter()
    }

    /// Dataset names, newest first. Ties keep name order.
    pub fn names_by_recency(&self) -> Vec<&str> {
        let mut entries: Vec<_> = self.records.iter().collect();
        entries.sort_by(|a, b| b.1.timestamp.cmp(&a.1.timestamp).then(a.0.cmp(b.0)));
        entries.into_iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Name of the dataset with the greatest timestamp.
    pub fn latest_name(&self) -> Option<&str> {
        self.names_by_recency().into_iter().next()
    }
}

impl FromIterator<(String, DatasetRecord)> for RawDataset {
    fn from_iter<I: IntoIterator<Item = (String, DatasetRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

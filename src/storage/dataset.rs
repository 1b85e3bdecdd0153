//! Tally corpus file.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info};

use super::StorageError;
use crate::models::RawDataset;

/// Load the corpus from a JSON file mapping dataset names to records.
pub fn load_dataset(path: &Path) -> Result<RawDataset, StorageError> {
    if !path.exists() {
        return Err(StorageError::PathNotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let corpus: RawDataset = serde_json::from_reader(BufReader::new(file))?;

    info!("Loaded {} datasets from {:?}", corpus.len(), path);
    if let Some(latest) = corpus.latest_name() {
        debug!("Latest dataset: {}", latest);
    }

    Ok(corpus)
}

/// Write the corpus as JSON, replacing the file.
pub fn save_dataset(path: &Path, corpus: &RawDataset) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, corpus)?;
    writer.flush()?;

    info!("Wrote {} datasets to {:?}", corpus.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CellKey, Coord, DatasetRecord};
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nope.json");

        let err = load_dataset(&path).unwrap_err();
        assert!(matches!(err, StorageError::PathNotFound(_)));
    }

    #[test]
    fn test_load_producer_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.json");
        std::fs::write(
            &path,
            r#"{
                "glicko-weekly:ogs:15:log:850:31.25": {
                    "name": "glicko-weekly:ogs:15:log:850:31.25",
                    "timestamp": 1600000000,
                    "ignored": 3,
                    "count": {"9": {"2": {"5": {"0": 10, "1": 5}, "0+5": {"0": 15}}}},
                    "black_wins": {"9": {"2": {"5": {"0": 6, "1": 2}}}},
                    "predictions": {"9": {"2": {"5": {"0": 5.5, "1": 2.25}}}},
                    "rank_distribution": [0, 1, 2]
                }
            }"#,
        )
        .unwrap();

        let corpus = load_dataset(&path).unwrap();
        let record = corpus.get("glicko-weekly:ogs:15:log:850:31.25").unwrap();
        let k = CellKey::new(
            Coord::Specific(9),
            Coord::Specific(2),
            Coord::Specific(5),
            Coord::Specific(1),
        );

        assert_eq!(record.ignored, 3);
        assert_eq!(record.count.len(), 2);
        assert_eq!(record.count.get(k), 5);
        assert_eq!(record.black_wins.get(k), 2);
        assert!((record.predictions.get(k) - 2.25).abs() < 1e-9);
        assert_eq!(record.rank_distribution, vec![0, 1, 2]);
    }

    #[test]
    fn test_load_malformed_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_dataset(&path).unwrap_err();
        assert!(matches!(err, StorageError::Json(_)));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("data.json");

        let mut record = DatasetRecord::new(42);
        record.add_games(
            CellKey::new(Coord::All, Coord::All, Coord::Specific(12), Coord::All),
            7,
            4,
            3.5,
        );
        let mut corpus = RawDataset::new();
        corpus.insert("a:b:7:gor", record);

        save_dataset(&path, &corpus).unwrap();
        let loaded = load_dataset(&path).unwrap();

        let record = loaded.get("a:b:7:gor").unwrap();
        assert_eq!(record.timestamp, 42);
        assert_eq!(
            record.count.get(CellKey::new(
                Coord::All,
                Coord::All,
                Coord::Specific(12),
                Coord::All
            )),
            7
        );
    }
}

//! Aggregation result models.

use serde::{Deserialize, Serialize};

use super::DatasetMetadata;
use crate::calculate::{is_insufficient_data, sample_share};

/// Win rate at one rank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WinRateBucket {
    pub rank: u32,

    /// Rank label, e.g. "5k" or "2d"
    pub label: String,

    /// Black win rate (0.0 to 1.0); 0.0 when there are no samples
    pub winrate: f64,

    pub black_wins: u64,

    pub samples: u64,
}

impl WinRateBucket {
    /// Whether presentation should shade this bucket as too thin to trust.
    pub fn insufficient_data(&self, total_samples: u64) -> bool {
        is_insufficient_data(self.samples, total_samples)
    }

    /// Share of all samples in this bucket (0.0 to 1.0).
    pub fn sample_share(&self, total_samples: u64) -> f64 {
        sample_share(self.samples, total_samples)
    }
}

/// Per-rank win rates over all 40 ranks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankAggregate {
    pub info: DatasetMetadata,

    pub winrate: Vec<WinRateBucket>,

    /// Overall black win rate across every bucket
    pub avg_winrate: f64,
}

impl RankAggregate {
    pub fn total_samples(&self) -> u64 {
        self.winrate.iter().map(|b| b.samples).sum()
    }

    pub fn total_black_wins(&self) -> u64 {
        self.winrate.iter().map(|b| b.black_wins).sum()
    }
}

/// Statistics for one band of ranks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BandedBucket {
    /// First rank of the band
    pub band_start: u32,

    pub label: String,

    pub winrate: f64,

    /// Mean predicted black win rate
    pub predicted_winrate: f64,

    pub unexpected_rank_changes: u64,

    pub black_wins: u64,

    pub samples: u64,
}

impl BandedBucket {
    pub fn insufficient_data(&self, total_samples: u64) -> bool {
        is_insufficient_data(self.samples, total_samples)
    }
}

/// Banded win rates, dense over all 40 ranks.
///
/// `winrate[r]` holds the bucket of the band containing rank `r`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandedRankAggregate {
    pub info: DatasetMetadata,

    pub band_width: u32,

    pub winrate: Vec<BandedBucket>,

    pub avg_winrate: f64,
}

impl BandedRankAggregate {
    /// One bucket per band, in rank order.
    pub fn bands(&self) -> impl Iterator<Item = &BandedBucket> {
        self.winrate
            .iter()
            .enumerate()
            .filter(|(rank, bucket)| *rank as u32 == bucket.band_start)
            .map(|(_, bucket)| bucket)
    }
}

/// Win rate at one handicap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandicapBucket {
    pub handicap: u32,

    pub winrate: f64,

    pub black_wins: u64,

    pub samples: u64,
}

impl HandicapBucket {
    pub fn insufficient_data(&self, total_samples: u64) -> bool {
        is_insufficient_data(self.samples, total_samples)
    }
}

/// Win rates for handicaps 0 through 9.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandicapAggregate {
    pub info: DatasetMetadata,

    /// Rank bands the handicap buckets were summed over (band starts)
    pub ranks: Vec<u32>,

    pub band_width: u32,

    pub handicaps: Vec<HandicapBucket>,

    pub avg_winrate: f64,
}

/// Players at one rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCount {
    pub rank: u32,
    pub label: String,
    pub count: u64,
}

/// Summary of a rank histogram.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankDistributionSummary {
    pub players: Vec<PlayerCount>,

    /// Player-weighted mean rank; NaN when the histogram is empty
    pub mean_rank: f64,

    /// Largest single-rank count, for axis scaling
    pub max_count: u64,

    pub total_players: u64,
}

/// Win rates by rank band (rows) and handicap (columns) for one board size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandicapPerformanceTable {
    pub size: u32,

    /// Games in the size's fully pre-aggregated bucket
    pub total_games: u64,

    pub rows: Vec<HandicapPerformanceRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandicapPerformanceRow {
    pub band_start: u32,

    /// e.g. "25k-21k"
    pub label: String,

    pub handicaps: Vec<HandicapBucket>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(samples: u64) -> WinRateBucket {
        WinRateBucket {
            rank: 10,
            label: "20k".to_string(),
            winrate: 0.5,
            black_wins: samples / 2,
            samples,
        }
    }

    #[test]
    fn test_bucket_insufficient_flag() {
        assert!(bucket(50).insufficient_data(100_000));
        assert!(!bucket(2000).insufficient_data(100_000));
    }

    #[test]
    fn test_bucket_sample_share() {
        assert!((bucket(250).sample_share(1000) - 0.25).abs() < 1e-9);
        assert_eq!(bucket(250).sample_share(0), 0.0);
    }

    #[test]
    fn test_banded_bands_iterator() {
        let mut winrate = Vec::new();
        for rank in 0..10u32 {
            let start = (rank / 5) * 5;
            winrate.push(BandedBucket {
                band_start: start,
                samples: start as u64 + 1,
                ..Default::default()
            });
        }
        let aggregate = BandedRankAggregate {
            info: DatasetMetadata::parse("a:b:0:gor"),
            band_width: 5,
            winrate,
            avg_winrate: 0.0,
        };

        let starts: Vec<u32> = aggregate.bands().map(|b| b.band_start).collect();
        assert_eq!(starts, vec![0, 5]);
    }

    #[test]
    fn test_rank_aggregate_serialization() {
        let aggregate = RankAggregate {
            info: DatasetMetadata::parse("a:b:0:gor"),
            winrate: vec![bucket(4)],
            avg_winrate: 0.5,
        };

        let json = serde_json::to_string(&aggregate).unwrap();
        let back: RankAggregate = serde_json::from_str(&json).unwrap();

        assert_eq!(back.winrate, aggregate.winrate);
        assert_eq!(back.total_samples(), 4);
        assert_eq!(back.total_black_wins(), 2);
    }
}

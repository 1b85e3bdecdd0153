//! Statistics calculation engine.
//!
//! Reduces the raw tally tables into plotted curves:
//! - Dimension resolution (empty selection reads the `ALL` bucket)
//! - Win-rate aggregation by rank, by rank band, and by handicap
//! - Carry-forward filling of banded results
//! - Rank histogram summaries

pub mod aggregate;
pub mod banding;
pub mod distribution;
pub mod resolve;

pub use aggregate::{
    aggregate_by_handicap, aggregate_by_rank, aggregate_by_rank_banded,
    handicap_performance_table, AggregateError,
};
pub use banding::carry_forward;
pub use distribution::summarize_rank_distribution;
pub use resolve::{resolve, ResolvedSelection};

/// Buckets below this share of the dataset are candidates for the
/// insufficient-data overlay.
pub const INSUFFICIENT_SHARE: f64 = 0.01;

/// Buckets above this many samples are always trusted.
pub const INSUFFICIENT_MAX_SAMPLES: u64 = 100;

/// Win rate from wins and samples; 0.0 when there are no samples.
pub fn calculate_win_rate(wins: u64, samples: u64) -> f64 {
    if samples == 0 {
        0.0
    } else {
        wins as f64 / samples as f64
    }
}

/// Mean predicted win rate from a sum of predictions.
pub fn calculate_predicted_rate(prediction_sum: f64, samples: u64) -> f64 {
    if samples == 0 {
        0.0
    } else {
        prediction_sum / samples as f64
    }
}

/// Fraction of the dataset's samples that fell in one bucket.
pub fn sample_share(samples: u64, total_samples: u64) -> f64 {
    if total_samples == 0 {
        0.0
    } else {
        samples as f64 / total_samples as f64
    }
}

/// A bucket is too thin to trust when it holds under 1% of the dataset
/// and no more than 100 samples.
pub fn is_insufficient_data(samples: u64, total_samples: u64) -> bool {
    sample_share(samples, total_samples) < INSUFFICIENT_SHARE
        && samples <= INSUFFICIENT_MAX_SAMPLES
}

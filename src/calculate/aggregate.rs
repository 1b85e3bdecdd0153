//! Win-rate aggregation over the tally tables.
//!
//! Every entry point walks the resolved (size, speed, handicap) coordinates
//! and sums the cells it needs. Missing cells contribute zero, and a bucket
//! with no samples keeps a win rate of 0.0 instead of dividing by zero.

use std::collections::BTreeSet;

use thiserror::Error;
use tracing::debug;

use super::banding::{band_ranks, band_starts, carry_forward};
use super::resolve::{resolve, ResolvedSelection};
use super::{calculate_predicted_rate, calculate_win_rate};
use crate::format::{rank_range_string, rank_string};
use crate::models::{
    BandedBucket, BandedRankAggregate, CellKey, Coord, DatasetMetadata, DatasetRecord,
    HandicapAggregate, HandicapBucket, HandicapPerformanceRow, HandicapPerformanceTable,
    RankAggregate, RawDataset, Selection, WinRateBucket, NUM_HANDICAPS, NUM_RANKS,
};

/// Band width of the handicap performance table rows.
pub const PERFORMANCE_TABLE_BAND: u32 = 5;

/// Rows start below this rank; the table ends with the 1d-5d band.
pub const PERFORMANCE_TABLE_RANKS: u32 = 35;

/// Errors that can occur during aggregation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("Band width must be greater than 0")]
    InvalidBandWidth,

    #[error("No band starts at rank 0")]
    MissingFirstBand,
}

fn find_record<'a>(
    corpus: &'a RawDataset,
    name: &str,
) -> Result<&'a DatasetRecord, AggregateError> {
    corpus
        .get(name)
        .ok_or_else(|| AggregateError::UnknownDataset(name.to_string()))
}

fn base_metadata(name: &str, record: &DatasetRecord) -> DatasetMetadata {
    let mut info = DatasetMetadata::parse(name);
    info.ignored = record.ignored;
    info
}

/// Black win rate at each of the 40 ranks.
pub fn aggregate_by_rank(
    corpus: &RawDataset,
    name: &str,
    selection: &Selection,
) -> Result<RankAggregate, AggregateError> {
    let record = find_record(corpus, name)?;
    let resolved = ResolvedSelection::from_selection(selection);

    let mut buckets: Vec<WinRateBucket> = (0..NUM_RANKS)
        .map(|rank| WinRateBucket {
            rank,
            label: rank_string(rank as f64),
            ..Default::default()
        })
        .collect();

    for (size, speed, handicap) in resolved.triples() {
        for bucket in buckets.iter_mut() {
            let key = CellKey::new(size, speed, Coord::Specific(bucket.rank), handicap);
            bucket.samples += record.count.get(key);
            bucket.black_wins += record.black_wins.get(key);
        }
    }

    let mut total_samples = 0u64;
    let mut total_wins = 0u64;
    for bucket in buckets.iter_mut() {
        total_samples += bucket.samples;
        total_wins += bucket.black_wins;
        bucket.winrate = calculate_win_rate(bucket.black_wins, bucket.samples);
    }

    let mut info = base_metadata(name, record);
    info.num_samples = Some(total_samples);

    debug!(
        "Aggregated {} by rank: {} samples over {} coordinate triples",
        name,
        total_samples,
        resolved.triples().count()
    );

    Ok(RankAggregate {
        info,
        winrate: buckets,
        avg_winrate: calculate_win_rate(total_wins, total_samples),
    })
}

/// Win rate, predicted win rate, and unexpected rank changes per band of
/// `band_width` ranks, filled out so every rank indexes its band.
pub fn aggregate_by_rank_banded(
    corpus: &RawDataset,
    name: &str,
    selection: &Selection,
    band_width: u32,
) -> Result<BandedRankAggregate, AggregateError> {
    if band_width == 0 {
        return Err(AggregateError::InvalidBandWidth);
    }

    let record = find_record(corpus, name)?;
    let resolved = ResolvedSelection::from_selection(selection);

    let mut sparse: Vec<Option<BandedBucket>> = vec![None; NUM_RANKS as usize];
    let mut total_samples = 0u64;
    let mut total_wins = 0u64;
    let mut total_changes = 0u64;

    for start in band_starts(band_width, NUM_RANKS) {
        let ranks = band_ranks(start, band_width, NUM_RANKS);
        let label = if ranks.len() > 1 {
            rank_range_string(ranks.start, ranks.end - 1)
        } else {
            rank_string(start as f64)
        };

        let mut bucket = BandedBucket {
            band_start: start,
            label,
            ..Default::default()
        };
        let mut prediction_sum = 0.0;

        for (size, speed, handicap) in resolved.triples() {
            for rank in ranks.clone() {
                let key = CellKey::new(size, speed, Coord::Specific(rank), handicap);
                bucket.samples += record.count.get(key);
                bucket.black_wins += record.black_wins.get(key);
                prediction_sum += record.predictions.get(key);
                if let Some(changes) = &record.unexpected_rank_changes {
                    bucket.unexpected_rank_changes += changes.get(key);
                }
            }
        }

        bucket.winrate = calculate_win_rate(bucket.black_wins, bucket.samples);
        bucket.predicted_winrate = calculate_predicted_rate(prediction_sum, bucket.samples);

        total_samples += bucket.samples;
        total_wins += bucket.black_wins;
        total_changes += bucket.unexpected_rank_changes;

        sparse[start as usize] = Some(bucket);
    }

    let winrate = carry_forward(sparse).ok_or(AggregateError::MissingFirstBand)?;

    let mut info = base_metadata(name, record);
    info.num_samples = Some(total_samples);
    info.unexpected_rank_changes = total_changes;

    debug!(
        "Aggregated {} in bands of {}: {} samples, {} unexpected rank changes",
        name, band_width, total_samples, total_changes
    );

    Ok(BandedRankAggregate {
        info,
        band_width,
        winrate,
        avg_winrate: calculate_win_rate(total_wins, total_samples),
    })
}

/// Black win rate at handicaps 0 through 9, summed over the chosen sizes,
/// speeds, and rank bands.
///
/// `ranks` holds band starts; an empty list covers every band of
/// `rank_band_width`. A rank covered by overlapping bands counts once.
pub fn aggregate_by_handicap(
    corpus: &RawDataset,
    name: &str,
    sizes: &[u32],
    speeds: &[u32],
    ranks: &[u32],
    rank_band_width: u32,
) -> Result<HandicapAggregate, AggregateError> {
    if rank_band_width == 0 {
        return Err(AggregateError::InvalidBandWidth);
    }

    let record = find_record(corpus, name)?;
    let sizes = resolve(sizes);
    let speeds = resolve(speeds);

    let band_list: Vec<u32> = if ranks.is_empty() {
        band_starts(rank_band_width, NUM_RANKS).collect()
    } else {
        ranks.to_vec()
    };

    let covered: BTreeSet<u32> = band_list
        .iter()
        .flat_map(|&start| band_ranks(start, rank_band_width, NUM_RANKS))
        .collect();

    let mut buckets: Vec<HandicapBucket> = (0..NUM_HANDICAPS)
        .map(|handicap| HandicapBucket {
            handicap,
            ..Default::default()
        })
        .collect();

    for &size in &sizes {
        for &speed in &speeds {
            for &rank in &covered {
                for bucket in buckets.iter_mut() {
                    let key = CellKey::new(
                        size,
                        speed,
                        Coord::Specific(rank),
                        Coord::Specific(bucket.handicap),
                    );
                    bucket.samples += record.count.get(key);
                    bucket.black_wins += record.black_wins.get(key);
                }
            }
        }
    }

    let mut total_samples = 0u64;
    let mut total_wins = 0u64;
    for bucket in buckets.iter_mut() {
        total_samples += bucket.samples;
        total_wins += bucket.black_wins;
        bucket.winrate = calculate_win_rate(bucket.black_wins, bucket.samples);
    }

    let mut info = base_metadata(name, record);
    info.num_samples = Some(total_samples);

    Ok(HandicapAggregate {
        info,
        ranks: band_list,
        band_width: rank_band_width,
        handicaps: buckets,
        avg_winrate: calculate_win_rate(total_wins, total_samples),
    })
}

/// Win rate by rank band and handicap for one board size (999 for all
/// sizes), across every game speed.
pub fn handicap_performance_table(
    corpus: &RawDataset,
    name: &str,
    size: u32,
) -> Result<HandicapPerformanceTable, AggregateError> {
    let record = find_record(corpus, name)?;
    let size_coord = Coord::from_raw(size);
    let total_games = record
        .count
        .get(CellKey::new(size_coord, Coord::All, Coord::All, Coord::All));

    let mut rows = Vec::new();
    for start in band_starts(PERFORMANCE_TABLE_BAND, PERFORMANCE_TABLE_RANKS) {
        let by_handicap =
            aggregate_by_handicap(corpus, name, &[size], &[], &[start], PERFORMANCE_TABLE_BAND)?;
        let ranks = band_ranks(start, PERFORMANCE_TABLE_BAND, NUM_RANKS);
        rows.push(HandicapPerformanceRow {
            band_start: start,
            label: rank_range_string(ranks.start, ranks.end.saturating_sub(1)),
            handicaps: by_handicap.handicaps,
        });
    }

    Ok(HandicapPerformanceTable {
        size,
        total_games,
        rows,
    })
}

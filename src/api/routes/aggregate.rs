use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{parse_list, ApiError};
use crate::calculate::{
    aggregate_by_handicap, aggregate_by_rank, aggregate_by_rank_banded, is_insufficient_data,
    sample_share,
};
use crate::models::{BandedBucket, DatasetMetadata, HandicapBucket, Selection, WinRateBucket};

// ── Query parameters ────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct AggregateParams {
    /// Comma-separated board sizes; empty means all
    pub sizes: Option<String>,
    pub speeds: Option<String>,
    pub handicaps: Option<String>,
    /// Comma-separated rank band starts (handicap view only)
    pub ranks: Option<String>,
    pub band_width: Option<u32>,
}

impl AggregateParams {
    fn selection(&self) -> Result<Selection, ApiError> {
        Ok(Selection::new(
            parse_list(self.sizes.as_deref(), "sizes")?,
            parse_list(self.speeds.as_deref(), "speeds")?,
            parse_list(self.handicaps.as_deref(), "handicaps")?,
        ))
    }
}

/// A bucket plus the overlay values presentation derives from it.
#[derive(Debug, Serialize)]
pub struct Flagged<T> {
    #[serde(flatten)]
    pub bucket: T,
    pub sample_share: f64,
    pub insufficient_data: bool,
}

fn flag<T>(bucket: T, samples: u64, total: u64) -> Flagged<T> {
    Flagged {
        bucket,
        sample_share: sample_share(samples, total),
        insufficient_data: is_insufficient_data(samples, total),
    }
}

#[derive(Debug, Serialize)]
pub struct RankCurveResponse {
    pub info: DatasetMetadata,
    pub avg_winrate: f64,
    pub winrate: Vec<Flagged<WinRateBucket>>,
}

#[derive(Debug, Serialize)]
pub struct BandedCurveResponse {
    pub info: DatasetMetadata,
    pub band_width: u32,
    pub avg_winrate: f64,
    pub winrate: Vec<Flagged<BandedBucket>>,
}

#[derive(Debug, Serialize)]
pub struct HandicapCurveResponse {
    pub info: DatasetMetadata,
    pub ranks: Vec<u32>,
    pub band_width: u32,
    pub avg_winrate: f64,
    pub handicaps: Vec<Flagged<HandicapBucket>>,
}

// ── Endpoints ───────────────────────────────────────────────────

pub async fn by_rank(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<AggregateParams>,
) -> Result<Json<RankCurveResponse>, ApiError> {
    let selection = params.selection()?;
    let aggregate = aggregate_by_rank(&state.corpus, &name, &selection)?;
    let total = aggregate.info.num_samples.unwrap_or_default();

    Ok(Json(RankCurveResponse {
        avg_winrate: aggregate.avg_winrate,
        winrate: aggregate
            .winrate
            .into_iter()
            .map(|b| {
                let samples = b.samples;
                flag(b, samples, total)
            })
            .collect(),
        info: aggregate.info,
    }))
}

pub async fn by_rank_banded(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<AggregateParams>,
) -> Result<Json<BandedCurveResponse>, ApiError> {
    let selection = params.selection()?;
    let band_width = params.band_width.unwrap_or(state.default_band_width);
    let aggregate = aggregate_by_rank_banded(&state.corpus, &name, &selection, band_width)?;
    let total = aggregate.info.num_samples.unwrap_or_default();

    Ok(Json(BandedCurveResponse {
        band_width: aggregate.band_width,
        avg_winrate: aggregate.avg_winrate,
        winrate: aggregate
            .winrate
            .into_iter()
            .map(|b| {
                let samples = b.samples;
                flag(b, samples, total)
            })
            .collect(),
        info: aggregate.info,
    }))
}

pub async fn by_handicap(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<AggregateParams>,
) -> Result<Json<HandicapCurveResponse>, ApiError> {
    let sizes = parse_list(params.sizes.as_deref(), "sizes")?;
    let speeds = parse_list(params.speeds.as_deref(), "speeds")?;
    let ranks = parse_list(params.ranks.as_deref(), "ranks")?;
    let band_width = params.band_width.unwrap_or(state.default_band_width);

    let aggregate =
        aggregate_by_handicap(&state.corpus, &name, &sizes, &speeds, &ranks, band_width)?;
    let total = aggregate.info.num_samples.unwrap_or_default();

    Ok(Json(HandicapCurveResponse {
        ranks: aggregate.ranks,
        band_width: aggregate.band_width,
        avg_winrate: aggregate.avg_winrate,
        handicaps: aggregate
            .handicaps
            .into_iter()
            .map(|b| {
                let samples = b.samples;
                flag(b, samples, total)
            })
            .collect(),
        info: aggregate.info,
    }))
}

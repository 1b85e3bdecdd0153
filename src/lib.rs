//! # Tally Explorer
//!
//! Reduces precomputed Go game tallies (win counts, sample counts, and
//! prediction sums bucketed by board size, game speed, rank, and handicap)
//! into win-rate curves for comparing rating systems.
//!
//! ## Architecture
//!
//! - **models**: Tally corpus, dataset metadata, selections, and results
//! - **calculate**: Dimension resolution, aggregation, banding, summaries
//! - **format**: Rank and count labels
//! - **storage**: Corpus loading and persisted selection state
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod format;
pub mod models;
pub mod storage;

pub use models::*;

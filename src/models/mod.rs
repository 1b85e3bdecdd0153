//! Core data models: the tally corpus, dataset metadata, and aggregation results.

mod coordinate;
mod dataset;
mod metadata;
mod selection;
mod stats;

pub use coordinate::*;
pub use dataset::*;
pub use metadata::*;
pub use selection::*;
pub use stats::*;

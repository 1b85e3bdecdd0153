//! Route handlers, grouped by resource.

pub mod aggregate;
pub mod datasets;
pub mod selection;

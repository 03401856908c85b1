//! Downstream processing over the active vector dataset: choropleth
//! classification, spatial bounding-box filtering, and categorical
//! aggregation.
//!
//! None of these operations fail on malformed per-feature data; bad
//! values are excluded or coerced so one odd feature never blocks
//! visualization of the rest.

pub mod aggregate;
pub mod classify;
pub mod spatial;

pub use aggregate::{aggregate, GroupStat};
pub use classify::{classify, ClassificationState};
pub use spatial::filter_by_box;

//! Common types and utilities shared across all geolens crates.

pub mod bbox;
pub mod catalog;
pub mod dataset;
pub mod error;
pub mod grid;
pub mod variable;

pub use bbox::BoundingBox;
pub use catalog::RemoteFileDescriptor;
pub use dataset::{numeric_value, Dataset, FeatureKey, FeatureRecord, Geometry};
pub use error::{GeoError, GeoResult};
pub use grid::NumericGrid;
pub use variable::VariableDescriptor;

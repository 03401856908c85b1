//! The active-layer session.
//!
//! Holds the one vector dataset the user is currently working with, plus
//! the choropleth state derived from it. Replacing the layer is atomic
//! from the consumer's perspective and explicitly invalidates the
//! classification; filtering is non-destructive so the canonical dataset
//! survives for reset.

use std::sync::Arc;

use tracing::{debug, info};

use feature_processor::{aggregate, classify, filter_by_box, ClassificationState, GroupStat};
use geo_common::{BoundingBox, Dataset, GeoError, GeoResult};

#[derive(Debug, Default)]
pub struct ActiveLayer {
    dataset: Option<Arc<Dataset>>,
    classification: Option<ClassificationState>,
}

impl ActiveLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new canonical dataset, dropping any classification built
    /// against the previous one.
    pub fn replace(&mut self, dataset: Dataset) -> Arc<Dataset> {
        let dataset = Arc::new(dataset);
        info!(features = dataset.len(), "replacing active layer");
        self.dataset = Some(Arc::clone(&dataset));
        self.classification = None;
        dataset
    }

    pub fn dataset(&self) -> Option<&Arc<Dataset>> {
        self.dataset.as_ref()
    }

    pub fn classification(&self) -> Option<&ClassificationState> {
        self.classification.as_ref()
    }

    /// Classify the active dataset by an attribute.
    ///
    /// An existing classification for the same attribute is reused;
    /// asking for a different attribute rebuilds it.
    pub fn classify(&mut self, attribute: &str) -> GeoResult<&ClassificationState> {
        let dataset = self.dataset.as_ref().ok_or(GeoError::EmptyDataset)?;

        let state = match self.classification.take() {
            Some(state) if state.attribute == attribute => state,
            _ => {
                debug!(attribute, "building classification");
                classify(dataset, attribute)
            }
        };
        Ok(self.classification.insert(state))
    }

    /// Filter the canonical dataset to a bounding box.
    ///
    /// The canonical dataset is untouched; the filtered view is returned
    /// to the caller, so resetting is just rendering the canonical layer
    /// again.
    pub fn filter_by_box(&self, bbox: BoundingBox) -> GeoResult<Dataset> {
        let dataset = self.dataset.as_ref().ok_or(GeoError::EmptyDataset)?;
        Ok(filter_by_box(dataset, &bbox))
    }

    /// Group the canonical dataset by a categorical attribute, summing a
    /// numeric one.
    pub fn aggregate(
        &self,
        categorical_attr: &str,
        numeric_attr: &str,
    ) -> GeoResult<std::collections::BTreeMap<String, GroupStat>> {
        let dataset = self.dataset.as_ref().ok_or(GeoError::EmptyDataset)?;
        Ok(aggregate(dataset, categorical_attr, numeric_attr))
    }
}

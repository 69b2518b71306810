//! Which criteria are active, and which constraint spec applies where.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::spec::{ConstraintSpec, SpecExt};
use crate::{all_criteria, ImageAcquisition, TrialCriteria};

/// Returns the identifiers of the criteria sets the user has selected.
pub trait CriteriaSelection: Send + Sync {
    fn selected_criteria_ids(&self) -> Vec<String>;
}

/// Resolves the constraint spec for a set of criteria.
///
/// With an image id the spec is narrowed to that image's acquisition and
/// timepoint type; without one the cohort-wide spec (keyed by timepoint
/// type) is returned. `None` means nothing applies.
pub trait ConstraintResolver: Send + Sync {
    fn resolve(&self, criteria_ids: &[String], image_id: Option<&str>) -> Option<ConstraintSpec>;
}

/// Thread-safe selection of active criteria ids.
#[derive(Debug, Default)]
pub struct SelectedCriteria {
    ids: RwLock<Vec<String>>,
}

impl SelectedCriteria {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: RwLock::new(ids.into_iter().map(Into::into).collect()),
        }
    }

    pub fn select(&self, id: impl Into<String>) {
        let id = id.into();
        let mut ids = self.ids.write().unwrap_or_else(PoisonError::into_inner);
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    pub fn deselect(&self, id: &str) {
        self.ids
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|existing| existing != id);
    }

    pub fn replace<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.ids.write().unwrap_or_else(PoisonError::into_inner) =
            ids.into_iter().map(Into::into).collect();
    }
}

impl CriteriaSelection for SelectedCriteria {
    fn selected_criteria_ids(&self) -> Vec<String> {
        self.ids.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// What the viewer knows about an image: how it was acquired and which
/// timepoint its study belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageContext {
    #[serde(default)]
    pub modality: Option<String>,
    #[serde(default)]
    pub slice_thickness: Option<f64>,
    #[serde(default)]
    pub body_part: Option<String>,
    /// e.g. "baseline" or "followup"; `None` if the study has no timepoint.
    #[serde(default)]
    pub timepoint_type: Option<String>,
}

impl ImageContext {
    fn acquisition(&self) -> ImageAcquisition {
        let modality = self.modality.as_deref().unwrap_or_default();
        let sectional = matches!(modality, "CT" | "MR");
        let radiograph = matches!(modality, "CR" | "DX");
        ImageAcquisition {
            slice_thickness: if sectional { self.slice_thickness } else { None },
            is_chest_xray: radiograph
                && self
                    .body_part
                    .as_deref()
                    .is_some_and(|part| part.eq_ignore_ascii_case("CHEST")),
        }
    }
}

/// Looks up image metadata loaded by the viewer.
pub trait ImageMetadata: Send + Sync {
    fn image_context(&self, image_id: &str) -> Option<ImageContext>;
}

impl ImageMetadata for HashMap<String, ImageContext> {
    fn image_context(&self, image_id: &str) -> Option<ImageContext> {
        self.get(image_id).cloned()
    }
}

/// Resolves specs from the built-in criteria sets.
pub struct CriteriaRegistry<I> {
    criteria: Vec<Box<dyn TrialCriteria>>,
    images: I,
}

impl<I: ImageMetadata> CriteriaRegistry<I> {
    pub fn new(images: I) -> Self {
        Self::with_criteria(all_criteria(), images)
    }

    pub fn with_criteria(criteria: Vec<Box<dyn TrialCriteria>>, images: I) -> Self {
        Self { criteria, images }
    }

    fn find(&self, id: &str) -> Option<&dyn TrialCriteria> {
        self.criteria.iter().find(|c| c.id() == id).map(|c| &**c)
    }
}

impl<I: ImageMetadata> ConstraintResolver for CriteriaRegistry<I> {
    fn resolve(&self, criteria_ids: &[String], image_id: Option<&str>) -> Option<ConstraintSpec> {
        // Only one criteria set is applied at a time: the first that resolves.
        for criteria_id in criteria_ids {
            let Some(criteria) = self.find(criteria_id) else {
                warn!(%criteria_id, "no such trial criteria defined");
                continue;
            };

            let Some(image_id) = image_id else {
                return Some(criteria.constraints(None));
            };

            let Some(context) = self.images.image_context(image_id) else {
                debug!(image_id, "no metadata for image");
                continue;
            };

            let Some(timepoint_type) = context.timepoint_type.as_deref() else {
                warn!(image_id, "timepoint related to study is missing");
                continue;
            };

            let acquisition = context.acquisition();
            return criteria
                .constraints(Some(&acquisition))
                .section(timepoint_type)
                .cloned();
        }
        None
    }
}

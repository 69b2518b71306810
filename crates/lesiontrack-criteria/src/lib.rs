//! lesiontrack-criteria
//!
//! Trial response-assessment criteria (RECIST 1.1, irRC) expressed as
//! declarative constraint specs, the generic evaluator that checks data
//! against them, and the resolver that picks the spec for a given image.

pub mod criteria;
pub mod error;
pub mod evaluate;
pub mod message;
pub mod resolve;
mod rules;
pub mod spec;

pub use evaluate::evaluate;
pub use spec::{ConstraintSpec, SpecExt};

/// Acquisition details that tailor a criteria set to one image.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImageAcquisition {
    /// Slice thickness in mm; only set for CT and MR.
    pub slice_thickness: Option<f64>,
    pub is_chest_xray: bool,
}

/// Trait implemented by each trial response-assessment criteria set.
pub trait TrialCriteria: Send + Sync {
    /// Unique identifier, as selected by the user (e.g. "RECIST", "irRC").
    fn id(&self) -> &str;

    /// Human-readable name (e.g. "RECIST 1.1").
    fn name(&self) -> &str;

    /// Build the full constraint document, keyed by timepoint type.
    ///
    /// With no acquisition details the generic thresholds apply.
    fn constraints(&self, image: Option<&ImageAcquisition>) -> ConstraintSpec;
}

/// Return all registered criteria sets.
pub fn all_criteria() -> Vec<Box<dyn TrialCriteria>> {
    vec![
        Box::new(criteria::recist::Recist),
        Box::new(criteria::irrc::IrRc),
    ]
}

/// Look up a criteria set by ID.
pub fn get_criteria(id: &str) -> Option<Box<dyn TrialCriteria>> {
    all_criteria().into_iter().find(|c| c.id() == id)
}

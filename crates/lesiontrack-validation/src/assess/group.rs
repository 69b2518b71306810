use tracing::debug;

use lesiontrack_core::models::{ErrorScope, Measurement};
use lesiontrack_criteria::error::CriteriaError;
use lesiontrack_criteria::spec::section;
use lesiontrack_criteria::{evaluate, ConstraintSpec, SpecExt};

use super::statistic;
use crate::state::ValidationState;
use crate::store::ErrorContext;

const TOTAL_NUMBER_OF_LESIONS: &str = "totalNumberOfLesions";

/// Validate cohort-wide statistics against the `group` section of one
/// timepoint type's constraints.
///
/// The lesion total counts every measurement, regardless of timepoint or
/// criteria.
pub fn assess_group(
    constraints: &ConstraintSpec,
    measurements: &[Measurement],
    state: &mut ValidationState,
) -> Result<(), CriteriaError> {
    let Some(group) = constraints.section(section::GROUP) else {
        debug!("no group constraints");
        return Ok(());
    };

    state.clear_scope(ErrorScope::Group);

    let data = statistic(TOTAL_NUMBER_OF_LESIONS, measurements.len());
    let violations = evaluate(&data, Some(group))?;
    let outcome = state.record(group, violations, &ErrorContext::group());
    debug!(
        scope = %ErrorScope::Group,
        inserted = outcome.inserted,
        updated = outcome.updated,
        "group assessed"
    );
    Ok(())
}

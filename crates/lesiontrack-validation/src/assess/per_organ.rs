use tracing::debug;

use lesiontrack_core::models::{ErrorScope, Measurement};
use lesiontrack_criteria::error::CriteriaError;
use lesiontrack_criteria::spec::section;
use lesiontrack_criteria::{evaluate, ConstraintSpec, SpecExt};

use super::statistic;
use crate::state::ValidationState;
use crate::store::ErrorContext;

const NUMBER_OF_LESIONS_PER_ORGAN: &str = "numberOfLesionsPerOrgan";

/// Locations in order of first appearance. Unlocated measurements are skipped.
pub fn distinct_locations(measurements: &[Measurement]) -> Vec<&str> {
    let mut locations: Vec<&str> = Vec::new();
    for location in measurements.iter().filter_map(|m| m.location.as_deref()) {
        if !locations.contains(&location) {
            locations.push(location);
        }
    }
    locations
}

/// Validate lesion counts per organ against the `perOrgan` section.
///
/// Errors are prefixed with the location, e.g. `"Liver: "`.
pub fn assess_per_organ(
    constraints: &ConstraintSpec,
    measurements: &[Measurement],
    state: &mut ValidationState,
) -> Result<(), CriteriaError> {
    let Some(per_organ) = constraints.section(section::PER_ORGAN) else {
        debug!("no per-organ constraints");
        return Ok(());
    };

    state.clear_scope(ErrorScope::PerOrgan);

    for location in distinct_locations(measurements) {
        let count = measurements
            .iter()
            .filter(|m| m.location.as_deref() == Some(location))
            .count();
        let prefix = format!("{location}: ");
        let data = statistic(NUMBER_OF_LESIONS_PER_ORGAN, count);
        let violations = evaluate(&data, Some(per_organ))?;
        state.record(per_organ, violations, &ErrorContext::per_organ(&prefix));
        debug!(%prefix, count, "organ assessed");
    }
    Ok(())
}

use tracing::debug;

use lesiontrack_core::models::ValidationInput;
use lesiontrack_criteria::error::CriteriaError;
use lesiontrack_criteria::spec::section;
use lesiontrack_criteria::{evaluate, ConstraintSpec, SpecExt};

use crate::state::ValidationState;
use crate::store::ErrorContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetClass {
    Target,
    NonTarget,
}

impl TargetClass {
    pub fn of(is_target: bool) -> Self {
        if is_target {
            Self::Target
        } else {
            Self::NonTarget
        }
    }

    pub fn section(self) -> &'static str {
        match self {
            Self::Target => section::TARGET,
            Self::NonTarget => section::NON_TARGET,
        }
    }
}

/// Sub-sections to probe, most specific first.
pub fn nodality_candidates(is_nodal: Option<bool>) -> &'static [&'static str] {
    match is_nodal {
        Some(true) => &[section::NODAL, section::ALL],
        Some(false) => &[section::EXTRA_NODAL, section::ALL],
        None => &[section::ALL],
    }
}

/// The rule set that applies to one lesion, if any.
pub fn select_branch<'a>(
    constraints: &'a ConstraintSpec,
    is_target: bool,
    is_nodal: Option<bool>,
) -> Option<&'a ConstraintSpec> {
    let branch = constraints.section(TargetClass::of(is_target).section())?;
    nodality_candidates(is_nodal)
        .iter()
        .find_map(|key| branch.section(key))
}

/// Validate one lesion's timepoint data, replacing whatever was recorded
/// under its prefix.
pub fn assess_single(
    constraints: &ConstraintSpec,
    input: &ValidationInput,
    state: &mut ValidationState,
) -> Result<(), CriteriaError> {
    let Some(rules) = select_branch(constraints, input.is_target, input.is_nodal) else {
        debug!(
            measurement_id = %input.measurement_id,
            "no constraints for this lesion class"
        );
        return Ok(());
    };

    let prefix = input.prefix();
    state.clear_prefix(&prefix);

    let violations = evaluate(&input.to_value(), Some(rules))?;
    let outcome = state.record(
        rules,
        violations,
        &ErrorContext::single(&prefix, &input.measurement_id),
    );
    debug!(
        %prefix,
        measurement_id = %input.measurement_id,
        inserted = outcome.inserted,
        "measurement assessed"
    );
    Ok(())
}

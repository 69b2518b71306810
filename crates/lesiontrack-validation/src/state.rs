use lesiontrack_core::models::{ErrorScope, Violation};
use lesiontrack_criteria::evaluate::constrained_attributes;
use lesiontrack_criteria::ConstraintSpec;

use crate::store::{ErrorContext, ErrorStore, SuccessStore, UpsertOutcome};

/// The error and success caches, mutated together.
#[derive(Debug, Clone, Default)]
pub struct ValidationState {
    pub errors: ErrorStore,
    pub successes: SuccessStore,
}

impl ValidationState {
    pub fn clear_scope(&mut self, scope: ErrorScope) -> usize {
        self.errors.remove_by_scope(scope) + self.successes.remove_by_scope(scope)
    }

    pub fn clear_prefix(&mut self, prefix: &str) -> usize {
        self.errors.remove_by_prefix(prefix) + self.successes.remove_by_prefix(prefix)
    }

    pub fn clear(&mut self) {
        self.errors.clear();
        self.successes.clear();
    }

    /// Route one evaluation result: violations go to the error store and
    /// every other attribute the spec constrains is confirmed as passed.
    pub fn record(
        &mut self,
        spec: &ConstraintSpec,
        violations: Option<Vec<Violation>>,
        ctx: &ErrorContext<'_>,
    ) -> UpsertOutcome {
        let violations = violations.unwrap_or_default();
        let passed = constrained_attributes(spec)
            .filter(|attribute| !violations.iter().any(|v| v.attribute == *attribute));
        self.successes.record_passed(passed, ctx);

        if violations.is_empty() {
            return UpsertOutcome::default();
        }
        self.errors.upsert(&violations, ctx)
    }

    /// Combined revision of both stores.
    pub fn revision(&self) -> u64 {
        self.errors.revision() + self.successes.revision()
    }
}


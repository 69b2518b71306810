//! Upsert-by-key caches of validation errors and success messages.
//!
//! Both stores keep records in insertion order and bump a revision counter
//! only on effective mutations, so a consumer can skip repainting when a
//! validation pass changed nothing.

use serde_json::Value;
use uuid::Uuid;

use lesiontrack_core::models::{ErrorKey, ErrorScope, SuccessMessage, ValidationError, Violation};
use lesiontrack_criteria::message::{capitalize, prettify};

/// Where a batch of results came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorContext<'a> {
    pub prefix: &'a str,
    pub scope: Option<ErrorScope>,
    pub measurement_id: Option<&'a str>,
}

impl<'a> ErrorContext<'a> {
    pub fn group() -> Self {
        Self {
            prefix: "",
            scope: Some(ErrorScope::Group),
            measurement_id: None,
        }
    }

    pub fn per_organ(prefix: &'a str) -> Self {
        Self {
            prefix,
            scope: Some(ErrorScope::PerOrgan),
            measurement_id: None,
        }
    }

    /// Single-measurement results are untyped.
    pub fn single(prefix: &'a str, measurement_id: &'a str) -> Self {
        Self {
            prefix,
            scope: None,
            measurement_id: Some(measurement_id),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub inserted: usize,
    pub updated: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ErrorStore {
    records: Vec<ValidationError>,
    revision: u64,
}

impl ErrorStore {
    /// Insert each violation, or refresh the `value` of the record that
    /// already has its (attribute, validator, error, prefix) identity.
    pub fn upsert(&mut self, violations: &[Violation], ctx: &ErrorContext<'_>) -> UpsertOutcome {
        let mut outcome = UpsertOutcome::default();
        for violation in violations {
            let key = violation.key(ctx.prefix);
            match self.records.iter().position(|r| r.key() == key) {
                Some(index) => {
                    let existing = &mut self.records[index];
                    if existing.value != violation.value {
                        existing.value = violation.value.clone();
                        outcome.updated += 1;
                        self.revision += 1;
                    }
                }
                None => {
                    self.records.push(ValidationError {
                        id: Uuid::new_v4(),
                        attribute: violation.attribute.clone(),
                        validator: violation.validator.clone(),
                        error: violation.error.clone(),
                        value: violation.value.clone(),
                        prefix: ctx.prefix.to_string(),
                        scope: ctx.scope,
                        measurement_id: ctx.measurement_id.map(str::to_string),
                    });
                    outcome.inserted += 1;
                    self.revision += 1;
                }
            }
        }
        outcome
    }

    pub fn remove_by_scope(&mut self, scope: ErrorScope) -> usize {
        self.remove_where(|r| r.scope == Some(scope))
    }

    pub fn remove_by_prefix(&mut self, prefix: &str) -> usize {
        self.remove_where(|r| r.prefix == prefix)
    }

    pub fn clear(&mut self) -> usize {
        self.remove_where(|_| true)
    }

    fn remove_where(&mut self, predicate: impl Fn(&ValidationError) -> bool) -> usize {
        let before = self.records.len();
        self.records.retain(|r| !predicate(r));
        let removed = before - self.records.len();
        if removed > 0 {
            self.revision += 1;
        }
        removed
    }

    pub fn find_one(&self, key: &ErrorKey<'_>) -> Option<&ValidationError> {
        self.records.iter().find(|r| r.key() == *key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.records.iter()
    }

    pub fn by_scope(&self, scope: ErrorScope) -> impl Iterator<Item = &ValidationError> {
        self.records.iter().filter(move |r| r.scope == Some(scope))
    }

    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.records.iter().filter(move |r| r.prefix == prefix)
    }

    pub fn for_measurement<'a>(
        &'a self,
        measurement_id: &'a str,
    ) -> impl Iterator<Item = &'a ValidationError> {
        self.records
            .iter()
            .filter(move |r| r.measurement_id.as_deref() == Some(measurement_id))
    }

    /// The latest offending value recorded for an error identity.
    pub fn value_of(&self, key: &ErrorKey<'_>) -> Option<&Value> {
        self.find_one(key).map(|r| &r.value)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn to_vec(&self) -> Vec<ValidationError> {
        self.records.clone()
    }
}

/// Positive confirmations, keyed by (attribute, prefix).
#[derive(Debug, Clone, Default)]
pub struct SuccessStore {
    records: Vec<SuccessMessage>,
    revision: u64,
}

impl SuccessStore {
    /// Record that each attribute passed. Already-recorded pairs are left as is.
    pub fn record_passed<'s>(
        &mut self,
        attributes: impl IntoIterator<Item = &'s str>,
        ctx: &ErrorContext<'_>,
    ) -> usize {
        let mut inserted = 0;
        for attribute in attributes {
            if self.find(attribute, ctx.prefix).is_some() {
                continue;
            }
            self.records.push(SuccessMessage {
                id: Uuid::new_v4(),
                attribute: attribute.to_string(),
                message: format!("{} satisfies the criteria", capitalize(&prettify(attribute))),
                prefix: ctx.prefix.to_string(),
                scope: ctx.scope,
                measurement_id: ctx.measurement_id.map(str::to_string),
            });
            inserted += 1;
        }
        if inserted > 0 {
            self.revision += 1;
        }
        inserted
    }

    pub fn remove_by_scope(&mut self, scope: ErrorScope) -> usize {
        self.remove_where(|r| r.scope == Some(scope))
    }

    pub fn remove_by_prefix(&mut self, prefix: &str) -> usize {
        self.remove_where(|r| r.prefix == prefix)
    }

    pub fn clear(&mut self) -> usize {
        self.remove_where(|_| true)
    }

    fn remove_where(&mut self, predicate: impl Fn(&SuccessMessage) -> bool) -> usize {
        let before = self.records.len();
        self.records.retain(|r| !predicate(r));
        let removed = before - self.records.len();
        if removed > 0 {
            self.revision += 1;
        }
        removed
    }

    pub fn find(&self, attribute: &str, prefix: &str) -> Option<&SuccessMessage> {
        self.records
            .iter()
            .find(|r| r.attribute == attribute && r.prefix == prefix)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SuccessMessage> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn to_vec(&self) -> Vec<SuccessMessage> {
        self.records.clone()
    }
}

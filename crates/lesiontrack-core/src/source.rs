//! Read access to the measurement record store.

use std::sync::{PoisonError, RwLock};

use crate::error::CoreError;
use crate::models::Measurement;

/// The record store holding [`Measurement`]s.
///
/// Reads are synchronous and return measurements in insertion order.
/// Counting and filtering, e.g. by location, happen on the `find_all`
/// snapshot so one validation pass sees a single consistent view.
pub trait MeasurementSource: Send + Sync {
    fn find_one(&self, id: &str) -> Option<Measurement>;

    fn find_all(&self) -> Vec<Measurement>;
}

/// Ordered in-memory measurement collection.
#[derive(Debug, Default)]
pub struct InMemoryMeasurements {
    records: RwLock<Vec<Measurement>>,
}

impl InMemoryMeasurements {
    pub fn new(measurements: Vec<Measurement>) -> Self {
        Self {
            records: RwLock::new(measurements),
        }
    }

    pub fn insert(&self, measurement: Measurement) -> Result<(), CoreError> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        if records.iter().any(|m| m.id == measurement.id) {
            return Err(CoreError::DuplicateMeasurement(measurement.id));
        }
        records.push(measurement);
        Ok(())
    }

    /// Replace the record with the same id, keeping its position.
    pub fn update(&self, measurement: Measurement) -> Result<(), CoreError> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let slot = records
            .iter_mut()
            .find(|m| m.id == measurement.id)
            .ok_or_else(|| CoreError::MeasurementNotFound(measurement.id.clone()))?;
        *slot = measurement;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn remove(&self, id: &str) -> Option<Measurement> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let index = records.iter().position(|m| m.id == id)?;
        Some(records.remove(index))
    }
}

impl MeasurementSource for InMemoryMeasurements {
    fn find_one(&self, id: &str) -> Option<Measurement> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|m| m.id == id)
            .cloned()
    }

    fn find_all(&self) -> Vec<Measurement> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Host-side hook told when the validation caches have changed and the
/// viewer should redraw. The validation engine itself never calls it.
pub trait RepaintSink: Send + Sync {
    fn notify_changed(&self);
}

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::Value;

use lesiontrack_core::models::{Measurement, TimepointMeasurement};
use lesiontrack_core::source::{InMemoryMeasurements, MeasurementSource};
use lesiontrack_criteria::resolve::{ConstraintResolver, SelectedCriteria};
use lesiontrack_criteria::{ConstraintSpec, SpecExt};
use lesiontrack_validation::{MeasurementValidator, ValidatorConfig};

/// Resolves every criteria id to the same document. With an image id the
/// `baseline` bucket is returned, mirroring a baseline image lookup.
pub struct StaticResolver {
    pub spec: Option<ConstraintSpec>,
}

impl StaticResolver {
    pub fn new(spec: Value) -> Self {
        Self {
            spec: spec.as_object().cloned(),
        }
    }

    pub fn empty() -> Self {
        Self { spec: None }
    }
}

impl ConstraintResolver for StaticResolver {
    fn resolve(&self, _criteria_ids: &[String], image_id: Option<&str>) -> Option<ConstraintSpec> {
        let spec = self.spec.as_ref()?;
        match image_id {
            Some(_) => spec.section("baseline").cloned(),
            None => Some(spec.clone()),
        }
    }
}

/// Wraps an in-memory store and counts reads.
#[derive(Default)]
pub struct CountingSource {
    pub inner: InMemoryMeasurements,
    pub find_one_calls: AtomicUsize,
    pub find_all_calls: AtomicUsize,
}

impl CountingSource {
    pub fn new(measurements: Vec<Measurement>) -> Self {
        Self {
            inner: InMemoryMeasurements::new(measurements),
            ..Self::default()
        }
    }

    pub fn find_one_calls(&self) -> usize {
        self.find_one_calls.load(Ordering::SeqCst)
    }

    pub fn find_all_calls(&self) -> usize {
        self.find_all_calls.load(Ordering::SeqCst)
    }
}

impl MeasurementSource for CountingSource {
    fn find_one(&self, id: &str) -> Option<Measurement> {
        self.find_one_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_one(id)
    }

    fn find_all(&self) -> Vec<Measurement> {
        self.find_all_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_all()
    }
}

pub fn target(id: &str, lesion_number: u32, location: &str, longest: f64, shortest: f64) -> Measurement {
    Measurement::new(id, true, lesion_number)
        .with_location(location)
        .with_nodal(false)
        .with_timepoint(
            "tp-baseline",
            TimepointMeasurement::bidirectional(format!("img-{id}"), longest, shortest),
        )
}

pub fn validator(
    source: Arc<CountingSource>,
    resolver: StaticResolver,
) -> MeasurementValidator {
    MeasurementValidator::new(
        source,
        Arc::new(SelectedCriteria::new(["RECIST"])),
        Arc::new(resolver),
        &ValidatorConfig::default(),
    )
}

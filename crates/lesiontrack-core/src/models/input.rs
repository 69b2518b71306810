use serde_json::{Map, Value};

use crate::models::measurement::{lesion_label, Measurement, TimepointMeasurement};

/// A short-lived copy of one timepoint's data, stamped with the owning
/// measurement's classification so it can be validated on its own.
///
/// The stored [`TimepointMeasurement`] is never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationInput {
    pub measurement_id: String,
    pub is_target: bool,
    pub is_nodal: Option<bool>,
    pub lesion_number: u32,
    pub timepoint: TimepointMeasurement,
}

impl ValidationInput {
    pub fn new(measurement: &Measurement, timepoint: &TimepointMeasurement) -> Self {
        Self {
            measurement_id: measurement.id.clone(),
            is_target: measurement.is_target,
            is_nodal: measurement.is_nodal,
            lesion_number: measurement.lesion_number,
            timepoint: timepoint.clone(),
        }
    }

    /// Error/success prefix for this lesion, e.g. `"Target 1: "`.
    ///
    /// Derived only from the target flag and lesion number so it stays
    /// stable across geometry edits.
    pub fn prefix(&self) -> String {
        format!("{}: ", lesion_label(self.is_target, self.lesion_number))
    }

    /// The attribute object handed to the constraint evaluator.
    pub fn to_value(&self) -> Value {
        let mut attrs: Map<String, Value> = self.timepoint.to_attributes();
        attrs.insert("isTarget".into(), Value::Bool(self.is_target));
        match self.is_nodal {
            Some(is_nodal) => attrs.insert("isNodal".into(), Value::Bool(is_nodal)),
            None => attrs.remove("isNodal"),
        };
        attrs.insert("lesionNumber".into(), Value::from(self.lesion_number));
        attrs.insert("_id".into(), Value::String(self.measurement_id.clone()));
        Value::Object(attrs)
    }
}

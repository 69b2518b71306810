use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A tracked lesion with one entry per timepoint it was assessed at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub tool_type: String,
    pub is_target: bool,
    /// `None` when nodality has not been recorded yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_nodal: Option<bool>,
    /// Organ or site label, e.g. "Liver" or "Lung Right".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub lesion_number: u32,
    #[serde(default)]
    pub timepoints: BTreeMap<String, TimepointMeasurement>,
}

impl Measurement {
    pub fn new(id: impl Into<String>, is_target: bool, lesion_number: u32) -> Self {
        Self {
            id: id.into(),
            tool_type: if is_target { "bidirectional" } else { "nonTarget" }.to_string(),
            is_target,
            is_nodal: None,
            location: None,
            lesion_number,
            timepoints: BTreeMap::new(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_nodal(mut self, is_nodal: bool) -> Self {
        self.is_nodal = Some(is_nodal);
        self
    }

    pub fn with_timepoint(
        mut self,
        timepoint_id: impl Into<String>,
        data: TimepointMeasurement,
    ) -> Self {
        self.timepoints.insert(timepoint_id.into(), data);
        self
    }

    /// Human-readable lesion label, e.g. "Target 3" or "Non-target 1".
    pub fn lesion_label(&self) -> String {
        lesion_label(self.is_target, self.lesion_number)
    }
}

pub(crate) fn lesion_label(is_target: bool, lesion_number: u32) -> String {
    let kind = if is_target { "Target" } else { "Non-target" };
    format!("{kind} {lesion_number}")
}

/// The clinically relevant attributes of a measurement at one timepoint.
///
/// Attributes without a dedicated field are kept in `attributes` so that
/// constraint specs may reference them by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimepointMeasurement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longest_diameter: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortest_diameter: Option<f64>,
    /// Response assessment, e.g. "Present" or "CR".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl TimepointMeasurement {
    pub fn bidirectional(image_id: impl Into<String>, longest: f64, shortest: f64) -> Self {
        Self {
            image_id: Some(image_id.into()),
            longest_diameter: Some(longest),
            shortest_diameter: Some(shortest),
            ..Self::default()
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = Some(response.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Flatten into the attribute object seen by constraint evaluation.
    pub fn to_attributes(&self) -> Map<String, Value> {
        let mut out = self.attributes.clone();
        if let Some(image_id) = &self.image_id {
            out.insert("imageId".into(), Value::String(image_id.clone()));
        }
        if let Some(longest) = self.longest_diameter {
            out.insert("longestDiameter".into(), Value::from(longest));
        }
        if let Some(shortest) = self.shortest_diameter {
            out.insert("shortestDiameter".into(), Value::from(shortest));
        }
        if let Some(response) = &self.response {
            out.insert("response".into(), Value::String(response.clone()));
        }
        out
    }
}

/// Event emitted by the annotation tool whenever a measurement changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementEdit {
    /// Identifier of the owning [`Measurement`].
    pub id: String,
    pub timepoint_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
}

impl MeasurementEdit {
    pub fn new(id: impl Into<String>, timepoint_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            timepoint_id: timepoint_id.into(),
            image_id: None,
        }
    }

    pub fn on_image(mut self, image_id: impl Into<String>) -> Self {
        self.image_id = Some(image_id.into());
        self
    }
}

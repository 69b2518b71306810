pub mod irrc;
pub mod recist;

use serde_json::Value;

use crate::message::display_number;
use crate::spec::ConstraintSpec;

/// Unwrap a `json!` object literal into a spec.
pub(crate) fn object(value: Value) -> ConstraintSpec {
    match value {
        Value::Object(map) => map,
        _ => ConstraintSpec::new(),
    }
}

/// Response labels a target lesion cannot carry at baseline.
pub(crate) fn unmeasurable_responses() -> Value {
    serde_json::json!({
        "CR": "Complete Response (CR)",
        "UN": "Unknown (UN)",
        "NE": "Non-evaluable (NE)",
        "EX": "Excluded (EX)"
    })
}

/// Non-targets may only be assessed as present at baseline.
pub(crate) fn non_target_present_only() -> Value {
    let message = "^Non-target lesions can only be assessed as 'Present' at Baseline";
    serde_json::json!({
        "response": {
            "presence": { "message": message },
            "inclusion": { "within": ["Present"], "message": message }
        }
    })
}

pub(crate) fn mm(value: f64) -> String {
    display_number(value)
}

use serde_json::{json, Value};

use crate::criteria::{mm, non_target_present_only, object, unmeasurable_responses};
use crate::spec::ConstraintSpec;
use crate::{ImageAcquisition, TrialCriteria};

/// irRC: immune-related Response Criteria.
///
/// Baseline: targets >= 10 x 10 mm, at most 5 per organ and 10 in total,
/// non-targets present only, targets must be measured.
/// Follow-up: new target lesions >= 5 x 5 mm.
pub struct IrRc;

/// `longestDiameter` and `shortestDiameter` both at least `min`. When the
/// threshold was raised for slice thickness, `note` carries
/// `(who, floor, thickness)` for the message.
fn both_axes_at_least(min: f64, note: Option<(&str, f64, f64)>) -> Value {
    let rule = |axis: &str| match note {
        Some((who, floor, t)) => json!({ "numericality": {
            "greaterThanOrEqualTo": min,
            "message": format!(
                "^{who} must be >= {} mm {axis} axis AND >= double the acquisition \
                 slice thickness ({} mm) for CT and MR.",
                mm(floor),
                mm(t)
            )
        }}),
        None => json!({ "numericality": { "greaterThanOrEqualTo": min } }),
    };
    json!({
        "longestDiameter": rule("long"),
        "shortestDiameter": rule("short"),
    })
}

impl TrialCriteria for IrRc {
    fn id(&self) -> &str {
        "irRC"
    }

    fn name(&self) -> &str {
        "irRC"
    }

    fn constraints(&self, image: Option<&ImageAcquisition>) -> ConstraintSpec {
        let thickness = image.and_then(|i| i.slice_thickness);

        let mut baseline_target = match thickness {
            Some(t) => both_axes_at_least(f64::max(10.0, t), Some(("Target lesions", 10.0, t))),
            None => both_axes_at_least(10.0, None),
        };
        baseline_target["response"] = json!({ "exclusion": {
            "within": unmeasurable_responses(),
            "message": "^Target lesions must have a length and cannot be marked as %{value} at baseline."
        }});

        let new_target = match thickness {
            Some(t) => {
                both_axes_at_least(f64::max(5.0, 2.0 * t), Some(("New target lesions", 5.0, t)))
            }
            None => both_axes_at_least(5.0, None),
        };

        object(json!({
            "baseline": {
                "target": { "all": baseline_target },
                "nonTarget": { "all": non_target_present_only() },
                "perOrgan": {
                    "numberOfLesionsPerOrgan": { "numericality": { "lessThanOrEqualTo": 5 } }
                },
                "group": {
                    "totalNumberOfLesions": { "numericality": { "lessThanOrEqualTo": 10 } }
                }
            },
            "followup": {
                "newLesions": { "target": { "all": new_target } },
                "target": {},
                "group": {
                    "numberOfLesionsPerOrgan": { "numericality": { "lessThanOrEqualTo": 5 } },
                    "totalNumberOfLesions": { "numericality": { "lessThanOrEqualTo": 10 } }
                }
            },
            "all": {
                "group": {
                    "totalLesionBurden": { "numericality": { "greaterThanOrEqualTo": 100 } }
                }
            }
        }))
    }
}

use serde_json::json;

use crate::criteria::{mm, non_target_present_only, object, unmeasurable_responses};
use crate::spec::ConstraintSpec;
use crate::{ImageAcquisition, TrialCriteria};

/// RECIST 1.1: Response Evaluation Criteria in Solid Tumors.
///
/// Baseline checks:
/// - extranodal targets >= 10 mm long axis and >= twice the slice thickness
///   on CT/MR, >= 20 mm on chest X-ray
/// - nodal targets >= 15 mm short axis and >= twice the slice thickness on CT/MR
/// - at most 2 target lesions per organ and 5 in total
/// - non-targets can only be assessed as present
/// - target lesions must be measured (not CR, UN, NE or EX)
pub struct Recist;

impl TrialCriteria for Recist {
    fn id(&self) -> &str {
        "RECIST"
    }

    fn name(&self) -> &str {
        "RECIST 1.1"
    }

    fn constraints(&self, image: Option<&ImageAcquisition>) -> ConstraintSpec {
        let thickness = image.and_then(|i| i.slice_thickness);
        let chest_xray = image.is_some_and(|i| i.is_chest_xray);

        let nodal = match thickness {
            Some(t) => json!({
                "shortestDiameter": { "numericality": {
                    "greaterThanOrEqualTo": f64::max(15.0, 2.0 * t),
                    "message": format!(
                        "^Nodal lesions must be >= 15 mm short axis AND >= double the \
                         acquisition slice thickness ({} mm) for CT and MR.",
                        mm(t)
                    )
                }}
            }),
            None => json!({
                "shortestDiameter": { "numericality": { "greaterThanOrEqualTo": 15 } }
            }),
        };

        let extra_nodal = match (thickness, chest_xray) {
            (Some(t), _) => json!({
                "longestDiameter": { "numericality": {
                    "greaterThanOrEqualTo": f64::max(10.0, 2.0 * t),
                    "message": format!(
                        "^Extranodal lesions must be >= 10 mm long axis AND >= double the \
                         acquisition slice thickness ({} mm) for CT and MR.",
                        mm(t)
                    )
                }}
            }),
            (None, true) => json!({
                "longestDiameter": { "numericality": { "greaterThanOrEqualTo": 20 } }
            }),
            (None, false) => json!({
                "longestDiameter": { "numericality": { "greaterThanOrEqualTo": 10 } }
            }),
        };

        object(json!({
            "baseline": {
                "target": {
                    "nodal": nodal,
                    "extraNodal": extra_nodal,
                    "all": {
                        "response": { "exclusion": {
                            "within": unmeasurable_responses(),
                            "message": "^Target lesions must have a length and cannot be marked as %{value} at baseline."
                        }},
                        "totalLesionBurden": { "numericality": { "greaterThanOrEqualTo": 2 } }
                    }
                },
                "nonTarget": { "all": non_target_present_only() },
                "perOrgan": {
                    "numberOfLesionsPerOrgan": { "numericality": { "lessThanOrEqualTo": 2 } }
                },
                "group": {
                    "totalNumberOfLesions": { "numericality": { "lessThanOrEqualTo": 5 } }
                }
            }
        }))
    }
}

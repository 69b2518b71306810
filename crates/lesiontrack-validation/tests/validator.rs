mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use lesiontrack_core::models::{ErrorScope, Measurement, MeasurementEdit, TimepointMeasurement};
use lesiontrack_criteria::resolve::{CriteriaRegistry, ImageContext, SelectedCriteria};
use lesiontrack_validation::{MeasurementValidator, ValidatorConfig};

use common::{target, validator, CountingSource, StaticResolver};

fn lesion_limit(max: u32) -> serde_json::Value {
    json!({
        "baseline": {
            "group": {
                "totalNumberOfLesions": { "numericality": { "lessThanOrEqualTo": max } }
            }
        }
    })
}

#[test]
fn group_limit_reports_one_error_with_the_count() {
    let measurements = (1..=6)
        .map(|n| target(&format!("m{n}"), n, "Lung", 20.0, 12.0))
        .collect();
    let source = Arc::new(CountingSource::new(measurements));
    let validator = validator(source, StaticResolver::new(lesion_limit(5)));

    validator.validate_groups();

    let errors = validator.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].scope, Some(ErrorScope::Group));
    assert_eq!(errors[0].attribute, "totalNumberOfLesions");
    assert_eq!(errors[0].value, json!(6));
    assert_eq!(errors[0].prefix, "");
    assert_eq!(
        errors[0].error,
        "Total number of lesions must be less than or equal to 5"
    );
}

#[test]
fn nodal_target_below_short_axis_minimum() {
    let measurement = Measurement::new("node-1", true, 1)
        .with_nodal(true)
        .with_location("Mediastinum")
        .with_timepoint(
            "tp-baseline",
            TimepointMeasurement::bidirectional("img-1", 14.0, 8.0).with_attribute("shortAxis", 8),
        );
    let source = Arc::new(CountingSource::new(vec![measurement]));
    let spec = json!({
        "baseline": {
            "target": {
                "nodal": { "shortAxis": { "numericality": { "greaterThanOrEqualTo": 15 } } }
            }
        }
    });
    let validator = validator(source, StaticResolver::new(spec));

    validator.validate_single_measurement(
        &MeasurementEdit::new("node-1", "tp-baseline").on_image("img-1"),
    );

    let errors = validator.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].prefix, "Target 1: ");
    assert_eq!(errors[0].attribute, "shortAxis");
    assert_eq!(errors[0].measurement_id.as_deref(), Some("node-1"));
    assert_eq!(errors[0].scope, None);
    assert_eq!(
        errors[0].display_message(),
        "Target 1: Short axis must be greater than or equal to 15"
    );
}

#[test]
fn shared_location_exceeds_per_organ_limit() {
    let source = Arc::new(CountingSource::new(vec![
        target("a", 1, "Liver", 20.0, 12.0),
        target("b", 2, "Liver", 22.0, 14.0),
        target("c", 3, "Lung", 30.0, 18.0),
    ]));
    let spec = json!({
        "baseline": {
            "perOrgan": {
                "numberOfLesionsPerOrgan": { "numericality": { "lessThanOrEqualTo": 1 } }
            }
        }
    });
    let validator = validator(source, StaticResolver::new(spec));

    validator.validate_groups();

    let errors = validator.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].scope, Some(ErrorScope::PerOrgan));
    assert_eq!(errors[0].prefix, "Liver: ");
    assert_eq!(errors[0].value, json!(2));

    // The organ that passed is confirmed.
    let lung = validator.with_state(|s| {
        s.successes
            .find("numberOfLesionsPerOrgan", "Lung: ")
            .map(|m| m.message.clone())
    });
    assert_eq!(
        lung.as_deref(),
        Some("Number of lesions per organ satisfies the criteria")
    );
}

#[test]
fn repeated_validation_does_not_duplicate_errors() {
    let measurements = (1..=6)
        .map(|n| target(&format!("m{n}"), n, "Lung", 20.0, 12.0))
        .collect();
    let source = Arc::new(CountingSource::new(measurements));
    let validator = validator(source, StaticResolver::new(lesion_limit(5)));

    validator.validate_groups();
    let first = validator.errors();
    validator.validate_groups();
    validator.validate_all();

    let errors = validator.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].key(), first[0].key());
}

#[test]
fn corrected_measurement_clears_its_stale_error() {
    let source = Arc::new(CountingSource::new(vec![target("m1", 1, "Liver", 6.0, 4.0)]));
    let spec = json!({
        "baseline": {
            "target": {
                "all": { "longestDiameter": { "numericality": { "greaterThanOrEqualTo": 10 } } }
            }
        }
    });
    let validator = validator(Arc::clone(&source), StaticResolver::new(spec));
    let edit = MeasurementEdit::new("m1", "tp-baseline").on_image("img-m1");

    validator.validate_single_measurement(&edit);
    assert_eq!(validator.errors().len(), 1);

    source
        .inner
        .update(target("m1", 1, "Liver", 12.0, 4.0))
        .unwrap();
    validator.validate_single_measurement(&edit);

    assert!(validator.errors().is_empty());
    let passed = validator.with_state(|s| s.successes.find("longestDiameter", "Target 1: ").is_some());
    assert!(passed);
}

#[test]
fn group_pass_leaves_single_measurement_errors_alone() {
    let source = Arc::new(CountingSource::new(vec![
        target("m1", 1, "Liver", 6.0, 4.0),
        target("m2", 2, "Liver", 30.0, 20.0),
    ]));
    let spec = json!({
        "baseline": {
            "target": {
                "all": { "longestDiameter": { "numericality": { "greaterThanOrEqualTo": 10 } } }
            },
            "group": {
                "totalNumberOfLesions": { "numericality": { "lessThanOrEqualTo": 1 } }
            }
        }
    });
    let validator = validator(source, StaticResolver::new(spec));

    validator.validate_all();
    let single = validator.with_state(|s| s.errors.for_measurement("m1").count());
    assert_eq!(single, 1);
    assert_eq!(validator.errors().len(), 2);

    validator.validate_groups();
    let (single, group) = validator.with_state(|s| {
        (
            s.errors.for_measurement("m1").count(),
            s.errors.by_scope(ErrorScope::Group).count(),
        )
    });
    assert_eq!(single, 1);
    assert_eq!(group, 1);
}

#[test]
fn missing_constraints_leave_the_store_untouched() {
    let source = Arc::new(CountingSource::new(vec![target("m1", 1, "Liver", 6.0, 4.0)]));
    let validator = validator(source, StaticResolver::empty());

    validator.validate_all();
    validator.validate_single_measurement(&MeasurementEdit::new("m1", "tp-baseline").on_image("img-m1"));

    assert_eq!(validator.with_state(|s| s.revision()), 0);
}

#[test]
fn unknown_measurement_or_timepoint_stops_before_the_group_pass() {
    let source = Arc::new(CountingSource::new(vec![
        target("m1", 1, "Liver", 6.0, 4.0),
        target("m2", 2, "Lung", 30.0, 20.0),
    ]));
    let spec = json!({
        "baseline": {
            "target": {
                "all": { "longestDiameter": { "numericality": { "greaterThanOrEqualTo": 10 } } }
            },
            "group": {
                "totalNumberOfLesions": { "numericality": { "lessThanOrEqualTo": 1 } }
            }
        }
    });
    let validator = validator(Arc::clone(&source), StaticResolver::new(spec));

    validator.validate_single_measurement(&MeasurementEdit::new("ghost", "tp-baseline").on_image("x"));
    validator.validate_single_measurement(&MeasurementEdit::new("m1", "tp-followup").on_image("x"));

    assert_eq!(source.find_all_calls(), 0);
    assert_eq!(validator.with_state(|s| s.revision()), 0);
}

#[test]
fn edit_on_an_image_without_constraints_stops_before_the_group_pass() {
    let source = Arc::new(CountingSource::new(vec![
        target("m1", 1, "Liver", 6.0, 4.0),
        target("m2", 2, "Lung", 30.0, 20.0),
    ]));
    // Only follow-up rules exist, so the baseline image resolves nothing.
    let spec = json!({
        "followup": {
            "group": {
                "totalNumberOfLesions": { "numericality": { "lessThanOrEqualTo": 1 } }
            }
        }
    });
    let validator = validator(Arc::clone(&source), StaticResolver::new(spec));

    validator.validate_single_measurement(&MeasurementEdit::new("m1", "tp-baseline").on_image("img-m1"));
    assert_eq!(source.find_one_calls(), 0);
    assert_eq!(validator.with_state(|s| s.revision()), 0);

    // The same cohort rules do fire on an explicit group pass.
    validator.validate_groups();
    assert_eq!(validator.errors().len(), 1);
}

#[test]
fn malformed_scope_does_not_block_the_others() {
    let source = Arc::new(CountingSource::new(vec![
        target("a", 1, "Liver", 20.0, 12.0),
        target("b", 2, "Liver", 22.0, 14.0),
    ]));
    let spec = json!({
        "baseline": {
            "group": { "totalNumberOfLesions": { "mustBeTiny": true } },
            "perOrgan": {
                "numberOfLesionsPerOrgan": { "numericality": { "lessThanOrEqualTo": 1 } }
            }
        }
    });
    let validator = validator(source, StaticResolver::new(spec));

    validator.validate_groups();

    let errors = validator.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].prefix, "Liver: ");
}

#[test]
fn entry_points_read_the_store_the_expected_number_of_times() {
    let source = Arc::new(CountingSource::new(vec![target("m1", 1, "Liver", 20.0, 12.0)]));
    let validator = validator(Arc::clone(&source), StaticResolver::new(lesion_limit(5)));

    validator.validate_single_measurement(&MeasurementEdit::new("m1", "tp-baseline").on_image("img-m1"));
    assert_eq!(source.find_one_calls(), 1);
    assert_eq!(source.find_all_calls(), 1);

    validator.validate_all();
    assert_eq!(source.find_one_calls(), 1);
    assert_eq!(source.find_all_calls(), 3);
}

#[test]
fn builtin_criteria_validate_a_recist_session() {
    let images = std::collections::HashMap::from([(
        "ct-1".to_string(),
        ImageContext {
            modality: Some("CT".to_string()),
            slice_thickness: Some(5.0),
            body_part: None,
            timepoint_type: Some("baseline".to_string()),
        },
    )]);
    let small = Measurement::new("m1", true, 1)
        .with_nodal(false)
        .with_location("Liver")
        .with_timepoint(
            "tp-1",
            TimepointMeasurement::bidirectional("ct-1", 8.0, 5.0).with_attribute("totalLesionBurden", 8),
        );
    let validator = MeasurementValidator::new(
        Arc::new(CountingSource::new(vec![small])),
        Arc::new(SelectedCriteria::new(["RECIST"])),
        Arc::new(CriteriaRegistry::new(images)),
        &ValidatorConfig::default(),
    );

    validator.validate_all();

    let errors = validator.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].attribute, "longestDiameter");
    assert_eq!(errors[0].prefix, "Target 1: ");
}

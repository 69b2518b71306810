mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use lesiontrack_core::models::MeasurementEdit;
use lesiontrack_validation::debounce::Debouncer;

use common::{target, validator, CountingSource, StaticResolver};

fn undersized_pair() -> Arc<CountingSource> {
    Arc::new(CountingSource::new(vec![
        target("m1", 1, "Liver", 6.0, 4.0),
        target("m2", 2, "Lung", 7.0, 4.0),
    ]))
}

fn long_axis_spec() -> StaticResolver {
    StaticResolver::new(json!({
        "baseline": {
            "target": {
                "all": { "longestDiameter": { "numericality": { "greaterThanOrEqualTo": 10 } } }
            }
        }
    }))
}

fn edit(id: &str) -> MeasurementEdit {
    MeasurementEdit::new(id, "tp-baseline").on_image(format!("img-{id}"))
}

#[tokio::test(start_paused = true)]
async fn rapid_edits_collapse_into_the_last_one() {
    let source = undersized_pair();
    let validator = validator(Arc::clone(&source), long_axis_spec());

    validator.validate_delayed(edit("m1"));
    validator.validate_delayed(edit("m1"));
    validator.validate_delayed(edit("m2"));

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(validator.has_pending());
    assert_eq!(source.find_one_calls(), 0);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!validator.has_pending());
    assert_eq!(source.find_one_calls(), 1);

    let (m1, m2) = validator.with_state(|s| {
        (
            s.errors.for_measurement("m1").count(),
            s.errors.for_measurement("m2").count(),
        )
    });
    assert_eq!((m1, m2), (0, 1));
}

#[tokio::test(start_paused = true)]
async fn each_call_restarts_the_quiet_period() {
    let source = undersized_pair();
    let validator = validator(Arc::clone(&source), long_axis_spec());

    for _ in 0..5 {
        validator.validate_all_delayed();
        tokio::time::sleep(Duration::from_millis(300)).await;
    }
    assert_eq!(source.find_all_calls(), 0);

    tokio::time::sleep(Duration::from_millis(150)).await;
    // One pass: the measurement sweep plus the group pass.
    assert_eq!(source.find_all_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn validate_all_supersedes_a_pending_edit() {
    let source = undersized_pair();
    let validator = validator(Arc::clone(&source), long_axis_spec());

    validator.validate_delayed(edit("m1"));
    validator.validate_all_delayed();
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(source.find_one_calls(), 0);
    assert_eq!(source.find_all_calls(), 2);
    assert_eq!(validator.errors().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn an_edit_supersedes_a_pending_validate_all() {
    let source = undersized_pair();
    let validator = validator(Arc::clone(&source), long_axis_spec());

    validator.validate_all_delayed();
    validator.validate_delayed(edit("m1"));
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(source.find_one_calls(), 1);
    assert_eq!(source.find_all_calls(), 1);
    let errors = validator.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].measurement_id.as_deref(), Some("m1"));
}

#[tokio::test(start_paused = true)]
async fn delayed_edit_of_a_deleted_measurement_does_not_cascade() {
    let source = undersized_pair();
    let validator = validator(
        Arc::clone(&source),
        StaticResolver::new(json!({
            "baseline": {
                "group": {
                    "totalNumberOfLesions": { "numericality": { "lessThanOrEqualTo": 1 } }
                }
            }
        })),
    );

    validator.validate_delayed(edit("m1"));
    assert!(source.inner.remove("m1").is_some());
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(source.find_one_calls(), 1);
    assert_eq!(source.find_all_calls(), 0);
    assert!(validator.errors().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancelled_run_never_fires() {
    let source = undersized_pair();
    let validator = validator(Arc::clone(&source), long_axis_spec());

    validator.validate_all_delayed();
    assert!(validator.cancel_pending());
    assert!(!validator.cancel_pending());

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(source.find_all_calls(), 0);
}

#[test]
fn without_a_runtime_the_call_runs_immediately() {
    let source = undersized_pair();
    let validator = validator(Arc::clone(&source), long_axis_spec());

    validator.validate_all_delayed();

    assert_eq!(source.find_all_calls(), 2);
    assert_eq!(validator.errors().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn debouncer_honours_its_delay() {
    let fired = Arc::new(AtomicUsize::new(0));
    let debouncer = Debouncer::new(Duration::from_millis(50));

    let counter = Arc::clone(&fired);
    debouncer.schedule(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    tokio::time::sleep(Duration::from_millis(49)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert_eq!(debouncer.delay(), Duration::from_millis(50));
}

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info};

use lesiontrack_core::models::{
    Measurement, MeasurementEdit, SuccessMessage, ValidationError, ValidationInput,
};
use lesiontrack_core::source::MeasurementSource;
use lesiontrack_criteria::resolve::{ConstraintResolver, CriteriaSelection};
use lesiontrack_criteria::{ConstraintSpec, SpecExt};

use crate::assess::{assess_group, assess_per_organ, assess_single};
use crate::config::ValidatorConfig;
use crate::debounce::Debouncer;
use crate::state::ValidationState;

/// Re-validates measurements as they are edited.
///
/// Every entry point runs to completion on the calling thread. A single
/// edit re-validates that measurement and then every group and per-organ
/// rule, since one lesion can change cohort-wide counts.
pub struct MeasurementValidator {
    engine: Arc<Engine>,
    debouncer: Debouncer,
}

struct Engine {
    measurements: Arc<dyn MeasurementSource>,
    selection: Arc<dyn CriteriaSelection>,
    resolver: Arc<dyn ConstraintResolver>,
    timepoint_types: Vec<String>,
    state: Mutex<ValidationState>,
}

impl MeasurementValidator {
    pub fn new(
        measurements: Arc<dyn MeasurementSource>,
        selection: Arc<dyn CriteriaSelection>,
        resolver: Arc<dyn ConstraintResolver>,
        config: &ValidatorConfig,
    ) -> Self {
        Self {
            engine: Arc::new(Engine {
                measurements,
                selection,
                resolver,
                timepoint_types: config.timepoint_types.clone(),
                state: Mutex::new(ValidationState::default()),
            }),
            debouncer: Debouncer::new(config.debounce_delay()),
        }
    }

    /// Validate the edited timepoint of one measurement, then all groups.
    ///
    /// Nothing cascades when the edit cannot be traced to constraints, a
    /// stored measurement and its timepoint data.
    pub fn validate_single_measurement(&self, edit: &MeasurementEdit) {
        info!(measurement_id = %edit.id, timepoint_id = %edit.timepoint_id, "validating measurement");
        let mut state = self.engine.lock_state();
        self.engine.edit(edit, &mut state);
    }

    /// Re-run every group and per-organ rule.
    pub fn validate_groups(&self) {
        info!("validating groups");
        let mut state = self.engine.lock_state();
        self.engine.groups(&mut state);
    }

    /// Validate every timepoint of every measurement, then all groups once.
    pub fn validate_all(&self) {
        info!("validating all measurements");
        let mut state = self.engine.lock_state();
        self.engine.all(&mut state);
    }

    /// Debounced [`validate_single_measurement`](Self::validate_single_measurement).
    ///
    /// Called outside a tokio runtime there is no timer to arm, so the
    /// validation runs immediately and bursts are not collapsed.
    pub fn validate_delayed(&self, edit: MeasurementEdit) {
        let engine = Arc::clone(&self.engine);
        self.debouncer.schedule(move || {
            info!(measurement_id = %edit.id, "running delayed validation");
            let mut state = engine.lock_state();
            engine.edit(&edit, &mut state);
        });
    }

    /// Debounced [`validate_all`](Self::validate_all). Shares its timer with
    /// [`validate_delayed`](Self::validate_delayed), and like it runs
    /// immediately outside a tokio runtime.
    pub fn validate_all_delayed(&self) {
        let engine = Arc::clone(&self.engine);
        self.debouncer.schedule(move || {
            info!("running delayed validation of all measurements");
            let mut state = engine.lock_state();
            engine.all(&mut state);
        });
    }

    /// Drop a pending debounced run. Returns whether one was pending.
    pub fn cancel_pending(&self) -> bool {
        self.debouncer.cancel()
    }

    pub fn has_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Snapshot of the cached validation errors, in insertion order.
    pub fn errors(&self) -> Vec<ValidationError> {
        self.engine.lock_state().errors.to_vec()
    }

    /// Snapshot of the cached success messages, in insertion order.
    pub fn successes(&self) -> Vec<SuccessMessage> {
        self.engine.lock_state().successes.to_vec()
    }

    /// Read the validation state without copying it.
    pub fn with_state<R>(&self, f: impl FnOnce(&ValidationState) -> R) -> R {
        f(&self.engine.lock_state())
    }

    pub fn clear(&self) {
        self.engine.lock_state().clear();
    }
}

impl Engine {
    fn lock_state(&self) -> MutexGuard<'_, ValidationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn selected(&self) -> Option<Vec<String>> {
        let ids = self.selection.selected_criteria_ids();
        if ids.is_empty() {
            debug!("no trial criteria selected");
            return None;
        }
        Some(ids)
    }

    fn edit(&self, edit: &MeasurementEdit, state: &mut ValidationState) {
        if self.single_measurement(edit, state) {
            self.groups(state);
        }
    }

    /// Returns whether the edit resolved far enough to be assessed.
    fn single_measurement(&self, edit: &MeasurementEdit, state: &mut ValidationState) -> bool {
        let Some(ids) = self.selected() else {
            return false;
        };
        let Some(constraints) = self.resolver.resolve(&ids, edit.image_id.as_deref()) else {
            debug!(image_id = ?edit.image_id, "no constraints for image");
            return false;
        };
        let Some(measurement) = self.measurements.find_one(&edit.id) else {
            debug!(measurement_id = %edit.id, "measurement not found");
            return false;
        };
        self.timepoint(&measurement, &edit.timepoint_id, &constraints, state)
    }

    fn timepoint(
        &self,
        measurement: &Measurement,
        timepoint_id: &str,
        constraints: &ConstraintSpec,
        state: &mut ValidationState,
    ) -> bool {
        let Some(data) = measurement.timepoints.get(timepoint_id) else {
            debug!(
                measurement_id = %measurement.id,
                timepoint_id,
                "measurement has no data for timepoint"
            );
            return false;
        };
        let input = ValidationInput::new(measurement, data);
        if let Err(e) = assess_single(constraints, &input, state) {
            error!(
                measurement_id = %measurement.id,
                prefix = %input.prefix(),
                error = %e,
                "measurement validation failed"
            );
        }
        true
    }

    fn groups(&self, state: &mut ValidationState) {
        let Some(ids) = self.selected() else {
            return;
        };
        let Some(constraints) = self.resolver.resolve(&ids, None) else {
            debug!("no cohort constraints");
            return;
        };
        let measurements = self.measurements.find_all();

        for timepoint_type in &self.timepoint_types {
            let Some(bucket) = constraints.section(timepoint_type) else {
                continue;
            };
            if let Err(e) = assess_group(bucket, &measurements, state) {
                error!(%timepoint_type, scope = "group", error = %e, "group validation failed");
            }
            if let Err(e) = assess_per_organ(bucket, &measurements, state) {
                error!(%timepoint_type, scope = "perOrgan", error = %e, "per-organ validation failed");
            }
        }
    }

    fn all(&self, state: &mut ValidationState) {
        if let Some(ids) = self.selected() {
            for measurement in self.measurements.find_all() {
                for (timepoint_id, data) in &measurement.timepoints {
                    let image_id = data.image_id.as_deref();
                    let Some(constraints) = self.resolver.resolve(&ids, image_id) else {
                        debug!(?image_id, "no constraints for image");
                        continue;
                    };
                    self.timepoint(&measurement, timepoint_id, &constraints, state);
                }
            }
        }
        self.groups(state);
    }
}

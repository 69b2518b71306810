pub mod input;
pub mod measurement;
pub mod validation;

pub use input::ValidationInput;
pub use measurement::{Measurement, MeasurementEdit, TimepointMeasurement};
pub use validation::{ErrorKey, ErrorScope, SuccessMessage, ValidationError, Violation};

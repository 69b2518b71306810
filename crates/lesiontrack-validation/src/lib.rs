//! lesiontrack-validation
//!
//! Cascading conformance validation of lesion measurements against the
//! active trial criteria, and the error/success caches the viewer renders.
//!
//! An edit to one measurement re-validates that measurement and then every
//! group and per-organ rule. Results are upserted into [`store::ErrorStore`]
//! so repeated passes never duplicate messages, and each scope is cleared
//! before it is recomputed so corrected conditions never leave stale errors.

pub mod assess;
pub mod config;
pub mod debounce;
pub mod error;
pub mod state;
pub mod store;
pub mod validator;

pub use config::ValidatorConfig;
pub use state::ValidationState;
pub use validator::MeasurementValidator;

//! lesiontrack-core
//!
//! Pure domain types for longitudinal lesion measurements and their
//! validation records, plus the measurement-source seam the validation
//! engine reads from. No criteria or evaluation logic lives here.

pub mod error;
pub mod models;
pub mod source;

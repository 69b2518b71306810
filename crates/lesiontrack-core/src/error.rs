use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("measurement not found: {0}")]
    MeasurementNotFound(String),

    #[error("duplicate measurement id: {0}")]
    DuplicateMeasurement(String),
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CriteriaError {
    #[error("unknown trial criteria: {0}")]
    UnknownCriteria(String),

    #[error("unknown validator '{validator}' for attribute '{attribute}'")]
    UnknownValidator {
        attribute: String,
        validator: String,
    },

    #[error("malformed '{validator}' rule for attribute '{attribute}': {reason}")]
    MalformedRule {
        attribute: String,
        validator: String,
        reason: String,
    },

    #[error("constraints for attribute '{0}' must be an object")]
    MalformedAttribute(String),
}

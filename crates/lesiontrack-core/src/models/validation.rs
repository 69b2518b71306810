use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;
use uuid::Uuid;

/// A single failed rule, as produced by constraint evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Violation {
    /// Name of the failing attribute, e.g. `shortestDiameter`.
    pub attribute: String,
    /// Name of the failing rule, e.g. `numericality`.
    pub validator: String,
    /// Full human-readable message.
    pub error: String,
    /// The offending value (`null` when absent).
    pub value: Value,
}

impl Violation {
    pub fn key<'a>(&'a self, prefix: &'a str) -> ErrorKey<'a> {
        ErrorKey {
            attribute: &self.attribute,
            validator: &self.validator,
            error: &self.error,
            prefix,
        }
    }
}

/// Which aggregate pass produced an error. Single-measurement errors carry
/// no scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum ErrorScope {
    Group,
    PerOrgan,
}

impl ErrorScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::PerOrgan => "perOrgan",
        }
    }
}

impl fmt::Display for ErrorScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a cached validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorKey<'a> {
    pub attribute: &'a str,
    pub validator: &'a str,
    pub error: &'a str,
    pub prefix: &'a str,
}

/// A cached, displayable validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ValidationError {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub attribute: String,
    pub validator: String,
    pub error: String,
    pub value: Value,
    /// Display context, e.g. `"Target 2: "` or `"Liver: "`. Part of the identity.
    pub prefix: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<ErrorScope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_id: Option<String>,
}

impl ValidationError {
    pub fn key(&self) -> ErrorKey<'_> {
        ErrorKey {
            attribute: &self.attribute,
            validator: &self.validator,
            error: &self.error,
            prefix: &self.prefix,
        }
    }

    /// The message as shown to the user, prefix included.
    pub fn display_message(&self) -> String {
        format!("{}{}", self.prefix, self.error)
    }
}

/// A positive confirmation that a constrained attribute passed its rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SuccessMessage {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub attribute: String,
    pub message: String,
    pub prefix: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<ErrorScope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_id: Option<String>,
}

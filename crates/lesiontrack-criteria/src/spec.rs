use serde_json::{Map, Value};

/// An opaque, nested constraint document.
///
/// Per timepoint type (`baseline`, `followup`, ...) the recognized sections
/// are `group`, `perOrgan`, and `target`/`nonTarget`, the latter two
/// optionally split into `nodal`, `extraNodal` and `all`.
pub type ConstraintSpec = Map<String, Value>;

/// Section names used when walking a [`ConstraintSpec`].
pub mod section {
    pub const GROUP: &str = "group";
    pub const PER_ORGAN: &str = "perOrgan";
    pub const TARGET: &str = "target";
    pub const NON_TARGET: &str = "nonTarget";
    pub const NODAL: &str = "nodal";
    pub const EXTRA_NODAL: &str = "extraNodal";
    pub const ALL: &str = "all";
}

pub trait SpecExt {
    /// The named sub-object, if present and an object.
    fn section(&self, key: &str) -> Option<&ConstraintSpec>;
}

impl SpecExt for ConstraintSpec {
    fn section(&self, key: &str) -> Option<&ConstraintSpec> {
        self.get(key).and_then(Value::as_object)
    }
}

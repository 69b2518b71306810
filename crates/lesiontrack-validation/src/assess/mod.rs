//! The three assessors. Each clears the records it owns, evaluates, and
//! routes the result into [`ValidationState`](crate::state::ValidationState).

mod group;
mod per_organ;
mod single;

pub use group::assess_group;
pub use per_organ::{assess_per_organ, distinct_locations};
pub use single::{assess_single, nodality_candidates, select_branch, TargetClass};

use serde_json::{Map, Value};

/// A one-attribute object holding an aggregate statistic.
fn statistic(name: &str, value: usize) -> Value {
    let mut data = Map::new();
    data.insert(name.to_string(), Value::from(value));
    Value::Object(data)
}

use serde_json::{Map, Value};

use lesiontrack_core::models::Violation;

use crate::error::CriteriaError;
use crate::message::full_message;
use crate::rules::{membership, numericality, presence, Membership, RuleContext};
use crate::spec::ConstraintSpec;

/// Evaluate `data` against a declarative constraint spec.
///
/// The spec maps attribute names to rule sets, e.g.
/// `{ "shortestDiameter": { "numericality": { "greaterThanOrEqualTo": 15 } } }`.
/// An absent or empty spec yields `Ok(None)`, as does a spec the data fully
/// satisfies. A spec that cannot be evaluated is an error.
pub fn evaluate(
    data: &Value,
    spec: Option<&ConstraintSpec>,
) -> Result<Option<Vec<Violation>>, CriteriaError> {
    let Some(spec) = spec.filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let mut violations = Vec::new();
    for (attribute, rules) in spec {
        let rules = rules
            .as_object()
            .ok_or_else(|| CriteriaError::MalformedAttribute(attribute.clone()))?;
        let value = data.get(attribute).unwrap_or(&Value::Null);

        for (validator, raw_options) in rules {
            let Some(options) = rule_options(attribute, validator, raw_options)? else {
                continue;
            };
            let ctx = RuleContext {
                attribute,
                validator,
                options: &options,
            };
            let messages = match validator.as_str() {
                "presence" => presence(&ctx, value)?,
                "numericality" => numericality(&ctx, value)?,
                "inclusion" => membership(&ctx, value, Membership::Inclusion)?,
                "exclusion" => membership(&ctx, value, Membership::Exclusion)?,
                _ => {
                    return Err(CriteriaError::UnknownValidator {
                        attribute: attribute.clone(),
                        validator: validator.clone(),
                    });
                }
            };

            violations.extend(messages.into_iter().map(|message| Violation {
                attribute: attribute.clone(),
                validator: validator.clone(),
                error: full_message(attribute, &message, value),
                value: value.clone(),
            }));
        }
    }

    Ok((!violations.is_empty()).then_some(violations))
}

/// Normalize a rule's options. `false`/`null` disable the rule, `true` means
/// defaults, and a bare list is shorthand for `{ "within": [...] }`.
fn rule_options(
    attribute: &str,
    validator: &str,
    raw: &Value,
) -> Result<Option<Map<String, Value>>, CriteriaError> {
    match raw {
        Value::Null | Value::Bool(false) => Ok(None),
        Value::Bool(true) => Ok(Some(Map::new())),
        Value::Object(options) => Ok(Some(options.clone())),
        Value::Array(_) => {
            let mut options = Map::new();
            options.insert("within".to_string(), raw.clone());
            Ok(Some(options))
        }
        _ => Err(CriteriaError::MalformedRule {
            attribute: attribute.to_string(),
            validator: validator.to_string(),
            reason: "options must be an object, a boolean or a list".to_string(),
        }),
    }
}

/// Attribute names constrained by a spec, in spec order.
pub fn constrained_attributes(spec: &ConstraintSpec) -> impl Iterator<Item = &str> {
    spec.keys().map(String::as_str)
}

//! The individual rule kinds a constraint spec may use.
//!
//! Each check returns the raw (not yet attribute-prefixed) messages for the
//! failures it found; an empty vector means the value passed.

use serde_json::{Map, Value};

use crate::error::CriteriaError;
use crate::message::{capitalize, display_number, display_value, format, prettify};

/// Ordered numeric comparisons understood by `numericality`.
const NUMERIC_CHECKS: &[(&str, fn(f64, f64) -> bool)] = &[
    ("greaterThan", greater_than),
    ("greaterThanOrEqualTo", greater_than_or_equal),
    ("equalTo", equal_to),
    ("lessThan", less_than),
    ("lessThanOrEqualTo", less_than_or_equal),
    ("divisibleBy", divisible_by),
];

fn greater_than(v: f64, c: f64) -> bool {
    v > c
}

fn greater_than_or_equal(v: f64, c: f64) -> bool {
    v >= c
}

fn equal_to(v: f64, c: f64) -> bool {
    v == c
}

fn less_than(v: f64, c: f64) -> bool {
    v < c
}

fn less_than_or_equal(v: f64, c: f64) -> bool {
    v <= c
}

fn divisible_by(v: f64, c: f64) -> bool {
    v % c == 0.0
}

pub(crate) struct RuleContext<'a> {
    pub attribute: &'a str,
    pub validator: &'a str,
    pub options: &'a Map<String, Value>,
}

impl RuleContext<'_> {
    fn malformed(&self, reason: impl Into<String>) -> CriteriaError {
        CriteriaError::MalformedRule {
            attribute: self.attribute.to_string(),
            validator: self.validator.to_string(),
            reason: reason.into(),
        }
    }

    fn string_option(&self, key: &str) -> Result<Option<&str>, CriteriaError> {
        match self.options.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(self.malformed(format!("`{key}` must be a string"))),
        }
    }

    fn flag(&self, key: &str) -> bool {
        self.options.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    fn custom_message(&self) -> Result<Option<&str>, CriteriaError> {
        self.string_option("message")
    }
}

fn is_defined(value: &Value) -> bool {
    !value.is_null()
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

pub(crate) fn presence(ctx: &RuleContext<'_>, value: &Value) -> Result<Vec<String>, CriteriaError> {
    let allow_empty = ctx.options.get("allowEmpty").and_then(Value::as_bool) != Some(false);
    let missing = if allow_empty {
        !is_defined(value)
    } else {
        is_empty(value)
    };
    if !missing {
        return Ok(Vec::new());
    }
    let message = ctx.custom_message()?.unwrap_or("can't be blank");
    Ok(vec![message.to_string()])
}

fn coerce_number(ctx: &RuleContext<'_>, value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if !ctx.flag("noStrings") && !s.trim().is_empty() => {
            s.trim().parse::<f64>().ok()
        }
        _ => None,
    }
}

pub(crate) fn numericality(
    ctx: &RuleContext<'_>,
    value: &Value,
) -> Result<Vec<String>, CriteriaError> {
    if !is_defined(value) {
        return Ok(Vec::new());
    }

    let custom = ctx.custom_message()?;

    let Some(number) = coerce_number(ctx, value) else {
        let message = custom
            .or(ctx.string_option("notValid")?)
            .unwrap_or("is not a number");
        return Ok(vec![message.to_string()]);
    };

    if ctx.flag("onlyInteger") && number.fract() != 0.0 {
        let message = custom
            .or(ctx.string_option("notInteger")?)
            .unwrap_or("must be an integer");
        return Ok(vec![message.to_string()]);
    }

    let mut errors = Vec::new();
    let mut first_count = None;
    for (name, check) in NUMERIC_CHECKS {
        let Some(raw) = ctx.options.get(*name) else {
            continue;
        };
        let count = raw
            .as_f64()
            .ok_or_else(|| ctx.malformed(format!("`{name}` must be a number")))?;
        if check(number, count) {
            continue;
        }
        let count = display_number(count);
        let kind = prettify(name);
        let key = format!("not{}", capitalize(name));
        let template = ctx.string_option(&key)?.unwrap_or("must be %{type} %{count}");
        errors.push(format(template, &[("count", &count), ("type", &kind)]));
        first_count.get_or_insert((count, kind));
    }

    if ctx.flag("odd") && number % 2.0 != 1.0 {
        errors.push(ctx.string_option("notOdd")?.unwrap_or("must be odd").to_string());
    }
    if ctx.flag("even") && number % 2.0 != 0.0 {
        errors.push(ctx.string_option("notEven")?.unwrap_or("must be even").to_string());
    }

    match custom {
        Some(message) if !errors.is_empty() => {
            let (count, kind) = first_count.unwrap_or_default();
            Ok(vec![format(message, &[("count", &count), ("type", &kind)])])
        }
        _ => Ok(errors),
    }
}

/// Whether a rule requires membership (`inclusion`) or forbids it (`exclusion`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Membership {
    Inclusion,
    Exclusion,
}

fn same_value(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

pub(crate) fn membership(
    ctx: &RuleContext<'_>,
    value: &Value,
    kind: Membership,
) -> Result<Vec<String>, CriteriaError> {
    if !is_defined(value) {
        return Ok(Vec::new());
    }

    let within = ctx
        .options
        .get("within")
        .ok_or_else(|| ctx.malformed("missing `within`"))?;

    // Keyed objects match on their keys; the label is what the user sees.
    let (contained, label) = match within {
        Value::Array(items) => (items.iter().any(|item| same_value(item, value)), None),
        Value::Object(labels) => {
            let key = display_value(value);
            let label = labels.get(&key).and_then(Value::as_str);
            (labels.contains_key(&key), label)
        }
        _ => return Err(ctx.malformed("`within` must be a list or an object")),
    };

    let violated = match kind {
        Membership::Inclusion => !contained,
        Membership::Exclusion => contained,
    };
    if !violated {
        return Ok(Vec::new());
    }

    let default = match kind {
        Membership::Inclusion => "^%{value} is not included in the list",
        Membership::Exclusion => "^%{value} is restricted",
    };
    let message = ctx.custom_message()?.unwrap_or(default);
    let shown = match (kind, label) {
        (Membership::Exclusion, Some(label)) => label.to_string(),
        _ => display_value(value),
    };
    Ok(vec![format(message, &[("value", &shown)])])
}

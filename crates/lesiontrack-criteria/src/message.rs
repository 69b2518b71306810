//! Message formatting compatible with the validate.js "detailed" format the
//! viewer's criteria messages are written against.

use serde_json::Value;

/// Turn an attribute or rule name into lower-case words:
/// `shortestDiameter` becomes `shortest diameter`.
pub fn prettify(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        let prev = i.checked_sub(1).map(|p| chars[p]);
        let next = chars.get(i + 1).copied();
        match c {
            '\\' => {}
            '_' | '-' => out.push(' '),
            '.' if prev.is_some_and(|p| !p.is_whitespace())
                && next.is_some_and(|n| !n.is_whitespace()) =>
            {
                out.push(' ')
            }
            c if c.is_uppercase() && prev.is_some_and(|p| p.is_lowercase()) => {
                out.push(' ');
                out.extend(c.to_lowercase());
            }
            c => out.extend(c.to_lowercase()),
        }
    }
    out
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Substitute `%{name}` placeholders. `%%{name}` escapes to a literal `%{name}`.
pub fn format(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("%{") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let name = &rest[start + 2..start + len];
        let escaped = rest[..start].ends_with('%');
        if escaped {
            out.push_str(&rest[..start - 1]);
            out.push_str(&rest[start..=start + len]);
        } else {
            out.push_str(&rest[..start]);
            match vars.iter().find(|(k, _)| *k == name) {
                Some((_, v)) => out.push_str(v),
                None => out.push_str(&rest[start..=start + len]),
            }
        }
        rest = &rest[start + len + 1..];
    }
    out.push_str(rest);
    out
}

/// Render a number the way a JavaScript UI would: `6`, `6.5`, `6.67`.
pub fn display_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else if (n * 100.0).fract() == 0.0 {
        format!("{n}")
    } else {
        format!("{:.2}", (n * 100.0).round() / 100.0)
    }
}

pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.as_f64().map(display_number).unwrap_or_else(|| n.to_string()),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(display_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// Build the final message for a failed rule.
///
/// A leading `^` suppresses the attribute name and is stripped; otherwise the
/// capitalized attribute name is prepended. `%{value}` is then replaced by the
/// offending value.
pub fn full_message(attribute: &str, message: &str, value: &Value) -> String {
    let message = match message.strip_prefix('^') {
        Some(bare) => bare.to_string(),
        None => format!("{} {message}", capitalize(&prettify(attribute))),
    };
    let message = message.replace("\\^", "^");
    format(&message, &[("value", &display_value(value))])
}

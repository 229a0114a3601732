//! String → JSON value parsing rules.
//!
//! Field values given on the command line are auto-detected:
//! 1. JSON structures (`{`, `[`, `"`) → parse as JSON
//! 2. `null` → `Value::Null`
//! 3. `true` / `false` → `Value::Bool`
//! 4. Integer pattern → number
//! 5. Float pattern → number
//! 6. Everything else → `Value::String`

use serde_json::Value;

/// Auto-detect value type from a user-supplied string.
pub fn parse_value(s: &str) -> Value {
    if s.starts_with('{') || s.starts_with('[') || s.starts_with('"') {
        if let Ok(json) = serde_json::from_str::<Value>(s) {
            return json;
        }
    }

    match s {
        "null" => return Value::Null,
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if is_integer(s) {
        if let Ok(i) = s.parse::<i64>() {
            return Value::from(i);
        }
    }

    if is_float(s) {
        if let Ok(f) = s.parse::<f64>() {
            if let Some(n) = serde_json::Number::from_f64(f) {
                return Value::Number(n);
            }
        }
    }

    Value::String(s.to_string())
}

/// Split `key=value` and parse the value.
pub fn parse_field(s: &str) -> Result<(String, Value), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected key=value, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("Empty field name in '{}'", s));
    }
    Ok((key.to_string(), parse_value(value)))
}

fn is_integer(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn is_float(s: &str) -> bool {
    let body = s.strip_prefix('-').unwrap_or(s);
    match body.split_once('.') {
        Some((int, frac)) => {
            !int.is_empty()
                && !frac.is_empty()
                && int.bytes().all(|b| b.is_ascii_digit())
                && frac.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

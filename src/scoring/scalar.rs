//! Numeric normalization and percentage formatting.

use serde_json::Value;

/// Clamp to `[0, 1]`. NaN becomes 0.
pub fn clamp01(x: f64) -> f64 {
    if x.is_nan() {
        return 0.0;
    }
    x.clamp(0.0, 1.0)
}

/// Coerce a loosely-typed JSON value to a number, reading it the way a
/// browser's `Number(value)` would.
///
/// Returns NaN for values that have no numeric reading; callers pass the result
/// through [`clamp01`] before using it.
pub fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_numeric_str(s),
        // An array reads as its joined text: `[]` is 0, `[x]` is x, longer is NaN.
        Value::Array(items) => match items.as_slice() {
            [] => 0.0,
            [Value::Bool(_) | Value::Object(_)] => f64::NAN,
            [item] => coerce_number(item),
            _ => f64::NAN,
        },
        Value::Object(_) => f64::NAN,
    }
}

/// Decimal, `Infinity`, or an unsigned `0x`/`0o`/`0b` literal. Blank is 0.
///
/// Rust spellings such as `inf` or `nan` are not numbers here.
fn parse_numeric_str(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &s[2..];
        if !digits.chars().all(|c| c.is_ascii_alphanumeric()) {
            return f64::NAN;
        }
        return u64::from_str_radix(digits, radix)
            .map(|n| n as f64)
            .unwrap_or(f64::NAN);
    }

    let plain_decimal = s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !plain_decimal {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// Format a probability as a percentage with at most one decimal, e.g. `34.2%`.
pub fn fmt_pct(x: f64) -> String {
    let tenths = (clamp01(x) * 1000.0).round();
    if tenths % 10.0 == 0.0 {
        format!("{:.0}%", tenths / 10.0)
    } else {
        format!("{:.1}%", tenths / 10.0)
    }
}

//! Numeric coercion for animation targets
//!
//! Upstream sources hand the binder arbitrary JSON (API counters, form input,
//! missing fields). Coercion is total: numeric input passes through, everything
//! else becomes 0, so the animator never has an error path of its own.

use serde_json::Value;

/// Coerce an arbitrary JSON value to a finite number.
///
/// Numbers and numeric strings pass through; null, booleans, non-numeric
/// strings, arrays, objects and non-finite results all map to 0.
pub fn coerce(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_pass_through() {
        assert_eq!(coerce(&json!(42)), 42.0);
        assert_eq!(coerce(&json!(-7)), -7.0);
        assert_eq!(coerce(&json!(2.5)), 2.5);
        assert_eq!(coerce(&json!(0)), 0.0);
    }

    #[test]
    fn test_numeric_strings_pass_through() {
        assert_eq!(coerce(&json!("42")), 42.0);
        assert_eq!(coerce(&json!("  -3.5  ")), -3.5);
        assert_eq!(coerce(&json!("1e3")), 1000.0);
    }

    #[test]
    fn test_non_numeric_maps_to_zero() {
        assert_eq!(coerce(&Value::Null), 0.0);
        assert_eq!(coerce(&json!(true)), 0.0);
        assert_eq!(coerce(&json!("pending")), 0.0);
        assert_eq!(coerce(&json!("")), 0.0);
        assert_eq!(coerce(&json!([1, 2])), 0.0);
        assert_eq!(coerce(&json!({"count": 5})), 0.0);
    }

    #[test]
    fn test_non_finite_maps_to_zero() {
        assert_eq!(coerce(&json!("inf")), 0.0);
        assert_eq!(coerce(&json!("NaN")), 0.0);
    }
}

//! Coercion rules shared by every field.
//!
//! The community API encodes the same logical number as a JSON number in one
//! version and as a string in another, so every numeric field accepts both.

use serde_json::Value;

use super::ValidationReason;

/// Coerce a number or numeric string to a finite `f64`.
pub fn coerce_number(value: &Value) -> Result<f64, ValidationReason> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_numeric(s),
        _ => None,
    };

    match parsed {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(ValidationReason::NotNumeric(describe(value))),
    }
}

/// Coerce a string or number to its string form.
pub fn coerce_text(value: &Value) -> Result<String, ValidationReason> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(ValidationReason::ExpectedString(describe(value))),
    }
}

/// Require a JSON string.
pub fn expect_string(value: &Value) -> Result<String, ValidationReason> {
    match value {
        Value::String(s) => Ok(s.clone()),
        _ => Err(ValidationReason::ExpectedString(describe(value))),
    }
}

fn parse_numeric(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    // Rust accepts "inf" and "NaN" spellings; only plain decimals count here.
    if trimmed
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Short description of a value for error messages.
pub fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string {:?}", s),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_pass_through() {
        assert_eq!(coerce_number(&json!(120)), Ok(120.0));
        assert_eq!(coerce_number(&json!(-3.5)), Ok(-3.5));
        assert_eq!(coerce_number(&json!(1_700_000_000_000_i64)), Ok(1.7e12));
    }

    #[test]
    fn test_numeric_strings_coerce() {
        assert_eq!(coerce_number(&json!("120")), Ok(120.0));
        assert_eq!(coerce_number(&json!(" 42.25 ")), Ok(42.25));
        assert_eq!(coerce_number(&json!("1e3")), Ok(1000.0));
        assert_eq!(coerce_number(&json!("-7")), Ok(-7.0));
    }

    #[test]
    fn test_string_and_number_agree() {
        assert_eq!(coerce_number(&json!("120")), coerce_number(&json!(120)));
    }

    #[test]
    fn test_rejects_non_numeric_strings() {
        for bad in ["", "   ", "abc", "12abc", "NaN", "inf", "-Infinity"] {
            assert!(
                coerce_number(&json!(bad)).is_err(),
                "{:?} should not coerce",
                bad
            );
        }
    }

    #[test]
    fn test_rejects_other_types() {
        assert_eq!(
            coerce_number(&json!(true)),
            Err(ValidationReason::NotNumeric("boolean true".to_string()))
        );
        assert!(coerce_number(&Value::Null).is_err());
        assert!(coerce_number(&json!([1])).is_err());
        assert!(coerce_number(&json!({"n": 1})).is_err());
    }

    #[test]
    fn test_coerce_text() {
        assert_eq!(coerce_text(&json!("12.5")), Ok("12.5".to_string()));
        assert_eq!(coerce_text(&json!(10)), Ok("10".to_string()));
        assert_eq!(coerce_text(&json!(0.25)), Ok("0.25".to_string()));
        assert!(coerce_text(&json!(false)).is_err());
    }

    #[test]
    fn test_expect_string() {
        assert_eq!(expect_string(&json!("Potato")), Ok("Potato".to_string()));
        assert!(expect_string(&json!(5)).is_err());
    }
}

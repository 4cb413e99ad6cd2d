use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerce a loosely typed JSON value into a finite number.
///
/// Numbers pass through, numeric strings are parsed, everything else
/// (`null`, booleans, arrays, objects, unparsable strings) is treated as absent.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed.filter(|v| v.is_finite())
}

/// Coerce an identifier that may arrive as a string or a number.
pub fn coerce_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_f64(&value))
}

pub fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_id(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerce_f64_accepts_numbers_and_numeric_strings() {
        assert_eq!(coerce_f64(&json!(3)), Some(3.0));
        assert_eq!(coerce_f64(&json!(0.25)), Some(0.25));
        assert_eq!(coerce_f64(&json!(" 4.5 ")), Some(4.5));
    }

    #[test]
    fn coerce_f64_rejects_everything_else() {
        assert_eq!(coerce_f64(&json!(null)), None);
        assert_eq!(coerce_f64(&json!(true)), None);
        assert_eq!(coerce_f64(&json!("n/a")), None);
        assert_eq!(coerce_f64(&json!("NaN")), None);
        assert_eq!(coerce_f64(&json!([1.0])), None);
    }

    #[test]
    fn coerce_id_handles_strings_and_numbers() {
        assert_eq!(coerce_id(&json!("w-1")), Some("w-1".into()));
        assert_eq!(coerce_id(&json!(17)), Some("17".into()));
        assert_eq!(coerce_id(&json!("   ")), None);
        assert_eq!(coerce_id(&json!(null)), None);
    }
}

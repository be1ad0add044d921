//! Recursive text sanitization of JSON bodies.

use serde_json::{Map, Value};

use crate::sanitize::scalar::strip_tags;

/// Strip tags from every string leaf. Shape and ordering are preserved;
/// numbers, booleans and nulls pass through.
pub fn deep_sanitize_text(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(strip_tags(s)),
        Value::Array(items) => Value::Array(items.iter().map(deep_sanitize_text).collect()),
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), deep_sanitize_text(v)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Null | Value::Bool(_) | Value::Number(_) => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_strings_cleaned() {
        let input = json!({
            "borrower": {
                "name": "<b>Jane</b> Doe",
                "notes": ["<script>x</script>ok", 5, true, null],
            },
            "amount": 250000,
        });
        let expected = json!({
            "borrower": {
                "name": "Jane Doe",
                "notes": ["xok", 5, true, null],
            },
            "amount": 250000,
        });
        assert_eq!(deep_sanitize_text(&input), expected);
    }

    #[test]
    fn test_keys_untouched_and_input_unchanged() {
        let input = json!({"<k>": "<i>v</i>"});
        let out = deep_sanitize_text(&input);
        assert_eq!(out, json!({"<k>": "v"}));
        assert_eq!(input, json!({"<k>": "<i>v</i>"}));
    }

    #[test]
    fn test_scalar_root() {
        assert_eq!(deep_sanitize_text(&json!("<p>hi</p>")), json!("hi"));
        assert_eq!(deep_sanitize_text(&json!(1.5)), json!(1.5));
    }
}

//! Boundary parsing of variant types coming from form state.
//!
//! Input arrives as untyped JSON. Anything that is not an array of
//! `{name, options}` objects is rejected with [`VariantError::InvalidInput`];
//! no partial result is returned.

use serde_json::Value;

use crate::{Result, VariantError, VariantTypeDefinition};

/// Parses a JSON array of variant types.
pub fn definitions_from_value(value: &Value) -> Result<Vec<VariantTypeDefinition>> {
    let items = value
        .as_array()
        .ok_or_else(|| invalid(format!("expected an array of variant types, got {}", kind(value))))?;
    items.iter().enumerate().map(|(i, item)| definition_from_value(i, item)).collect()
}

/// Parses one `{name, options}` object. `index` only feeds error messages.
///
/// `options` may be a comma-separated string or an array of strings; arrays
/// are joined with `", "` the way saved products are loaded back into the form.
/// `optionsRaw` is accepted as an alias.
pub fn definition_from_value(index: usize, value: &Value) -> Result<VariantTypeDefinition> {
    let object = value
        .as_object()
        .ok_or_else(|| invalid(format!("variant type {index}: expected an object, got {}", kind(value))))?;

    let name = match object.get("name") {
        Some(Value::String(s)) => s.as_str(),
        Some(other) => return Err(invalid(format!("variant type {index}: name must be a string, got {}", kind(other)))),
        None => return Err(invalid(format!("variant type {index}: missing name"))),
    };

    let options = match object.get("options").or_else(|| object.get("optionsRaw")) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(values)) => values
            .iter()
            .map(|v| {
                v.as_str().ok_or_else(|| {
                    invalid(format!("variant type {index}: options must hold strings, got {}", kind(v)))
                })
            })
            .collect::<Result<Vec<_>>>()?
            .join(", "),
        Some(other) => {
            return Err(invalid(format!(
                "variant type {index}: options must be a string or array, got {}",
                kind(other)
            )))
        }
        None => return Err(invalid(format!("variant type {index}: missing options"))),
    };

    VariantTypeDefinition::new(name, options).map_err(|e| match e {
        VariantError::InvalidInput(msg) => invalid(format!("variant type {index}: {msg}")),
        other => other,
    })
}

fn invalid(msg: String) -> VariantError { VariantError::InvalidInput(msg) }

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_string_and_array_options() {
        let defs = definitions_from_value(&json!([
            {"name": "Size", "options": "S, M"},
            {"name": " Color ", "options": ["Red", "Blue"]},
            {"name": "Fit", "optionsRaw": "Slim"},
        ]))
        .unwrap();
        assert_eq!(defs[0].options().as_slice(), ["S", "M"]);
        assert_eq!(defs[1].name, "Color");
        assert_eq!(defs[1].options_raw, "Red, Blue");
        assert_eq!(defs[2].options().as_slice(), ["Slim"]);
    }

    #[test]
    fn test_rejects_non_array() {
        let err = definitions_from_value(&json!({"name": "Size"})).unwrap_err();
        assert!(matches!(err, VariantError::InvalidInput(ref m) if m.contains("object")));
        assert!(definitions_from_value(&Value::Null).is_err());
    }

    #[test]
    fn test_rejects_null_fields() {
        let err = definitions_from_value(&json!([{"name": "Size", "options": "S"}, {"name": null, "options": "S"}]))
            .unwrap_err();
        assert!(matches!(err, VariantError::InvalidInput(ref m) if m.starts_with("variant type 1")));
        assert!(definitions_from_value(&json!([{"name": "Size", "options": null}])).is_err());
        assert!(definitions_from_value(&json!([{"name": "Size"}])).is_err());
        assert!(definitions_from_value(&json!([{"name": "Size", "options": [1, 2]}])).is_err());
        assert!(definitions_from_value(&json!(["Size"])).is_err());
    }

    #[test]
    fn test_rejects_blank_name() {
        let err = definitions_from_value(&json!([{"name": "  ", "options": "S"}])).unwrap_err();
        assert!(matches!(err, VariantError::InvalidInput(ref m) if m.contains("blank")));
    }

    #[test]
    fn test_long_names_are_well_formed() {
        let name = "N".repeat(101);
        let defs = definitions_from_value(&json!([{"name": name.clone(), "options": "S, M"}])).unwrap();
        let out = crate::generate(&defs);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].get(&name), Some("S"));
    }

    #[test]
    fn test_blank_options_are_well_formed() {
        let defs = definitions_from_value(&json!([{"name": "Size", "options": ""}])).unwrap();
        assert!(defs[0].options().is_empty());
    }
}

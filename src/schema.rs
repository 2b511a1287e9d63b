//! Caller-supplied response schemas.
//!
//! A [`ResponseSchema`] wraps a JSON Schema document together with its
//! compiled validator. It is supplied per structured call and never stored
//! by the registry or providers.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::LlmError;

/// Structural descriptor for a structured response.
pub struct ResponseSchema {
    raw: Value,
    validator: jsonschema::Validator,
}

impl ResponseSchema {
    /// Compile a JSON Schema document.
    ///
    /// An invalid schema is a caller bug and fails immediately.
    pub fn new(schema: Value) -> Result<Self, LlmError> {
        let validator = jsonschema::validator_for(&schema)
            .map_err(|e| LlmError::ConfigurationError(format!("invalid response schema: {e}")))?;
        Ok(Self {
            raw: schema,
            validator,
        })
    }

    /// Convenience constructor for a flat object schema: field name to
    /// JSON Schema type name, all fields required.
    pub fn object(fields: &[(&str, &str)]) -> Result<Self, LlmError> {
        let properties: serde_json::Map<String, Value> = fields
            .iter()
            .map(|(name, ty)| ((*name).to_string(), serde_json::json!({ "type": ty })))
            .collect();
        let required: Vec<Value> = fields
            .iter()
            .map(|(name, _)| Value::String((*name).to_string()))
            .collect();
        Self::new(serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        }))
    }

    /// The schema document, as rendered into JSON-request prompts.
    pub fn as_json(&self) -> &Value {
        &self.raw
    }

    /// Structural/type check of a parsed value against the schema.
    ///
    /// Returns the first validation error message; the caller wraps it
    /// into a permanent [`LlmError::SchemaValidation`].
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        match self.validator.iter_errors(value).next() {
            None => Ok(()),
            Some(error) => Err(format!("{error} (at {})", error.instance_path)),
        }
    }

    /// Deserialize a validated value into a typed struct.
    pub fn decode<T: DeserializeOwned>(&self, value: Value) -> Result<T, LlmError> {
        serde_json::from_value(value)
            .map_err(|e| LlmError::ConfigurationError(format!("typed decode failed: {e}")))
    }
}

impl std::fmt::Debug for ResponseSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseSchema")
            .field("raw", &self.raw)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_schema_accepts_conforming_value() {
        let schema = ResponseSchema::object(&[("name", "string"), ("age", "integer")]).unwrap();
        let value = json!({"name": "John Smith", "age": 30});
        assert!(schema.validate(&value).is_ok());
    }

    #[test]
    fn object_schema_rejects_wrong_type() {
        let schema = ResponseSchema::object(&[("name", "string"), ("age", "integer")]).unwrap();
        let value = json!({"name": "John Smith", "age": "thirty"});
        assert!(schema.validate(&value).is_err());
    }

    #[test]
    fn object_schema_rejects_missing_field() {
        let schema = ResponseSchema::object(&[("name", "string"), ("age", "integer")]).unwrap();
        assert!(schema.validate(&json!({"name": "John Smith"})).is_err());
    }

    #[test]
    fn invalid_schema_fails_at_construction() {
        let result = ResponseSchema::new(json!({"type": "not-a-type"}));
        assert!(result.is_err());
    }

    #[test]
    fn decode_into_typed_struct() {
        #[derive(serde::Deserialize)]
        struct Person {
            name: String,
            age: u32,
        }
        let schema = ResponseSchema::object(&[("name", "string"), ("age", "integer")]).unwrap();
        let person: Person = schema.decode(json!({"name": "Ada", "age": 36})).unwrap();
        assert_eq!(person.name, "Ada");
        assert_eq!(person.age, 36);
    }
}

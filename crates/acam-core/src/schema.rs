//! JSON Schema validation for SDK configuration documents

use crate::error::{Error, Result};
use jsonschema::Validator;
use rust_embed::RustEmbed;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Name of the schema that validates sdk_config.json
pub const SDK_CONFIG_SCHEMA: &str = "sdk-config";

/// Embedded schema files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/schemas/"]
#[prefix = ""]
struct EmbeddedSchemas;

/// Schema validator with pre-compiled schemas
#[derive(Debug)]
pub struct SchemaValidator {
    /// Compiled schemas by name
    schemas: HashMap<String, Validator>,
}

impl SchemaValidator {
    /// Create a new schema validator with embedded schemas
    pub fn new() -> Result<Self> {
        let mut schemas = HashMap::new();

        for file in EmbeddedSchemas::iter() {
            let Some(name) = file.strip_suffix(".schema.json") else {
                continue;
            };
            let Some(content) = EmbeddedSchemas::get(&file) else {
                continue;
            };

            debug!("Loading embedded schema: {}", name);

            let json_str = std::str::from_utf8(&content.data)
                .map_err(|_| Error::invalid_config(format!("Invalid UTF-8 in schema: {}", file)))?;
            let schema_value: Value = serde_json::from_str(json_str)?;
            let compiled = jsonschema::validator_for(&schema_value).map_err(|e| {
                Error::invalid_config(format!("Failed to compile schema {}: {}", name, e))
            })?;

            schemas.insert(name.to_string(), compiled);
        }

        if !schemas.contains_key(SDK_CONFIG_SCHEMA) {
            return Err(Error::schema_not_found(SDK_CONFIG_SCHEMA));
        }

        Ok(Self { schemas })
    }

    /// Validate JSON value against a schema
    pub fn validate(&self, value: &Value, schema_name: &str) -> Result<()> {
        let schema = self
            .schemas
            .get(schema_name)
            .ok_or_else(|| Error::schema_not_found(schema_name))?;

        let errors: Vec<String> = schema
            .iter_errors(value)
            .map(|e| {
                let path = e.instance_path().to_string();
                if path.is_empty() {
                    format!("  - {}", e)
                } else {
                    format!("  - {}: {}", path, e)
                }
            })
            .collect();

        if !errors.is_empty() {
            return Err(Error::schema_validation(errors));
        }

        Ok(())
    }

    /// Parse and validate a JSON document, returning the parsed value
    pub fn validate_json(&self, content: &str, schema_name: &str) -> Result<Value> {
        let value: Value = serde_json::from_str(content)?;
        self.validate(&value, schema_name)?;
        Ok(value)
    }

    /// Names of all loaded schemas
    pub fn schema_names(&self) -> Vec<&str> {
        self.schemas.keys().map(|s| s.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_schema_loads() {
        let validator = SchemaValidator::new().unwrap();
        assert!(validator.schema_names().contains(&SDK_CONFIG_SCHEMA));
    }

    #[test]
    fn test_valid_document() {
        let validator = SchemaValidator::new().unwrap();
        let doc = r#"{
            "sdkVersion": "1.0.0",
            "alphacamVersion": "2023.1",
            "paths": { "installation": "/opt/acam", "sdk": { "root": "/srv/sdk" } }
        }"#;
        assert!(validator.validate_json(doc, SDK_CONFIG_SCHEMA).is_ok());
    }

    #[test]
    fn test_missing_workspace_root_is_reported() {
        let validator = SchemaValidator::new().unwrap();
        let doc = r#"{
            "sdkVersion": "1.0.0",
            "alphacamVersion": "2023.1",
            "paths": { "installation": "/opt/acam", "sdk": {} }
        }"#;

        let err = validator.validate_json(doc, SDK_CONFIG_SCHEMA).unwrap_err();
        match err {
            Error::SchemaValidation { errors } => assert!(errors.contains("root")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_retry_strategy_rejected() {
        let validator = SchemaValidator::new().unwrap();
        let doc = r#"{
            "sdkVersion": "1.0.0",
            "alphacamVersion": "2023.1",
            "paths": { "installation": "/opt/acam", "sdk": { "root": "/srv/sdk" } },
            "sync": { "retry": { "strategy": "forever" } }
        }"#;
        assert!(validator.validate_json(doc, SDK_CONFIG_SCHEMA).is_err());
    }

    #[test]
    fn test_unknown_schema() {
        let validator = SchemaValidator::new().unwrap();
        let result = validator.validate(&Value::Null, "nope");
        assert!(matches!(result, Err(Error::SchemaNotFound { .. })));
    }
}

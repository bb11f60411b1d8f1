// Error types for schema definitions

use std::fmt;

/// Errors that can occur while reading a schema definition from YAML
#[derive(Debug)]
pub enum SchemaError {
    /// Unknown schema type name
    InvalidType(String),

    /// Invalid schema structure
    InvalidStructure { message: String },

    /// Missing required field
    MissingField { field: String },

    /// YAML parsing error
    YamlError(yaml_rust2::ScanError),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::InvalidType(s) => write!(f, "Invalid schema type: {}", s),
            SchemaError::InvalidStructure { message } => {
                write!(f, "Invalid schema structure: {}", message)
            }
            SchemaError::MissingField { field } => {
                write!(f, "Missing required field '{}'", field)
            }
            SchemaError::YamlError(e) => write!(f, "YAML parsing error: {}", e),
        }
    }
}

impl std::error::Error for SchemaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SchemaError::YamlError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<yaml_rust2::ScanError> for SchemaError {
    fn from(e: yaml_rust2::ScanError) -> Self {
        SchemaError::YamlError(e)
    }
}

impl SchemaError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        SchemaError::InvalidStructure {
            message: message.into(),
        }
    }
}

/// Result type for schema parsing operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_display() {
        assert_eq!(
            SchemaError::InvalidType("widget".to_string()).to_string(),
            "Invalid schema type: widget"
        );
        assert_eq!(
            SchemaError::MissingField {
                field: "schema".to_string()
            }
            .to_string(),
            "Missing required field 'schema'"
        );
    }

    #[test]
    fn test_yaml_error_has_source() {
        let err: SchemaError = yaml_rust2::YamlLoader::load_from_str("a: [1, 2")
            .unwrap_err()
            .into();
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("YAML parsing error"));
    }
}

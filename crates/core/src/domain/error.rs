// Conversion Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// Stored text did not match the platform's date-time layout.
    #[error(
        "Could not convert database value \"{value}\" to type {type_name}. Expected format: {expected_format}"
    )]
    ConversionFailed {
        value: String,
        type_name: String,
        expected_format: String,
    },

    #[error("Could not convert value \"{value}\" of kind {actual} to type {type_name}. Expected one of: {expected}")]
    InvalidType {
        value: String,
        actual: String,
        type_name: String,
        expected: String,
    },

    #[error("Invalid date-time layout: {0}")]
    InvalidFormat(String),

    #[error("Date-time out of range: {0}")]
    OutOfRange(String),
}

impl ConversionError {
    pub fn conversion_failed(
        value: impl Into<String>,
        type_name: impl Into<String>,
        expected_format: impl Into<String>,
    ) -> Self {
        ConversionError::ConversionFailed {
            value: value.into(),
            type_name: type_name.into(),
            expected_format: expected_format.into(),
        }
    }

    pub fn invalid_type(value: &super::Value, type_name: &str, expected: &[&str]) -> Self {
        ConversionError::InvalidType {
            value: value.to_string(),
            actual: value.kind().to_string(),
            type_name: type_name.to_string(),
            expected: expected.join(", "),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConversionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_failed_message() {
        let err = ConversionError::conversion_failed("not-a-date", "utc_datetime", "Y-m-d H:i:s");
        assert_eq!(
            err.to_string(),
            "Could not convert database value \"not-a-date\" to type utc_datetime. Expected format: Y-m-d H:i:s"
        );
    }

    #[test]
    fn test_invalid_type_message() {
        let err = ConversionError::invalid_type(
            &super::super::Value::Integer(42),
            "datetime",
            &["null", "DateTime"],
        );
        assert!(err.to_string().contains("kind integer"));
        assert!(err.to_string().ends_with("Expected one of: null, DateTime"));
    }
}

// UTC DateTime conversion
//
// Every date-time crossing the storage boundary, in either direction, is
// tagged with the shared UTC zone. Rendering and final coercion are left to
// the wrapped base conversion.

use super::base_datetime::BaseDateTimeType;
use crate::domain::error::Result;
use crate::domain::{utc_zone, ConversionError, DateTimeValue, FormatDescriptor, Value};
use crate::port::{ConversionType, Platform};
use chrono::Utc;
use std::sync::Arc;
use tracing::{trace, warn};

/// Converter that stores and loads date-times as UTC.
///
/// Both directions take the value by ownership and hand back a new,
/// UTC-tagged value; the caller's original is never altered behind its back.
///
/// # Example
/// ```
/// use tempora_core::domain::{DateTimeValue, Value};
/// use tempora_core::port::{ConversionType, SqlitePlatform};
/// use tempora_core::UtcDateTimeType;
///
/// let converter = UtcDateTimeType::new();
/// let value = DateTimeValue::parse_rfc3339("2023-06-01T12:00:00+02:00").unwrap();
///
/// let stored = converter.to_storage(value.into(), &SqlitePlatform).unwrap();
/// assert_eq!(stored, Value::Text("2023-06-01 10:00:00".to_string()));
///
/// let loaded = converter.from_storage(stored, &SqlitePlatform).unwrap().unwrap();
/// assert_eq!(loaded.to_rfc3339(), "2023-06-01T10:00:00+00:00");
/// ```
pub struct UtcDateTimeType<B = BaseDateTimeType> {
    base: B,
}

impl UtcDateTimeType {
    pub fn new() -> Self {
        Self::with_base(BaseDateTimeType::default())
    }
}

impl Default for UtcDateTimeType {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ConversionType> UtcDateTimeType<B> {
    pub const NAME: &'static str = "utc_datetime";

    /// Wrap a custom base conversion
    pub fn with_base(base: B) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &B {
        &self.base
    }
}

impl<B: ConversionType> ConversionType for UtcDateTimeType<B> {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn to_storage(&self, value: Value, platform: &dyn Platform) -> Result<Value> {
        let utc = utc_zone();

        let value = match value {
            Value::DateTime(v) => {
                trace!(from_zone = %v.zone(), "Rezoning date-time to UTC for storage");
                Value::DateTime(v.with_zone(utc))
            }
            other => other,
        };

        self.base.to_storage(value, platform)
    }

    fn from_storage(
        &self,
        value: Value,
        platform: &dyn Platform,
    ) -> Result<Option<DateTimeValue>> {
        let utc = utc_zone();

        let value = match value {
            Value::DateTime(v) => Value::DateTime(v.with_zone(Arc::clone(&utc))),
            Value::Text(text) => {
                let format = FormatDescriptor::new(platform.datetime_format());
                match format.parse(&text, &utc) {
                    Some(parsed) => Value::DateTime(DateTimeValue::new(
                        parsed.with_timezone(&Utc),
                        Arc::clone(&utc),
                    )),
                    None => {
                        warn!(
                            value = %text,
                            expected_format = %format,
                            platform = platform.name(),
                            "Stored date-time does not match platform format"
                        );
                        return Err(ConversionError::conversion_failed(
                            text,
                            self.name(),
                            platform.datetime_format(),
                        ));
                    }
                }
            }
            // Numeric and binary representations are the base's call
            other => other,
        };

        Ok(self
            .base
            .from_storage(value, platform)?
            .map(|v| v.with_zone(utc)))
    }
}

// Base DateTime conversion
//
// Default rules for date-time columns: render in the value's own zone, read
// text in a configurable default zone. Knows nothing about UTC normalization.

use crate::domain::error::Result;
use crate::domain::{ConversionError, DateTimeValue, FormatDescriptor, Value, Zone};
use crate::port::{ConversionType, Platform};
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use std::sync::Arc;
use tracing::debug;

/// The Unix epoch in SQLite julian days: `julianday('1970-01-01T00:00:00Z')`.
const UNIX_EPOCH_AS_JULIAN_DAYS: f64 = 2_440_587.5;

/// SQLite assumes 24 hours in every day.
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Lenient layout tried when text does not match the platform layout.
const FALLBACK_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%.f";

pub struct BaseDateTimeType {
    default_zone: Arc<Zone>,
}

impl BaseDateTimeType {
    pub const NAME: &'static str = "datetime";

    /// Base conversion reading zone-less text in `default_zone`.
    pub fn new(default_zone: Arc<Zone>) -> Self {
        Self { default_zone }
    }

    pub fn default_zone(&self) -> &Arc<Zone> {
        &self.default_zone
    }

    fn parse_text(&self, text: &str, platform: &dyn Platform) -> Result<DateTimeValue> {
        let format = FormatDescriptor::new(platform.datetime_format());

        if let Some(parsed) = format.parse(text, &self.default_zone) {
            return Ok(self.tag(parsed, format.has_offset()));
        }

        if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
            debug!(value = %text, "Parsed date-time with RFC 3339 fallback");
            return Ok(DateTimeValue::from_fixed(parsed));
        }

        if let Ok(naive) = NaiveDateTime::parse_from_str(text, FALLBACK_LAYOUT) {
            if let Some(value) = DateTimeValue::from_local(naive, Arc::clone(&self.default_zone)) {
                debug!(value = %text, "Parsed date-time with lenient fallback");
                return Ok(value);
            }
        }

        Err(ConversionError::conversion_failed(
            text,
            Self::NAME,
            format.as_str(),
        ))
    }

    fn tag(&self, parsed: DateTime<FixedOffset>, written_offset: bool) -> DateTimeValue {
        if written_offset {
            DateTimeValue::from_fixed(parsed)
        } else {
            DateTimeValue::new(parsed.with_timezone(&Utc), Arc::clone(&self.default_zone))
        }
    }
}

impl Default for BaseDateTimeType {
    /// Reads zone-less text in the process's local offset.
    fn default() -> Self {
        Self::new(Arc::new(Zone::local()))
    }
}

impl ConversionType for BaseDateTimeType {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn to_storage(&self, value: Value, platform: &dyn Platform) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::DateTime(v) => {
                let format = FormatDescriptor::new(platform.datetime_format());
                format
                    .render(&v.local())
                    .map(Value::Text)
                    .ok_or_else(|| ConversionError::InvalidFormat(format.as_str().to_string()))
            }
            other => Err(ConversionError::invalid_type(
                &other,
                Self::NAME,
                &["null", "DateTime"],
            )),
        }
    }

    fn from_storage(
        &self,
        value: Value,
        platform: &dyn Platform,
    ) -> Result<Option<DateTimeValue>> {
        match value {
            Value::Null => Ok(None),
            Value::DateTime(v) => Ok(Some(v)),
            Value::Text(text) => self.parse_text(&text, platform).map(Some),
            Value::Integer(seconds) => DateTime::from_timestamp(seconds, 0)
                .map(|instant| Some(DateTimeValue::utc(instant)))
                .ok_or_else(|| {
                    ConversionError::OutOfRange(format!("{} seconds since epoch", seconds))
                }),
            Value::Real(days) => julian_days_to_instant(days).map(|i| Some(DateTimeValue::utc(i))),
            other @ Value::Blob(_) => Err(ConversionError::invalid_type(
                &other,
                Self::NAME,
                &["null", "text", "integer", "real", "DateTime"],
            )),
        }
    }
}

/// Converts an SQLite julian day number to an instant, to the millisecond.
fn julian_days_to_instant(days: f64) -> Result<DateTime<Utc>> {
    let out_of_range = || ConversionError::OutOfRange(format!("{} julian days", days));

    if !days.is_finite() {
        return Err(out_of_range());
    }

    let millis = ((days - UNIX_EPOCH_AS_JULIAN_DAYS) * MILLIS_PER_DAY).round();
    if millis < i64::MIN as f64 || millis > i64::MAX as f64 {
        return Err(out_of_range());
    }

    DateTime::from_timestamp_millis(millis as i64).ok_or_else(out_of_range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::platform::{CustomPlatform, SqlitePlatform};

    fn base_at_plus_five() -> BaseDateTimeType {
        BaseDateTimeType::new(Arc::new(Zone::east(5 * 3600).unwrap()))
    }

    #[test]
    fn test_to_storage_renders_in_own_zone() {
        let base = base_at_plus_five();
        let value = DateTimeValue::parse_rfc3339("2023-06-01T12:00:00+02:00").unwrap();
        let stored = base.to_storage(Value::DateTime(value), &SqlitePlatform).unwrap();
        assert_eq!(stored, Value::Text("2023-06-01 12:00:00".to_string()));
    }

    #[test]
    fn test_to_storage_null_and_invalid_type() {
        let base = base_at_plus_five();
        assert_eq!(base.to_storage(Value::Null, &SqlitePlatform).unwrap(), Value::Null);

        let err = base
            .to_storage(Value::from("2023-06-01 10:00:00"), &SqlitePlatform)
            .unwrap_err();
        assert!(matches!(err, ConversionError::InvalidType { .. }));
    }

    #[test]
    fn test_to_storage_malformed_layout() {
        let base = base_at_plus_five();
        let value = DateTimeValue::parse_rfc3339("2023-06-01T10:00:00Z").unwrap();
        let err = base
            .to_storage(Value::DateTime(value), &CustomPlatform::new("broken", "%Y %!"))
            .unwrap_err();
        assert_eq!(err, ConversionError::InvalidFormat("%Y %!".to_string()));
    }

    #[test]
    fn test_from_storage_text_uses_default_zone() {
        let base = base_at_plus_five();
        let value = base
            .from_storage(Value::from("2023-06-01 10:00:00"), &SqlitePlatform)
            .unwrap()
            .unwrap();
        assert_eq!(value.zone().name(), "+05:00");
        assert_eq!(value.instant().to_rfc3339(), "2023-06-01T05:00:00+00:00");
    }

    #[test]
    fn test_from_storage_fallbacks() {
        let base = base_at_plus_five();
        let rfc = base
            .from_storage(Value::from("2023-06-01T10:00:00Z"), &SqlitePlatform)
            .unwrap()
            .unwrap();
        assert_eq!(rfc.instant().to_rfc3339(), "2023-06-01T10:00:00+00:00");

        let fractional = base
            .from_storage(Value::from("2023-06-01 10:00:00.250"), &SqlitePlatform)
            .unwrap()
            .unwrap();
        assert_eq!(fractional.local().timestamp_subsec_millis(), 250);

        let err = base
            .from_storage(Value::from("garbage"), &SqlitePlatform)
            .unwrap_err();
        assert_eq!(
            err,
            ConversionError::conversion_failed("garbage", "datetime", "Y-m-d H:i:s")
        );
    }

    #[test]
    fn test_from_storage_numeric() {
        let base = base_at_plus_five();

        let unix = base
            .from_storage(Value::Integer(1_685_613_600), &SqlitePlatform)
            .unwrap()
            .unwrap();
        assert_eq!(unix.instant().to_rfc3339(), "2023-06-01T10:00:00+00:00");

        let julian = base
            .from_storage(Value::Real(2_460_097.0), &SqlitePlatform)
            .unwrap()
            .unwrap();
        assert_eq!(julian.instant().to_rfc3339(), "2023-06-01T12:00:00+00:00");

        assert!(matches!(
            base.from_storage(Value::Real(f64::NAN), &SqlitePlatform),
            Err(ConversionError::OutOfRange(_))
        ));
        assert!(matches!(
            base.from_storage(Value::Integer(i64::MAX), &SqlitePlatform),
            Err(ConversionError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_from_storage_blob_is_invalid_type() {
        let base = base_at_plus_five();
        let err = base
            .from_storage(Value::Blob(vec![1, 2, 3]), &SqlitePlatform)
            .unwrap_err();
        assert!(matches!(err, ConversionError::InvalidType { .. }));
    }

    #[test]
    fn test_from_storage_null() {
        let base = BaseDateTimeType::default();
        assert!(base
            .from_storage(Value::Null, &SqlitePlatform)
            .unwrap()
            .is_none());
    }
}

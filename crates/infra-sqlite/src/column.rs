// UTC date-time column type for SQLx
//
// Encoding and decoding both go through `UtcDateTimeType` with the SQLite
// platform layout, so every value written is UTC text and every value read is
// tagged with the shared UTC zone.

use once_cell::sync::Lazy;
use sqlx::encode::IsNull;
use sqlx::error::{BoxDynError, UnexpectedNullError};
use sqlx::sqlite::{Sqlite, SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef};
use sqlx::{Decode, Encode, Type, TypeInfo, ValueRef};
use tempora_core::domain::{DateTimeValue, Value};
use tempora_core::port::{ConversionType, SqlitePlatform};
use tempora_core::UtcDateTimeType;

static CONVERTER: Lazy<UtcDateTimeType> = Lazy::new(UtcDateTimeType::new);

/// A `DateTimeValue` stored in an SQLite column as UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtcDateTime(DateTimeValue);

impl UtcDateTime {
    pub fn into_inner(self) -> DateTimeValue {
        self.0
    }

    pub fn as_value(&self) -> &DateTimeValue {
        &self.0
    }
}

impl From<DateTimeValue> for UtcDateTime {
    fn from(value: DateTimeValue) -> Self {
        Self(value)
    }
}

impl From<&DateTimeValue> for UtcDateTime {
    fn from(value: &DateTimeValue) -> Self {
        Self(value.clone())
    }
}

impl From<UtcDateTime> for DateTimeValue {
    fn from(value: UtcDateTime) -> Self {
        value.0
    }
}

impl Type<Sqlite> for UtcDateTime {
    fn type_info() -> SqliteTypeInfo {
        <str as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <str as Type<Sqlite>>::compatible(ty)
            || <i64 as Type<Sqlite>>::compatible(ty)
            || <f64 as Type<Sqlite>>::compatible(ty)
    }
}

impl Encode<'_, Sqlite> for UtcDateTime {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<SqliteArgumentValue<'_>>,
    ) -> Result<IsNull, BoxDynError> {
        match CONVERTER.to_storage(Value::DateTime(self.0.clone()), &SqlitePlatform)? {
            Value::Text(text) => Encode::<Sqlite>::encode(text, buf),
            Value::Null => Ok(IsNull::Yes),
            other => Err(format!("unexpected storage representation: {}", other.kind()).into()),
        }
    }
}

impl<'r> Decode<'r, Sqlite> for UtcDateTime {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        let raw = read_raw(value)?;
        match CONVERTER.from_storage(raw, &SqlitePlatform)? {
            Some(v) => Ok(Self(v)),
            None => Err(Box::new(UnexpectedNullError)),
        }
    }
}

/// Reads a cell according to the storage class of the value it holds.
fn read_raw(value: SqliteValueRef<'_>) -> Result<Value, BoxDynError> {
    if value.is_null() {
        return Ok(Value::Null);
    }

    // Storage class of this particular value, not the declared column type
    let storage_class = value.type_info().name().to_string();
    let raw = match storage_class.as_str() {
        "INTEGER" => Value::Integer(<i64 as Decode<Sqlite>>::decode(value)?),
        "REAL" => Value::Real(<f64 as Decode<Sqlite>>::decode(value)?),
        "BLOB" => Value::Blob(<Vec<u8> as Decode<Sqlite>>::decode(value)?),
        _ => Value::Text(<String as Decode<Sqlite>>::decode(value)?),
    };
    Ok(raw)
}

// Domain Layer - Date-time values, zones and storage representations

pub mod datetime;
pub mod entry;
pub mod error;
pub mod format;
pub mod value;
pub mod zone;

// Re-exports
pub use datetime::DateTimeValue;
pub use entry::{Entry, EntryId};
pub use error::ConversionError;
pub use format::FormatDescriptor;
pub use value::Value;
pub use zone::{utc_zone, Zone};

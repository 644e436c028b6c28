// Application Layer - Converters invoked by the persistence layer

pub mod base_datetime;
pub mod utc_datetime;

pub use base_datetime::BaseDateTimeType;
pub use utc_datetime::UtcDateTimeType;

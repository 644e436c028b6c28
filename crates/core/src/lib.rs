// Tempora Core - UTC date-time conversion, domain types & ports
// NO infrastructure dependencies: drivers live in adapter crates

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use application::{BaseDateTimeType, UtcDateTimeType};
pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

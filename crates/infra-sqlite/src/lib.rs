// Tempora Infrastructure - SQLite Adapter
// Implements: UTC date-time columns (sqlx Type/Encode/Decode), EntryRepository

mod column;
mod connection;
mod entry_repository;
mod migration;

pub use column::UtcDateTime;
pub use connection::create_pool;
pub use entry_repository::SqliteEntryRepository;
pub use migration::run_migrations;

// Note: sqlx::Error conversion is handled by wrapping in helper functions
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)

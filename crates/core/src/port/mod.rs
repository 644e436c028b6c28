// Port Layer - Interfaces for external collaborators

pub mod conversion;
pub mod entry_repository;
pub mod id_provider; // For deterministic testing
pub mod platform;

// Re-exports
pub use conversion::ConversionType;
pub use entry_repository::EntryRepository;
pub use id_provider::IdProvider;
pub use platform::{
    CustomPlatform, MySqlPlatform, Platform, PostgreSqlPlatform, SqlServerPlatform, SqlitePlatform,
};

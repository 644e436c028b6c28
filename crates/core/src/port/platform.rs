// Platform Port
//
// A database platform contributes the date-time layout its engine renders and
// accepts. The layout is opaque to converters and forwarded as-is.

/// Database platform interface
pub trait Platform: Send + Sync {
    /// Platform identifier (e.g. "sqlite")
    fn name(&self) -> &str;

    /// Date-time text layout, e.g. `Y-m-d H:i:s`
    fn datetime_format(&self) -> &str;
}

/// Layout shared by most SQL engines.
pub const DEFAULT_DATETIME_FORMAT: &str = "Y-m-d H:i:s";

#[derive(Debug, Clone, Copy, Default)]
pub struct SqlitePlatform;

impl Platform for SqlitePlatform {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn datetime_format(&self) -> &str {
        DEFAULT_DATETIME_FORMAT
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PostgreSqlPlatform;

impl Platform for PostgreSqlPlatform {
    fn name(&self) -> &str {
        "postgresql"
    }

    fn datetime_format(&self) -> &str {
        DEFAULT_DATETIME_FORMAT
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlPlatform;

impl Platform for MySqlPlatform {
    fn name(&self) -> &str {
        "mysql"
    }

    fn datetime_format(&self) -> &str {
        DEFAULT_DATETIME_FORMAT
    }
}

/// SQL Server keeps fractional seconds in DATETIME2 text.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerPlatform;

impl Platform for SqlServerPlatform {
    fn name(&self) -> &str {
        "mssql"
    }

    fn datetime_format(&self) -> &str {
        "Y-m-d H:i:s.u"
    }
}

/// Platform with a caller-chosen layout.
#[derive(Debug, Clone)]
pub struct CustomPlatform {
    name: String,
    datetime_format: String,
}

impl CustomPlatform {
    pub fn new(name: impl Into<String>, datetime_format: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            datetime_format: datetime_format.into(),
        }
    }
}

impl Platform for CustomPlatform {
    fn name(&self) -> &str {
        &self.name
    }

    fn datetime_format(&self) -> &str {
        &self.datetime_format
    }
}

/// Resolve a built-in platform by its configured name.
pub fn by_name(name: &str) -> Option<Box<dyn Platform>> {
    match name.to_ascii_lowercase().as_str() {
        "sqlite" | "sqlite3" => Some(Box::new(SqlitePlatform)),
        "postgresql" | "postgres" | "pgsql" => Some(Box::new(PostgreSqlPlatform)),
        "mysql" | "mariadb" => Some(Box::new(MySqlPlatform)),
        "mssql" | "sqlserver" => Some(Box::new(SqlServerPlatform)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name() {
        assert_eq!(by_name("SQLite").unwrap().name(), "sqlite");
        assert_eq!(by_name("postgres").unwrap().name(), "postgresql");
        assert_eq!(
            by_name("sqlserver").unwrap().datetime_format(),
            "Y-m-d H:i:s.u"
        );
        assert!(by_name("oracle").is_none());
    }

    #[test]
    fn test_custom_platform() {
        let platform = CustomPlatform::new("legacy", "%d/%m/%Y %H:%M");
        assert_eq!(platform.name(), "legacy");
        assert_eq!(platform.datetime_format(), "%d/%m/%Y %H:%M");
    }
}

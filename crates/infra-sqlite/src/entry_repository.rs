// SQLite EntryRepository Implementation

use crate::column::UtcDateTime;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tempora_core::domain::{ConversionError, DateTimeValue, Entry, EntryId};
use tempora_core::error::{AppError, Result};
use tempora_core::port::EntryRepository;
use tracing::{debug, warn};

// Helper to convert sqlx::Error to AppError with structured information
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::ColumnDecode { index, source } => {
            // Conversion failures raised while decoding a column keep their type
            match source.downcast::<ConversionError>() {
                Ok(conversion) => {
                    warn!(column = %index, error = %conversion, "Stored date-time could not be converted");
                    AppError::Conversion(*conversion)
                }
                Err(source) => {
                    AppError::Database(format!("Failed to decode column {}: {}", index, source))
                }
            }
        }
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                let code_str = code.as_ref();

                // SQLite error codes: https://www.sqlite.org/rescode.html
                match code_str {
                    "2067" | "1555" => {
                        // UNIQUE constraint failed
                        AppError::Database(format!(
                            "Unique constraint violation: {} ({})",
                            db_err.message(),
                            code_str
                        ))
                    }
                    "5" => {
                        // SQLITE_BUSY - database is locked
                        AppError::Database(format!(
                            "Database locked (SQLITE_BUSY): {}",
                            db_err.message()
                        ))
                    }
                    _ => AppError::Database(format!(
                        "Database error [{}]: {}",
                        code_str,
                        db_err.message()
                    )),
                }
            } else {
                AppError::Database(format!("Database error: {}", db_err.message()))
            }
        }
        sqlx::Error::RowNotFound => AppError::NotFound("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Database(format!("Column not found: {}", col))
        }
        // Connection, pool, protocol errors
        other => AppError::Database(other.to_string()),
    }
}

pub struct SqliteEntryRepository {
    pool: SqlitePool,
}

impl SqliteEntryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntryRepository for SqliteEntryRepository {
    async fn insert(&self, entry: &Entry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO entries (id, label, occurred_at, expires_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.label)
        .bind(UtcDateTime::from(&entry.occurred_at))
        .bind(entry.expires_at.as_ref().map(UtcDateTime::from))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!(entry_id = %entry.id, occurred_at = %entry.occurred_at, "Entry stored");
        Ok(())
    }

    async fn find_by_id(&self, id: &EntryId) -> Result<Option<Entry>> {
        let row = sqlx::query_as::<_, EntryRow>("SELECT * FROM entries WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(EntryRow::into_entry))
    }

    async fn find_between(&self, from: &DateTimeValue, to: &DateTimeValue) -> Result<Vec<Entry>> {
        // Bounds are encoded as UTC text; numeric rows are brought to the same
        // text form so every storage class orders on the instant it holds
        let rows: Vec<EntryRow> = sqlx::query_as(
            r#"
            SELECT id, label, occurred_at, expires_at FROM (
                SELECT *,
                    CASE typeof(occurred_at)
                        WHEN 'integer' THEN datetime(occurred_at, 'unixepoch')
                        WHEN 'real' THEN datetime(occurred_at)
                        ELSE occurred_at
                    END AS occurred_utc
                FROM entries
            )
            WHERE occurred_utc >= ? AND occurred_utc < ?
            ORDER BY occurred_utc ASC, id ASC
            "#,
        )
        .bind(UtcDateTime::from(from))
        .bind(UtcDateTime::from(to))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!(found = rows.len(), from = %from, to = %to, "Range query");
        Ok(rows.into_iter().map(EntryRow::into_entry).collect())
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM entries")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count)
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct EntryRow {
    id: String,
    label: String,
    occurred_at: UtcDateTime,
    expires_at: Option<UtcDateTime>,
}

impl EntryRow {
    fn into_entry(self) -> Entry {
        Entry {
            id: self.id,
            label: self.label,
            occurred_at: self.occurred_at.into_inner(),
            expires_at: self.expires_at.map(UtcDateTime::into_inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};

    async fn setup_test_db() -> SqlitePool {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    fn at(text: &str) -> DateTimeValue {
        DateTimeValue::parse_rfc3339(text).unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = SqliteEntryRepository::new(setup_test_db().await);

        let entry = Entry::new(
            "entry-1",
            "deploy",
            at("2023-06-01T12:00:00+02:00"),
            None,
        )
        .unwrap();
        repo.insert(&entry).await.unwrap();

        let found = repo.find_by_id(&entry.id).await.unwrap().unwrap();
        assert_eq!(found.id, entry.id);
        assert!(found.occurred_at.same_instant(&entry.occurred_at));
        assert!(found.occurred_at.has_shared_utc_zone());
        assert!(found.expires_at.is_none());
    }

    #[tokio::test]
    async fn test_find_missing() {
        let repo = SqliteEntryRepository::new(setup_test_db().await);
        assert!(repo
            .find_by_id(&"missing".to_string())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_id_is_database_error() {
        let repo = SqliteEntryRepository::new(setup_test_db().await);
        let entry = Entry::new("dup", "a", at("2023-06-01T10:00:00Z"), None).unwrap();

        repo.insert(&entry).await.unwrap();
        let err = repo.insert(&entry).await.unwrap_err();
        assert!(matches!(err, AppError::Database(msg) if msg.contains("Unique constraint")));
    }

    #[tokio::test]
    async fn test_range_includes_numeric_rows() {
        let pool = setup_test_db().await;
        sqlx::query(
            r#"
            INSERT INTO entries (id, label, occurred_at) VALUES
                ('unix', 'unix seconds', 1685613600),
                ('julian', 'julian day', julianday('2023-06-01 11:00:00')),
                ('early', 'before range', 1685577600)
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();

        let repo = SqliteEntryRepository::new(pool);
        repo.insert(
            &Entry::new("text", "utc text", at("2023-06-01T12:30:00+02:00"), None).unwrap(),
        )
        .await
        .unwrap();

        let found = repo
            .find_between(&at("2023-06-01T09:00:00Z"), &at("2023-06-02T00:00:00Z"))
            .await
            .unwrap();

        // unix 10:00Z, text 10:30Z, julian 11:00Z; early is 00:00Z
        let ids: Vec<&str> = found.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["unix", "text", "julian"]);
        assert!(found.iter().all(|e| e.occurred_at.has_shared_utc_zone()));
        assert_eq!(repo.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_unparseable_row_surfaces_conversion_error() {
        let pool = setup_test_db().await;
        sqlx::query("INSERT INTO entries (id, label, occurred_at) VALUES ('bad', 'x', 'yesterday')")
            .execute(&pool)
            .await
            .unwrap();

        let repo = SqliteEntryRepository::new(pool);
        let err = repo.find_by_id(&"bad".to_string()).await.unwrap_err();

        match err {
            AppError::Conversion(ConversionError::ConversionFailed {
                value,
                expected_format,
                ..
            }) => {
                assert_eq!(value, "yesterday");
                assert_eq!(expected_format, "Y-m-d H:i:s");
            }
            other => panic!("expected conversion failure, got {:?}", other),
        }
    }
}

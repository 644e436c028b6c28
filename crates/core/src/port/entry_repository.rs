// Entry Repository Port (Interface)

use crate::domain::{DateTimeValue, Entry, EntryId};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for Entry persistence
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Insert a new entry
    async fn insert(&self, entry: &Entry) -> Result<()>;

    /// Find entry by ID
    async fn find_by_id(&self, id: &EntryId) -> Result<Option<Entry>>;

    /// Entries with `from <= occurred_at < to`, oldest first
    async fn find_between(&self, from: &DateTimeValue, to: &DateTimeValue) -> Result<Vec<Entry>>;

    /// Count all entries
    async fn count(&self) -> Result<i64>;
}

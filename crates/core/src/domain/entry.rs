// Entry Domain Model
//
// A labelled point in time persisted through the UTC converter.

use super::datetime::DateTimeValue;
use crate::error::{AppError, Result};
use serde::Serialize;

/// Entry ID (UUID v4)
pub type EntryId = String;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub id: EntryId,
    pub label: String,
    pub occurred_at: DateTimeValue,
    pub expires_at: Option<DateTimeValue>,
}

impl Entry {
    /// Create a new entry
    ///
    /// An expiry, when given, must not precede the occurrence.
    pub fn new(
        id: impl Into<EntryId>,
        label: impl Into<String>,
        occurred_at: DateTimeValue,
        expires_at: Option<DateTimeValue>,
    ) -> Result<Self> {
        if let Some(expires_at) = &expires_at {
            if expires_at.instant() < occurred_at.instant() {
                return Err(AppError::Validation(format!(
                    "expiry {} precedes occurrence {}",
                    expires_at, occurred_at
                )));
            }
        }

        Ok(Self {
            id: id.into(),
            label: label.into(),
            occurred_at,
            expires_at,
        })
    }

    /// Whether the entry has expired at `now`
    pub fn is_expired_at(&self, now: &DateTimeValue) -> bool {
        self.expires_at
            .as_ref()
            .is_some_and(|expires_at| expires_at.instant() <= now.instant())
    }
}

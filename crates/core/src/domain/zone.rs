// Time Zone Model

use chrono::{FixedOffset, Offset, Utc};
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;

/// Canonical name of the storage zone.
pub const UTC_NAME: &str = "UTC";

/// Process-wide UTC zone, built on first access and shared read-only afterwards.
static UTC: Lazy<Arc<Zone>> = Lazy::new(|| {
    tracing::debug!("Initializing shared UTC zone");
    Arc::new(Zone {
        name: UTC_NAME.to_string(),
        offset: Utc.fix(),
    })
});

/// Returns the shared UTC zone.
///
/// Every call, from any thread, returns a handle to the same allocation:
/// `Arc::ptr_eq(&utc_zone(), &utc_zone())` always holds.
pub fn utc_zone() -> Arc<Zone> {
    Arc::clone(&UTC)
}

/// A named fixed offset from UTC.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Zone {
    name: String,
    offset: FixedOffset,
}

impl Zone {
    /// Zone with an explicit name (e.g. `"Europe/Helsinki"` during summer time).
    pub fn named(name: impl Into<String>, offset: FixedOffset) -> Self {
        Self {
            name: name.into(),
            offset,
        }
    }

    /// Zone named after its offset, e.g. `+02:00`.
    pub fn fixed(offset: FixedOffset) -> Self {
        Self {
            name: offset.to_string(),
            offset,
        }
    }

    /// Zone from a whole number of seconds east of UTC.
    ///
    /// Returns `None` when the offset is a day or more.
    pub fn east(seconds: i32) -> Option<Self> {
        FixedOffset::east_opt(seconds).map(Self::fixed)
    }

    /// Offset the process is currently running at.
    pub fn local() -> Self {
        let offset = *chrono::Local::now().offset();
        Self::named("Local", offset)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn is_utc(&self) -> bool {
        self.offset.local_minus_utc() == 0
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// Date-time value carried across the persistence boundary

use super::zone::{utc_zone, Zone};
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// An instant together with the zone it is presented in.
///
/// Rezoning never changes the instant. Two values are equal when both their
/// instant and their zone are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateTimeValue {
    instant: DateTime<Utc>,
    zone: Arc<Zone>,
}

impl DateTimeValue {
    /// Builds a value for `instant`, presented in `zone`.
    pub fn new(instant: DateTime<Utc>, zone: Arc<Zone>) -> Self {
        Self { instant, zone }
    }

    /// Builds a value for `instant`, presented in the shared UTC zone.
    pub fn utc(instant: DateTime<Utc>) -> Self {
        Self::new(instant, utc_zone())
    }

    /// Interprets wall-clock fields as local time in `zone`.
    pub fn from_local(naive: NaiveDateTime, zone: Arc<Zone>) -> Option<Self> {
        let local = zone.offset().from_local_datetime(&naive).single()?;
        Some(Self::new(local.with_timezone(&Utc), zone))
    }

    /// Keeps the offset of `value` as an unnamed fixed zone.
    pub fn from_fixed(value: DateTime<FixedOffset>) -> Self {
        let zone = Arc::new(Zone::fixed(*value.offset()));
        Self::new(value.with_timezone(&Utc), zone)
    }

    /// Parses an RFC 3339 string, keeping the offset it was written in.
    pub fn parse_rfc3339(text: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(text).ok().map(Self::from_fixed)
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    pub fn zone(&self) -> &Arc<Zone> {
        &self.zone
    }

    /// The instant as wall-clock time in this value's zone.
    pub fn local(&self) -> DateTime<FixedOffset> {
        self.instant.with_timezone(&self.zone.offset())
    }

    /// Same instant, presented in `zone`.
    pub fn with_zone(self, zone: Arc<Zone>) -> Self {
        Self {
            instant: self.instant,
            zone,
        }
    }

    /// True when this value is tagged with the shared UTC zone itself,
    /// not merely an equivalent zero offset.
    pub fn has_shared_utc_zone(&self) -> bool {
        Arc::ptr_eq(&self.zone, &utc_zone())
    }

    pub fn same_instant(&self, other: &DateTimeValue) -> bool {
        self.instant == other.instant
    }

    pub fn to_rfc3339(&self) -> String {
        self.local().to_rfc3339()
    }
}

impl fmt::Display for DateTimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_rfc3339())
    }
}

impl Serialize for DateTimeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

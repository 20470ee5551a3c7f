//! Watermark model for tracking sync state
//!
//! A watermark records when the last fully successful sync cycle of a
//! collection started. The next cycle only asks the source for members
//! changed since that instant.

use crate::domain::ids::CollectionId;
use crate::domain::{Result, SyncError};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Watermark for one collection
///
/// # Examples
///
/// ```
/// use listsync::core::state::Watermark;
/// use listsync::domain::ids::CollectionId;
/// use chrono::{TimeZone, Utc};
///
/// let id = CollectionId::new("a1b2c3").unwrap();
/// let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
/// let watermark = Watermark::new(id, at);
///
/// assert_eq!(watermark.filter_value(), "2025-03-01T12:00:00Z");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watermark {
    /// Collection this watermark tracks
    pub collection_id: CollectionId,

    /// Start time of the last cycle that synced every page
    pub last_completed_at: DateTime<Utc>,
}

impl Watermark {
    /// Create a watermark
    pub fn new(collection_id: CollectionId, last_completed_at: DateTime<Utc>) -> Self {
        Self {
            collection_id,
            last_completed_at,
        }
    }

    /// Parse a stored value
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::State`] if `value` is not an RFC 3339 timestamp.
    pub fn parse(collection_id: CollectionId, value: &str) -> Result<Self> {
        let parsed = DateTime::parse_from_rfc3339(value.trim()).map_err(|e| {
            SyncError::State(format!(
                "Stored watermark for list {collection_id} is not a valid timestamp ({value:?}): {e}"
            ))
        })?;

        Ok(Self::new(collection_id, parsed.with_timezone(&Utc)))
    }

    /// Value written to the store
    pub fn to_stored(&self) -> String {
        self.filter_value()
    }

    /// Value sent as the source's changed-since filter
    pub fn filter_value(&self) -> String {
        self.last_completed_at
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

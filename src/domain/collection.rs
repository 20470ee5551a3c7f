//! Collection (audience list) model

use super::ids::CollectionId;
use serde::{Deserialize, Serialize};

/// A list of contacts on the source CRM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// List identifier
    pub id: CollectionId,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Membership statistics as reported by the source
    #[serde(default)]
    pub stats: CollectionStats,
}

/// Membership statistics of a collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionStats {
    /// Number of subscribed members
    #[serde(default)]
    pub member_count: u64,

    /// Number of contacts in any status
    #[serde(default)]
    pub total_contacts: u64,
}

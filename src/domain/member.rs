//! Source-side member records
//!
//! These mirror the minimal field projection requested from the source API.
//! Every field defaults to empty when omitted from the response.

use serde::{Deserialize, Serialize};

/// One page of members for a collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MembersPage {
    /// Number of members matching the query across all pages
    #[serde(default)]
    pub total_items: usize,

    /// Members on this page, in source order
    #[serde(default)]
    pub members: Vec<Member>,
}

/// A contact as stored on the source CRM
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Member {
    /// Source member id (hash of the lowercase email address)
    pub id: String,

    /// Email address
    pub email_address: String,

    /// Free-text full name
    pub full_name: String,

    /// Subscription status (subscribed, unsubscribed, cleaned, ...)
    pub status: String,

    /// Structured name fields
    pub merge_fields: MergeFields,
}

/// Structured name merge fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeFields {
    /// First name
    #[serde(rename = "FNAME")]
    pub first_name: String,

    /// Last name
    #[serde(rename = "LNAME")]
    pub last_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_members_page_deserialization() {
        let json = r#"{
            "total_items": 2,
            "members": [
                {
                    "id": "m1",
                    "email_address": "jane@example.com",
                    "full_name": "Jane Public",
                    "status": "subscribed",
                    "merge_fields": { "FNAME": "Jane", "LNAME": "Public" }
                },
                { "id": "m2", "email_address": "bob@example.com" }
            ]
        }"#;

        let page: MembersPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.total_items, 2);
        assert_eq!(page.members.len(), 2);
        assert_eq!(page.members[0].merge_fields.first_name, "Jane");
        assert_eq!(page.members[0].merge_fields.last_name, "Public");
        assert_eq!(page.members[1].full_name, "");
        assert_eq!(page.members[1].merge_fields, MergeFields::default());
    }

    #[test]
    fn test_out_of_range_page_is_empty() {
        let page: MembersPage = serde_json::from_str(r#"{"total_items": 1800}"#).unwrap();
        assert_eq!(page.total_items, 1800);
        assert!(page.members.is_empty());
    }
}

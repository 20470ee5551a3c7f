//! Mailchimp API request and response models

use crate::domain::Collection;
use serde::Deserialize;

/// Field projection for member pages
///
/// Only what the transformer reads is requested, which keeps pages small.
pub const MEMBER_FIELDS: &[&str] = &[
    "total_items",
    "members.id",
    "members.email_address",
    "members.full_name",
    "members.status",
    "members.merge_fields.FNAME",
    "members.merge_fields.LNAME",
];

/// Number of lists requested by the listing call
pub const LIST_PAGE_SIZE: usize = 1000;

/// User name sent with basic auth; the API only checks the password
pub const BASIC_AUTH_USER: &str = "listsync";

/// Response of `GET /lists`
#[derive(Debug, Deserialize)]
pub struct ListsResponse {
    /// Lists visible to the API key
    #[serde(default)]
    pub lists: Vec<Collection>,
}

/// Build the query string of a member page request
pub fn member_page_query(offset: usize, count: usize, since: Option<&str>) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("fields", MEMBER_FIELDS.join(",")),
        ("offset", offset.to_string()),
        ("count", count.to_string()),
    ];

    if let Some(since) = since.filter(|s| !s.is_empty()) {
        query.push(("since_last_changed", since.to_string()));
    }

    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_page_query_full_sync() {
        let query = member_page_query(1800, 900, None);

        assert_eq!(query.len(), 3);
        assert_eq!(query[1], ("offset", "1800".to_string()));
        assert_eq!(query[2], ("count", "900".to_string()));
        assert!(query[0].1.starts_with("total_items,members.id"));
        assert!(query[0].1.ends_with("members.merge_fields.LNAME"));
    }

    #[test]
    fn test_member_page_query_with_since() {
        let query = member_page_query(0, 900, Some("2025-01-01T00:00:00+00:00"));

        assert_eq!(
            query.last(),
            Some(&("since_last_changed", "2025-01-01T00:00:00+00:00".to_string()))
        );
    }

    #[test]
    fn test_member_page_query_ignores_empty_since() {
        let query = member_page_query(0, 900, Some(""));
        assert!(query.iter().all(|(k, _)| *k != "since_last_changed"));
    }

    #[test]
    fn test_lists_response_deserialization() {
        let json = r#"{"lists": [{"id": "l1", "name": "One"}], "total_items": 1}"#;
        let response: ListsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.lists.len(), 1);
        assert_eq!(response.lists[0].id.as_str(), "l1");
    }
}

//! Destination-side contact records

use serde::{Deserialize, Serialize};

/// A contact in the shape accepted by the destination import endpoint
///
/// Produced by [`crate::core::transform::to_contact`]; never built from a
/// cached member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Source member id
    pub id: String,

    /// First name, possibly derived from the full name
    #[serde(rename = "firstname")]
    pub first_name: String,

    /// Last name, possibly derived from the full name
    #[serde(rename = "lastname")]
    pub last_name: String,

    /// Email address
    pub email: String,

    /// Subscription status, passed through from the source
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_wire_names() {
        let contact = Contact {
            id: "m1".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Public".to_string(),
            email: "jane@example.com".to_string(),
            status: "subscribed".to_string(),
        };

        let value = serde_json::to_value(&contact).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "m1",
                "firstname": "Jane",
                "lastname": "Public",
                "email": "jane@example.com",
                "status": "subscribed"
            })
        );
    }
}

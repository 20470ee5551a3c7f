//! Member to contact transformation
//!
//! Maps source-shaped [`Member`]s into destination-shaped [`Contact`]s.
//! Called every time a page is pushed, so the derived names always reflect
//! the member as it was fetched in the current cycle.
//!
//! # Name derivation
//!
//! - Blank `FNAME` and non-blank full name: first name is the first
//!   whitespace-separated token of the full name.
//! - Blank `LNAME` and a full name with more than one token: last name is the
//!   last token of the full name.
//! - Otherwise the merge fields are used verbatim.
//!
//! ```
//! use listsync::core::transform::to_contact;
//! use listsync::domain::Member;
//!
//! let member = Member {
//!     id: "m1".to_string(),
//!     full_name: "Jane Q Public".to_string(),
//!     ..Default::default()
//! };
//!
//! let contact = to_contact(&member);
//! assert_eq!(contact.first_name, "Jane");
//! assert_eq!(contact.last_name, "Public");
//! ```

use crate::domain::{Contact, Member};

/// Transform one member into a destination contact
pub fn to_contact(member: &Member) -> Contact {
    let full_name = member.full_name.trim();
    let mut tokens = full_name.split_whitespace();
    let first_token = tokens.next();
    let last_token = tokens.last();

    let first_name = match first_token {
        Some(token) if is_blank(&member.merge_fields.first_name) => token.to_string(),
        _ => member.merge_fields.first_name.clone(),
    };

    // A single-token full name only fills the first name
    let last_name = match last_token {
        Some(token) if is_blank(&member.merge_fields.last_name) => token.to_string(),
        _ => member.merge_fields.last_name.clone(),
    };

    Contact {
        id: member.id.clone(),
        first_name,
        last_name,
        email: member.email_address.clone(),
        status: member.status.clone(),
    }
}

/// Transform a page of members, preserving order
pub fn to_contacts(members: &[Member]) -> Vec<Contact> {
    members.iter().map(to_contact).collect()
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MergeFields;
    use test_case::test_case;

    fn member(full_name: &str, first: &str, last: &str) -> Member {
        Member {
            id: "8a25ff1d98".to_string(),
            email_address: "someone@example.com".to_string(),
            full_name: full_name.to_string(),
            status: "subscribed".to_string(),
            merge_fields: MergeFields {
                first_name: first.to_string(),
                last_name: last.to_string(),
            },
        }
    }

    #[test_case("Jane Q Public", "", "", "Jane", "Public" ; "three tokens")]
    #[test_case("Madonna", "", "", "Madonna", "" ; "single token")]
    #[test_case("Jane Public", "Janet", "Doe", "Janet", "Doe" ; "merge fields win")]
    #[test_case("", "", "", "", "" ; "everything blank")]
    #[test_case("   ", "", "", "", "" ; "whitespace full name")]
    #[test_case("Jane Public", "", "Doe", "Jane", "Doe" ; "only first derived")]
    #[test_case("Jane Public", "Janet", "", "Janet", "Public" ; "only last derived")]
    #[test_case("  Jane   Q  Public ", "", "", "Jane", "Public" ; "irregular spacing")]
    #[test_case("Jane Public", "  ", "\t", "Jane", "Public" ; "whitespace merge fields")]
    fn test_name_derivation(full: &str, first: &str, last: &str, want_first: &str, want_last: &str) {
        let contact = to_contact(&member(full, first, last));
        assert_eq!(contact.first_name, want_first);
        assert_eq!(contact.last_name, want_last);
    }

    #[test]
    fn test_passthrough_fields() {
        let mut source = member("Jane Public", "", "");
        source.status = "unsubscribed".to_string();

        let contact = to_contact(&source);
        assert_eq!(contact.id, "8a25ff1d98");
        assert_eq!(contact.email, "someone@example.com");
        assert_eq!(contact.status, "unsubscribed");
    }

    #[test]
    fn test_to_contacts_preserves_order() {
        let members = vec![member("A One", "", ""), member("B Two", "", "")];
        let contacts = to_contacts(&members);

        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[0].first_name, "A");
        assert_eq!(contacts[1].first_name, "B");
    }
}

//! Mailchimp source adapter
//!
//! Reads lists and paginated, delta-filtered member pages from the
//! Mailchimp marketing API.

pub mod client;
pub mod models;

pub use client::MailchimpClient;
pub use models::MEMBER_FIELDS;

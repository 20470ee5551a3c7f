//! Ometria destination adapter
//!
//! Pushes batches of transformed contacts to the contact import endpoint.

pub mod client;

pub use client::OmetriaClient;

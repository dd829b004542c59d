//! Contact record shared by the contact server and its clients.
//!
//! This crate owns the one entity the service exposes and its wire form:
//!
//! - [`Contact`] with identity-only equality and hashing
//! - the JSON codec ([`Contact::to_json`] / [`Contact::from_json`])
//! - [`ContactError`] for payloads that cannot become a `Contact`

pub mod contact;
pub mod error;

pub use contact::{Contact, FIELD_FIRST_NAME, FIELD_INFO, FIELD_LAST_NAME, FIELD_UNIQUE_ID};
pub use error::ContactError;

/// Media type of the serialized contact document.
pub const CONTENT_TYPE: &str = "application/json";

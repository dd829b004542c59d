//! Contact service: a volatile in-memory store behind an HTTP resource.
//!
//! - [`ContactStore`] holds contacts keyed by unique id and is shared by
//!   every request through an `Arc`
//! - [`ContactResource`] maps GET/PUT/DELETE on `<root>/contact/<id>` onto
//!   store calls and status codes
//! - [`http`] frames raw HTTP/1.1 requests and responses
//! - [`ContactServer`] accepts TCP connections and serves them concurrently

pub mod config;
pub mod http;
pub mod resource;
pub mod server;
pub mod store;

pub use config::{ConfigError, ServerConfig};
pub use resource::{ContactResource, Representation, StatusCode, Verb};
pub use server::ContactServer;
pub use store::ContactStore;

//! Client side of the contact service: a blocking HTTP client and the
//! `contact` command-line front end built on it.

pub mod app;
pub mod client;

pub use app::{run_cli, Cli, Operation, Outcome};
pub use client::{ClientError, ContactClient};

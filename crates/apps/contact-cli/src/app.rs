use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use contact_core::Contact;
use std::io::Write;

use crate::client::{ClientError, ContactClient, DEFAULT_CONTEXT_ROOT};

#[derive(Debug, Clone, Parser)]
#[command(name = "contact", about = "Contact service client", version)]
pub struct Cli {
    /// Service address, for example http://localhost:8112
    pub host: String,
    #[arg(long, default_value = DEFAULT_CONTEXT_ROOT)]
    pub context_root: String,
    #[command(subcommand)]
    pub operation: Operation,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Operation {
    Get { unique_id: String },
    Put(PutArgs),
    Delete { unique_id: String },
    List,
}

#[derive(Debug, Clone, Args)]
pub struct PutArgs {
    pub unique_id: String,
    pub first_name: String,
    pub last_name: String,
    pub info: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The service answered with a non-success status, already printed.
    Failed { status: u16 },
}

pub fn run_cli(cli: Cli) -> Result<Outcome> {
    let client = ContactClient::new(&cli.host).with_context_root(&cli.context_root);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&client, &cli.operation, &mut out)
}

pub fn execute<W: Write>(client: &ContactClient, operation: &Operation, out: &mut W) -> Result<Outcome> {
    let result = match operation {
        Operation::Get { unique_id } => client.get(unique_id).map(|contact| vec![contact]),
        Operation::Put(args) => client
            .put(&Contact::new(
                args.unique_id.as_str(),
                args.first_name.as_str(),
                args.last_name.as_str(),
                args.info.as_str(),
            ))
            .map(|()| Vec::new()),
        Operation::Delete { unique_id } => client.delete(unique_id).map(|()| Vec::new()),
        Operation::List => client.list(),
    };

    match result {
        Ok(contacts) => {
            for contact in contacts {
                writeln!(out, "{contact}")?;
            }
            Ok(Outcome::Done)
        }
        Err(ClientError::Status { code, reason, .. }) => {
            writeln!(out, "Error: {code} {reason}")?;
            Ok(Outcome::Failed { status: code })
        }
        Err(err) => Err(err.into()),
    }
}

use contact_core::{Contact, ContactError, CONTENT_TYPE};
use serde_json::Value;
use std::io::Read;
use std::time::Duration;
use ureq::ErrorKind;

pub const DEFAULT_CONTEXT_ROOT: &str = "/contactserver";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("http status {code} {reason} from {url}")]
    Status { code: u16, reason: String, url: String },
    #[error("transport error: {message}")]
    Transport { message: String },
    #[error("invalid contact payload: {0}")]
    Decode(#[from] ContactError),
    #[error("failed to read response body: {0}")]
    Body(#[from] std::io::Error),
}

impl ClientError {
    /// Status code carried by a non-success response, if that is what failed.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Blocking client for one contact service instance.
#[derive(Debug)]
pub struct ContactClient {
    base_url: String,
    context_root: String,
    agent: ureq::Agent,
}

impl ContactClient {
    pub fn new(host: &str) -> Self {
        Self::new_with_timeouts(
            host,
            Duration::from_secs(3),
            Duration::from_secs(10),
            Duration::from_secs(10),
        )
    }

    pub fn new_with_timeouts(
        host: &str,
        connect_timeout: Duration,
        read_timeout: Duration,
        write_timeout: Duration,
    ) -> Self {
        let base_url = if host.starts_with("http://") || host.starts_with("https://") {
            host.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", host.trim_end_matches('/'))
        };

        Self {
            base_url,
            context_root: DEFAULT_CONTEXT_ROOT.to_string(),
            agent: ureq::AgentBuilder::new()
                .timeout_connect(connect_timeout)
                .timeout_read(read_timeout)
                .timeout_write(write_timeout)
                .build(),
        }
    }

    pub fn with_context_root(mut self, context_root: &str) -> Self {
        let trimmed = context_root.trim().trim_matches('/');
        self.context_root =
            if trimmed.is_empty() { String::new() } else { format!("/{trimmed}") };
        self
    }

    pub fn contact_url(&self, unique_id: &str) -> String {
        format!("{}{}/contact/{}", self.base_url, self.context_root, percent_encode(unique_id))
    }

    pub fn get(&self, unique_id: &str) -> Result<Contact, ClientError> {
        let url = self.contact_url(unique_id);
        let response = self.agent.get(&url).call().map_err(|err| map_http_error(&url, err))?;
        let bytes = read_response_body(response)?;
        Ok(Contact::from_json(&bytes)?)
    }

    pub fn put(&self, contact: &Contact) -> Result<(), ClientError> {
        let url = self.contact_url(contact.unique_id());
        let body = contact.to_json()?;
        self.agent
            .put(&url)
            .set("Content-Type", CONTENT_TYPE)
            .send_bytes(&body)
            .map_err(|err| map_http_error(&url, err))?;
        Ok(())
    }

    pub fn delete(&self, unique_id: &str) -> Result<(), ClientError> {
        let url = self.contact_url(unique_id);
        self.agent.delete(&url).call().map_err(|err| map_http_error(&url, err))?;
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<Contact>, ClientError> {
        let url = format!("{}{}/contacts", self.base_url, self.context_root);
        let response = self.agent.get(&url).call().map_err(|err| map_http_error(&url, err))?;
        let bytes = read_response_body(response)?;
        let values: Vec<Value> = serde_json::from_slice(&bytes)
            .map_err(|err| ContactError::InvalidDocument { message: err.to_string() })?;
        values.iter().map(|value| Contact::from_document(value).map_err(ClientError::from)).collect()
    }
}

fn read_response_body(response: ureq::Response) -> Result<Vec<u8>, std::io::Error> {
    let mut bytes = Vec::new();
    response.into_reader().read_to_end(&mut bytes)?;
    Ok(bytes)
}

fn map_http_error(url: &str, err: ureq::Error) -> ClientError {
    match err {
        ureq::Error::Status(code, response) => ClientError::Status {
            code,
            reason: response.status_text().to_string(),
            url: url.to_string(),
        },
        ureq::Error::Transport(transport) => {
            ClientError::Transport { message: summarize_transport_error(&transport) }
        }
    }
}

fn summarize_transport_error(transport: &ureq::Transport) -> String {
    let category = match transport.kind() {
        ErrorKind::ConnectionFailed => "connection refused or target unavailable",
        ErrorKind::Dns => "dns lookup failed",
        ErrorKind::Io => "network i/o error",
        ErrorKind::InvalidUrl => "invalid url",
        ErrorKind::UnknownScheme => "unsupported url scheme",
        ErrorKind::BadStatus => "bad status line from server",
        ErrorKind::BadHeader => "bad header from server",
        _ => "http transport error",
    };
    match transport.message() {
        Some(message) if !message.trim().is_empty() => format!("{category}: {}", message.trim()),
        _ => category.to_string(),
    }
}

/// Escapes everything outside the RFC 3986 unreserved set.
fn percent_encode(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

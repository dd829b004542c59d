use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::http::{self, MAX_REQUEST_BYTES};
use crate::store::ContactStore;

const READ_TIMEOUT: Duration = Duration::from_secs(10);
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

#[derive(Debug, Default, Clone)]
struct RequestLogMeta {
    http_method: String,
    path: String,
}

/// Listening contact service. Each accepted connection carries one request
/// and is served on its own task against the shared store.
#[derive(Debug)]
pub struct ContactServer {
    listener: TcpListener,
    store: Arc<ContactStore>,
    context_root: Arc<str>,
}

impl ContactServer {
    pub async fn bind(config: &ServerConfig, store: Arc<ContactStore>) -> io::Result<Self> {
        let listener = TcpListener::bind(config.listen).await?;
        Ok(Self { listener, store, context_root: config.normalized_context_root().into() })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn run(self) {
        if let Ok(addr) = self.local_addr() {
            log::info!("contactd listening on http://{}{}/contact/", addr, self.context_root);
        }
        loop {
            let (stream, peer_addr) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(err) => {
                    log::warn!("accept failed err={err}");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            };
            let store = Arc::clone(&self.store);
            let context_root = Arc::clone(&self.context_root);
            tokio::spawn(async move {
                handle_connection(stream, peer_addr, &store, &context_root, READ_TIMEOUT).await;
            });
        }
    }
}

async fn handle_connection<S>(
    mut stream: S,
    peer_addr: SocketAddr,
    store: &ContactStore,
    context_root: &str,
    read_timeout: Duration,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let buffer = match tokio::time::timeout(read_timeout, read_request(&mut stream)).await {
        Ok(Ok(buffer)) => buffer,
        Ok(Err(err)) => {
            log::warn!("read error peer={peer_addr} err={err}");
            return;
        }
        Err(_) => {
            log::warn!("read timed out peer={peer_addr} after={read_timeout:?}");
            let response = http::build_error_response("bad request: read timed out");
            write_response(&mut stream, peer_addr, &response).await;
            return;
        }
    };
    if buffer.is_empty() {
        return;
    }

    let request_meta = parse_request_log_meta(&buffer);
    let started_at = Instant::now();
    let response_result = if buffer.len() > MAX_REQUEST_BYTES {
        Err(io::Error::new(io::ErrorKind::InvalidInput, "request too large"))
    } else {
        http::handle_http_request(store, context_root, &buffer)
    };
    let elapsed_ms = started_at.elapsed().as_millis() as u64;
    let (response, error_text) = match response_result {
        Ok(response) => (response, None),
        Err(err) => {
            let err_text = err.to_string();
            (http::build_error_response(&format!("bad request: {err_text}")), Some(err_text))
        }
    };
    emit_access_log(peer_addr, &request_meta, &response, elapsed_ms, error_text.as_deref());
    write_response(&mut stream, peer_addr, &response).await;
}

async fn write_response<S>(stream: &mut S, peer_addr: SocketAddr, response: &[u8])
where
    S: AsyncWrite + Unpin,
{
    if let Err(err) = stream.write_all(response).await {
        log::warn!("write error peer={peer_addr} err={err}");
    }
    let _ = stream.shutdown().await;
}

/// Reads until the headers and any declared body have arrived, the peer
/// closes, or the size cap is passed. A declared body over the cap stops
/// the read right after the headers.
async fn read_request<S>(stream: &mut S) -> io::Result<Vec<u8>>
where
    S: AsyncRead + Unpin,
{
    let mut buffer = Vec::new();
    loop {
        let mut chunk = [0_u8; 4096];
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);
        if buffer.len() > MAX_REQUEST_BYTES {
            break;
        }
        if let Some(header_end) = http::find_header_end(&buffer) {
            let headers = &buffer[..header_end];
            match http::parse_content_length(headers) {
                Some(length)
                    if length <= MAX_REQUEST_BYTES
                        && buffer.len() < header_end + 4 + length =>
                {
                    continue
                }
                _ => break,
            }
        }
    }
    Ok(buffer)
}

fn parse_request_log_meta(request: &[u8]) -> RequestLogMeta {
    let mut meta = RequestLogMeta::default();
    let Some(header_end) = http::find_header_end(request) else {
        return meta;
    };
    if let Some((http_method, path)) = http::parse_request_line(&request[..header_end]) {
        meta.http_method = http_method;
        meta.path = path;
    }
    meta
}

fn emit_access_log(
    peer_addr: SocketAddr,
    meta: &RequestLogMeta,
    response: &[u8],
    elapsed_ms: u64,
    error_text: Option<&str>,
) {
    let status_code = http::parse_status_code(response).unwrap_or(0);
    let payload = json!({
        "event": "http_request",
        "peer": peer_addr.to_string(),
        "http_method": meta.http_method,
        "path": meta.path,
        "status_code": status_code,
        "elapsed_ms": elapsed_ms,
        "ok": error_text.is_none(),
        "error": error_text,
    });
    log::info!("{payload}");
}

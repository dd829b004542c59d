use std::io;

use serde_json::json;

use crate::resource::{list_contacts, ContactResource, Representation, StatusCode, Verb};
use crate::store::ContactStore;

const HEADER_END: &[u8] = b"\r\n\r\n";

/// Largest request, headers and body together, the server will frame.
pub const MAX_REQUEST_BYTES: usize = 1024 * 1024;

#[derive(Debug, PartialEq, Eq)]
enum Route {
    Health,
    Contacts,
    Contact(String),
    Unknown,
}

/// Answers one complete HTTP/1.1 request held in `request`.
///
/// Request-shape problems (no header terminator, bad request line, missing
/// or short body on PUT) come back as `Err` so the connection layer can turn
/// them into a 400. Everything routable produces `Ok`, including 404/405/406.
pub fn handle_http_request(
    store: &ContactStore,
    context_root: &str,
    request: &[u8],
) -> io::Result<Vec<u8>> {
    let header_end = find_header_end(request)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "missing headers"))?;
    let headers = &request[..header_end];
    let body_start = header_end + HEADER_END.len();
    let (method, path) = parse_request_line(headers)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid request line"))?;
    let (path_only, _query) = split_path_and_query(path.as_str());

    let representation = match route(context_root, path_only) {
        Route::Health if method == "GET" => {
            let body = serde_json::to_vec(&json!({
                "ok": true,
                "service": "contactd",
                "status": "healthy",
            }))
            .map_err(io::Error::other)?;
            Representation::json(StatusCode::Ok, body)
        }
        Route::Contacts if method == "GET" => {
            list_contacts(store).unwrap_or_else(|err| Representation::from_error(&err))
        }
        Route::Health | Route::Contacts => Representation::empty(StatusCode::MethodNotAllowed),
        Route::Contact(unique_id) => {
            let resource = ContactResource::bind(store, unique_id);
            match Verb::from_method(method.as_str()) {
                Some(Verb::Put) => {
                    let content_length = parse_content_length(headers).ok_or_else(|| {
                        io::Error::new(io::ErrorKind::InvalidInput, "missing content-length")
                    })?;
                    if content_length > MAX_REQUEST_BYTES {
                        return Err(io::Error::new(
                            io::ErrorKind::InvalidInput,
                            "content-length too large",
                        ));
                    }
                    if request.len() < body_start + content_length {
                        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "body incomplete"));
                    }
                    let body = &request[body_start..body_start + content_length];
                    resource.handle(Verb::Put, body)
                }
                Some(verb) => resource.handle(verb, &[]),
                None => Representation::empty(StatusCode::MethodNotAllowed),
            }
        }
        Route::Unknown => Representation::empty(StatusCode::NotFound),
    };
    Ok(build_response(&representation))
}

fn route(context_root: &str, path: &str) -> Route {
    if path == "/healthz" {
        return Route::Health;
    }
    let Some(rest) = path.strip_prefix(context_root) else {
        return Route::Unknown;
    };
    if rest == "/contacts" || rest == "/contacts/" {
        return Route::Contacts;
    }
    match rest.strip_prefix("/contact/") {
        Some(segment) if !segment.is_empty() && !segment.contains('/') => {
            match percent_decode(segment) {
                Some(unique_id) if !unique_id.is_empty() => Route::Contact(unique_id),
                _ => Route::Unknown,
            }
        }
        _ => Route::Unknown,
    }
}

pub fn find_header_end(request: &[u8]) -> Option<usize> {
    request.windows(HEADER_END.len()).position(|window| window == HEADER_END)
}

pub fn parse_content_length(headers: &[u8]) -> Option<usize> {
    let text = String::from_utf8_lossy(headers);
    for line in text.lines() {
        let lower = line.to_ascii_lowercase();
        if let Some(rest) = lower.strip_prefix("content-length:") {
            if let Ok(length) = rest.trim().parse::<usize>() {
                return Some(length);
            }
        }
    }
    None
}

pub fn parse_request_line(headers: &[u8]) -> Option<(String, String)> {
    let text = String::from_utf8_lossy(headers);
    let line = text.lines().next()?;
    let mut parts = line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();
    Some((method, path))
}

pub fn parse_status_code(response: &[u8]) -> Option<u16> {
    let head = &response[..response.len().min(64)];
    let text = String::from_utf8_lossy(head);
    let line = text.lines().next()?;
    let mut parts = line.split_whitespace();
    let _http_version = parts.next()?;
    parts.next()?.parse::<u16>().ok()
}

fn split_path_and_query(path: &str) -> (&str, &str) {
    match path.split_once('?') {
        Some((path_only, query)) => (path_only, query),
        None => (path, ""),
    }
}

/// Decodes `%XX` escapes in a path segment. `+` stays literal.
fn percent_decode(value: &str) -> Option<String> {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'%' => {
                let hi = decode_hex(*bytes.get(idx + 1)?)?;
                let lo = decode_hex(*bytes.get(idx + 2)?)?;
                out.push((hi << 4) | lo);
                idx += 3;
            }
            byte => {
                out.push(byte);
                idx += 1;
            }
        }
    }
    String::from_utf8(out).ok()
}

fn decode_hex(input: u8) -> Option<u8> {
    match input {
        b'0'..=b'9' => Some(input - b'0'),
        b'a'..=b'f' => Some(input - b'a' + 10),
        b'A'..=b'F' => Some(input - b'A' + 10),
        _ => None,
    }
}

pub fn build_response(representation: &Representation) -> Vec<u8> {
    let status = representation.status;
    let body = representation.body.as_deref().unwrap_or_default();
    let mut response = Vec::with_capacity(128 + body.len());
    response.extend_from_slice(
        format!("HTTP/1.1 {} {}\r\n", status.code(), status.reason()).as_bytes(),
    );
    if representation.body.is_some() {
        response
            .extend_from_slice(format!("Content-Type: {}\r\n", representation.content_type).as_bytes());
    }
    response.extend_from_slice(format!("Content-Length: {}\r\n", body.len()).as_bytes());
    response.extend_from_slice(b"Connection: close\r\n");
    response.extend_from_slice(b"\r\n");
    response.extend_from_slice(body);
    response
}

pub fn build_error_response(message: &str) -> Vec<u8> {
    build_response(&Representation::text(StatusCode::BadRequest, message))
}

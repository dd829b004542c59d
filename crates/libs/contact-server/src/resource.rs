use contact_core::{Contact, ContactError, CONTENT_TYPE};

use crate::store::ContactStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    NoContent,
    BadRequest,
    NotFound,
    MethodNotAllowed,
    NotAcceptable,
    InternalServerError,
}

impl StatusCode {
    pub fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::NoContent => 204,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::NotAcceptable => 406,
            Self::InternalServerError => 500,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::NoContent => "No Content",
            Self::BadRequest => "Bad Request",
            Self::NotFound => "Not Found",
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::NotAcceptable => "Not Acceptable",
            Self::InternalServerError => "Internal Server Error",
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, Self::Ok | Self::NoContent)
    }

    fn from_code(code: u16) -> Self {
        match code {
            400 => Self::BadRequest,
            _ => Self::InternalServerError,
        }
    }
}

/// Outcome of a resource call: a status and an optional body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Representation {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: Option<Vec<u8>>,
}

impl Representation {
    pub fn empty(status: StatusCode) -> Self {
        Self { status, content_type: CONTENT_TYPE, body: None }
    }

    pub fn json(status: StatusCode, body: Vec<u8>) -> Self {
        Self { status, content_type: CONTENT_TYPE, body: Some(body) }
    }

    pub fn text(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: Some(message.as_bytes().to_vec()),
        }
    }

    pub fn from_error(err: &ContactError) -> Self {
        Self::text(StatusCode::from_code(err.status()), &err.to_string())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verb {
    Get,
    Put,
    Delete,
}

impl Verb {
    pub fn from_method(method: &str) -> Option<Self> {
        match method {
            "GET" => Some(Self::Get),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// One contact, addressed by the unique id taken from the request path.
#[derive(Debug)]
pub struct ContactResource<'a> {
    store: &'a ContactStore,
    unique_id: String,
}

impl<'a> ContactResource<'a> {
    pub fn bind(store: &'a ContactStore, unique_id: impl Into<String>) -> Self {
        Self { store, unique_id: unique_id.into() }
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn handle(&self, verb: Verb, body: &[u8]) -> Representation {
        let outcome = match verb {
            Verb::Get => self.get(),
            Verb::Put => self.put(body),
            Verb::Delete => Ok(self.delete()),
        };
        outcome.unwrap_or_else(|err| {
            log::info!("contact {} rejected: {err}", self.unique_id);
            Representation::from_error(&err)
        })
    }

    /// 200 with the serialized contact, or 406 with no body when absent.
    pub fn get(&self) -> Result<Representation, ContactError> {
        match self.store.get(&self.unique_id) {
            Some(contact) => Ok(Representation::json(StatusCode::Ok, contact.to_json()?)),
            None => Ok(Representation::empty(StatusCode::NotAcceptable)),
        }
    }

    /// Decodes `body` and stores it. Nothing is stored unless decoding
    /// succeeds and the body id matches the path id.
    pub fn put(&self, body: &[u8]) -> Result<Representation, ContactError> {
        let contact = Contact::from_json(body)?;
        if contact.unique_id() != self.unique_id {
            return Err(ContactError::IdMismatch {
                path: self.unique_id.clone(),
                body: contact.unique_id().to_string(),
            });
        }
        self.store.put(contact);
        Ok(Representation::empty(StatusCode::NoContent))
    }

    pub fn delete(&self) -> Representation {
        self.store.delete(&self.unique_id);
        Representation::empty(StatusCode::NoContent)
    }
}

/// Serializes a snapshot of the whole store as a JSON array.
pub fn list_contacts(store: &ContactStore) -> Result<Representation, ContactError> {
    let snapshot = store.list_snapshot();
    let body = serde_json::to_vec(&snapshot)
        .map_err(|err| ContactError::Encode { message: err.to_string() })?;
    Ok(Representation::json(StatusCode::Ok, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DS_BODY: &[u8] =
        br#"{"unique-ID":"DS","first-name":"Dan","last-name":"Suthers","info":"Professor"}"#;

    #[test]
    fn put_get_delete_get_scenario() {
        let store = ContactStore::new();
        let resource = ContactResource::bind(&store, "DS");

        let put = resource.handle(Verb::Put, DS_BODY);
        assert_eq!(put.status, StatusCode::NoContent);
        assert!(put.body.is_none());

        let got = resource.handle(Verb::Get, &[]);
        assert_eq!(got.status, StatusCode::Ok);
        let contact = Contact::from_json(&got.body.expect("body")).expect("contact");
        assert_eq!(contact.unique_id(), "DS");

        let deleted = resource.handle(Verb::Delete, &[]);
        assert_eq!(deleted.status, StatusCode::NoContent);

        let gone = resource.handle(Verb::Get, &[]);
        assert_eq!(gone.status.code(), 406);
        assert!(gone.body.is_none());
    }

    #[test]
    fn unknown_contact_is_not_acceptable() {
        let store = ContactStore::new();
        let got = ContactResource::bind(&store, "foo").get().expect("get");
        assert_eq!(got, Representation::empty(StatusCode::NotAcceptable));
    }

    #[test]
    fn malformed_body_never_reaches_store() {
        let store = ContactStore::new();
        let resource = ContactResource::bind(&store, "DS");
        let body = br#"{"unique-ID":"DS","first-name":"Dan"}"#;

        let err = resource.put(body).expect_err("missing fields");
        assert!(err.is_malformed());
        assert_eq!(resource.handle(Verb::Put, body).status, StatusCode::BadRequest);
        assert!(store.is_empty());
    }

    #[test]
    fn mismatched_ids_are_rejected() {
        let store = ContactStore::new();
        let resource = ContactResource::bind(&store, "other");

        let err = resource.put(DS_BODY).expect_err("mismatch");
        assert_eq!(err, ContactError::IdMismatch { path: "other".into(), body: "DS".into() });
        assert!(store.is_empty());
    }

    #[test]
    fn delete_of_absent_contact_succeeds() {
        let store = ContactStore::new();
        let deleted = ContactResource::bind(&store, "ghost").delete();
        assert!(deleted.status.is_success());
    }

    #[test]
    fn list_serializes_snapshot() {
        let store = ContactStore::new();
        store.put(Contact::new("a", "Ann", "Lee", "x"));
        store.put(Contact::new("b", "Bo", "Kim", "y"));

        let listed = list_contacts(&store).expect("list");
        let values: Vec<serde_json::Value> =
            serde_json::from_slice(&listed.body.expect("body")).expect("array");
        assert_eq!(values.len(), 2);
        for value in &values {
            Contact::from_document(value).expect("contact");
        }
    }

    #[test]
    fn verbs_parse_from_methods() {
        assert_eq!(Verb::from_method("GET"), Some(Verb::Get));
        assert_eq!(Verb::from_method("PUT"), Some(Verb::Put));
        assert_eq!(Verb::from_method("DELETE"), Some(Verb::Delete));
        assert_eq!(Verb::from_method("POST"), None);
    }
}

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;
use serde_json::Value;

use crate::error::ContactError;

pub const FIELD_UNIQUE_ID: &str = "unique-ID";
pub const FIELD_FIRST_NAME: &str = "first-name";
pub const FIELD_LAST_NAME: &str = "last-name";
pub const FIELD_INFO: &str = "info";

/// A person record addressed by a caller-chosen unique id.
///
/// Equality and hashing look at `unique_id` only: two contacts with the same
/// id are the same contact even when names or info differ. Values are never
/// mutated in place; an update replaces the whole value under the same id.
///
/// Serializes to a flat JSON object whose keys appear in the canonical order
/// `unique-ID`, `first-name`, `last-name`, `info`.
#[derive(Clone, Debug, Serialize)]
pub struct Contact {
    #[serde(rename = "unique-ID")]
    unique_id: String,
    #[serde(rename = "first-name")]
    first_name: String,
    #[serde(rename = "last-name")]
    last_name: String,
    info: String,
}

impl Contact {
    pub fn new(
        unique_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        info: impl Into<String>,
    ) -> Self {
        Self {
            unique_id: unique_id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            info: info.into(),
        }
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn info(&self) -> &str {
        &self.info
    }

    pub fn to_document(&self) -> Result<Value, ContactError> {
        serde_json::to_value(self).map_err(|err| ContactError::Encode { message: err.to_string() })
    }

    /// Serializes the contact in canonical field order.
    pub fn to_json(&self) -> Result<Vec<u8>, ContactError> {
        serde_json::to_vec(self).map_err(|err| ContactError::Encode { message: err.to_string() })
    }

    /// Parses a wire payload. Fields are located by name, never by position.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ContactError> {
        let document: Value = serde_json::from_slice(bytes)
            .map_err(|err| ContactError::InvalidDocument { message: err.to_string() })?;
        Self::from_document(&document)
    }

    pub fn from_document(document: &Value) -> Result<Self, ContactError> {
        Ok(Self {
            unique_id: required_text(document, FIELD_UNIQUE_ID)?,
            first_name: required_text(document, FIELD_FIRST_NAME)?,
            last_name: required_text(document, FIELD_LAST_NAME)?,
            info: required_text(document, FIELD_INFO)?,
        })
    }
}

impl PartialEq for Contact {
    fn eq(&self, other: &Self) -> bool {
        self.unique_id == other.unique_id
    }
}

impl Eq for Contact {}

impl Hash for Contact {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.unique_id.hash(state);
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ID {}: Name: {} {} Info: {}]",
            self.unique_id, self.first_name, self.last_name, self.info
        )
    }
}

fn required_text(document: &Value, field: &'static str) -> Result<String, ContactError> {
    match find_field(document, field) {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(ContactError::NotText { field }),
        None => Err(ContactError::MalformedEntity { field }),
    }
}

/// Depth-first search for the first object key named `field`.
fn find_field<'a>(value: &'a Value, field: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => {
            if let Some(found) = map.get(field) {
                return Some(found);
            }
            map.values().find_map(|child| find_field(child, field))
        }
        Value::Array(items) => items.iter().find_map(|child| find_field(child, field)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    fn professor() -> Contact {
        Contact::new("DS", "Dan", "Suthers", "Professor")
    }

    #[test]
    fn json_roundtrip_keeps_every_field() {
        let contact = Contact::new("ID", "First", "Last", "Info");
        let bytes = contact.to_json().expect("encode");
        let decoded = Contact::from_json(&bytes).expect("decode");
        assert_eq!(decoded, contact);
        assert_eq!(decoded.to_string(), contact.to_string());
    }

    #[test]
    fn roundtrip_keeps_empty_and_non_ascii_text() {
        let contact = Contact::new("", "Zoë", "", "東京 · naïve ✓");
        let decoded = Contact::from_json(&contact.to_json().expect("encode")).expect("decode");
        assert_eq!(decoded.unique_id(), "");
        assert_eq!(decoded.first_name(), "Zoë");
        assert_eq!(decoded.last_name(), "");
        assert_eq!(decoded.info(), "東京 · naïve ✓");
    }

    #[test]
    fn roundtrip_keeps_json_escaped_characters() {
        let contact = Contact::new("a\"b", "back\\slash", "line\nbreak", "tab\tand \"quotes\"");
        let bytes = contact.to_json().expect("encode");
        let decoded = Contact::from_json(&bytes).expect("decode");
        assert_eq!(decoded.unique_id(), "a\"b");
        assert_eq!(decoded.first_name(), "back\\slash");
        assert_eq!(decoded.last_name(), "line\nbreak");
        assert_eq!(decoded.info(), "tab\tand \"quotes\"");
        assert!(!bytes.contains(&b'\n'), "newline must be escaped");
    }

    #[test]
    fn serialized_fields_follow_canonical_order() {
        let text = String::from_utf8(professor().to_json().expect("encode")).expect("utf8");
        let positions: Vec<usize> = [FIELD_UNIQUE_ID, FIELD_FIRST_NAME, FIELD_LAST_NAME, FIELD_INFO]
            .iter()
            .map(|field| text.find(&format!("\"{field}\"")).expect("field present"))
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "order: {text}");
    }

    #[test]
    fn document_is_flat_text_fields() {
        let document = professor().to_document().expect("document");
        assert_eq!(
            document,
            json!({
                "unique-ID": "DS",
                "first-name": "Dan",
                "last-name": "Suthers",
                "info": "Professor",
            })
        );
    }

    #[test]
    fn decodes_fields_in_any_order() {
        let body = br#"{"info":"Professor","last-name":"Suthers","unique-ID":"DS","first-name":"Dan"}"#;
        let contact = Contact::from_json(body).expect("decode");
        assert_eq!(contact.to_string(), "[ID DS: Name: Dan Suthers Info: Professor]");
    }

    #[test]
    fn decodes_fields_nested_under_a_wrapper() {
        let document = json!({
            "contact": {
                "unique-ID": "pmj",
                "first-name": "Philip",
                "last-name": "Johnson",
                "info": "Professor",
            }
        });
        let contact = Contact::from_document(&document).expect("decode");
        assert_eq!(contact.unique_id(), "pmj");
        assert_eq!(contact.last_name(), "Johnson");
    }

    #[test]
    fn missing_field_is_malformed() {
        let body = br#"{"unique-ID":"DS","first-name":"Dan","last-name":"Suthers"}"#;
        let err = Contact::from_json(body).expect_err("info missing");
        assert_eq!(err, ContactError::MalformedEntity { field: FIELD_INFO });
        assert!(err.is_malformed());
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn non_text_field_is_rejected() {
        let body = br#"{"unique-ID":7,"first-name":"Dan","last-name":"Suthers","info":"x"}"#;
        let err = Contact::from_json(body).expect_err("numeric id");
        assert_eq!(err, ContactError::NotText { field: FIELD_UNIQUE_ID });
    }

    #[test]
    fn garbage_body_is_invalid_document() {
        let err = Contact::from_json(b"<contact/>").expect_err("not json");
        assert!(matches!(err, ContactError::InvalidDocument { .. }));
        assert!(!err.is_malformed());
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn equality_uses_unique_id_only() {
        let a = Contact::new("pmj", "Philip", "Johnson", "Professor");
        let renamed = Contact::new("pmj", "Phil", "J", "Emeritus");
        let twin = Contact::new("other", "Philip", "Johnson", "Professor");
        assert_eq!(a, renamed);
        assert_ne!(a, twin);

        let set: HashSet<Contact> = [a, renamed, twin].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn display_matches_diagnostic_format() {
        assert_eq!(professor().to_string(), "[ID DS: Name: Dan Suthers Info: Professor]");
    }
}

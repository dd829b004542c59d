/// Errors raised while turning a wire payload into a [`crate::Contact`].
///
/// Every variant is the caller's fault, so every variant maps to a client
/// error status. None of them is raised after a store has been touched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ContactError {
    #[error("invalid document: {message}")]
    InvalidDocument { message: String },

    #[error("malformed entity: missing field '{field}'")]
    MalformedEntity { field: &'static str },

    #[error("malformed entity: field '{field}' is not text")]
    NotText { field: &'static str },

    #[error("unique id mismatch: path '{path}' but body '{body}'")]
    IdMismatch { path: String, body: String },

    #[error("encode error: {message}")]
    Encode { message: String },
}

impl ContactError {
    /// HTTP status the resource layer answers with for this error.
    pub fn status(&self) -> u16 {
        match self {
            Self::Encode { .. } => 500,
            _ => 400,
        }
    }

    /// Returns `true` when the payload was parsed but lacked a required field.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedEntity { .. } | Self::NotText { .. })
    }
}

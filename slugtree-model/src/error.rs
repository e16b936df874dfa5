use thiserror::Error;

/// Result type alias for entry validation.
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// A raw entry whose field bag does not describe a valid [`crate::Entry`].
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("entry {entry}: required field '{field}' is missing")]
    MissingField { entry: String, field: String },

    #[error("entry {entry}: field '{field}' must not be blank")]
    BlankField { entry: String, field: String },

    #[error("entry {entry}: field '{field}' should be {expected}")]
    WrongType {
        entry: String,
        field: String,
        expected: &'static str,
    },

    #[error("entry {entry}: field '{field}' holds an invalid reference: {source}")]
    InvalidReference {
        entry: String,
        field: String,
        #[source]
        source: slugtree_types::Error,
    },

    #[error("entry {entry}: malformed path metadata in '{field}': {reason}")]
    MalformedPathMeta {
        entry: String,
        field: String,
        reason: String,
    },
}

impl ValidationError {
    /// The store field the error refers to.
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field, .. }
            | Self::BlankField { field, .. }
            | Self::WrongType { field, .. }
            | Self::InvalidReference { field, .. }
            | Self::MalformedPathMeta { field, .. } => field,
        }
    }
}

//! Domain error types for payload validation and envelope decoding.
//!
//! Uses `thiserror` for ergonomic error handling with typed variants
//! that can be inspected by callers.

use thiserror::Error;

/// Errors raised when a field is present but violates an invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// More than one of the mutually exclusive file/directory fields was set.
    #[error("multiple exclusive fields set: {}", .fields.join(", "))]
    MultipleExclusiveFields {
        /// The fields that were set together.
        fields: Vec<&'static str>,
    },

    /// A field that must hold a string held something else.
    #[error("{field} must be a string")]
    NotAString {
        /// The offending field.
        field: String,
    },

    /// A field that must hold a list of strings held something else.
    #[error("{field} must be a list of strings")]
    NotAStringList {
        /// The offending field.
        field: String,
    },

    /// The DICOM operation is not one of the supported values.
    #[error("unsupported operation '{0}'")]
    UnsupportedOperation(String),

    /// The envelope role is not one of the supported values.
    #[error("invalid role '{0}'")]
    InvalidRole(String),

    /// A numeric field was negative.
    #[error("{field} must be non-negative, got {value}")]
    NegativeValue {
        /// The offending field.
        field: String,
        /// The rejected value.
        value: i64,
    },

    /// A numeric field exceeded the range of its type.
    #[error("{field} is out of range: {value}")]
    OutOfRange {
        /// The offending field.
        field: String,
        /// The rejected value.
        value: i64,
    },

    /// A field could not be read as an integer.
    #[error("{field} must be an integer: {reason}")]
    InvalidInteger {
        /// The offending field.
        field: String,
        /// Why coercion failed.
        reason: String,
    },

    /// A field has an invalid shape for some other reason.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// The offending field.
        field: String,
        /// Description of the failure.
        reason: String,
    },

    /// Operation parameters do not match the shape the operation requires.
    #[error("{operation} requires {expected} parameters, got {found}")]
    ParameterMismatch {
        /// The operation being configured.
        operation: String,
        /// The content type the operation requires.
        expected: String,
        /// The content type that was supplied.
        found: String,
    },

    /// A payload carried a different discriminator than the decoder expected.
    #[error("expected content_type '{expected}', got '{found}'")]
    ContentTypeMismatch {
        /// The discriminator the decoder handles.
        expected: String,
        /// The discriminator found in the document.
        found: String,
    },

    /// A custom discriminator is empty or collides with a built-in one.
    #[error("invalid content_type '{0}'")]
    InvalidContentType(String),
}

impl ValidationError {
    /// Creates an error for a field that must be a string.
    #[must_use]
    pub fn not_a_string(field: impl Into<String>) -> Self {
        Self::NotAString {
            field: field.into(),
        }
    }

    /// Creates an error for a field that must be a list of strings.
    #[must_use]
    pub fn not_a_string_list(field: impl Into<String>) -> Self {
        Self::NotAStringList {
            field: field.into(),
        }
    }

    /// Creates an error for a field with an invalid shape.
    #[must_use]
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an error for a field that could not be read as an integer.
    #[must_use]
    pub fn invalid_integer(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInteger {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while mutating or reading the content-type registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A decoder was registered under an empty discriminator.
    #[error("content_type cannot be empty")]
    EmptyContentType,

    /// The registry lock was poisoned by a panicking thread.
    #[error("content-type registry unavailable: {0}")]
    LockPoisoned(String),
}

/// Broad classification of a [`DecodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeErrorKind {
    /// Malformed JSON text.
    Parse,
    /// A required key was missing.
    Schema,
    /// A field violated an invariant.
    Validation,
    /// The discriminator is not registered.
    UnknownType,
    /// The document exceeded a configured limit.
    Limit,
    /// The registry itself could not be used.
    Registry,
}

/// Errors that can occur while reconstructing an envelope from JSON.
///
/// Every variant is a recoverable outcome: callers decoding a stream can
/// log the failure and move on to the next document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The input was not well-formed JSON.
    #[error("malformed JSON: {0}")]
    Parse(String),

    /// A required key was missing.
    #[error("missing {field}")]
    Schema {
        /// The missing key.
        field: String,
    },

    /// A field was present but invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No decoder is registered for the discriminator.
    #[error("unknown content_type '{content_type}' (known types: {})", .registered.join(","))]
    UnknownType {
        /// The unrecognised discriminator.
        content_type: String,
        /// Discriminators registered at the time of the lookup.
        registered: Vec<String>,
    },

    /// The raw document was larger than the configured limit.
    #[error("document size {actual_bytes} exceeds limit of {limit_bytes} bytes")]
    DocumentTooLarge {
        /// The size of the rejected document.
        actual_bytes: usize,
        /// The configured maximum.
        limit_bytes: usize,
    },

    /// The registry could not be consulted.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl DecodeError {
    /// Creates an error for a missing required key.
    #[must_use]
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Schema {
            field: field.into(),
        }
    }

    /// Returns the broad classification of this error.
    #[must_use]
    pub const fn kind(&self) -> DecodeErrorKind {
        match self {
            Self::Parse(_) => DecodeErrorKind::Parse,
            Self::Schema { .. } => DecodeErrorKind::Schema,
            Self::Validation(_) => DecodeErrorKind::Validation,
            Self::UnknownType { .. } => DecodeErrorKind::UnknownType,
            Self::DocumentTooLarge { .. } => DecodeErrorKind::Limit,
            Self::Registry(_) => DecodeErrorKind::Registry,
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

//! Decoder port for payload reconstruction.
//!
//! Defines the abstract interface the content-type registry dispatches to
//! when it turns a JSON `content` object back into a [`Payload`].

use serde_json::Value;

use crate::message::{codec::ContentTypeRegistry, domain::Payload, error::DecodeError};

/// Result type for decoding operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Port for reconstructing a payload variant from its JSON form.
///
/// One decoder is registered per `content_type` discriminator. The registry
/// passes itself to the decoder so nested payloads can be resolved through
/// the same mapping.
///
/// # Implementation Notes
///
/// Implementations should:
/// - Re-validate every field rather than trusting the document
/// - Report a missing key as [`DecodeError::Schema`] and an ill-formed one as
///   [`DecodeError::Validation`]
/// - Be stateless and thread-safe
///
/// Any `Fn(&Value, &ContentTypeRegistry) -> DecodeResult<Payload>` closure is
/// a decoder.
pub trait ContentDecoder: Send + Sync {
    /// Reconstructs a payload from its `content` object.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the content is missing required keys or a
    /// field violates an invariant of the target variant.
    fn decode(&self, content: &Value, registry: &ContentTypeRegistry) -> DecodeResult<Payload>;
}

impl<F> ContentDecoder for F
where
    F: Fn(&Value, &ContentTypeRegistry) -> DecodeResult<Payload> + Send + Sync,
{
    fn decode(&self, content: &Value, registry: &ContentTypeRegistry) -> DecodeResult<Payload> {
        self(content, registry)
    }
}

/// Configuration for envelope decoding.
///
/// # Examples
///
/// ```
/// use insightful_messages::message::ports::decoder::DecoderConfig;
///
/// let config = DecoderConfig::default();
/// assert!(config.accept_legacy_none_marker);
///
/// let strict = DecoderConfig::strict();
/// assert!(!strict.coerce_numeric_strings);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Maximum size of a raw text document in bytes.
    pub max_document_bytes: usize,
    /// Whether the string `"None"` is read as an unset value.
    pub accept_legacy_none_marker: bool,
    /// Whether integer fields may be supplied as numeric strings.
    pub coerce_numeric_strings: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_document_bytes: 1024 * 1024, // 1 MiB
            accept_legacy_none_marker: true,
            coerce_numeric_strings: true,
        }
    }
}

impl DecoderConfig {
    /// Creates a lenient configuration with a larger document limit.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            max_document_bytes: 16 * 1024 * 1024, // 16 MiB
            ..Default::default()
        }
    }

    /// Creates a strict configuration that only accepts canonical documents.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            max_document_bytes: 256 * 1024, // 256 KiB
            accept_legacy_none_marker: false,
            coerce_numeric_strings: false,
        }
    }
}

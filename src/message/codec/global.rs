//! The process-wide registry.
//!
//! Most callers share one registry seeded with the built-in decoders.
//! Extensions registered here are visible to every later
//! [`deserialize_envelope`] call on any thread.

use std::sync::OnceLock;

use serde_json::Value;

use super::{ContentTypeRegistry, EnvelopeInput};
use crate::message::{
    domain::{Envelope, Payload},
    error::RegistryError,
    ports::decoder::DecodeResult,
};

static GLOBAL: OnceLock<ContentTypeRegistry> = OnceLock::new();

/// Returns the process-wide registry, creating it on first use.
#[must_use]
pub fn global() -> &'static ContentTypeRegistry {
    GLOBAL.get_or_init(ContentTypeRegistry::new)
}

/// Registers a decoder on the process-wide registry.
///
/// # Errors
///
/// As [`ContentTypeRegistry::register`].
pub fn register_content_type<F>(
    content_type: impl Into<String>,
    decoder: F,
) -> Result<bool, RegistryError>
where
    F: Fn(&Value, &ContentTypeRegistry) -> DecodeResult<Payload> + Send + Sync + 'static,
{
    global().register_fn(content_type, decoder)
}

/// Reconstructs an envelope using the process-wide registry.
///
/// # Errors
///
/// As [`ContentTypeRegistry::decode_envelope`].
///
/// # Examples
///
/// ```
/// use insightful_messages::message::codec::deserialize_envelope;
/// use insightful_messages::message::error::DecodeErrorKind;
///
/// let err = deserialize_envelope(r#"{"role":"user","content":{"content_type":"NOPE"}}"#)
///     .expect_err("unregistered type");
/// assert_eq!(err.kind(), DecodeErrorKind::UnknownType);
/// ```
pub fn deserialize_envelope<'a>(input: impl Into<EnvelopeInput<'a>>) -> DecodeResult<Envelope> {
    global().decode_envelope(input)
}

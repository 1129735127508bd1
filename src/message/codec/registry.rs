//! Content-type registry dispatching JSON documents to payload decoders.
//!
//! The registry maps each `content_type` discriminator to a
//! [`ContentDecoder`]. It is seeded with the built-in variants and stays
//! open to new discriminators at runtime.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::{debug, warn};

use super::builtin;
use crate::message::{
    domain::{Envelope, Payload, Role},
    error::{DecodeError, RegistryError, ValidationError},
    ports::decoder::{ContentDecoder, DecodeResult, DecoderConfig},
};

/// Input accepted by [`ContentTypeRegistry::decode_envelope`]: raw JSON text
/// or an already parsed document.
#[derive(Debug, Clone, Copy)]
pub enum EnvelopeInput<'a> {
    /// JSON text still to be parsed.
    Text(&'a str),
    /// A parsed JSON document.
    Json(&'a Value),
}

impl<'a> From<&'a str> for EnvelopeInput<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a String> for EnvelopeInput<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a Value> for EnvelopeInput<'a> {
    fn from(value: &'a Value) -> Self {
        Self::Json(value)
    }
}

type DecoderMap = HashMap<String, Arc<dyn ContentDecoder>>;

/// Registry of payload decoders keyed by `content_type`.
///
/// Registration overwrites: the last decoder registered for a discriminator
/// wins. Lookups and registrations share one [`RwLock`]; the lock is released
/// before a decoder runs, so decoders may re-enter the registry to resolve
/// nested payloads.
///
/// # Examples
///
/// ```
/// use insightful_messages::message::codec::ContentTypeRegistry;
/// use insightful_messages::message::domain::{ExtensionPayload, Payload, Role};
///
/// let registry = ContentTypeRegistry::new();
/// registry
///     .register_fn("CUSTOM", |content, _| {
///         Ok(Payload::Extension(ExtensionPayload::from_json(content)?))
///     })
///     .expect("registry available");
///
/// let envelope = registry
///     .decode_envelope(r#"{"role":"user","content":{"content_type":"CUSTOM","x":1}}"#)
///     .expect("registered type decodes");
/// assert_eq!(envelope.role(), Role::User);
/// assert_eq!(envelope.content().content_type(), Some("CUSTOM"));
/// ```
pub struct ContentTypeRegistry {
    decoders: RwLock<DecoderMap>,
    config: DecoderConfig,
}

impl ContentTypeRegistry {
    /// Creates a registry with the built-in decoders and default
    /// configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    /// Creates a registry with the built-in decoders and custom
    /// configuration.
    #[must_use]
    pub fn with_config(config: DecoderConfig) -> Self {
        let decoders = builtin::decoders()
            .into_iter()
            .map(|(content_type, decoder)| (content_type.to_owned(), decoder))
            .collect();
        Self {
            decoders: RwLock::new(decoders),
            config,
        }
    }

    /// Creates a registry with no decoders.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            decoders: RwLock::new(HashMap::new()),
            config: DecoderConfig::default(),
        }
    }

    /// Returns the decoding configuration.
    #[must_use]
    pub const fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Registers a decoder for a discriminator.
    ///
    /// Returns `true` if a decoder was already registered for the
    /// discriminator and has been replaced.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::EmptyContentType`] for an empty discriminator
    /// and [`RegistryError::LockPoisoned`] if the registry is unusable.
    pub fn register<D>(
        &self,
        content_type: impl Into<String>,
        decoder: D,
    ) -> Result<bool, RegistryError>
    where
        D: ContentDecoder + 'static,
    {
        let key = content_type.into();
        if key.is_empty() {
            return Err(RegistryError::EmptyContentType);
        }
        let mut guard = self
            .decoders
            .write()
            .map_err(|e| RegistryError::LockPoisoned(e.to_string()))?;
        let replaced = guard.insert(key.clone(), Arc::new(decoder)).is_some();
        drop(guard);

        if replaced {
            warn!(content_type = %key, "content_type decoder replaced");
        } else {
            debug!(content_type = %key, "content_type decoder registered");
        }
        Ok(replaced)
    }

    /// Registers a closure as the decoder for a discriminator.
    ///
    /// Equivalent to [`ContentTypeRegistry::register`], but lets the closure's
    /// argument types be inferred.
    ///
    /// # Errors
    ///
    /// As [`ContentTypeRegistry::register`].
    pub fn register_fn<F>(
        &self,
        content_type: impl Into<String>,
        decoder: F,
    ) -> Result<bool, RegistryError>
    where
        F: Fn(&Value, &Self) -> DecodeResult<Payload> + Send + Sync + 'static,
    {
        self.register(content_type, decoder)
    }

    /// Removes the decoder for a discriminator.
    ///
    /// Returns `true` if a decoder was removed.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] if the registry is unusable.
    pub fn unregister(&self, content_type: &str) -> Result<bool, RegistryError> {
        let mut guard = self
            .decoders
            .write()
            .map_err(|e| RegistryError::LockPoisoned(e.to_string()))?;
        Ok(guard.remove(content_type).is_some())
    }

    /// Returns `true` if a decoder is registered for the discriminator.
    ///
    /// Returns `false` if the internal lock is poisoned.
    #[must_use]
    pub fn contains(&self, content_type: &str) -> bool {
        self.decoders
            .read()
            .is_ok_and(|guard| guard.contains_key(content_type))
    }

    /// Returns the registered discriminators in sorted order.
    ///
    /// Returns an empty list if the internal lock is poisoned.
    #[must_use]
    pub fn content_types(&self) -> Vec<String> {
        let mut content_types: Vec<String> = self
            .decoders
            .read()
            .map_or_else(|_| Vec::new(), |guard| guard.keys().cloned().collect());
        content_types.sort();
        content_types
    }

    /// Returns the decoder registered for `content_type`, cloned out of the
    /// lock.
    pub(super) fn lookup(
        &self,
        content_type: &str,
    ) -> Result<Option<Arc<dyn ContentDecoder>>, RegistryError> {
        let guard = self
            .decoders
            .read()
            .map_err(|e| RegistryError::LockPoisoned(e.to_string()))?;
        Ok(guard.get(content_type).cloned())
    }

    /// Reconstructs a payload using the decoder registered for
    /// `content_type`, regardless of the discriminator inside `content`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnknownType`] if no decoder is registered, or
    /// whatever the decoder reports.
    pub fn decode_as(&self, content_type: &str, content: &Value) -> DecodeResult<Payload> {
        let Some(decoder) = self.lookup(content_type)? else {
            let registered = self.content_types();
            warn!(
                content_type,
                known = %registered.join(","),
                "unknown content_type"
            );
            return Err(DecodeError::UnknownType {
                content_type: content_type.to_owned(),
                registered,
            });
        };
        decoder.decode(content, self)
    }

    /// Reconstructs a payload from its `content` object, dispatching on its
    /// `content_type`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `content` is not an object, a schema
    /// error if it has no `content_type`, [`DecodeError::UnknownType`] for an
    /// unregistered discriminator, or whatever the decoder reports.
    pub fn decode_payload(&self, content: &Value) -> DecodeResult<Payload> {
        let object = content
            .as_object()
            .ok_or_else(|| ValidationError::invalid_field("content", "expected a JSON object"))?;
        let content_type = object
            .get("content_type")
            .ok_or_else(|| DecodeError::missing("content_type"))?
            .as_str()
            .ok_or_else(|| ValidationError::not_a_string("content_type"))?;
        self.decode_as(content_type, content)
    }

    /// Reconstructs an envelope from JSON text or a parsed document.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::DocumentTooLarge`] if text input exceeds
    ///   [`DecoderConfig::max_document_bytes`]
    /// - [`DecodeError::Parse`] if text input is not valid JSON
    /// - [`DecodeError::Schema`] if `role`, `content`, or
    ///   `content.content_type` is missing
    /// - [`DecodeError::UnknownType`] if the discriminator is not registered
    /// - [`DecodeError::Validation`] if any field violates an invariant
    pub fn decode_envelope<'a>(&self, input: impl Into<EnvelopeInput<'a>>) -> DecodeResult<Envelope> {
        let document = match input.into() {
            EnvelopeInput::Text(text) => {
                if text.len() > self.config.max_document_bytes {
                    return Err(DecodeError::DocumentTooLarge {
                        actual_bytes: text.len(),
                        limit_bytes: self.config.max_document_bytes,
                    });
                }
                Cow::Owned(serde_json::from_str::<Value>(text)?)
            }
            EnvelopeInput::Json(value) => Cow::Borrowed(value),
        };

        let object = document
            .as_object()
            .ok_or_else(|| ValidationError::invalid_field("envelope", "expected a JSON object"))?;
        let role_value = object
            .get("role")
            .ok_or_else(|| DecodeError::missing("role"))?;
        let content = object
            .get("content")
            .ok_or_else(|| DecodeError::missing("content"))?;

        let payload = self.decode_payload(content)?;
        let role = role_value
            .as_str()
            .ok_or_else(|| ValidationError::not_a_string("role"))
            .and_then(Role::try_from)?;

        debug!(
            %role,
            content_type = payload.content_type().unwrap_or_default(),
            "envelope decoded"
        );
        Ok(Envelope::new(role, payload))
    }

    /// Decodes each document in isolation.
    ///
    /// A failing document yields an `Err` in its slot and is logged; the
    /// remaining documents are still decoded.
    #[must_use]
    pub fn decode_batch<'a, I>(&self, inputs: I) -> Vec<DecodeResult<Envelope>>
    where
        I: IntoIterator,
        I::Item: Into<EnvelopeInput<'a>>,
    {
        inputs
            .into_iter()
            .enumerate()
            .map(|(index, input)| {
                let result = self.decode_envelope(input);
                if let Err(err) = &result {
                    warn!(index, kind = ?err.kind(), error = %err, "skipping undecodable envelope");
                }
                result
            })
            .collect()
    }
}

#[cfg(test)]
impl ContentTypeRegistry {
    /// Poisons the decoder lock by panicking while holding it.
    pub(super) fn poison(&self) {
        let outcome = std::thread::scope(|scope| {
            scope
                .spawn(|| {
                    let _guard = self.decoders.write();
                    panic!("poisoning the decoder lock");
                })
                .join()
        });
        assert!(outcome.is_err());
        assert!(self.decoders.is_poisoned());
    }
}

impl Default for ContentTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ContentTypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentTypeRegistry")
            .field("content_types", &self.content_types())
            .field("config", &self.config)
            .finish()
    }
}

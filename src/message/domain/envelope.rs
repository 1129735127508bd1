//! The envelope pairing a role with a payload.

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

use super::{Payload, RawContent, Role};
use crate::message::{
    codec::ContentTypeRegistry, error::ValidationError, ports::decoder::DecodeResult,
};

/// A message: who is asking, and what.
///
/// # Serialisation
///
/// ```json
/// { "role": "user", "content": { "content_type": "STRING", "value": "hi" } }
/// ```
///
/// The whole document is built as one JSON value and encoded once, so nested
/// payloads are always embedded as objects.
///
/// # Examples
///
/// ```
/// use insightful_messages::message::domain::{Envelope, Role, StringPayload};
///
/// let envelope = Envelope::new(Role::User, StringPayload::new("hello"));
/// assert_eq!(
///     envelope.to_json_string(),
///     r#"{"content":{"content_type":"STRING","value":"hello"},"role":"user"}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    role: Role,
    content: Payload,
}

impl Envelope {
    /// Creates an envelope.
    #[must_use]
    pub fn new(role: Role, content: impl Into<Payload>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates an envelope from a role name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRole`] if `role` is neither `user`
    /// nor `system`.
    pub fn try_new(role: &str, content: impl Into<Payload>) -> Result<Self, ValidationError> {
        Ok(Self::new(Role::try_from(role)?, content))
    }

    /// Returns the role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the payload.
    #[must_use]
    pub const fn content(&self) -> &Payload {
        &self.content
    }

    /// Consumes the envelope, returning the payload.
    #[must_use]
    pub fn into_content(self) -> Payload {
        self.content
    }

    /// Replaces the role.
    pub const fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    /// Replaces the role from its name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRole`] for an unknown name; the role
    /// is unchanged.
    pub fn set_role_str(&mut self, role: &str) -> Result<(), ValidationError> {
        self.role = Role::try_from(role)?;
        Ok(())
    }

    /// Replaces the payload.
    pub fn set_content(&mut self, content: impl Into<Payload>) {
        self.content = content.into();
    }

    /// Replaces the payload from loosely typed text.
    ///
    /// Text that is not JSON is kept as [`RawContent::Text`]; parsed JSON is
    /// handled as by [`Envelope::set_content_value`].
    ///
    /// # Errors
    ///
    /// As [`Envelope::set_content_value`].
    pub fn set_content_loose(
        &mut self,
        input: &str,
        registry: &ContentTypeRegistry,
    ) -> DecodeResult<()> {
        let Ok(value) = serde_json::from_str::<Value>(input) else {
            self.content = Payload::Raw(RawContent::Text(input.to_owned()));
            return Ok(());
        };
        self.set_content_value(&value, registry)
    }

    /// Replaces the payload from an already parsed JSON value.
    ///
    /// A value with a `content_type` is reconstructed through `registry`;
    /// any other value is kept as [`RawContent::Json`].
    ///
    /// # Errors
    ///
    /// Returns the registry's [`DecodeError`](crate::message::error::DecodeError)
    /// if the value is a payload object that fails to reconstruct; the
    /// payload is unchanged.
    pub fn set_content_value(
        &mut self,
        value: &Value,
        registry: &ContentTypeRegistry,
    ) -> DecodeResult<()> {
        self.content = if value.get("content_type").is_some() {
            registry.decode_payload(value)?
        } else {
            Payload::Raw(RawContent::Json(value.clone()))
        };
        Ok(())
    }

    /// Renders the canonical JSON document.
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "role": self.role.as_str(),
            "content": self.content.to_json(),
        })
    }

    /// Encodes the canonical JSON document as a string.
    #[must_use]
    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }
}

impl Serialize for Envelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

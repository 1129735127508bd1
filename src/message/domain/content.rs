//! Payload variants carried in an envelope's `content` slot.
//!
//! Each variant is identified on the wire by a `content_type` discriminator.
//! Built-in discriminators map to closed variants; discriminators registered
//! at runtime reconstruct into [`ExtensionPayload`].

use mockable::Clock;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::{DicomOperation, FileOrDirectory, Timestamp, fields};
use crate::message::{error::ValidationError, ports::decoder::DecodeResult};

/// Built-in `content_type` discriminators.
pub mod content_type {
    /// [`super::StringPayload`].
    pub const STRING: &str = "STRING";
    /// [`super::FileOrDirectory`].
    pub const FILEDIR: &str = "FILEDIR";
    /// [`super::GenericPayload`].
    pub const GENERIC: &str = "GENERIC";
    /// [`super::DicomOperation`].
    pub const DCM: &str = "DCM";

    /// Every built-in discriminator.
    pub const BUILT_IN: [&str; 4] = [STRING, FILEDIR, GENERIC, DCM];

    /// Returns `true` if `content_type` names a built-in variant.
    #[must_use]
    pub fn is_built_in(content_type: &str) -> bool {
        BUILT_IN.contains(&content_type)
    }
}

/// A payload carried by an envelope.
///
/// # Serialisation
///
/// Every variant except [`Payload::Raw`] renders as a JSON object with a
/// `content_type` key:
///
/// ```json
/// { "content_type": "STRING", "value": "hello" }
/// { "content_type": "FILEDIR", "file": "/path/to/filename.dcm" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Any JSON value.
    Generic(GenericPayload),
    /// A single string.
    String(StringPayload),
    /// A file, directory, or list of either.
    FileOrDirectory(FileOrDirectory),
    /// A DICOM network operation.
    DicomOperation(DicomOperation),
    /// A variant registered at runtime.
    Extension(ExtensionPayload),
    /// Loosely typed input kept verbatim because it could not be reconstructed.
    Raw(RawContent),
}

impl Payload {
    /// Returns the `content_type` discriminator, or `None` for raw content.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        match self {
            Self::Generic(_) => Some(content_type::GENERIC),
            Self::String(_) => Some(content_type::STRING),
            Self::FileOrDirectory(_) => Some(content_type::FILEDIR),
            Self::DicomOperation(_) => Some(content_type::DCM),
            Self::Extension(extension) => Some(extension.content_type()),
            Self::Raw(_) => None,
        }
    }

    /// Returns the payload timestamp, if any.
    #[must_use]
    pub const fn timestamp(&self) -> Option<&Timestamp> {
        match self {
            Self::Generic(payload) => payload.timestamp(),
            Self::String(payload) => payload.timestamp(),
            Self::FileOrDirectory(payload) => payload.timestamp(),
            Self::DicomOperation(payload) => payload.timestamp(),
            Self::Extension(payload) => payload.timestamp(),
            Self::Raw(_) => None,
        }
    }

    /// Replaces the payload timestamp. Raw content carries none and is
    /// left unchanged.
    pub fn set_timestamp(&mut self, timestamp: Option<Timestamp>) {
        match self {
            Self::Generic(payload) => payload.set_timestamp(timestamp),
            Self::String(payload) => payload.set_timestamp(timestamp),
            Self::FileOrDirectory(payload) => payload.set_timestamp(timestamp),
            Self::DicomOperation(payload) => payload.set_timestamp(timestamp),
            Self::Extension(payload) => payload.set_timestamp(timestamp),
            Self::Raw(_) => {}
        }
    }

    /// Stamps the payload with the current time from `clock`.
    #[must_use]
    pub fn stamped(mut self, clock: &impl Clock) -> Self {
        self.set_timestamp(Some(Timestamp::now(clock)));
        self
    }

    /// Returns `true` for the raw fallback variant.
    #[must_use]
    pub const fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }

    /// Renders the canonical JSON form.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Generic(payload) => payload.to_json(),
            Self::String(payload) => payload.to_json(),
            Self::FileOrDirectory(payload) => payload.to_json(),
            Self::DicomOperation(payload) => payload.to_json(),
            Self::Extension(payload) => payload.to_json(),
            Self::Raw(raw) => raw.to_json(),
        }
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<GenericPayload> for Payload {
    fn from(payload: GenericPayload) -> Self {
        Self::Generic(payload)
    }
}

impl From<StringPayload> for Payload {
    fn from(payload: StringPayload) -> Self {
        Self::String(payload)
    }
}

impl From<FileOrDirectory> for Payload {
    fn from(payload: FileOrDirectory) -> Self {
        Self::FileOrDirectory(payload)
    }
}

impl From<DicomOperation> for Payload {
    fn from(payload: DicomOperation) -> Self {
        Self::DicomOperation(payload)
    }
}

impl From<ExtensionPayload> for Payload {
    fn from(payload: ExtensionPayload) -> Self {
        Self::Extension(payload)
    }
}

impl From<RawContent> for Payload {
    fn from(raw: RawContent) -> Self {
        Self::Raw(raw)
    }
}

/// Starts a payload object with its discriminator and timestamp.
fn header(content_type: &str, timestamp: Option<&Timestamp>) -> Map<String, Value> {
    let mut out = Map::new();
    out.insert(
        "content_type".to_owned(),
        Value::String(content_type.to_owned()),
    );
    Timestamp::write(timestamp, &mut out);
    out
}

/// Fails if `content` declares a discriminator other than `expected`.
///
/// A missing discriminator is accepted so nested parameter objects written
/// without one still reconstruct.
pub(crate) fn check_content_type(
    content: &Map<String, Value>,
    expected: &str,
) -> Result<(), ValidationError> {
    match content.get("content_type") {
        None | Some(Value::Null) => Ok(()),
        Some(Value::String(found)) if found == expected => Ok(()),
        Some(Value::String(found)) => Err(ValidationError::ContentTypeMismatch {
            expected: expected.to_owned(),
            found: found.clone(),
        }),
        Some(_) => Err(ValidationError::not_a_string("content_type")),
    }
}

/// A payload holding any JSON value.
///
/// # Examples
///
/// ```
/// use insightful_messages::message::domain::GenericPayload;
/// use serde_json::json;
///
/// let payload = GenericPayload::new(json!({"answer": 42}));
/// assert_eq!(payload.value()["answer"], 42);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericPayload {
    value: Value,
    timestamp: Option<Timestamp>,
}

impl GenericPayload {
    /// Creates a generic payload.
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self {
            value,
            timestamp: None,
        }
    }

    /// Sets the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<Timestamp>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Returns the carried value.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Replaces the carried value.
    pub fn set_value(&mut self, value: Value) {
        self.value = value;
    }

    /// Returns the timestamp, if any.
    #[must_use]
    pub const fn timestamp(&self) -> Option<&Timestamp> {
        self.timestamp.as_ref()
    }

    /// Replaces the timestamp.
    pub fn set_timestamp(&mut self, timestamp: Option<Timestamp>) {
        self.timestamp = timestamp;
    }

    /// Renders the canonical JSON object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut out = header(content_type::GENERIC, self.timestamp.as_ref());
        out.insert("value".to_owned(), self.value.clone());
        Value::Object(out)
    }

    /// Reconstructs a generic payload from its JSON object.
    ///
    /// # Errors
    ///
    /// Returns a schema error if `value` is missing; `null` is a valid value.
    pub fn from_json(content: &Value) -> DecodeResult<Self> {
        let object = fields::object(content, "content")?;
        check_content_type(object, content_type::GENERIC)?;
        let value = fields::require(object, "value")?.clone();
        Ok(Self {
            value,
            timestamp: Timestamp::read(object),
        })
    }
}

/// A payload holding a single string.
///
/// # Examples
///
/// ```
/// use insightful_messages::message::domain::StringPayload;
/// use serde_json::json;
///
/// let payload = StringPayload::new("store complete");
/// assert_eq!(payload.value(), "store complete");
///
/// assert!(StringPayload::try_from(json!(42)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringPayload {
    value: String,
    timestamp: Option<Timestamp>,
}

impl StringPayload {
    /// Creates a string payload.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            timestamp: None,
        }
    }

    /// Sets the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<Timestamp>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Returns the string value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replaces the string value.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Replaces the value from loosely typed JSON input.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotAString`] if `value` is not a JSON string;
    /// the current value is kept.
    pub fn set_value_json(&mut self, value: &Value) -> Result<(), ValidationError> {
        let text = value
            .as_str()
            .ok_or_else(|| ValidationError::not_a_string("value"))?;
        self.value = text.to_owned();
        Ok(())
    }

    /// Returns the timestamp, if any.
    #[must_use]
    pub const fn timestamp(&self) -> Option<&Timestamp> {
        self.timestamp.as_ref()
    }

    /// Replaces the timestamp.
    pub fn set_timestamp(&mut self, timestamp: Option<Timestamp>) {
        self.timestamp = timestamp;
    }

    /// Renders the canonical JSON object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut out = header(content_type::STRING, self.timestamp.as_ref());
        out.insert("value".to_owned(), Value::String(self.value.clone()));
        Value::Object(out)
    }

    /// Reconstructs a string payload from its JSON object.
    ///
    /// # Errors
    ///
    /// Returns a schema error if `value` is missing and a validation error if
    /// it is not a string.
    pub fn from_json(content: &Value) -> DecodeResult<Self> {
        let object = fields::object(content, "content")?;
        check_content_type(object, content_type::STRING)?;
        let value = fields::require_str(object, "value")?;
        Ok(Self {
            value,
            timestamp: Timestamp::read(object),
        })
    }
}

impl TryFrom<Value> for StringPayload {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(text) => Ok(Self::new(text)),
            _ => Err(ValidationError::not_a_string("value")),
        }
    }
}

/// A payload whose discriminator was registered at runtime.
///
/// The body keeps every key of the JSON object other than `content_type`
/// and `timestamp`.
///
/// # Examples
///
/// ```
/// use insightful_messages::message::domain::ExtensionPayload;
/// use serde_json::{Map, json};
///
/// let mut body = Map::new();
/// body.insert("x".to_owned(), json!(1));
/// let payload = ExtensionPayload::new("CUSTOM", body).expect("valid extension");
/// assert_eq!(payload.get("x"), Some(&json!(1)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionPayload {
    content_type: String,
    body: Map<String, Value>,
    timestamp: Option<Timestamp>,
}

impl ExtensionPayload {
    const RESERVED_KEYS: [&'static str; 2] = ["content_type", "timestamp"];

    /// Creates an extension payload.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidContentType`] if the discriminator is
    /// empty or names a built-in variant, and [`ValidationError::InvalidField`]
    /// if the body uses a reserved key.
    pub fn new(
        content_type: impl Into<String>,
        body: Map<String, Value>,
    ) -> Result<Self, ValidationError> {
        let discriminator = content_type.into();
        validate_extension_type(&discriminator)?;
        if let Some(key) = Self::RESERVED_KEYS
            .iter()
            .find(|key| body.contains_key(**key))
        {
            return Err(ValidationError::invalid_field(
                *key,
                "reserved key cannot appear in an extension body",
            ));
        }
        Ok(Self {
            content_type: discriminator,
            body,
            timestamp: None,
        })
    }

    /// Sets the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<Timestamp>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Returns the discriminator.
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Returns the body fields.
    #[must_use]
    pub const fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    /// Returns a single body field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }

    /// Returns the timestamp, if any.
    #[must_use]
    pub const fn timestamp(&self) -> Option<&Timestamp> {
        self.timestamp.as_ref()
    }

    /// Replaces the timestamp.
    pub fn set_timestamp(&mut self, timestamp: Option<Timestamp>) {
        self.timestamp = timestamp;
    }

    /// Renders the canonical JSON object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut out = header(&self.content_type, self.timestamp.as_ref());
        out.extend(self.body.iter().map(|(k, v)| (k.clone(), v.clone())));
        Value::Object(out)
    }

    /// Reconstructs an extension payload from its JSON object.
    ///
    /// Registered decoders typically call this after checking the fields
    /// their variant requires.
    ///
    /// # Errors
    ///
    /// Returns a schema error if `content_type` is missing and a validation
    /// error if it is not a usable custom discriminator.
    pub fn from_json(content: &Value) -> DecodeResult<Self> {
        let object = fields::object(content, "content")?;
        let discriminator = fields::require_str(object, "content_type")?;
        validate_extension_type(&discriminator)?;
        let body = object
            .iter()
            .filter(|(key, _)| !Self::RESERVED_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Ok(Self {
            content_type: discriminator,
            body,
            timestamp: Timestamp::read(object),
        })
    }
}

fn validate_extension_type(content_type: &str) -> Result<(), ValidationError> {
    if content_type.is_empty() || content_type::is_built_in(content_type) {
        return Err(ValidationError::InvalidContentType(content_type.to_owned()));
    }
    Ok(())
}

/// Content that arrived loosely typed and was kept as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawContent {
    /// Text that was not valid JSON.
    Text(String),
    /// Valid JSON that is not a payload object.
    Json(Value),
}

impl RawContent {
    /// Renders the raw content unchanged.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::Json(value) => value.clone(),
        }
    }
}

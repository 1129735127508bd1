//! Opaque payload timestamps.

use chrono::SecondsFormat;
use mockable::Clock;
use serde::Serialize;
use serde_json::Value;

/// A payload timestamp carried verbatim.
///
/// The core never interprets timestamps; whatever JSON value arrived is
/// written back unchanged. Locally stamped timestamps are RFC 3339 UTC
/// strings.
///
/// # Examples
///
/// ```
/// use insightful_messages::message::domain::Timestamp;
///
/// let ts = Timestamp::from("2024-05-01T12:00:00Z");
/// assert_eq!(ts.as_str(), Some("2024-05-01T12:00:00Z"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Timestamp(Value);

impl Timestamp {
    /// Stamps the current time from the supplied clock.
    #[must_use]
    pub fn now(clock: &impl Clock) -> Self {
        Self(Value::String(
            clock.utc().to_rfc3339_opts(SecondsFormat::Micros, true),
        ))
    }

    /// Wraps an arbitrary JSON value.
    ///
    /// Returns `None` for `null`, which documents use for "no timestamp".
    #[must_use]
    pub fn from_json(value: Value) -> Option<Self> {
        (!value.is_null()).then_some(Self(value))
    }

    /// Returns the timestamp as a string slice, if it is a JSON string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }

    /// Returns the underlying JSON value.
    #[must_use]
    pub const fn as_json(&self) -> &Value {
        &self.0
    }

    /// Reads the optional `timestamp` key of a payload object.
    ///
    /// A JSON `null` is treated as absent.
    pub(crate) fn read(content: &serde_json::Map<String, Value>) -> Option<Self> {
        content
            .get("timestamp")
            .filter(|value| !value.is_null())
            .cloned()
            .map(Self)
    }

    /// Writes the timestamp into a payload object when present.
    pub(crate) fn write(this: Option<&Self>, out: &mut serde_json::Map<String, Value>) {
        if let Some(timestamp) = this {
            out.insert("timestamp".to_owned(), timestamp.0.clone());
        }
    }
}

impl From<&str> for Timestamp {
    fn from(value: &str) -> Self {
        Self(Value::String(value.to_owned()))
    }
}

impl From<String> for Timestamp {
    fn from(value: String) -> Self {
        Self(Value::String(value))
    }
}

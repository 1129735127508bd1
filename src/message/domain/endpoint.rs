//! Connection targets and session parameters for DICOM operations.

use serde_json::Value;

use super::fields;
use crate::message::{
    error::ValidationError,
    ports::decoder::{DecodeResult, DecoderConfig},
};

/// Identity and address of a DICOM application entity.
///
/// # Examples
///
/// ```
/// use insightful_messages::message::domain::Endpoint;
///
/// let scp = Endpoint::new("SCP", "localhost", Some(4242));
/// assert_eq!(scp.port(), Some(4242));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Application Entity title.
    ae_title: String,
    /// Network address (host name or IP).
    addr: String,
    /// TCP port; `None` leaves the choice to the transport.
    port: Option<u16>,
}

impl Endpoint {
    /// Creates an endpoint.
    #[must_use]
    pub fn new(ae_title: impl Into<String>, addr: impl Into<String>, port: Option<u16>) -> Self {
        Self {
            ae_title: ae_title.into(),
            addr: addr.into(),
            port,
        }
    }

    /// Returns the Application Entity title.
    #[must_use]
    pub fn ae_title(&self) -> &str {
        &self.ae_title
    }

    /// Returns the network address.
    #[must_use]
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Returns the TCP port, if set.
    #[must_use]
    pub const fn port(&self) -> Option<u16> {
        self.port
    }

    /// Sets the Application Entity title.
    pub fn set_ae_title(&mut self, ae_title: impl Into<String>) {
        self.ae_title = ae_title.into();
    }

    /// Sets the network address.
    pub fn set_addr(&mut self, addr: impl Into<String>) {
        self.addr = addr.into();
    }

    /// Sets the TCP port.
    pub const fn set_port(&mut self, port: Option<u16>) {
        self.port = port;
    }

    /// Renders the canonical JSON object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "ae_title": self.ae_title,
            "addr": self.addr,
            "port": self.port,
        })
    }

    /// Reconstructs an endpoint from its JSON object.
    ///
    /// `port` may be an integer, a numeric string, `null`, absent, or the
    /// legacy `"None"` marker.
    ///
    /// # Errors
    ///
    /// Returns a schema error if `ae_title` or `addr` is missing, and a
    /// validation error if a field has the wrong type or `port` is negative
    /// or above 65535.
    pub fn from_json(value: &Value, config: &DecoderConfig) -> DecodeResult<Self> {
        let content = fields::object(value, "endpoint")?;
        let ae_title = fields::require_str(content, "ae_title")?;
        let addr = fields::require_str(content, "addr")?;
        let port = fields::optional_unsigned(content, "port", config)?
            .map(|port| fields::narrow::<u16>("port", port))
            .transpose()?;
        Ok(Self::new(ae_title, addr, port))
    }
}

/// Timeouts for an AE-to-AE association, in seconds.
///
/// Unset values defer to the transport's defaults. The values are carried
/// through unchanged and never enforced by this crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionParameters {
    /// Timeout for DIMSE messages.
    dimse_timeout: Option<u32>,
    /// Timeout for the network socket.
    socket_timeout: Option<u32>,
    /// Timeout for ACSE messages.
    acse_timeout: Option<u32>,
}

impl ConnectionParameters {
    /// Creates parameters with every timeout unset.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dimse_timeout: None,
            socket_timeout: None,
            acse_timeout: None,
        }
    }

    /// Sets the DIMSE timeout.
    #[must_use]
    pub const fn with_dimse_timeout(mut self, seconds: u32) -> Self {
        self.dimse_timeout = Some(seconds);
        self
    }

    /// Sets the socket timeout.
    #[must_use]
    pub const fn with_socket_timeout(mut self, seconds: u32) -> Self {
        self.socket_timeout = Some(seconds);
        self
    }

    /// Sets the ACSE timeout.
    #[must_use]
    pub const fn with_acse_timeout(mut self, seconds: u32) -> Self {
        self.acse_timeout = Some(seconds);
        self
    }

    /// Returns the DIMSE timeout.
    #[must_use]
    pub const fn dimse_timeout(&self) -> Option<u32> {
        self.dimse_timeout
    }

    /// Returns the socket timeout.
    #[must_use]
    pub const fn socket_timeout(&self) -> Option<u32> {
        self.socket_timeout
    }

    /// Returns the ACSE timeout.
    #[must_use]
    pub const fn acse_timeout(&self) -> Option<u32> {
        self.acse_timeout
    }

    /// Sets or clears the DIMSE timeout from a signed value.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NegativeValue`] for negative input.
    pub fn set_dimse_timeout(&mut self, seconds: Option<i64>) -> Result<(), ValidationError> {
        self.dimse_timeout = checked_timeout("dimse_timeout", seconds)?;
        Ok(())
    }

    /// Sets or clears the socket timeout from a signed value.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NegativeValue`] for negative input.
    pub fn set_socket_timeout(&mut self, seconds: Option<i64>) -> Result<(), ValidationError> {
        self.socket_timeout = checked_timeout("socket_timeout", seconds)?;
        Ok(())
    }

    /// Sets or clears the ACSE timeout from a signed value.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NegativeValue`] for negative input.
    pub fn set_acse_timeout(&mut self, seconds: Option<i64>) -> Result<(), ValidationError> {
        self.acse_timeout = checked_timeout("acse_timeout", seconds)?;
        Ok(())
    }

    /// Renders the canonical JSON object; unset timeouts are `null`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "dimse_timeout": self.dimse_timeout,
            "socket_timeout": self.socket_timeout,
            "acse_timeout": self.acse_timeout,
        })
    }

    /// Reconstructs connection parameters from their JSON object.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a timeout is negative, too large, or not
    /// an integer.
    pub fn from_json(value: &Value, config: &DecoderConfig) -> DecodeResult<Self> {
        let content = fields::object(value, "connection")?;
        let read = |key: &str| -> Result<Option<u32>, ValidationError> {
            fields::optional_unsigned(content, key, config)?
                .map(|seconds| fields::narrow::<u32>(key, seconds))
                .transpose()
        };
        Ok(Self {
            dimse_timeout: read("dimse_timeout")?,
            socket_timeout: read("socket_timeout")?,
            acse_timeout: read("acse_timeout")?,
        })
    }
}

fn checked_timeout(field: &str, seconds: Option<i64>) -> Result<Option<u32>, ValidationError> {
    seconds
        .map(|value| {
            let unsigned = u64::try_from(value).map_err(|_| ValidationError::NegativeValue {
                field: field.to_owned(),
                value,
            })?;
            fields::narrow::<u32>(field, unsigned)
        })
        .transpose()
}

//! DICOM network operation payloads.
//!
//! A [`DicomOperation`] describes a request one application entity makes of
//! another. It carries connection parameters but never opens a connection.

use serde_json::Value;
use std::fmt;

use super::{ConnectionParameters, Endpoint, Payload, Timestamp, content_type};
use crate::message::error::ValidationError;

/// The DIMSE service a [`DicomOperation`] requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DicomOperationKind {
    /// Store composite instances on the receiver.
    CStore,
    /// Query the receiver.
    CFind,
}

impl DicomOperationKind {
    /// Returns the wire representation of the operation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CStore => "C-STORE",
            Self::CFind => "C-FIND",
        }
    }

    /// Returns the content type `op_parameters` must have, if the operation
    /// defines one.
    ///
    /// C-FIND parameters have no fixed shape yet.
    #[must_use]
    pub const fn parameter_content_type(self) -> Option<&'static str> {
        match self {
            Self::CStore => Some(content_type::FILEDIR),
            Self::CFind => None,
        }
    }

    /// Checks that `parameters` fit this operation.
    ///
    /// Raw content is never accepted: it has no discriminator, so it could
    /// not be reconstructed from the serialised operation.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ParameterMismatch`] for raw parameters, or
    /// if the operation requires a content type the parameters do not have.
    pub fn check_parameters(self, parameters: Option<&Payload>) -> Result<(), ValidationError> {
        let Some(payload) = parameters else {
            return Ok(());
        };
        let expected = self.parameter_content_type();
        let Some(found) = payload.content_type() else {
            return Err(self.mismatch(expected.unwrap_or("typed"), "raw content"));
        };
        match expected {
            Some(required) if required != found => Err(self.mismatch(required, found)),
            _ => Ok(()),
        }
    }

    fn mismatch(self, expected: &str, found: &str) -> ValidationError {
        ValidationError::ParameterMismatch {
            operation: self.as_str().to_owned(),
            expected: expected.to_owned(),
            found: found.to_owned(),
        }
    }
}

impl TryFrom<&str> for DicomOperationKind {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "C-STORE" => Ok(Self::CStore),
            "C-FIND" => Ok(Self::CFind),
            other => Err(ValidationError::UnsupportedOperation(other.to_owned())),
        }
    }
}

impl std::str::FromStr for DicomOperationKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl fmt::Display for DicomOperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A DICOM operation between a sending and a receiving application entity.
///
/// # Invariants
///
/// - For C-STORE, `op_parameters`, when set, is a
///   [`FileOrDirectory`](super::FileOrDirectory) payload.
/// - The nested parameters are owned exclusively by the operation.
///
/// # Examples
///
/// ```
/// use insightful_messages::message::domain::{
///     DicomOperation, DicomOperationKind, Endpoint, FileOrDirectory,
/// };
///
/// let operation = DicomOperation::new(
///     DicomOperationKind::CStore,
///     Endpoint::new("SCU", "localhost", None),
///     Endpoint::new("SCP", "localhost", Some(4242)),
/// )
/// .with_op_parameters(FileOrDirectory::from_file("/path/to/filename.dcm"))
/// .expect("C-STORE accepts file parameters");
///
/// assert_eq!(operation.operation(), DicomOperationKind::CStore);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DicomOperation {
    operation: DicomOperationKind,
    sender: Endpoint,
    receiver: Endpoint,
    connection: ConnectionParameters,
    op_parameters: Option<Box<Payload>>,
    timestamp: Option<Timestamp>,
}

impl DicomOperation {
    /// Creates an operation with default connection parameters and no
    /// operation parameters.
    #[must_use]
    pub const fn new(operation: DicomOperationKind, sender: Endpoint, receiver: Endpoint) -> Self {
        Self {
            operation,
            sender,
            receiver,
            connection: ConnectionParameters::new(),
            op_parameters: None,
            timestamp: None,
        }
    }

    /// Creates an operation from all of its fields, parsing the operation
    /// name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnsupportedOperation`] for an unknown
    /// operation and [`ValidationError::ParameterMismatch`] if the parameters
    /// do not fit it.
    pub fn try_new(
        operation: &str,
        sender: Endpoint,
        receiver: Endpoint,
        connection: ConnectionParameters,
        op_parameters: Option<Payload>,
    ) -> Result<Self, ValidationError> {
        let kind = DicomOperationKind::try_from(operation)?;
        kind.check_parameters(op_parameters.as_ref())?;
        Ok(Self {
            operation: kind,
            sender,
            receiver,
            connection,
            op_parameters: op_parameters.map(Box::new),
            timestamp: None,
        })
    }

    /// Sets the connection parameters.
    #[must_use]
    pub const fn with_connection(mut self, connection: ConnectionParameters) -> Self {
        self.connection = connection;
        self
    }

    /// Sets the operation parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ParameterMismatch`] if the parameters do not
    /// fit the operation.
    pub fn with_op_parameters(mut self, parameters: impl Into<Payload>) -> Result<Self, ValidationError> {
        self.set_op_parameters(Some(parameters.into()))?;
        Ok(self)
    }

    /// Sets the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<Timestamp>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Returns the requested operation.
    #[must_use]
    pub const fn operation(&self) -> DicomOperationKind {
        self.operation
    }

    /// Returns the sending entity.
    #[must_use]
    pub const fn sender(&self) -> &Endpoint {
        &self.sender
    }

    /// Returns the receiving entity.
    #[must_use]
    pub const fn receiver(&self) -> &Endpoint {
        &self.receiver
    }

    /// Returns the connection parameters.
    #[must_use]
    pub const fn connection(&self) -> &ConnectionParameters {
        &self.connection
    }

    /// Returns the operation parameters, if set.
    #[must_use]
    pub fn op_parameters(&self) -> Option<&Payload> {
        self.op_parameters.as_deref()
    }

    /// Returns the timestamp, if any.
    #[must_use]
    pub const fn timestamp(&self) -> Option<&Timestamp> {
        self.timestamp.as_ref()
    }

    /// Changes the operation.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ParameterMismatch`] if the current
    /// parameters do not fit the new operation; the operation is unchanged.
    pub fn set_operation(&mut self, operation: DicomOperationKind) -> Result<(), ValidationError> {
        operation.check_parameters(self.op_parameters())?;
        self.operation = operation;
        Ok(())
    }

    /// Changes the operation from its wire name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnsupportedOperation`] for an unknown name,
    /// otherwise as [`DicomOperation::set_operation`].
    pub fn set_operation_str(&mut self, operation: &str) -> Result<(), ValidationError> {
        self.set_operation(DicomOperationKind::try_from(operation)?)
    }

    /// Replaces the sending entity.
    pub fn set_sender(&mut self, sender: Endpoint) {
        self.sender = sender;
    }

    /// Replaces the receiving entity.
    pub fn set_receiver(&mut self, receiver: Endpoint) {
        self.receiver = receiver;
    }

    /// Replaces the connection parameters.
    pub const fn set_connection(&mut self, connection: ConnectionParameters) {
        self.connection = connection;
    }

    /// Replaces or clears the operation parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ParameterMismatch`] if the parameters do not
    /// fit the operation; the current parameters are kept.
    pub fn set_op_parameters(&mut self, parameters: Option<Payload>) -> Result<(), ValidationError> {
        self.operation.check_parameters(parameters.as_ref())?;
        self.op_parameters = parameters.map(Box::new);
        Ok(())
    }

    /// Replaces the timestamp.
    pub fn set_timestamp(&mut self, timestamp: Option<Timestamp>) {
        self.timestamp = timestamp;
    }

    /// Renders the canonical JSON object.
    ///
    /// Nested entities and parameters are embedded as objects; absent
    /// parameters are written as `null`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut out = serde_json::Map::new();
        out.insert(
            "content_type".to_owned(),
            Value::String(content_type::DCM.to_owned()),
        );
        Timestamp::write(self.timestamp.as_ref(), &mut out);
        out.insert(
            "operation".to_owned(),
            Value::String(self.operation.as_str().to_owned()),
        );
        out.insert("sender".to_owned(), self.sender.to_json());
        out.insert("receiver".to_owned(), self.receiver.to_json());
        out.insert("connection".to_owned(), self.connection.to_json());
        out.insert(
            "op_parameters".to_owned(),
            self.op_parameters
                .as_deref()
                .map_or(Value::Null, Payload::to_json),
        );
        Value::Object(out)
    }
}

//! Envelope format, payload variants, and registry-driven decoding.
//!
//! # Architecture
//!
//! - **Domain**: Pure types ([`domain::Envelope`], [`domain::Payload`],
//!   [`domain::DicomOperation`], etc.)
//! - **Ports**: The decoder interface ([`ports::decoder::ContentDecoder`])
//!   and its configuration
//! - **Codec**: The extensible registry ([`codec::ContentTypeRegistry`]) and
//!   the process-wide [`codec::deserialize_envelope`]
//!
//! # Example
//!
//! ```
//! use insightful_messages::message::codec::deserialize_envelope;
//! use insightful_messages::message::domain::{
//!     DicomOperation, DicomOperationKind, Endpoint, Envelope, FileOrDirectory, Role,
//! };
//!
//! let operation = DicomOperation::new(
//!     DicomOperationKind::CStore,
//!     Endpoint::new("SCU", "localhost", Some(0)),
//!     Endpoint::new("SCP", "localhost", Some(4242)),
//! )
//! .with_op_parameters(FileOrDirectory::from_file("/path/to/filename.dcm"))
//! .expect("C-STORE accepts file parameters");
//! let envelope = Envelope::new(Role::User, operation);
//!
//! let text = envelope.to_json_string();
//! let decoded = deserialize_envelope(&text).expect("canonical documents decode");
//! assert_eq!(decoded, envelope);
//! assert_eq!(decoded.to_json_string(), text);
//! ```

pub mod codec;
pub mod domain;
pub mod error;
pub mod ports;

#[cfg(test)]
mod tests;

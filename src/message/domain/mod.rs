//! Domain types for the message subsystem.
//!
//! This module contains pure domain types with no infrastructure dependencies.
//! All types are validated at construction and mutate only through setters
//! that re-validate.

mod content;
mod dicom;
mod endpoint;
mod envelope;
pub(crate) mod fields;
mod file_dir;
mod role;
mod timestamp;

pub(crate) use content::check_content_type;
pub use content::{
    ExtensionPayload, GenericPayload, Payload, RawContent, StringPayload, content_type,
};
pub use dicom::{DicomOperation, DicomOperationKind};
pub use endpoint::{ConnectionParameters, Endpoint};
pub use envelope::Envelope;
pub use file_dir::{FileOrDirectory, FileTarget};
pub use role::Role;
pub use timestamp::Timestamp;

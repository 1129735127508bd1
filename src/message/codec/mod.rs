//! Envelope decoding.
//!
//! Turns JSON documents back into typed [`Envelope`](crate::message::domain::Envelope)
//! values by dispatching on the payload's `content_type` discriminator.

mod builtin;
mod global;
mod registry;

pub use global::{deserialize_envelope, global, register_content_type};
pub use registry::{ContentTypeRegistry, EnvelopeInput};

//! Insightful messages: typed, validated message envelopes for agent actions.
//!
//! An [`Envelope`](message::domain::Envelope) pairs a role with a payload
//! describing an action such as "store this file" or "perform a DICOM
//! C-STORE". Envelopes serialise to one canonical JSON document and are
//! reconstructed through an extensible content-type registry.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Payload variants and the envelope, validated at construction
//! - **Ports**: The decoder interface the registry dispatches to
//! - **Codec**: The content-type registry and envelope deserialiser
//!
//! # Modules
//!
//! - [`message`]: Envelope format, payload variants, and decoding

pub mod message;

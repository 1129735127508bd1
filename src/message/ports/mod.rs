//! Port interfaces for the message subsystem.
//!
//! Ports define the seams at which callers plug in behaviour, following
//! hexagonal architecture principles.

pub mod decoder;

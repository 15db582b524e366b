//! flashlab core types
//!
//! This crate provides the foundational types shared by every flashlab crate:
//! - Participant handles (ParticipantId)
//! - Attribute values (the Value enum and the Attributes map)
//! - The Stateful capability implemented by every transaction participant
//! - Common error types

mod error;
mod id;
mod state;
mod value;

pub use error::*;
pub use id::*;
pub use state::*;
pub use value::*;

//! Participant handles.
//!
//! A transaction issues one handle per participant when it is entered. The
//! handle is the participant's position in the participant set, so callers
//! that know the order they passed their participants in can look up the
//! matching snapshot without relying on object addresses.

use std::fmt;

/// Opaque handle for a transaction participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticipantId(pub u32);

impl ParticipantId {
    /// Handle of the participant at `position` in a participant set.
    pub fn nth(position: usize) -> Self {
        Self(position as u32)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

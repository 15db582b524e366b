//! The Stateful capability.
//!
//! Every object that takes part in a transaction implements this trait. The
//! transaction engine never looks inside a participant: it captures a typed
//! `State` on entry, hands it back through `restore` on rollback, and reads
//! the `attributes` view when it reports before/after snapshots.

use crate::Attributes;

/// A participant whose full state can be captured and put back.
pub trait Stateful {
    /// Complete copy of the participant's state.
    type State: Clone;

    /// Capture the full state.
    fn snapshot(&self) -> Self::State;

    /// Replace the full state with a previously captured one.
    fn restore(&mut self, state: Self::State);

    /// Enumerable name -> value view of the current state.
    fn attributes(&self) -> Attributes;
}

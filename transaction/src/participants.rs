//! Participant sets.
//!
//! A transaction runs over an ordered set of participants. Sets are tuples of
//! mutable references to heterogeneous `Stateful` types, or a mutable slice of
//! one `Stateful` type. The borrow checker rules out the same participant
//! appearing twice in one set.

use flashlab_core::{ParticipantId, Stateful};

use crate::snapshot::Snapshot;

/// An ordered set of participants that can be saved and restored as a unit.
pub trait Participants {
    /// Typed state of every participant, in order.
    type Saved;

    /// Capture the full state of every participant.
    fn save(&self) -> Self::Saved;

    /// Put every participant back to a copy of `saved`.
    fn restore(&mut self, saved: &Self::Saved);

    /// Attribute view of every participant, keyed by handle.
    fn capture(&self) -> Snapshot;

    /// Number of participants.
    fn count(&self) -> usize;
}

macro_rules! tuple_participants {
    ($count:expr; $($name:ident : $idx:tt),+) => {
        impl<'p, $($name: Stateful),+> Participants for ($(&'p mut $name,)+) {
            type Saved = ($($name::State,)+);

            fn save(&self) -> Self::Saved {
                ($(self.$idx.snapshot(),)+)
            }

            fn restore(&mut self, saved: &Self::Saved) {
                $(self.$idx.restore(saved.$idx.clone());)+
            }

            fn capture(&self) -> Snapshot {
                let mut snapshot = Snapshot::new();
                $(snapshot.insert(ParticipantId::nth($idx), self.$idx.attributes());)+
                snapshot
            }

            fn count(&self) -> usize {
                $count
            }
        }
    };
}

tuple_participants!(1; A: 0);
tuple_participants!(2; A: 0, B: 1);
tuple_participants!(3; A: 0, B: 1, C: 2);
tuple_participants!(4; A: 0, B: 1, C: 2, D: 3);
tuple_participants!(5; A: 0, B: 1, C: 2, D: 3, E: 4);
tuple_participants!(6; A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);

impl<'p, T: Stateful> Participants for &'p mut [T] {
    type Saved = Vec<T::State>;

    fn save(&self) -> Self::Saved {
        self.iter().map(Stateful::snapshot).collect()
    }

    fn restore(&mut self, saved: &Self::Saved) {
        for (participant, state) in self.iter_mut().zip(saved) {
            participant.restore(state.clone());
        }
    }

    fn capture(&self) -> Snapshot {
        self.iter()
            .enumerate()
            .map(|(i, p)| (ParticipantId::nth(i), p.attributes()))
            .collect()
    }

    fn count(&self) -> usize {
        self.len()
    }
}

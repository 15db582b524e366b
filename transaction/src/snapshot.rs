//! Attribute snapshots keyed by participant handle.

use std::collections::BTreeMap;

use flashlab_core::{Attributes, AttributesExt, CoreError, CoreResult, ParticipantId};

/// Attribute view of every participant at one instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    entries: BTreeMap<ParticipantId, Attributes>,
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the attributes of one participant.
    pub fn insert(&mut self, id: ParticipantId, attributes: Attributes) {
        self.entries.insert(id, attributes);
    }

    /// Attributes of a participant, if recorded.
    pub fn get(&self, id: ParticipantId) -> Option<&Attributes> {
        self.entries.get(&id)
    }

    /// Attributes of a participant, or an error naming the missing handle.
    pub fn participant(&self, id: ParticipantId) -> CoreResult<&Attributes> {
        self.get(id).ok_or(CoreError::UnknownParticipant(id))
    }

    /// Read one numeric attribute of one participant.
    pub fn number(&self, id: ParticipantId, name: &str) -> CoreResult<f64> {
        self.participant(id)?.number(name)
    }

    /// Iterate participants in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (ParticipantId, &Attributes)> {
        self.entries.iter().map(|(id, attrs)| (*id, attrs))
    }

    /// Number of participants recorded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(ParticipantId, Attributes)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (ParticipantId, Attributes)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

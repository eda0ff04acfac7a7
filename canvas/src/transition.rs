//! Bookkeeping for in-flight slides driven by remote changes.
//!
//! The scheduler never owns a timer. `begin` hands back a
//! [`TransitionToken`] and the host arms a timer for it; when that timer
//! fires the host calls [`TransitionScheduler::expire`] with the same token.
//! Each registration carries a fresh generation, so a stale timer from a
//! superseded slide can never clear the entry that replaced it.

#[cfg(test)]
#[path = "transition_test.rs"]
mod transition_test;

use std::collections::HashMap;

use frames::{Entity, EntityId};

/// Why a slide was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// Sliding in from the window edge after a create.
    Enter,
    /// Sliding to a remotely moved position.
    Move,
    /// Sliding out to the window edge before deletion.
    Exit,
}

/// Handle for one registration. Hosts arm a timer per token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionToken {
    pub id: EntityId,
    pub generation: u64,
}

/// The current registration for an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionEntry {
    /// State the entity is sliding toward.
    pub target: Entity,
    pub kind: TransitionKind,
    generation: u64,
}

/// At most one live entry per id; a new registration replaces the old one.
#[derive(Debug, Default)]
pub struct TransitionScheduler {
    entries: HashMap<EntityId, TransitionEntry>,
    next_generation: u64,
}

impl TransitionScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a slide for `target.id`, superseding any live entry.
    pub fn begin(&mut self, target: Entity, kind: TransitionKind) -> TransitionToken {
        self.next_generation += 1;
        let token = TransitionToken { id: target.id, generation: self.next_generation };
        self.entries.insert(target.id, TransitionEntry { target, kind, generation: token.generation });
        token
    }

    /// Clear the entry for `token.id` if `token` is still the current
    /// registration. A superseded token returns `None` and changes nothing.
    pub fn expire(&mut self, token: TransitionToken) -> Option<TransitionEntry> {
        match self.entries.get(&token.id) {
            Some(entry) if entry.generation == token.generation => self.entries.remove(&token.id),
            _ => None,
        }
    }

    /// Drop any live entry for `id`, returning it.
    pub fn cancel(&mut self, id: EntityId) -> Option<TransitionEntry> {
        self.entries.remove(&id)
    }

    #[must_use]
    pub fn is_animating(&self, id: EntityId) -> bool {
        self.entries.contains_key(&id)
    }

    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&TransitionEntry> {
        self.entries.get(&id)
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

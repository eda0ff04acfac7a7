//! Applies authoritative updates to the tracked magnet set.
//!
//! The reconciler owns the [`EntityStore`] and the [`TransitionScheduler`].
//! Each `apply_*` call takes the current [`SpatialWindow`] and returns the
//! [`Action`]s the host must carry out: render callbacks, plus a
//! [`Action::TransitionArmed`] for every slide that needs an expiry timer.
//!
//! Rules, per update kind:
//!
//! - **Snapshot**: known ids are updated in place, new ids appear at their
//!   true position, and tracked ids that are neither in the snapshot nor
//!   inside the window are evicted. Applying the same snapshot twice emits
//!   nothing the second time.
//! - **Create**: the magnet appears on a random window edge and slides to
//!   its true position.
//! - **Move**: an echo of our own mutation (same `x`, `y`, `rotation`) only
//!   bumps `z_index`. A move that lands outside the window evicts at once.
//!   Anything else slides.
//! - **Remove**: the magnet slides out to a window edge and is deleted when
//!   the slide expires.
//!
//! Move and Remove for an unknown id are no-ops.

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod reconcile_test;

use std::collections::{HashMap, HashSet};

use frames::{Entity, EntityId, EntityMove, Update};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, trace};

use crate::doc::EntityStore;
use crate::engine::Action;
use crate::transition::{TransitionKind, TransitionScheduler, TransitionToken};
use crate::window::SpatialWindow;

pub struct EntityReconciler {
    store: EntityStore,
    transitions: TransitionScheduler,
    leaving: HashSet<EntityId>,
    held: Option<EntityId>,
    rng: StdRng,
}

impl Default for EntityReconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityReconciler {
    /// Reconciler with an OS-seeded edge sampler.
    #[must_use]
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Reconciler whose edge sampling is reproducible.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            store: EntityStore::new(),
            transitions: TransitionScheduler::new(),
            leaving: HashSet::new(),
            held: None,
            rng,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.store.get(id)
    }

    #[must_use]
    pub fn is_animating(&self, id: EntityId) -> bool {
        self.transitions.is_animating(id)
    }

    #[must_use]
    pub fn is_leaving(&self, id: EntityId) -> bool {
        self.leaving.contains(&id)
    }

    #[must_use]
    pub fn transitions(&self) -> &TransitionScheduler {
        &self.transitions
    }

    // --- Local gesture lock ---

    /// Give a local gesture priority over remote updates for `id`.
    ///
    /// Any in-flight slide is cancelled. While held, remote moves for the id
    /// update tracked state without emitting anything. Returns `false` if the
    /// id is not tracked or is already leaving.
    pub fn hold(&mut self, id: EntityId) -> bool {
        if !self.store.contains(id) || self.leaving.contains(&id) {
            return false;
        }
        if self.transitions.cancel(id).is_some() {
            debug!(id, "local gesture preempted transition");
        }
        self.held = Some(id);
        true
    }

    /// Drop the gesture lock.
    ///
    /// Remote moves absorbed while held skipped the window check, so a magnet
    /// they carried outside `window` is evicted here.
    pub fn release(&mut self, window: &SpatialWindow) -> Vec<Action> {
        let mut actions = Vec::new();
        let Some(id) = self.held.take() else {
            return actions;
        };
        let outside = self.store.get(id).is_some_and(|e| !window.contains(e.x, e.y));
        if outside && !self.leaving.contains(&id) {
            self.evict(id, &mut actions);
        }
        actions
    }

    /// Overwrite tracked state for `id` with a local edit.
    ///
    /// Returns the updated entity, or `None` if the id is no longer tracked.
    pub fn apply_local(&mut self, id: EntityId, x: i32, y: i32, rotation: i32, z_index: i64) -> Option<Entity> {
        let entity = self.store.get_mut(id)?;
        entity.x = x;
        entity.y = y;
        entity.rotation = rotation;
        entity.z_index = z_index;
        Some(entity.clone())
    }

    // --- Inbound updates ---

    /// Dispatch a decoded update to the matching handler.
    pub fn apply(&mut self, update: Update, window: &SpatialWindow) -> Vec<Action> {
        match update {
            Update::Snapshot(entities) => self.apply_snapshot(entities, window),
            Update::Create(entity) => self.apply_create(entity, window),
            Update::Move(mv) => self.apply_move(mv, window),
            Update::Remove(id) => self.apply_remove(id, window),
        }
    }

    pub fn apply_snapshot(&mut self, entities: Vec<Entity>, window: &SpatialWindow) -> Vec<Action> {
        let mut actions = Vec::new();
        let mut incoming: HashMap<EntityId, Entity> = HashMap::with_capacity(entities.len());
        for entity in entities {
            incoming.insert(entity.id, entity);
        }

        for id in self.store.ids() {
            if incoming.contains_key(&id) {
                continue;
            }
            let inside = self.store.get(id).is_some_and(|e| window.contains(e.x, e.y));
            if !inside {
                self.evict(id, &mut actions);
            }
        }

        let mut ids: Vec<EntityId> = incoming.keys().copied().collect();
        ids.sort_unstable();
        for id in ids {
            let Some(entity) = incoming.remove(&id) else {
                continue;
            };
            let revived = self.leaving.remove(&id);
            if revived {
                self.transitions.cancel(id);
            }
            let held = self.held == Some(id);
            match self.store.get_mut(id) {
                Some(current) if *current == entity && !revived => {}
                Some(current) => {
                    *current = entity.clone();
                    if held {
                        continue;
                    }
                    self.transitions.cancel(id);
                    actions.push(Action::EntityUpdated { entity, animated: false });
                }
                None => {
                    self.store.insert(entity.clone());
                    actions.push(Action::EntityCreated(entity));
                }
            }
        }
        actions
    }

    pub fn apply_create(&mut self, entity: Entity, window: &SpatialWindow) -> Vec<Action> {
        if self.store.contains(entity.id) {
            let mv = EntityMove { id: entity.id, x: entity.x, y: entity.y, rotation: entity.rotation, z_index: entity.z_index };
            return self.apply_move(mv, window);
        }
        if !window.contains(entity.x, entity.y) {
            trace!(id = entity.id, x = entity.x, y = entity.y, "create outside window ignored");
            return Vec::new();
        }

        let (edge_x, edge_y) = window.random_boundary_point(&mut self.rng);
        let start = Entity { x: edge_x, y: edge_y, ..entity.clone() };
        self.store.insert(entity.clone());
        let token = self.transitions.begin(entity.clone(), TransitionKind::Enter);
        vec![
            Action::EntityCreated(start),
            Action::EntityUpdated { entity, animated: true },
            Action::TransitionArmed(token),
        ]
    }

    pub fn apply_move(&mut self, mv: EntityMove, window: &SpatialWindow) -> Vec<Action> {
        let id = mv.id;
        let Some(current) = self.store.get_mut(id) else {
            trace!(id, "move for untracked id ignored");
            return Vec::new();
        };

        if self.held == Some(id) {
            *current = current.moved(&mv);
            return Vec::new();
        }

        if !self.leaving.contains(&id) && current.x == mv.x && current.y == mv.y && current.rotation == mv.rotation {
            if current.z_index == mv.z_index {
                return Vec::new();
            }
            current.z_index = mv.z_index;
            return vec![Action::EntityUpdated { entity: current.clone(), animated: false }];
        }

        let target = current.moved(&mv);
        *current = target.clone();

        let mut actions = Vec::new();
        if !window.contains(target.x, target.y) {
            self.evict(id, &mut actions);
            return actions;
        }

        self.leaving.remove(&id);
        let token = self.transitions.begin(target.clone(), TransitionKind::Move);
        actions.push(Action::EntityUpdated { entity: target, animated: true });
        actions.push(Action::TransitionArmed(token));
        actions
    }

    pub fn apply_remove(&mut self, id: EntityId, window: &SpatialWindow) -> Vec<Action> {
        let Some(current) = self.store.get(id) else {
            trace!(id, "remove for untracked id ignored");
            return Vec::new();
        };
        if self.held == Some(id) {
            self.held = None;
        }

        let (edge_x, edge_y) = window.random_boundary_point(&mut self.rng);
        let exit = Entity { x: edge_x, y: edge_y, ..current.clone() };
        self.leaving.insert(id);
        let token = self.transitions.begin(exit.clone(), TransitionKind::Exit);
        vec![Action::EntityUpdated { entity: exit, animated: true }, Action::TransitionArmed(token)]
    }

    // --- Timers ---

    /// Handle an expired transition timer.
    ///
    /// A superseded token does nothing. An expired exit deletes the magnet;
    /// any other expiry reports the slide as settled.
    pub fn expire(&mut self, token: TransitionToken) -> Vec<Action> {
        let Some(entry) = self.transitions.expire(token) else {
            trace!(id = token.id, generation = token.generation, "stale transition timer");
            return Vec::new();
        };
        if entry.kind == TransitionKind::Exit {
            self.leaving.remove(&token.id);
            self.store.remove(token.id);
            return vec![Action::EntityRemoved(token.id)];
        }
        vec![Action::TransitionSettled(token.id)]
    }

    fn evict(&mut self, id: EntityId, actions: &mut Vec<Action>) {
        self.transitions.cancel(id);
        self.leaving.remove(&id);
        if self.held == Some(id) {
            self.held = None;
        }
        if self.store.remove(id).is_some() {
            debug!(id, "evicted outside window");
            actions.push(Action::EntityRemoved(id));
        }
    }
}

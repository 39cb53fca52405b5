//! Body-part marks for one battle.
//!
//! Two independent slots:
//!
//! - **Harvest**: set by the player on the enemy; biases the reward pool.
//! - **Threat**: set by the enemy on the player; picks the curse on defeat.
//!
//! One `MarkTracker` is owned by the battle and lent to every consumer, so
//! there is exactly one copy of both slots. Listeners are registered with
//! [`MarkTracker::subscribe`] and removed by id.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::BodyTag;

/// Which mark slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkSlot {
    Harvest,
    Threat,
}

/// Handle returned by [`MarkTracker::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListenerId(pub u32);

impl ListenerId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Listener({})", self.0)
    }
}

type Listener = Box<dyn FnMut(MarkSlot, Option<BodyTag>)>;

/// The two mark slots plus their change listeners.
#[derive(Default)]
pub struct MarkTracker {
    harvest: Option<BodyTag>,
    threat: Option<BodyTag>,
    listeners: FxHashMap<ListenerId, Listener>,
    next_id: u32,
}

impl MarkTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, slot: MarkSlot) -> Option<BodyTag> {
        match slot {
            MarkSlot::Harvest => self.harvest,
            MarkSlot::Threat => self.threat,
        }
    }

    /// Mark the player put on the enemy.
    #[must_use]
    pub fn harvest(&self) -> Option<BodyTag> {
        self.harvest
    }

    /// Mark the enemy put on the player.
    #[must_use]
    pub fn threat(&self) -> Option<BodyTag> {
        self.threat
    }

    /// Set a slot. Setting the value it already holds does nothing.
    pub fn apply(&mut self, slot: MarkSlot, tag: BodyTag) {
        let current = match slot {
            MarkSlot::Harvest => &mut self.harvest,
            MarkSlot::Threat => &mut self.threat,
        };
        if *current == Some(tag) {
            return;
        }
        *current = Some(tag);
        log::debug!("{slot:?} mark -> {tag}");
        self.notify(slot, Some(tag));
    }

    pub fn apply_harvest(&mut self, tag: BodyTag) {
        self.apply(MarkSlot::Harvest, tag);
    }

    pub fn apply_threat(&mut self, tag: BodyTag) {
        self.apply(MarkSlot::Threat, tag);
    }

    /// Clear both slots. Always notifies once per slot, even if already clear.
    pub fn clear_all(&mut self) {
        self.harvest = None;
        self.threat = None;
        self.notify(MarkSlot::Harvest, None);
        self.notify(MarkSlot::Threat, None);
    }

    /// Register a change listener.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(MarkSlot, Option<BodyTag>) + 'static,
    ) -> ListenerId {
        let id = ListenerId::new(self.next_id);
        self.next_id += 1;
        self.listeners.insert(id, Box::new(listener));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    /// Drop every listener.
    pub fn unsubscribe_all(&mut self) {
        self.listeners.clear();
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn notify(&mut self, slot: MarkSlot, value: Option<BodyTag>) {
        let mut ids: Vec<ListenerId> = self.listeners.keys().copied().collect();
        ids.sort();
        for id in ids {
            if let Some(listener) = self.listeners.get_mut(&id) {
                listener(slot, value);
            }
        }
    }
}

impl std::fmt::Debug for MarkTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkTracker")
            .field("harvest", &self.harvest)
            .field("threat", &self.threat)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

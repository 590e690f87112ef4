//! Bounded set of recently received message IDs.

use std::collections::BTreeMap;

use crate::message::MessageId;

/// Default number of IDs kept.
pub const DEFAULT_CAPACITY: usize = 400;

/// Outcome of [`MsgIdsSet::register`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registered {
    /// First time this ID was seen.
    Fresh,
    /// Already in the set.
    Duplicate,
    /// Older than everything kept while the set is full.
    TooOld,
}

/// Outcome of [`MsgIdsSet::lookup`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lookup {
    /// Not in the set.
    NotFound,
    /// Seen, and the message requires an acknowledgement.
    NeedsAck,
    /// Seen, no acknowledgement required.
    NoAckNeeded,
}

/// Received message IDs in ascending order, each with its ack requirement.
#[derive(Clone, Debug)]
pub struct MsgIdsSet {
    ids: BTreeMap<MessageId, bool>,
    capacity: usize,
}

impl MsgIdsSet {
    /// An empty set holding [`DEFAULT_CAPACITY`] IDs.
    pub fn new() -> Self { Self::with_capacity(DEFAULT_CAPACITY) }

    /// An empty set holding `capacity` IDs.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { ids: BTreeMap::new(), capacity: capacity.max(1) }
    }

    /// Record an incoming ID.
    ///
    /// Once full, only IDs newer than the oldest kept one are accepted, and
    /// accepting one drops the oldest so the set never exceeds its capacity.
    pub fn register(&mut self, id: MessageId, need_ack: bool) -> Registered {
        if self.ids.contains_key(&id) {
            return Registered::Duplicate;
        }
        if self.ids.len() >= self.capacity && self.min().is_some_and(|min| id < min) {
            log::debug!("[mtp] rejecting old msg_id {id}");
            return Registered::TooOld;
        }
        self.ids.insert(id, need_ack);
        if self.ids.len() > self.capacity {
            self.ids.pop_first();
        }
        Registered::Fresh
    }

    /// Most IDs kept at once.
    pub fn capacity(&self) -> usize { self.capacity }

    /// Whether `id` was seen and whether it needs an ack.
    pub fn lookup(&self, id: MessageId) -> Lookup {
        match self.ids.get(&id) {
            None => Lookup::NotFound,
            Some(true) => Lookup::NeedsAck,
            Some(false) => Lookup::NoAckNeeded,
        }
    }

    /// Oldest kept ID.
    pub fn min(&self) -> Option<MessageId> { self.ids.keys().next().copied() }

    /// Newest kept ID.
    pub fn max(&self) -> Option<MessageId> { self.ids.keys().next_back().copied() }

    /// Number of kept IDs.
    pub fn len(&self) -> usize { self.ids.len() }

    /// True when nothing has been registered.
    pub fn is_empty(&self) -> bool { self.ids.is_empty() }
}

impl Default for MsgIdsSet {
    fn default() -> Self { Self::new() }
}

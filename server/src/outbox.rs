//! The unresolved-reference outbox: pending field writes parked until the
//! objects they reference receive stable ids.
//!
//! Entries live in an arena keyed by small recycled handles; the two lookup
//! indices (per pending field, per awaited object) both store handles, so
//! removal is a two-map erase with no shared ownership.

use std::{
    collections::{HashMap, HashSet},
    time::Duration,
};

use log::trace;

use shardspace_shared::{FieldHandle, KeyGenerator};

use crate::{channel::ChannelId, object::ObjectHandle};

pub type PendingHandle = u16;

/// Identifies one parked field write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OutboxKey {
    pub channel: ChannelId,
    pub object: ObjectHandle,
    pub field: FieldHandle,
}

struct PendingEntry {
    key: OutboxKey,
    waiting_on: HashSet<ObjectHandle>,
}

pub struct Outbox {
    handle_store: KeyGenerator<PendingHandle>,
    entries: HashMap<PendingHandle, PendingEntry>,
    by_field: HashMap<OutboxKey, PendingHandle>,
    by_awaited: HashMap<ObjectHandle, HashSet<PendingHandle>>,
}

impl Outbox {
    pub fn new() -> Self {
        Self {
            handle_store: KeyGenerator::new(Duration::from_secs(60)),
            entries: HashMap::new(),
            by_field: HashMap::new(),
            by_awaited: HashMap::new(),
        }
    }

    /// Parks `key` until every object in `waiting_on` resolves. A later
    /// write to the same field supersedes the earlier one.
    pub fn queue(&mut self, key: OutboxKey, waiting_on: HashSet<ObjectHandle>) {
        debug_assert!(!waiting_on.is_empty());
        self.remove_key(&key);

        let handle = self.handle_store.generate();
        trace!(
            "Queueing field {} on channel {:?} behind {} unresolved object(s)",
            key.field,
            key.channel,
            waiting_on.len()
        );
        for awaited in &waiting_on {
            self.by_awaited.entry(*awaited).or_default().insert(handle);
        }
        self.by_field.insert(key, handle);
        self.entries.insert(handle, PendingEntry { key, waiting_on });
    }

    /// Drops the parked write for `key`, if any. Called when a fresh update
    /// re-serializes the field or the target object dies.
    pub fn reset(&mut self, key: &OutboxKey) {
        self.remove_key(key);
    }

    /// Drops every parked write belonging to `channel`.
    pub fn reset_channel(&mut self, channel: ChannelId) {
        let keys: Vec<OutboxKey> = self
            .by_field
            .keys()
            .filter(|key| key.channel == channel)
            .copied()
            .collect();
        for key in keys {
            self.remove_key(&key);
        }
    }

    /// Marks `object` resolved. Returns the keys whose waiting sets just
    /// emptied; those fields must be re-serialized and sent now. Entries
    /// still waiting on other objects stay parked.
    pub fn resolve(&mut self, object: ObjectHandle) -> Vec<OutboxKey> {
        let Some(handles) = self.by_awaited.remove(&object) else {
            return Vec::new();
        };
        let mut ready = Vec::new();
        for handle in handles {
            let entry = self
                .entries
                .get_mut(&handle)
                .expect("awaited index points at a missing outbox entry");
            entry.waiting_on.remove(&object);
            if entry.waiting_on.is_empty() {
                let entry = self.entries.remove(&handle).unwrap();
                self.by_field.remove(&entry.key);
                self.handle_store.recycle_key(&handle);
                ready.push(entry.key);
            }
        }
        ready
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &OutboxKey) -> bool {
        self.by_field.contains_key(key)
    }

    fn remove_key(&mut self, key: &OutboxKey) {
        let Some(handle) = self.by_field.remove(key) else {
            return;
        };
        let entry = self.entries.remove(&handle).unwrap();
        for awaited in &entry.waiting_on {
            if let Some(handles) = self.by_awaited.get_mut(awaited) {
                handles.remove(&handle);
                if handles.is_empty() {
                    self.by_awaited.remove(awaited);
                }
            }
        }
        self.handle_store.recycle_key(&handle);
    }
}

impl Default for Outbox {
    fn default() -> Self {
        Self::new()
    }
}

use std::collections::HashSet;

use shardspace_shared::{ComponentId, EntityId};

/// Which (entity, component) pairs this worker currently holds write
/// authority over. Updated from runtime authority-change notifications;
/// consulted before every component update goes out.
#[derive(Debug, Default)]
pub struct AuthorityView {
    authoritative: HashSet<(EntityId, ComponentId)>,
}

impl AuthorityView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_authority(&self, entity_id: EntityId, component_id: ComponentId) -> bool {
        self.authoritative.contains(&(entity_id, component_id))
    }

    pub fn grant(&mut self, entity_id: EntityId, component_id: ComponentId) {
        self.authoritative.insert((entity_id, component_id));
    }

    pub fn revoke(&mut self, entity_id: EntityId, component_id: ComponentId) {
        self.authoritative.remove(&(entity_id, component_id));
    }

    /// Drops all authority records for a deleted entity.
    pub fn forget_entity(&mut self, entity_id: EntityId) {
        self.authoritative.retain(|(entity, _)| *entity != entity_id);
    }
}

use shardspace_shared::{EntityId, Query};

use crate::object::ObjectHandle;

/// Identifier for the replication channel binding one root object to one
/// entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(pub u32);

/// The client connection that owns an entity, if any.
#[derive(Clone, Debug, PartialEq)]
pub struct OwningClient {
    /// The attribute naming this client in ACLs, e.g. "workerId:client-7".
    pub worker_attribute: String,
    /// Sublevels the client has streamed in; actors in other levels are
    /// filtered out of its interest.
    pub visible_levels: Vec<String>,
    /// The client's controller object, through which packed unreliable
    /// RPCs are routed.
    pub controller: ObjectHandle,
}

/// Per-entity replication state the sender consults on every flush.
#[derive(Clone, Debug)]
pub struct EntityChannel {
    pub id: ChannelId,
    pub entity_id: EntityId,
    /// The root object replicated on this channel. Subobjects are reached
    /// through references, never bound to their own channel.
    pub object: ObjectHandle,
    /// Set between the create request going out and the response arriving.
    pub creating_new_entity: bool,
    pub owning_client: Option<OwningClient>,
    pub user_queries: Vec<Query>,
    /// Set when anything feeding the entity's Interest changed; the sender
    /// regenerates and appends the Interest update on its next flush.
    pub interest_dirty: bool,
}

impl EntityChannel {
    pub fn new(id: ChannelId, entity_id: EntityId, object: ObjectHandle) -> Self {
        Self {
            id,
            entity_id,
            object,
            creating_new_entity: false,
            owning_client: None,
            user_queries: Vec::new(),
            interest_dirty: false,
        }
    }
}

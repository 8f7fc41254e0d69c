use crate::types::{CommandIndex, ComponentId, FieldId};

use super::object::SchemaObject;

/// Full component state, sent once when an entity is created or a component
/// first checked out.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComponentData {
    pub component_id: ComponentId,
    pub fields: SchemaObject,
}

impl ComponentData {
    pub fn new(component_id: ComponentId) -> Self {
        Self {
            component_id,
            fields: SchemaObject::new(),
        }
    }
}

/// A delta against previously-delivered component state: field writes for
/// changed fields, events, and an explicit cleared-field list so receivers
/// can distinguish "set to empty" from "never touched".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComponentUpdate {
    pub component_id: ComponentId,
    pub fields: SchemaObject,
    pub events: SchemaObject,
    pub cleared: Vec<FieldId>,
}

impl ComponentUpdate {
    pub fn new(component_id: ComponentId) -> Self {
        Self {
            component_id,
            fields: SchemaObject::new(),
            events: SchemaObject::new(),
            cleared: Vec::new(),
        }
    }

    pub fn add_cleared(&mut self, field_id: FieldId) {
        self.cleared.push(field_id);
    }

    /// True when the update carries no writes, events, or clears at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.events.is_empty() && self.cleared.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CommandRequest {
    pub component_id: ComponentId,
    pub command_index: CommandIndex,
    pub payload: SchemaObject,
}

impl CommandRequest {
    pub fn new(component_id: ComponentId, command_index: CommandIndex) -> Self {
        Self {
            component_id,
            command_index,
            payload: SchemaObject::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CommandResponse {
    pub component_id: ComponentId,
    pub command_index: CommandIndex,
    pub payload: SchemaObject,
}

impl CommandResponse {
    pub fn empty(component_id: ComponentId, command_index: CommandIndex) -> Self {
        Self {
            component_id,
            command_index,
            payload: SchemaObject::new(),
        }
    }
}

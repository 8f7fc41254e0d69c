use std::collections::BTreeMap;

use crate::{
    constants::ENTITY_ACL_COMPONENT_ID,
    schema::{ComponentData, ComponentUpdate, SchemaObject},
    types::ComponentId,
};

const ACL_READ_ID: u32 = 1;
const ACL_WRITE_ENTRY_ID: u32 = 2;
const ACL_WRITE_ENTRY_KEY_ID: u32 = 1;
const ACL_WRITE_ENTRY_VALUE_ID: u32 = 2;
const REQUIREMENT_SET_ATTRIBUTE_SET_ID: u32 = 1;
const ATTRIBUTE_SET_ATTRIBUTE_ID: u32 = 1;

/// A conjunction of worker attributes ("this worker is a server AND in
/// deployment X").
pub type WorkerAttributeSet = Vec<String>;

/// A disjunction of attribute sets; a worker satisfies the requirement if it
/// matches any one set.
pub type WorkerRequirementSet = Vec<WorkerAttributeSet>;

pub fn attribute_set(attribute: &str) -> WorkerAttributeSet {
    vec![attribute.to_string()]
}

/// The access-control component: who may observe the entity, and which
/// workers may write each component.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityAcl {
    pub read_acl: WorkerRequirementSet,
    pub component_write_acl: BTreeMap<ComponentId, WorkerRequirementSet>,
}

impl EntityAcl {
    pub fn new(read_acl: WorkerRequirementSet) -> Self {
        Self {
            read_acl,
            component_write_acl: BTreeMap::new(),
        }
    }

    pub fn set_write_access(&mut self, component_id: ComponentId, requirement: WorkerRequirementSet) {
        self.component_write_acl.insert(component_id, requirement);
    }

    pub fn to_data(&self) -> ComponentData {
        let mut data = ComponentData::new(ENTITY_ACL_COMPONENT_ID);
        self.write_to(&mut data.fields);
        data
    }

    pub fn to_update(&self) -> ComponentUpdate {
        let mut update = ComponentUpdate::new(ENTITY_ACL_COMPONENT_ID);
        self.write_to(&mut update.fields);
        update
    }

    fn write_to(&self, object: &mut SchemaObject) {
        write_requirement_set(object.add_object(ACL_READ_ID), &self.read_acl);
        for (component_id, requirement) in &self.component_write_acl {
            let entry = object.add_object(ACL_WRITE_ENTRY_ID);
            entry.add_uint32(ACL_WRITE_ENTRY_KEY_ID, *component_id);
            write_requirement_set(entry.add_object(ACL_WRITE_ENTRY_VALUE_ID), requirement);
        }
    }
}

fn write_requirement_set(object: &mut SchemaObject, requirement: &WorkerRequirementSet) {
    for attributes in requirement {
        let set = object.add_object(REQUIREMENT_SET_ATTRIBUTE_SET_ID);
        for attribute in attributes {
            set.add_string(ATTRIBUTE_SET_ATTRIBUTE_ID, attribute);
        }
    }
}

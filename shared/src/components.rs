//! Encoders for the well-known components every entity template carries.

use crate::{
    constants::{
        ENTITY_METADATA_COMPONENT_ID, HEARTBEAT_COMPONENT_ID, METADATA_COMPONENT_ID,
        PERSISTENCE_COMPONENT_ID, POSITION_COMPONENT_ID, SINGLETON_COMPONENT_ID,
        SPAWN_DATA_COMPONENT_ID,
    },
    coordinates::Coordinates,
    schema::{ComponentData, ComponentUpdate, SchemaObject},
};

const POSITION_COORDS_ID: u32 = 1;
const METADATA_ENTITY_TYPE_ID: u32 = 1;
const SPAWN_DATA_LOCATION_ID: u32 = 1;
const SPAWN_DATA_ROTATION_ID: u32 = 2;
const SPAWN_DATA_SCALE_ID: u32 = 3;
const SPAWN_DATA_VELOCITY_ID: u32 = 4;
const ENTITY_METADATA_STABLY_NAMED_PATH_ID: u32 = 1;
const ENTITY_METADATA_OWNER_ATTRIBUTE_ID: u32 = 2;
const ENTITY_METADATA_CLASS_PATH_ID: u32 = 3;
const ENTITY_METADATA_NET_STARTUP_ID: u32 = 4;

/// The canonical spatial position the runtime shards on.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub coords: Coordinates,
}

impl Position {
    pub fn new(coords: Coordinates) -> Self {
        Self { coords }
    }

    pub fn to_data(&self) -> ComponentData {
        let mut data = ComponentData::new(POSITION_COMPONENT_ID);
        self.write_to(&mut data.fields);
        data
    }

    pub fn to_update(&self) -> ComponentUpdate {
        let mut update = ComponentUpdate::new(POSITION_COMPONENT_ID);
        self.write_to(&mut update.fields);
        update
    }

    fn write_to(&self, object: &mut SchemaObject) {
        let coords = object.add_object(POSITION_COORDS_ID);
        coords.add_double(1, self.coords.x);
        coords.add_double(2, self.coords.y);
        coords.add_double(3, self.coords.z);
    }
}

/// Human-readable entity type, surfaced by runtime inspection tooling.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metadata {
    pub entity_type: String,
}

impl Metadata {
    pub fn new(entity_type: &str) -> Self {
        Self {
            entity_type: entity_type.to_string(),
        }
    }

    pub fn to_data(&self) -> ComponentData {
        let mut data = ComponentData::new(METADATA_COMPONENT_ID);
        data.fields
            .add_string(METADATA_ENTITY_TYPE_ID, &self.entity_type);
        data
    }
}

/// Marker component; entities carrying it survive snapshots.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Persistence;

impl Persistence {
    pub fn to_data(&self) -> ComponentData {
        ComponentData::new(PERSISTENCE_COMPONENT_ID)
    }
}

/// Marker component identifying the one instance of a singleton class.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Singleton;

impl Singleton {
    pub fn to_data(&self) -> ComponentData {
        ComponentData::new(SINGLETON_COMPONENT_ID)
    }
}

/// Marker component used for client liveness checks.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Heartbeat;

impl Heartbeat {
    pub fn to_data(&self) -> ComponentData {
        ComponentData::new(HEARTBEAT_COMPONENT_ID)
    }
}

/// Immutable transform captured at entity creation, used to respawn the
/// object on workers that gain authority later.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpawnData {
    pub location: Coordinates,
    pub rotation: Coordinates,
    pub scale: Coordinates,
    pub velocity: Coordinates,
}

impl SpawnData {
    pub fn to_data(&self) -> ComponentData {
        let mut data = ComponentData::new(SPAWN_DATA_COMPONENT_ID);
        write_coordinates(&mut data.fields, SPAWN_DATA_LOCATION_ID, &self.location);
        write_coordinates(&mut data.fields, SPAWN_DATA_ROTATION_ID, &self.rotation);
        write_coordinates(&mut data.fields, SPAWN_DATA_SCALE_ID, &self.scale);
        write_coordinates(&mut data.fields, SPAWN_DATA_VELOCITY_ID, &self.velocity);
        data
    }
}

/// Bookkeeping the integration layer needs to re-associate an entity with a
/// local object: stable name (for startup objects), owning client, class
/// path, and whether the object was placed in the level.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityMetadata {
    pub stably_named_path: Option<String>,
    pub owner_worker_attribute: Option<String>,
    pub class_path: String,
    pub net_startup: bool,
}

impl EntityMetadata {
    pub fn to_data(&self) -> ComponentData {
        let mut data = ComponentData::new(ENTITY_METADATA_COMPONENT_ID);
        if let Some(path) = &self.stably_named_path {
            data.fields
                .add_string(ENTITY_METADATA_STABLY_NAMED_PATH_ID, path);
        }
        if let Some(attribute) = &self.owner_worker_attribute {
            data.fields
                .add_string(ENTITY_METADATA_OWNER_ATTRIBUTE_ID, attribute);
        }
        data.fields
            .add_string(ENTITY_METADATA_CLASS_PATH_ID, &self.class_path);
        data.fields
            .add_bool(ENTITY_METADATA_NET_STARTUP_ID, self.net_startup);
        data
    }
}

fn write_coordinates(object: &mut SchemaObject, field_id: u32, coordinates: &Coordinates) {
    let nested = object.add_object(field_id);
    nested.add_double(1, coordinates.x);
    nested.add_double(2, coordinates.y);
    nested.add_double(3, coordinates.z);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_metadata_fields_are_omitted_when_absent() {
        let metadata = EntityMetadata {
            stably_named_path: None,
            owner_worker_attribute: None,
            class_path: "/Game/Blueprints/BP_Crate".to_string(),
            net_startup: false,
        };
        let data = metadata.to_data();
        assert_eq!(data.fields.count(ENTITY_METADATA_STABLY_NAMED_PATH_ID), 0);
        assert_eq!(data.fields.count(ENTITY_METADATA_OWNER_ATTRIBUTE_ID), 0);
        assert_eq!(data.fields.count(ENTITY_METADATA_CLASS_PATH_ID), 1);
    }

    #[test]
    fn marker_components_carry_no_fields() {
        assert!(Persistence.to_data().fields.is_empty());
        assert!(Singleton.to_data().fields.is_empty());
        assert!(Heartbeat.to_data().fields.is_empty());
    }
}

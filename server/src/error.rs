use thiserror::Error;

use shardspace_shared::ComponentId;

use crate::{channel::ChannelId, class_registry::TypeId, object::ObjectHandle};

/// Errors raised while building the class registry. These indicate a broken
/// schema-generation step, so callers treat them as fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Type {type_id:?} registered twice")]
    DuplicateType { type_id: TypeId },

    #[error("Type {type_id:?} names parent {parent:?}, which is not registered")]
    UnknownParent { type_id: TypeId, parent: TypeId },

    #[error("Registry has no root type (every type names a parent)")]
    NoRootType,

    #[error("Root type {type_id:?} declares no checkout radius")]
    RootWithoutRadius { type_id: TypeId },
}

/// Errors raised by the sender pipeline. Missing mappings degrade the
/// affected operation; they never abort the worker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SenderError {
    #[error("Channel {channel:?} is not open")]
    UnknownChannel { channel: ChannelId },

    #[error("Object {object:?} no longer exists")]
    ObjectGone { object: ObjectHandle },

    #[error("No class info registered for type {type_id:?}")]
    MissingClassInfo { type_id: TypeId },

    #[error("Class {type_id:?} has no schema component for the requested group")]
    MissingComponentId { type_id: TypeId },

    #[error("RPC targets component {component_id} but no such RPC is registered")]
    UnknownRpc { component_id: ComponentId },
}

//! # Shardspace Shared
//! Wire-level building blocks shared between shardspace workers: schema
//! objects, well-known components, access control, and interest queries.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod acl;
mod components;
pub mod constants;
mod coordinates;
mod key_generator;
mod object_ref;
mod query;
mod schema;
mod settings;
mod types;

pub use acl::{attribute_set, EntityAcl, WorkerAttributeSet, WorkerRequirementSet};
pub use components::{
    EntityMetadata, Heartbeat, Metadata, Persistence, Position, Singleton, SpawnData,
};
pub use coordinates::Coordinates;
pub use key_generator::KeyGenerator;
pub use object_ref::ObjectRef;
pub use query::{ComponentInterest, Interest, Query, QueryConstraint, QueryResult};
pub use schema::{
    CommandRequest, CommandResponse, ComponentData, ComponentUpdate, SchemaError, SchemaObject,
    SchemaValue,
};
pub use settings::SpatialSettings;
pub use types::{
    CommandIndex, ComponentId, EntityId, FieldHandle, FieldId, ObjectOffset, RequestId, RetryIndex,
};

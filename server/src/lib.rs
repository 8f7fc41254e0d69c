//! # Shardspace Server
//! The server-worker pipeline: computes per-entity interest, synthesizes
//! schema component updates from engine property diffs, and drives the
//! outgoing-operation sender with its unresolved-reference outbox,
//! authority-gated queues, and reliable RPC retry.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use shardspace_shared::{
        attribute_set, ComponentData, ComponentUpdate, Coordinates, EntityAcl, EntityId,
        Interest, ObjectRef, Query, QueryConstraint, QueryResult, SchemaObject, SchemaValue,
        SpatialSettings, WorkerRequirementSet,
    };
}

mod authority;
mod channel;
mod class_registry;
mod component_factory;
mod connection;
mod error;
mod interest_factory;
mod object;
mod outbox;
mod resolver;
mod rpc;
mod sender;
mod world_view;

pub use authority::AuthorityView;
pub use channel::{ChannelId, EntityChannel, OwningClient};
pub use class_registry::{
    CheckoutRadiusOverride, ClassInfo, ClassRegistry, ClassRegistryBuilder, TypeId,
};
pub use component_factory::{ComponentFactory, OutgoingUpdate, UnresolvedFields};
pub use connection::{CommandResponseCode, Connection};
pub use error::{RegistryError, SenderError};
pub use interest_factory::InterestFactory;
pub use object::{
    FieldDescriptor, FieldType, FieldValue, ObjectHandle, ObjectState, PropertyGroup,
    RepChangeState, StructValue,
};
pub use outbox::{Outbox, OutboxKey, PendingHandle};
pub use resolver::ObjectResolver;
pub use rpc::{PendingRpcParams, ReliableRpcForRetry, RpcId, RpcInfo, RpcKind};
pub use sender::{CreationParams, Sender, SenderContext};
pub use world_view::WorldView;

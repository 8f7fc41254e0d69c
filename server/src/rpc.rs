use shardspace_shared::{
    constants::{
        CLIENT_RPC_ENDPOINT_COMPONENT_ID, MULTICAST_RPCS_COMPONENT_ID,
        SERVER_RPC_ENDPOINT_COMPONENT_ID,
    },
    ComponentId, ObjectRef, RetryIndex, SchemaObject,
};

use crate::object::ObjectHandle;

/// Stable identifier for one RPC within a class, assigned by the schema
/// generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RpcId(pub u32);

/// Delivery semantics of an RPC.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RpcKind {
    /// Server-to-client, delivered exactly once with retry.
    ClientReliable,
    /// Client-to-server, delivered exactly once with retry.
    ServerReliable,
    /// Server-to-server, delivered exactly once with retry.
    CrossServer,
    /// Server-to-client, best effort.
    ClientUnreliable,
    /// Client-to-server, best effort.
    ServerUnreliable,
    /// Fan-out to every interested worker, best effort.
    Multicast,
}

impl RpcKind {
    pub fn is_reliable(self) -> bool {
        matches!(
            self,
            RpcKind::ClientReliable | RpcKind::ServerReliable | RpcKind::CrossServer
        )
    }

    /// The endpoint component this RPC's payload travels on.
    pub fn endpoint_component(self) -> ComponentId {
        match self {
            RpcKind::ClientReliable | RpcKind::ClientUnreliable => CLIENT_RPC_ENDPOINT_COMPONENT_ID,
            RpcKind::ServerReliable | RpcKind::ServerUnreliable | RpcKind::CrossServer => {
                SERVER_RPC_ENDPOINT_COMPONENT_ID
            }
            RpcKind::Multicast => MULTICAST_RPCS_COMPONENT_ID,
        }
    }
}

/// Static description of one RPC, looked up from the class registry.
#[derive(Clone, Debug, PartialEq)]
pub struct RpcInfo {
    pub rpc_id: RpcId,
    pub kind: RpcKind,
    /// Index of this RPC within its class's RPC list, written into the
    /// payload so the receiver can dispatch.
    pub rpc_index: u32,
}

/// An RPC whose target (or an argument) has no assigned entity id yet,
/// parked until resolution. Arguments are kept as live values and
/// re-serialized on release, so references resolved in the meantime are
/// expressed concretely.
#[derive(Clone, Debug)]
pub struct PendingRpcParams {
    pub target: ObjectHandle,
    pub rpc: RpcInfo,
    pub args: Vec<crate::object::FieldValue>,
    /// Assigned at the original send attempt so resolution-delayed reliable
    /// RPCs still go out in call order.
    pub retry_index: RetryIndex,
}

/// A reliable RPC that timed out and is awaiting retransmission.
#[derive(Debug)]
pub struct ReliableRpcForRetry {
    pub target_ref: ObjectRef,
    pub target: ObjectHandle,
    pub component_id: ComponentId,
    pub rpc_index: u32,
    pub payload: SchemaObject,
    pub attempts: u32,
    pub retry_index: RetryIndex,
}

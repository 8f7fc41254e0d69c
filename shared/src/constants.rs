use std::time::Duration;

use crate::types::{CommandIndex, ComponentId, EntityId, FieldId};

pub const INVALID_ENTITY_ID: EntityId = 0;
pub const INVALID_COMPONENT_ID: ComponentId = 0;

// Well-known components every entity carries.
pub const ENTITY_ACL_COMPONENT_ID: ComponentId = 50;
pub const METADATA_COMPONENT_ID: ComponentId = 53;
pub const POSITION_COMPONENT_ID: ComponentId = 54;
pub const PERSISTENCE_COMPONENT_ID: ComponentId = 55;
pub const INTEREST_COMPONENT_ID: ComponentId = 58;

// Components owned by this integration layer. Generated per-class component
// ids are assigned upward from FIRST_GENERATED_COMPONENT_ID by the schema
// compiler; everything below is reserved.
pub const SPAWN_DATA_COMPONENT_ID: ComponentId = 9999;
pub const ENTITY_METADATA_COMPONENT_ID: ComponentId = 9998;
pub const SINGLETON_COMPONENT_ID: ComponentId = 9997;
pub const HEARTBEAT_COMPONENT_ID: ComponentId = 9996;
pub const NOT_STREAMED_COMPONENT_ID: ComponentId = 9984;
pub const CLIENT_RPC_ENDPOINT_COMPONENT_ID: ComponentId = 9978;
pub const SERVER_RPC_ENDPOINT_COMPONENT_ID: ComponentId = 9977;
pub const MULTICAST_RPCS_COMPONENT_ID: ComponentId = 9976;
pub const RPCS_ON_ENTITY_CREATION_COMPONENT_ID: ComponentId = 9975;
pub const DEBUG_METRICS_COMPONENT_ID: ComponentId = 9974;
pub const FIRST_GENERATED_COMPONENT_ID: ComponentId = 10000;

// RPC endpoint schema layout.
pub const RPC_ENDPOINT_COMMAND_INDEX: CommandIndex = 1;
pub const CLEAR_RPCS_ON_ENTITY_CREATION_COMMAND_INDEX: CommandIndex = 2;
pub const RPC_ENDPOINT_EVENT_ID: FieldId = 1;
pub const RPC_ENDPOINT_PACKED_EVENT_ID: FieldId = 2;
pub const RPC_PAYLOAD_OFFSET_ID: FieldId = 1;
pub const RPC_PAYLOAD_INDEX_ID: FieldId = 2;
pub const RPC_PAYLOAD_DATA_ID: FieldId = 3;
pub const PACKED_RPC_ENTITY_ID: FieldId = 4;
pub const RPCS_ON_ENTITY_CREATION_DATA_ID: FieldId = 1;

/// Reliable commands are abandoned after this many attempts.
pub const MAX_COMMAND_ATTEMPTS: u32 = 5;

/// Backoff before retrying a timed-out command. Doubles per attempt,
/// starting at 100ms after the first failure.
pub fn command_retry_wait_time(attempts: u32) -> Duration {
    let exponent = attempts.saturating_sub(1).min(16);
    Duration::from_millis(100u64 << exponent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_wait_doubles_per_attempt() {
        assert_eq!(command_retry_wait_time(1), Duration::from_millis(100));
        assert_eq!(command_retry_wait_time(2), Duration::from_millis(200));
        assert_eq!(command_retry_wait_time(4), Duration::from_millis(800));
    }

    #[test]
    fn retry_wait_is_capped() {
        assert!(command_retry_wait_time(1000) <= Duration::from_millis(100 << 16));
    }
}

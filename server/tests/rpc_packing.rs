//! Unreliable RPC packing: with packing enabled, per-tick RPCs accumulate
//! and flush as one batched update on the owning client's controller.

mod common;

use shardspace_server::{
    AuthorityView, ChannelId, EntityChannel, FieldValue, ObjectHandle, ObjectState, OwningClient,
    RpcId, RpcInfo, RpcKind, Sender, SenderContext, TypeId,
};
use shardspace_shared::{
    constants::{
        CLIENT_RPC_ENDPOINT_COMPONENT_ID, PACKED_RPC_ENTITY_ID, RPC_ENDPOINT_EVENT_ID,
        RPC_ENDPOINT_PACKED_EVENT_ID,
    },
    SchemaValue, SpatialSettings,
};

use common::{pawn_registry, MockConnection, MockResolver, MockWorld};

const PAWN_ENTITY: i64 = 100;
const CONTROLLER_ENTITY: i64 = 200;

fn owned_pawn_world() -> MockWorld {
    let mut world = MockWorld::new();
    let mut channel = EntityChannel::new(ChannelId(1), PAWN_ENTITY, ObjectHandle(1));
    channel.owning_client = Some(OwningClient {
        worker_attribute: "workerId:client-1".to_string(),
        visible_levels: Vec::new(),
        controller: ObjectHandle(9),
    });
    world.add_channel(channel, ObjectState::new(TypeId(1)));
    world
}

fn unreliable_rpc() -> RpcInfo {
    RpcInfo {
        rpc_id: RpcId(3),
        kind: RpcKind::ClientUnreliable,
        rpc_index: 6,
    }
}

#[test]
fn packed_rpcs_flush_as_one_update_on_the_controller() {
    let registry = pawn_registry(Vec::new());
    let mut settings = SpatialSettings::default();
    settings.pack_unreliable_rpcs = true;
    let world = owned_pawn_world();
    let mut resolver = MockResolver::new();
    resolver.assign(ObjectHandle(1), PAWN_ENTITY, 0);
    resolver.assign(ObjectHandle(9), CONTROLLER_ENTITY, 0);
    let mut authority = AuthorityView::new();
    authority.grant(PAWN_ENTITY, CLIENT_RPC_ENDPOINT_COMPONENT_ID);
    let mut connection = MockConnection::new();
    let mut sender = Sender::new();

    for value in [1, 2] {
        let mut ctx = SenderContext {
            registry: &registry,
            settings: &settings,
            world: &world,
            resolver: &mut resolver,
            authority: &authority,
            connection: &mut connection,
        };
        sender
            .send_rpc(
                &mut ctx,
                ObjectHandle(1),
                unreliable_rpc(),
                vec![FieldValue::Int32(value)],
            )
            .unwrap();
    }
    assert!(connection.sent.is_empty());

    sender.flush_packed_rpcs(&mut connection);
    let updates = connection.updates();
    assert_eq!(updates.len(), 1);
    let (entity, update) = updates[0];
    assert_eq!(*entity, CONTROLLER_ENTITY);
    assert_eq!(update.component_id, CLIENT_RPC_ENDPOINT_COMPONENT_ID);
    assert_eq!(update.events.count(RPC_ENDPOINT_PACKED_EVENT_ID), 2);

    // Each packed event carries the routing entity of the actual target.
    for event in update.events.get_all(RPC_ENDPOINT_PACKED_EVENT_ID) {
        let SchemaValue::Object(fields) = event else {
            panic!("packed event is not an object");
        };
        assert_eq!(fields.get_entity_id(PACKED_RPC_ENTITY_ID), Ok(PAWN_ENTITY));
    }

    // The batch is consumed; a second flush sends nothing.
    connection.sent.clear();
    sender.flush_packed_rpcs(&mut connection);
    assert!(connection.sent.is_empty());
}

#[test]
fn without_packing_each_rpc_goes_out_as_its_own_event() {
    let registry = pawn_registry(Vec::new());
    let settings = SpatialSettings::default();
    let world = owned_pawn_world();
    let mut resolver = MockResolver::new();
    resolver.assign(ObjectHandle(1), PAWN_ENTITY, 0);
    let mut authority = AuthorityView::new();
    authority.grant(PAWN_ENTITY, CLIENT_RPC_ENDPOINT_COMPONENT_ID);
    let mut connection = MockConnection::new();
    let mut sender = Sender::new();

    for value in [1, 2] {
        let mut ctx = SenderContext {
            registry: &registry,
            settings: &settings,
            world: &world,
            resolver: &mut resolver,
            authority: &authority,
            connection: &mut connection,
        };
        sender
            .send_rpc(
                &mut ctx,
                ObjectHandle(1),
                unreliable_rpc(),
                vec![FieldValue::Int32(value)],
            )
            .unwrap();
    }

    let updates = connection.updates();
    assert_eq!(updates.len(), 2);
    for (entity, update) in updates {
        assert_eq!(*entity, PAWN_ENTITY);
        assert_eq!(update.component_id, CLIENT_RPC_ENDPOINT_COMPONENT_ID);
        assert_eq!(update.events.count(RPC_ENDPOINT_EVENT_ID), 1);
    }
}

#[test]
fn packing_without_a_controller_falls_back_to_direct_send() {
    let registry = pawn_registry(Vec::new());
    let mut settings = SpatialSettings::default();
    settings.pack_unreliable_rpcs = true;
    let mut world = MockWorld::new();
    world.add_channel(
        EntityChannel::new(ChannelId(1), PAWN_ENTITY, ObjectHandle(1)),
        ObjectState::new(TypeId(1)),
    );
    let mut resolver = MockResolver::new();
    resolver.assign(ObjectHandle(1), PAWN_ENTITY, 0);
    let mut authority = AuthorityView::new();
    authority.grant(PAWN_ENTITY, CLIENT_RPC_ENDPOINT_COMPONENT_ID);
    let mut connection = MockConnection::new();
    let mut sender = Sender::new();

    let mut ctx = SenderContext {
        registry: &registry,
        settings: &settings,
        world: &world,
        resolver: &mut resolver,
        authority: &authority,
        connection: &mut connection,
    };
    sender
        .send_rpc(
            &mut ctx,
            ObjectHandle(1),
            unreliable_rpc(),
            vec![FieldValue::Int32(1)],
        )
        .unwrap();

    let updates = connection.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].1.events.count(RPC_ENDPOINT_EVENT_ID), 1);
}

#[test]
fn unreliable_rpc_without_endpoint_authority_is_dropped() {
    let registry = pawn_registry(Vec::new());
    let settings = SpatialSettings::default();
    let world = owned_pawn_world();
    let mut resolver = MockResolver::new();
    resolver.assign(ObjectHandle(1), PAWN_ENTITY, 0);
    let authority = AuthorityView::new();
    let mut connection = MockConnection::new();
    let mut sender = Sender::new();

    let mut ctx = SenderContext {
        registry: &registry,
        settings: &settings,
        world: &world,
        resolver: &mut resolver,
        authority: &authority,
        connection: &mut connection,
    };
    sender
        .send_rpc(
            &mut ctx,
            ObjectHandle(1),
            unreliable_rpc(),
            vec![FieldValue::Int32(1)],
        )
        .unwrap();

    // Dropped outright: not sent, and not queued for a later grant.
    assert!(connection.sent.is_empty());
    sender.on_authority_gained(&mut connection, PAWN_ENTITY);
    assert!(connection.sent.is_empty());
}

#[test]
fn unreliable_rpc_parks_on_an_unresolved_argument() {
    let registry = pawn_registry(Vec::new());
    let settings = SpatialSettings::default();
    let world = owned_pawn_world();
    let mut resolver = MockResolver::new();
    resolver.assign(ObjectHandle(1), PAWN_ENTITY, 0);
    let mut authority = AuthorityView::new();
    authority.grant(PAWN_ENTITY, CLIENT_RPC_ENDPOINT_COMPONENT_ID);
    let mut connection = MockConnection::new();
    let mut sender = Sender::new();

    let mut ctx = SenderContext {
        registry: &registry,
        settings: &settings,
        world: &world,
        resolver: &mut resolver,
        authority: &authority,
        connection: &mut connection,
    };
    sender
        .send_rpc(
            &mut ctx,
            ObjectHandle(1),
            unreliable_rpc(),
            vec![FieldValue::Object(Some(ObjectHandle(50)))],
        )
        .unwrap();
    assert!(connection.sent.is_empty());

    // The argument resolving releases the RPC with a concrete reference.
    resolver.assign(ObjectHandle(50), 777, 0);
    let mut ctx = SenderContext {
        registry: &registry,
        settings: &settings,
        world: &world,
        resolver: &mut resolver,
        authority: &authority,
        connection: &mut connection,
    };
    sender.resolve_object(&mut ctx, ObjectHandle(50)).unwrap();

    let updates = connection.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].1.events.count(RPC_ENDPOINT_EVENT_ID), 1);
}

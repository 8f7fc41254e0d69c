//! Authority-gated queuing: updates to components the worker cannot write
//! yet are held back and flushed, in order, when authority arrives.

mod common;

use shardspace_server::{AuthorityView, Sender, SenderContext};
use shardspace_shared::{
    constants::POSITION_COMPONENT_ID, Coordinates, SchemaValue, SpatialSettings,
};

use common::{pawn_registry, MockConnection, MockResolver, MockWorld};

const ENTITY: i64 = 100;

#[test]
fn updates_without_authority_are_queued_then_flushed_in_order() {
    let registry = pawn_registry(Vec::new());
    let settings = SpatialSettings::default();
    let world = MockWorld::new();
    let mut resolver = MockResolver::new();
    let authority = AuthorityView::new();
    let mut connection = MockConnection::new();
    let mut sender = Sender::new();

    for x in [1.0, 2.0, 3.0] {
        let mut ctx = SenderContext {
            registry: &registry,
            settings: &settings,
            world: &world,
            resolver: &mut resolver,
            authority: &authority,
            connection: &mut connection,
        };
        sender.send_position_update(&mut ctx, ENTITY, Coordinates::new(x, 0.0, 0.0));
    }
    assert!(connection.sent.is_empty());

    sender.on_authority_gained(&mut connection, ENTITY);
    let xs: Vec<f64> = connection
        .updates()
        .iter()
        .map(|(_, update)| {
            let SchemaValue::Object(coords) = update.fields.get(1).unwrap() else {
                panic!("position update has no coords object");
            };
            let SchemaValue::Double(x) = coords.get(1).unwrap() else {
                panic!("coords x is not a double");
            };
            *x
        })
        .collect();
    assert_eq!(xs, vec![1.0, 2.0, 3.0]);
    connection.sent.clear();

    // The queue is empty; a second grant flushes nothing.
    sender.on_authority_gained(&mut connection, ENTITY);
    assert!(connection.sent.is_empty());
}

#[test]
fn authority_gain_flushes_the_whole_entity_queue() {
    let registry = pawn_registry(Vec::new());
    let settings = SpatialSettings::default();
    let world = MockWorld::new();
    let mut resolver = MockResolver::new();
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
    sender.send_position_update(&mut ctx, ENTITY, Coordinates::ORIGIN);
    let class = registry.class(shardspace_server::TypeId(1)).unwrap();
    let mut ctx = SenderContext {
        registry: &registry,
        settings: &settings,
        world: &world,
        resolver: &mut resolver,
        authority: &authority,
        connection: &mut connection,
    };
    sender.update_entity_acl(&mut ctx, ENTITY, class, None);
    assert!(connection.sent.is_empty());

    // The grant was over one component, but the whole list drains in
    // enqueue order; the runtime grants the rest in the same burst.
    sender.on_authority_gained(&mut connection, ENTITY);
    let components: Vec<_> = connection
        .updates()
        .iter()
        .map(|(_, update)| update.component_id)
        .collect();
    assert_eq!(
        components,
        vec![
            POSITION_COMPONENT_ID,
            shardspace_shared::constants::ENTITY_ACL_COMPONENT_ID
        ]
    );

    // Nothing was left behind for a later grant.
    connection.sent.clear();
    sender.on_authority_gained(&mut connection, ENTITY);
    assert!(connection.sent.is_empty());
}

#[test]
fn updates_with_authority_bypass_the_queue() {
    let registry = pawn_registry(Vec::new());
    let settings = SpatialSettings::default();
    let world = MockWorld::new();
    let mut resolver = MockResolver::new();
    let mut authority = AuthorityView::new();
    authority.grant(ENTITY, POSITION_COMPONENT_ID);
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
    sender.send_position_update(&mut ctx, ENTITY, Coordinates::ORIGIN);
    assert_eq!(connection.updates().len(), 1);
}

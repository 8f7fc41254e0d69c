//! Mock collaborators shared by the sender and interest tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use shardspace_server::{
    ChannelId, ClassInfo, ClassRegistry, Connection, EntityChannel, FieldDescriptor, FieldType,
    ObjectHandle, ObjectResolver, ObjectState, PropertyGroup, TypeId, WorldView,
};
use shardspace_shared::{
    CommandRequest, CommandResponse, ComponentData, ComponentUpdate, EntityId, ObjectRef,
    RequestId,
};

#[derive(Debug)]
pub enum Sent {
    Update {
        entity: EntityId,
        update: ComponentUpdate,
    },
    Create {
        entity: EntityId,
        components: Vec<ComponentData>,
        request_id: RequestId,
    },
    Delete {
        entity: EntityId,
        request_id: RequestId,
    },
    Command {
        entity: EntityId,
        request: CommandRequest,
        request_id: RequestId,
    },
}

#[derive(Default)]
pub struct MockConnection {
    pub sent: Vec<Sent>,
    next_request_id: RequestId,
}

impl MockConnection {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self::default()
    }

    fn next_request(&mut self) -> RequestId {
        self.next_request_id += 1;
        self.next_request_id
    }

    pub fn updates(&self) -> Vec<(&EntityId, &ComponentUpdate)> {
        self.sent
            .iter()
            .filter_map(|sent| match sent {
                Sent::Update { entity, update } => Some((entity, update)),
                _ => None,
            })
            .collect()
    }

    pub fn commands(&self) -> Vec<(&RequestId, &CommandRequest)> {
        self.sent
            .iter()
            .filter_map(|sent| match sent {
                Sent::Command {
                    request_id,
                    request,
                    ..
                } => Some((request_id, request)),
                _ => None,
            })
            .collect()
    }
}

impl Connection for MockConnection {
    fn send_component_update(&mut self, entity_id: EntityId, update: ComponentUpdate) {
        self.sent.push(Sent::Update {
            entity: entity_id,
            update,
        });
    }

    fn send_create_entity_request(
        &mut self,
        entity_id: EntityId,
        components: Vec<ComponentData>,
    ) -> RequestId {
        let request_id = self.next_request();
        self.sent.push(Sent::Create {
            entity: entity_id,
            components,
            request_id,
        });
        request_id
    }

    fn send_delete_entity_request(&mut self, entity_id: EntityId) -> RequestId {
        let request_id = self.next_request();
        self.sent.push(Sent::Delete {
            entity: entity_id,
            request_id,
        });
        request_id
    }

    fn send_command_request(&mut self, entity_id: EntityId, request: CommandRequest) -> RequestId {
        let request_id = self.next_request();
        self.sent.push(Sent::Command {
            entity: entity_id,
            request,
            request_id,
        });
        request_id
    }

    fn send_command_response(&mut self, _request_id: RequestId, _response: CommandResponse) {}

    fn send_command_failure(&mut self, _request_id: RequestId, _message: &str) {}
}

#[derive(Default)]
pub struct MockResolver {
    pub refs: HashMap<ObjectHandle, ObjectRef>,
    pub dead: HashSet<ObjectHandle>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, object: ObjectHandle, entity: EntityId, offset: u32) {
        self.refs.insert(object, ObjectRef::entity(entity, offset));
    }
}

impl ObjectResolver for MockResolver {
    fn resolve(&mut self, object: ObjectHandle) -> ObjectRef {
        self.refs
            .get(&object)
            .copied()
            .unwrap_or(ObjectRef::Unresolved)
    }

    fn object_for_ref(&self, reference: &ObjectRef) -> Option<ObjectHandle> {
        self.refs
            .iter()
            .find(|(_, candidate)| *candidate == reference)
            .map(|(handle, _)| *handle)
    }

    fn is_alive(&self, object: ObjectHandle) -> bool {
        !self.dead.contains(&object)
    }
}

#[derive(Default)]
pub struct MockWorld {
    pub objects: HashMap<ObjectHandle, ObjectState>,
    pub channels: HashMap<ChannelId, EntityChannel>,
    pub object_channels: HashMap<ObjectHandle, ChannelId>,
}

impl MockWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_channel(&mut self, channel: EntityChannel, object: ObjectState) {
        self.object_channels.insert(channel.object, channel.id);
        self.objects.insert(channel.object, object);
        self.channels.insert(channel.id, channel);
    }
}

impl WorldView for MockWorld {
    fn object(&self, handle: ObjectHandle) -> Option<&ObjectState> {
        self.objects.get(&handle)
    }

    fn channel(&self, id: ChannelId) -> Option<&EntityChannel> {
        self.channels.get(&id)
    }

    fn channel_for_object(&self, object: ObjectHandle) -> Option<ChannelId> {
        self.object_channels.get(&object).copied()
    }
}

pub fn field(handle: u16, field_id: u32, ty: FieldType, group: PropertyGroup) -> FieldDescriptor {
    FieldDescriptor {
        handle,
        field_id,
        ty,
        group,
        always_interested: false,
    }
}

pub fn class_info(
    type_id: u32,
    parent: Option<u32>,
    radius: Option<f64>,
    data_component: u32,
    fields: Vec<FieldDescriptor>,
) -> ClassInfo {
    ClassInfo {
        type_id: TypeId(type_id),
        parent: parent.map(TypeId),
        class_path: format!("/Game/Type{type_id}"),
        checkout_radius: radius,
        server_only: false,
        singleton: false,
        schema_components: [Some(data_component), None, None],
        fields,
        rpcs: HashMap::new(),
    }
}

/// Registry with a Pawn root (radius 10, component 10000) and a VIPPawn
/// subclass (radius 50, component 10010), plus whichever extra classes the
/// caller registers.
pub fn pawn_registry(extra: Vec<ClassInfo>) -> ClassRegistry {
    let mut builder = ClassRegistry::builder()
        .register(class_info(
            1,
            None,
            Some(10.0),
            10000,
            vec![
                field(1, 1, FieldType::Int32, PropertyGroup::Data),
                field(2, 2, FieldType::Object, PropertyGroup::Data),
                field(3, 3, FieldType::Array(Box::new(FieldType::Int32)), PropertyGroup::Data),
            ],
        ))
        .register(class_info(2, Some(1), Some(50.0), 10010, Vec::new()));
    for class in extra {
        builder = builder.register(class);
    }
    builder.build().expect("registry builds")
}

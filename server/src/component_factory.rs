//! Translates an object's changed-property set into schema-encoded
//! component data and updates.
//!
//! One replication diff drives up to three physical components (Data,
//! OwnerOnly, Handover), so the change-list is walked once per group and
//! fields outside the current group are skipped. Object-reference fields
//! whose target has no stable id yet are the special case: a creation
//! snapshot writes them as an explicit null, a delta clears them instead of
//! sending a stale value, and in both cases the target lands in the
//! returned unresolved set for the outbox to watch.

use std::collections::{HashMap, HashSet};

use log::{trace, warn};

use shardspace_shared::{
    ComponentData, ComponentUpdate, FieldHandle, FieldId, ObjectRef, SchemaObject, SchemaValue,
};

use crate::{
    class_registry::ClassInfo,
    object::{FieldDescriptor, FieldType, FieldValue, ObjectHandle, ObjectState, PropertyGroup, StructValue},
    resolver::ObjectResolver,
};

/// Field handle → objects the field is waiting on.
pub type UnresolvedFields = HashMap<FieldHandle, HashSet<ObjectHandle>>;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Initial snapshot: every field present, unresolved refs as null.
    Snapshot,
    /// Delta: only changed fields, unresolved refs cleared instead.
    Delta,
}

/// An update the factory produced for one group, with the references it
/// could not yet express.
#[derive(Debug)]
pub struct OutgoingUpdate {
    pub group: PropertyGroup,
    pub update: ComponentUpdate,
    pub unresolved: UnresolvedFields,
}

pub struct ComponentFactory<'a> {
    resolver: &'a mut dyn ObjectResolver,
}

impl<'a> ComponentFactory<'a> {
    pub fn new(resolver: &'a mut dyn ObjectResolver) -> Self {
        Self { resolver }
    }

    /// Creation-time snapshots: one [`ComponentData`] per group the class
    /// declares a component for, every declared field included.
    pub fn create_component_data(
        &mut self,
        class: &ClassInfo,
        object: &ObjectState,
    ) -> Vec<(ComponentData, UnresolvedFields)> {
        let changes = class.initial_rep_change_state();
        let mut out = Vec::new();
        for group in PropertyGroup::ALL {
            let Some(component_id) = class.component_id(group) else {
                continue;
            };
            let mut data = ComponentData::new(component_id);
            let mut cleared = Vec::new();
            let unresolved = self.serialize_group(
                class,
                object,
                &changes.changed,
                group,
                Mode::Snapshot,
                &mut data.fields,
                &mut cleared,
            );
            out.push((data, unresolved));
        }
        out
    }

    /// Delta updates for the changed handles. Groups where nothing was
    /// written (no field writes, no events, no clears) are omitted
    /// entirely so the caller can skip transport.
    pub fn create_component_updates(
        &mut self,
        class: &ClassInfo,
        object: &ObjectState,
        changed: &[FieldHandle],
    ) -> Vec<OutgoingUpdate> {
        let mut out = Vec::new();
        for group in PropertyGroup::ALL {
            let Some(component_id) = class.component_id(group) else {
                continue;
            };
            let mut update = ComponentUpdate::new(component_id);
            let mut cleared = Vec::new();
            let unresolved = self.serialize_group(
                class,
                object,
                changed,
                group,
                Mode::Delta,
                &mut update.fields,
                &mut cleared,
            );
            for field_id in cleared {
                update.add_cleared(field_id);
            }
            if update.is_empty() {
                continue;
            }
            out.push(OutgoingUpdate {
                group,
                update,
                unresolved,
            });
        }
        out
    }

    /// Serializes RPC arguments as fields 1..=N of a payload object.
    /// Unresolved references encode as null (the receiver has no prior
    /// state), and their handles are returned so the caller can park the
    /// call until they resolve.
    pub fn serialize_rpc_payload(
        &mut self,
        args: &[FieldValue],
    ) -> (SchemaObject, HashSet<ObjectHandle>) {
        let mut payload = SchemaObject::new();
        let mut waiting_on = HashSet::new();
        for (index, arg) in args.iter().enumerate() {
            let field_id = (index + 1) as FieldId;
            match arg {
                FieldValue::Array(elements) => {
                    for element in elements {
                        if let Some(encoded) =
                            self.encode_value(None, element, Mode::Snapshot, &mut waiting_on)
                        {
                            payload.add(field_id, encoded);
                        }
                    }
                }
                single => {
                    if let Some(encoded) =
                        self.encode_value(None, single, Mode::Snapshot, &mut waiting_on)
                    {
                        payload.add(field_id, encoded);
                    }
                }
            }
        }
        (payload, waiting_on)
    }

    fn serialize_group(
        &mut self,
        class: &ClassInfo,
        object: &ObjectState,
        changed: &[FieldHandle],
        group: PropertyGroup,
        mode: Mode,
        fields: &mut SchemaObject,
        cleared: &mut Vec<FieldId>,
    ) -> UnresolvedFields {
        let mut unresolved = UnresolvedFields::new();
        for handle in changed {
            let Some(descriptor) = class.descriptor_for_handle(*handle) else {
                warn!(
                    "Class {} has no field descriptor for changed handle {handle}; skipping",
                    class.class_path
                );
                continue;
            };
            if descriptor.group != group {
                continue;
            }
            let Some(value) = object.field(*handle) else {
                trace!(
                    "Object has no value for field handle {handle} on {}; skipping",
                    class.class_path
                );
                continue;
            };
            self.serialize_field(descriptor, value, mode, fields, cleared, &mut unresolved);
        }
        unresolved
    }

    fn serialize_field(
        &mut self,
        descriptor: &FieldDescriptor,
        value: &FieldValue,
        mode: Mode,
        fields: &mut SchemaObject,
        cleared: &mut Vec<FieldId>,
        unresolved: &mut UnresolvedFields,
    ) {
        let mut waiting_on = HashSet::new();
        let mut writes = Vec::new();

        match value {
            FieldValue::Array(elements) => {
                if elements.is_empty() {
                    // Receivers must distinguish "emptied" from "untouched".
                    if mode == Mode::Delta {
                        cleared.push(descriptor.field_id);
                    }
                } else {
                    let element_ty = match &descriptor.ty {
                        FieldType::Array(inner) => inner.as_ref(),
                        other => other,
                    };
                    for element in elements {
                        if let Some(encoded) =
                            self.encode_value(Some(element_ty), element, mode, &mut waiting_on)
                        {
                            writes.push(encoded);
                        }
                    }
                }
            }
            single => {
                if let Some(encoded) =
                    self.encode_value(Some(&descriptor.ty), single, mode, &mut waiting_on)
                {
                    writes.push(encoded);
                }
            }
        }

        if mode == Mode::Delta && !waiting_on.is_empty() {
            // Never deliver a partially-resolved value; clear now, resend
            // the whole field once the outbox reports resolution.
            cleared.push(descriptor.field_id);
        } else {
            for write in writes {
                fields.add(descriptor.field_id, write);
            }
        }

        if !waiting_on.is_empty() {
            unresolved
                .entry(descriptor.handle)
                .or_default()
                .extend(waiting_on);
        }
    }

    /// `ty` is the declared wire shape when known; RPC arguments and struct
    /// members dispatch on the value alone.
    fn encode_value(
        &mut self,
        ty: Option<&FieldType>,
        value: &FieldValue,
        mode: Mode,
        waiting_on: &mut HashSet<ObjectHandle>,
    ) -> Option<SchemaValue> {
        match value {
            FieldValue::Bool(value) => Some(SchemaValue::Bool(*value)),
            FieldValue::Int8(value) => Some(SchemaValue::Int32(i32::from(*value))),
            FieldValue::Int16(value) => Some(SchemaValue::Int32(i32::from(*value))),
            FieldValue::Int32(value) => Some(SchemaValue::Int32(*value)),
            FieldValue::Int64(value) => Some(SchemaValue::Int64(*value)),
            FieldValue::Uint8(value) => Some(SchemaValue::Uint32(u32::from(*value))),
            FieldValue::Uint16(value) => Some(SchemaValue::Uint32(u32::from(*value))),
            FieldValue::Uint32(value) => Some(SchemaValue::Uint32(*value)),
            FieldValue::Uint64(value) => Some(SchemaValue::Uint64(*value)),
            FieldValue::Float(value) => Some(SchemaValue::Float(*value)),
            FieldValue::Double(value) => Some(SchemaValue::Double(*value)),
            FieldValue::String(value) => Some(SchemaValue::Bytes(value.as_bytes().to_vec())),
            FieldValue::Struct(StructValue::Native(bytes)) => {
                Some(SchemaValue::Bytes(bytes.clone()))
            }
            FieldValue::Struct(StructValue::Scripted(members)) => {
                let mut nested = SchemaObject::new();
                for (index, member) in members.iter().enumerate() {
                    let member_id = (index + 1) as FieldId;
                    if let Some(encoded) = self.encode_value(None, member, mode, waiting_on) {
                        nested.add(member_id, encoded);
                    }
                }
                Some(SchemaValue::Object(nested))
            }
            FieldValue::Enum(value) => {
                let wide = matches!(ty, Some(FieldType::Enum { wide: true }));
                if wide || *value > u64::from(u32::MAX) {
                    Some(SchemaValue::Uint64(*value))
                } else {
                    Some(SchemaValue::Uint32(*value as u32))
                }
            }
            FieldValue::Array(elements) => {
                // Nested arrays flatten into a sub-object, one element per
                // repeated write under field 1.
                let element_ty = match ty {
                    Some(FieldType::Array(inner)) => Some(inner.as_ref()),
                    other => other,
                };
                let mut nested = SchemaObject::new();
                for element in elements {
                    if let Some(encoded) = self.encode_value(element_ty, element, mode, waiting_on) {
                        nested.add(1, encoded);
                    }
                }
                Some(SchemaValue::Object(nested))
            }
            FieldValue::Object(None) => Some(SchemaValue::NullRef),
            FieldValue::Object(Some(handle)) => match self.resolver.resolve(*handle) {
                ObjectRef::Entity { entity, offset } => Some(SchemaValue::Ref { entity, offset }),
                ObjectRef::Null => Some(SchemaValue::NullRef),
                ObjectRef::Unresolved => {
                    waiting_on.insert(*handle);
                    match mode {
                        Mode::Snapshot => Some(SchemaValue::NullRef),
                        Mode::Delta => None,
                    }
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use shardspace_shared::ObjectRef;

    use super::*;
    use crate::class_registry::TypeId;

    struct FixedResolver {
        refs: HashMap<ObjectHandle, ObjectRef>,
    }

    impl ObjectResolver for FixedResolver {
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

        fn is_alive(&self, _object: ObjectHandle) -> bool {
            true
        }
    }

    fn test_class() -> ClassInfo {
        ClassInfo {
            type_id: TypeId(1),
            parent: None,
            class_path: "/Game/Test".to_string(),
            checkout_radius: Some(10.0),
            server_only: false,
            singleton: false,
            schema_components: [Some(10000), None, Some(10001)],
            fields: vec![
                FieldDescriptor {
                    handle: 1,
                    field_id: 1,
                    ty: FieldType::Int32,
                    group: PropertyGroup::Data,
                    always_interested: false,
                },
                FieldDescriptor {
                    handle: 2,
                    field_id: 2,
                    ty: FieldType::Object,
                    group: PropertyGroup::Data,
                    always_interested: false,
                },
                FieldDescriptor {
                    handle: 3,
                    field_id: 3,
                    ty: FieldType::Array(Box::new(FieldType::Int32)),
                    group: PropertyGroup::Data,
                    always_interested: false,
                },
                FieldDescriptor {
                    handle: 4,
                    field_id: 1,
                    ty: FieldType::Float,
                    group: PropertyGroup::Handover,
                    always_interested: false,
                },
            ],
            rpcs: HashMap::new(),
        }
    }

    fn test_object() -> ObjectState {
        let mut object = ObjectState::new(TypeId(1));
        object.set_field(1, FieldValue::Int32(7));
        object.set_field(2, FieldValue::Object(Some(ObjectHandle(99))));
        object.set_field(3, FieldValue::Array(vec![]));
        object.set_field(4, FieldValue::Float(1.5));
        object
    }

    #[test]
    fn unresolved_ref_is_null_in_snapshot_and_tracked() {
        let mut resolver = FixedResolver {
            refs: HashMap::new(),
        };
        let mut factory = ComponentFactory::new(&mut resolver);
        let class = test_class();
        let object = test_object();

        let datas = factory.create_component_data(&class, &object);
        let (data, unresolved) = &datas[0];
        assert_eq!(data.component_id, 10000);
        assert_eq!(data.fields.get_object_ref(2), Ok(ObjectRef::Null));
        assert_eq!(
            unresolved.get(&2),
            Some(&HashSet::from([ObjectHandle(99)]))
        );
    }

    #[test]
    fn unresolved_ref_is_cleared_in_delta() {
        let mut resolver = FixedResolver {
            refs: HashMap::new(),
        };
        let mut factory = ComponentFactory::new(&mut resolver);
        let class = test_class();
        let object = test_object();

        let updates = factory.create_component_updates(&class, &object, &[2]);
        assert_eq!(updates.len(), 1);
        let outgoing = &updates[0];
        assert_eq!(outgoing.update.fields.count(2), 0);
        assert_eq!(outgoing.update.cleared, vec![2]);
        assert!(outgoing.unresolved.contains_key(&2));
    }

    #[test]
    fn resolved_ref_is_written_concretely() {
        let mut resolver = FixedResolver {
            refs: HashMap::from([(ObjectHandle(99), ObjectRef::entity(42, 0))]),
        };
        let mut factory = ComponentFactory::new(&mut resolver);
        let class = test_class();
        let object = test_object();

        let updates = factory.create_component_updates(&class, &object, &[2]);
        assert_eq!(
            updates[0].update.fields.get_object_ref(2),
            Ok(ObjectRef::entity(42, 0))
        );
        assert!(updates[0].unresolved.is_empty());
    }

    #[test]
    fn empty_array_clears_rather_than_omits() {
        let mut resolver = FixedResolver {
            refs: HashMap::new(),
        };
        let mut factory = ComponentFactory::new(&mut resolver);
        let class = test_class();
        let object = test_object();

        let updates = factory.create_component_updates(&class, &object, &[3]);
        assert_eq!(updates[0].update.cleared, vec![3]);
        assert_eq!(updates[0].update.fields.count(3), 0);
    }

    #[test]
    fn untouched_group_produces_no_update() {
        let mut resolver = FixedResolver {
            refs: HashMap::new(),
        };
        let mut factory = ComponentFactory::new(&mut resolver);
        let class = test_class();
        let object = test_object();

        // Handle 1 is Data-group only, so the Handover walk writes nothing.
        let updates = factory.create_component_updates(&class, &object, &[1]);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].group, PropertyGroup::Data);
        assert_eq!(updates[0].update.fields.get_int32(1), Ok(7));
    }

    #[test]
    fn handover_fields_land_on_the_handover_component() {
        let mut resolver = FixedResolver {
            refs: HashMap::new(),
        };
        let mut factory = ComponentFactory::new(&mut resolver);
        let class = test_class();
        let object = test_object();

        let updates = factory.create_component_updates(&class, &object, &[1, 4]);
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[1].group, PropertyGroup::Handover);
        assert_eq!(updates[1].update.component_id, 10001);
    }
}

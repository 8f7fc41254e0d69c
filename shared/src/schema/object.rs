use std::collections::BTreeMap;

use crate::{
    object_ref::ObjectRef,
    types::{EntityId, FieldId, ObjectOffset},
};

use super::error::SchemaError;

/// A single wire-level field write: a typed tag plus value. Arrays are
/// expressed as repeated writes under one field id; object references are
/// either a concrete (entity, offset) pair or a null sentinel, which is
/// distinct from the field being absent.
#[derive(Clone, Debug, PartialEq)]
pub enum SchemaValue {
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Uint32(u32),
    Uint64(u64),
    Float(f32),
    Double(f64),
    Bytes(Vec<u8>),
    EntityId(EntityId),
    Ref {
        entity: EntityId,
        offset: ObjectOffset,
    },
    NullRef,
    Object(SchemaObject),
}

impl SchemaValue {
    fn type_name(&self) -> &'static str {
        match self {
            SchemaValue::Bool(_) => "bool",
            SchemaValue::Int32(_) => "int32",
            SchemaValue::Int64(_) => "int64",
            SchemaValue::Uint32(_) => "uint32",
            SchemaValue::Uint64(_) => "uint64",
            SchemaValue::Float(_) => "float",
            SchemaValue::Double(_) => "double",
            SchemaValue::Bytes(_) => "bytes",
            SchemaValue::EntityId(_) => "entity_id",
            SchemaValue::Ref { .. } | SchemaValue::NullRef => "object_ref",
            SchemaValue::Object(_) => "object",
        }
    }
}

/// An ordered collection of field writes. Fields are kept sorted by field id
/// so that delta updates are applied in the schema's fixed field order,
/// independent of the order the serializer visited them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SchemaObject {
    fields: BTreeMap<FieldId, Vec<SchemaValue>>,
}

impl SchemaObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field_id: FieldId, value: SchemaValue) {
        self.fields.entry(field_id).or_default().push(value);
    }

    pub fn add_bool(&mut self, field_id: FieldId, value: bool) {
        self.add(field_id, SchemaValue::Bool(value));
    }

    pub fn add_int32(&mut self, field_id: FieldId, value: i32) {
        self.add(field_id, SchemaValue::Int32(value));
    }

    pub fn add_int64(&mut self, field_id: FieldId, value: i64) {
        self.add(field_id, SchemaValue::Int64(value));
    }

    pub fn add_uint32(&mut self, field_id: FieldId, value: u32) {
        self.add(field_id, SchemaValue::Uint32(value));
    }

    pub fn add_uint64(&mut self, field_id: FieldId, value: u64) {
        self.add(field_id, SchemaValue::Uint64(value));
    }

    pub fn add_float(&mut self, field_id: FieldId, value: f32) {
        self.add(field_id, SchemaValue::Float(value));
    }

    pub fn add_double(&mut self, field_id: FieldId, value: f64) {
        self.add(field_id, SchemaValue::Double(value));
    }

    pub fn add_bytes(&mut self, field_id: FieldId, value: Vec<u8>) {
        self.add(field_id, SchemaValue::Bytes(value));
    }

    /// Strings go over the wire as length-prefixed bytes.
    pub fn add_string(&mut self, field_id: FieldId, value: &str) {
        self.add(field_id, SchemaValue::Bytes(value.as_bytes().to_vec()));
    }

    pub fn add_entity_id(&mut self, field_id: FieldId, value: EntityId) {
        self.add(field_id, SchemaValue::EntityId(value));
    }

    /// Writes an object reference. Unresolved references must never reach the
    /// wire; the serializer downgrades them to null before calling this.
    pub fn add_object_ref(&mut self, field_id: FieldId, value: ObjectRef) {
        match value {
            ObjectRef::Entity { entity, offset } => {
                self.add(field_id, SchemaValue::Ref { entity, offset })
            }
            ObjectRef::Null => self.add(field_id, SchemaValue::NullRef),
            ObjectRef::Unresolved => {
                panic!("Unresolved ObjectRef written to schema. The serializer must downgrade to Null.")
            }
        }
    }

    /// Appends a nested object under `field_id` and returns it for filling.
    pub fn add_object(&mut self, field_id: FieldId) -> &mut SchemaObject {
        self.add(field_id, SchemaValue::Object(SchemaObject::new()));
        match self.fields.get_mut(&field_id).unwrap().last_mut().unwrap() {
            SchemaValue::Object(object) => object,
            _ => unreachable!(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_ids(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.fields.keys().copied()
    }

    pub fn count(&self, field_id: FieldId) -> usize {
        self.fields.get(&field_id).map_or(0, Vec::len)
    }

    /// First value written for the field, if any.
    pub fn get(&self, field_id: FieldId) -> Option<&SchemaValue> {
        self.fields.get(&field_id).and_then(|values| values.first())
    }

    pub fn get_all(&self, field_id: FieldId) -> &[SchemaValue] {
        self.fields.get(&field_id).map_or(&[], Vec::as_slice)
    }

    pub fn get_bool(&self, field_id: FieldId) -> Result<bool, SchemaError> {
        match self.get_present(field_id)? {
            SchemaValue::Bool(value) => Ok(*value),
            other => Err(Self::wrong_type(field_id, "bool", other)),
        }
    }

    pub fn get_uint32(&self, field_id: FieldId) -> Result<u32, SchemaError> {
        match self.get_present(field_id)? {
            SchemaValue::Uint32(value) => Ok(*value),
            other => Err(Self::wrong_type(field_id, "uint32", other)),
        }
    }

    pub fn get_int32(&self, field_id: FieldId) -> Result<i32, SchemaError> {
        match self.get_present(field_id)? {
            SchemaValue::Int32(value) => Ok(*value),
            other => Err(Self::wrong_type(field_id, "int32", other)),
        }
    }

    pub fn get_bytes(&self, field_id: FieldId) -> Result<&[u8], SchemaError> {
        match self.get_present(field_id)? {
            SchemaValue::Bytes(value) => Ok(value),
            other => Err(Self::wrong_type(field_id, "bytes", other)),
        }
    }

    pub fn get_entity_id(&self, field_id: FieldId) -> Result<EntityId, SchemaError> {
        match self.get_present(field_id)? {
            SchemaValue::EntityId(value) => Ok(*value),
            other => Err(Self::wrong_type(field_id, "entity_id", other)),
        }
    }

    pub fn get_object_ref(&self, field_id: FieldId) -> Result<ObjectRef, SchemaError> {
        match self.get_present(field_id)? {
            SchemaValue::Ref { entity, offset } => Ok(ObjectRef::entity(*entity, *offset)),
            SchemaValue::NullRef => Ok(ObjectRef::Null),
            other => Err(Self::wrong_type(field_id, "object_ref", other)),
        }
    }

    fn get_present(&self, field_id: FieldId) -> Result<&SchemaValue, SchemaError> {
        self.get(field_id)
            .ok_or(SchemaError::FieldMissing { field_id })
    }

    fn wrong_type(field_id: FieldId, expected: &'static str, found: &SchemaValue) -> SchemaError {
        SchemaError::WrongType {
            field_id,
            expected,
            found: found.type_name(),
        }
    }
}

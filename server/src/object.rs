//! The engine-facing object model: opaque object handles, typed field
//! values, and the per-class field layout the serializer walks.

use std::collections::HashMap;

use shardspace_shared::{FieldHandle, FieldId};

use crate::class_registry::TypeId;

/// Opaque identifier for a live engine object (actor or subobject). The
/// engine side owns the mapping to its real objects; this layer only ever
/// stores and compares handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectHandle(pub u64);

/// Which wire component a replicated field is carried on.
///
/// One change-list drives up to three physical components, so the serializer
/// walks the list once per group and skips fields outside the current one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyGroup {
    /// Replicated to every interested worker.
    Data,
    /// Replicated only to the owning client.
    OwnerOnly,
    /// Transferred between servers on authority change, never to clients.
    Handover,
}

impl PropertyGroup {
    pub const ALL: [PropertyGroup; 3] = [
        PropertyGroup::Data,
        PropertyGroup::OwnerOnly,
        PropertyGroup::Handover,
    ];

    pub fn index(self) -> usize {
        match self {
            PropertyGroup::Data => 0,
            PropertyGroup::OwnerOnly => 1,
            PropertyGroup::Handover => 2,
        }
    }
}

/// Wire shape of a field, as declared by the schema generator.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float,
    Double,
    /// Names, strings and text all encode as length-prefixed bytes.
    String,
    /// `native` structs declare their own binary serialization and arrive
    /// pre-encoded; scripted structs recurse field by field.
    Struct { native: bool },
    /// Narrow enums inline as uint32; wide enums carry the full underlying
    /// 64-bit value.
    Enum { wide: bool },
    Array(Box<FieldType>),
    Object,
}

/// A field's current value, read out of the engine object by the property
/// accessor.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Float(f32),
    Double(f64),
    String(String),
    Struct(StructValue),
    Enum(u64),
    Array(Vec<FieldValue>),
    Object(Option<ObjectHandle>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum StructValue {
    /// Custom binary serialization, already encoded engine-side.
    Native(Vec<u8>),
    /// Plain struct; members are written as sub-fields 1..=N in order.
    Scripted(Vec<FieldValue>),
}

/// Layout of one replicated field within a class.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDescriptor {
    pub handle: FieldHandle,
    pub field_id: FieldId,
    pub ty: FieldType,
    pub group: PropertyGroup,
    /// Object references in this field pull their targets into the owning
    /// worker's interest.
    pub always_interested: bool,
}

/// Snapshot of a live object's replicated fields, keyed by field handle.
#[derive(Clone, Debug)]
pub struct ObjectState {
    pub class: TypeId,
    fields: HashMap<FieldHandle, FieldValue>,
}

impl ObjectState {
    pub fn new(class: TypeId) -> Self {
        Self {
            class,
            fields: HashMap::new(),
        }
    }

    pub fn set_field(&mut self, handle: FieldHandle, value: FieldValue) {
        self.fields.insert(handle, value);
    }

    pub fn field(&self, handle: FieldHandle) -> Option<&FieldValue> {
        self.fields.get(&handle)
    }
}

/// The changed-handle list produced by the engine's replication diff,
/// in handle order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RepChangeState {
    pub changed: Vec<FieldHandle>,
}

impl RepChangeState {
    pub fn new(mut changed: Vec<FieldHandle>) -> Self {
        changed.sort_unstable();
        changed.dedup();
        Self { changed }
    }

    /// Every field handle a class declares; used for creation snapshots.
    pub fn initial(descriptors: &[FieldDescriptor]) -> Self {
        Self::new(descriptors.iter().map(|descriptor| descriptor.handle).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }
}

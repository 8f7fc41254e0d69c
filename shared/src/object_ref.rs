use crate::types::{EntityId, ObjectOffset};

/// A reference to another entity or subobject.
///
/// A reference is either null, unresolved (the target exists locally but has
/// no assigned entity id yet), or a concrete (entity, offset) pair. Exactly
/// one of these states holds at a time; unresolved references are the reason
/// the sender's outbox exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectRef {
    Null,
    Unresolved,
    Entity {
        entity: EntityId,
        offset: ObjectOffset,
    },
}

impl ObjectRef {
    pub fn entity(entity: EntityId, offset: ObjectOffset) -> Self {
        ObjectRef::Entity { entity, offset }
    }

    /// True for concrete (entity, offset) references only.
    pub fn is_resolved(&self) -> bool {
        matches!(self, ObjectRef::Entity { .. })
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ObjectRef::Null)
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, ObjectRef::Unresolved)
    }

    pub fn entity_id(&self) -> Option<EntityId> {
        match self {
            ObjectRef::Entity { entity, .. } => Some(*entity),
            _ => None,
        }
    }

    pub fn offset(&self) -> Option<ObjectOffset> {
        match self {
            ObjectRef::Entity { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_state_holds() {
        let null = ObjectRef::Null;
        let unresolved = ObjectRef::Unresolved;
        let concrete = ObjectRef::entity(7, 2);

        assert!(null.is_null() && !null.is_unresolved() && !null.is_resolved());
        assert!(unresolved.is_unresolved() && !unresolved.is_resolved());
        assert!(concrete.is_resolved());
        assert_eq!(concrete.entity_id(), Some(7));
        assert_eq!(concrete.offset(), Some(2));
        assert_eq!(null.entity_id(), None);
    }
}

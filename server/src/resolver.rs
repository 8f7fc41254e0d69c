use shardspace_shared::ObjectRef;

use crate::object::ObjectHandle;

/// Maps between live objects and their stable references.
///
/// `resolve` may have side effects: a load-time object with a stable name
/// can be assigned its reference on first lookup, and a dynamic object can
/// be registered for id assignment. An [`ObjectRef::Unresolved`] result is
/// an everyday outcome, not an error; the sender parks the dependent
/// operation and retries once [`crate::sender::Sender::resolve_object`] is
/// called for the handle.
pub trait ObjectResolver {
    /// Best-effort resolution of `object` to a stable reference.
    fn resolve(&mut self, object: ObjectHandle) -> ObjectRef;

    /// The live object a resolved reference points at, or `None` if it has
    /// been destroyed or never checked out.
    fn object_for_ref(&self, reference: &ObjectRef) -> Option<ObjectHandle>;

    /// Liveness test used before touching any parked outbox entry.
    fn is_alive(&self, object: ObjectHandle) -> bool;
}

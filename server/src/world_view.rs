use crate::{
    channel::{ChannelId, EntityChannel},
    object::{ObjectHandle, ObjectState},
};

/// Read-only window onto the engine's replicated world: live objects and
/// the channels binding them to entities. A `None` from any lookup means
/// the object or channel has been torn down; callers drop the operation
/// rather than erroring.
pub trait WorldView {
    fn object(&self, handle: ObjectHandle) -> Option<&ObjectState>;

    fn channel(&self, id: ChannelId) -> Option<&EntityChannel>;

    /// The channel replicating `object` (for a subobject, the channel of
    /// its owning root object).
    fn channel_for_object(&self, object: ObjectHandle) -> Option<ChannelId>;
}

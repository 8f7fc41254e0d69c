/// Stable cross-worker identifier for a simulated entity.
pub type EntityId = i64;
/// Identifies a schema component.
pub type ComponentId = u32;
/// Identifies a field within a schema component.
pub type FieldId = u32;
/// Identifies a replicated property within a class layout. Handles are
/// 1-based; 0 is reserved as a terminator by the engine-side changelists.
pub type FieldHandle = u16;
/// Identifies an in-flight request on the worker connection.
pub type RequestId = u32;
/// Identifies a command within a component's command list.
pub type CommandIndex = u32;
/// Assigned to a reliable RPC at first-send time; restores original call
/// order when a batch of timed-out RPCs is retried.
pub type RetryIndex = u32;
/// Disambiguates subobjects within an entity.
pub type ObjectOffset = u32;

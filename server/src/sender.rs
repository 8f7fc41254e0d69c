//! The outgoing-operation sender: entity creation, component update
//! delivery, RPC dispatch, and all the deferral bookkeeping around
//! unresolved references, missing authority, and command timeouts.
//!
//! Nothing here blocks. Every "cannot send yet" outcome is recorded as
//! data (an outbox entry, an authority queue entry, a parked RPC) and the
//! method returns; the corresponding notification (`resolve_object`,
//! `on_authority_gained`, `on_command_response`) releases it later on the
//! same tick thread.

use std::{
    collections::HashMap,
    time::Duration,
};

use log::{error, info, trace, warn};

use shardspace_shared::{
    attribute_set,
    constants::{
        command_retry_wait_time, CLEAR_RPCS_ON_ENTITY_CREATION_COMMAND_INDEX,
        CLIENT_RPC_ENDPOINT_COMPONENT_ID, DEBUG_METRICS_COMPONENT_ID,
        ENTITY_ACL_COMPONENT_ID, ENTITY_METADATA_COMPONENT_ID, HEARTBEAT_COMPONENT_ID,
        INTEREST_COMPONENT_ID, MAX_COMMAND_ATTEMPTS, MULTICAST_RPCS_COMPONENT_ID,
        NOT_STREAMED_COMPONENT_ID, PACKED_RPC_ENTITY_ID,
        POSITION_COMPONENT_ID, RPCS_ON_ENTITY_CREATION_COMPONENT_ID,
        RPCS_ON_ENTITY_CREATION_DATA_ID, RPC_ENDPOINT_COMMAND_INDEX, RPC_ENDPOINT_EVENT_ID,
        RPC_ENDPOINT_PACKED_EVENT_ID, RPC_PAYLOAD_DATA_ID, RPC_PAYLOAD_INDEX_ID,
        RPC_PAYLOAD_OFFSET_ID, SERVER_RPC_ENDPOINT_COMPONENT_ID,
    },
    CommandRequest, ComponentData, ComponentId, ComponentUpdate, Coordinates, EntityAcl,
    EntityId, EntityMetadata, FieldHandle, Heartbeat, Metadata, ObjectOffset, ObjectRef,
    Persistence, Position, RequestId, RetryIndex, SchemaObject, SchemaValue, Singleton,
    SpatialSettings, SpawnData, WorkerRequirementSet,
};

use crate::{
    authority::AuthorityView,
    channel::ChannelId,
    class_registry::{ClassInfo, ClassRegistry},
    component_factory::ComponentFactory,
    connection::{CommandResponseCode, Connection},
    error::SenderError,
    interest_factory::InterestFactory,
    object::{FieldValue, ObjectHandle, PropertyGroup},
    outbox::{Outbox, OutboxKey},
    resolver::ObjectResolver,
    rpc::{PendingRpcParams, ReliableRpcForRetry, RpcInfo, RpcKind},
    world_view::WorldView,
};

/// Everything a sender operation needs from its collaborators, borrowed
/// for the duration of one call.
pub struct SenderContext<'a> {
    pub registry: &'a ClassRegistry,
    pub settings: &'a SpatialSettings,
    pub world: &'a dyn WorldView,
    pub resolver: &'a mut dyn ObjectResolver,
    pub authority: &'a AuthorityView,
    pub connection: &'a mut dyn Connection,
}

/// Inputs assembled by the engine side when an entity is first created.
#[derive(Clone, Debug)]
pub struct CreationParams {
    pub position: Coordinates,
    pub spawn_data: SpawnData,
    pub stably_named_path: Option<String>,
    /// The streamed sublevel the actor lives in; `None` for the
    /// persistent level.
    pub level_path: Option<String>,
    pub net_startup: bool,
    pub persistent: bool,
}

/// One unreliable RPC accumulated for per-controller packing.
struct PackedRpc {
    target_entity: EntityId,
    offset: ObjectOffset,
    rpc_index: u32,
    payload: SchemaObject,
}

/// Bookkeeping for an in-flight create-entity request.
struct PendingCreate {
    channel: ChannelId,
    entity_id: EntityId,
    /// Whether the creation payload carried stashed RPCs that must be
    /// cleared from the entity's snapshot once it exists.
    clear_rpcs: bool,
}

#[derive(Default)]
pub struct Sender {
    rep_outbox: Outbox,
    handover_outbox: Outbox,
    /// RPCs parked on an unresolved target or argument, keyed by the
    /// object being waited on.
    outgoing_rpcs: HashMap<ObjectHandle, Vec<PendingRpcParams>>,
    /// Timed-out reliable RPCs awaiting the next retry flush.
    retry_rpcs: Vec<ReliableRpcForRetry>,
    /// In-flight reliable RPCs keyed by their command request id.
    pending_reliable: HashMap<RequestId, ReliableRpcForRetry>,
    updates_queued_until_authority: HashMap<EntityId, Vec<ComponentUpdate>>,
    packed_rpcs: HashMap<EntityId, Vec<PackedRpc>>,
    /// Reliable RPC payloads stashed while their target entity's create
    /// request is still in flight; drained into the creation payload.
    rpcs_on_entity_creation: HashMap<ChannelId, Vec<SchemaObject>>,
    pending_create_requests: HashMap<RequestId, PendingCreate>,
    next_retry_index: RetryIndex,
}

impl Sender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes the changed fields of a channel's object and sends the
    /// resulting component updates, parking whatever cannot go out yet.
    /// If the channel's interest is flagged dirty, a regenerated Interest
    /// update is appended; the engine clears the flag after this returns.
    pub fn send_component_updates(
        &mut self,
        ctx: &mut SenderContext<'_>,
        channel_id: ChannelId,
        changed: &[FieldHandle],
    ) -> Result<(), SenderError> {
        let channel = ctx
            .world
            .channel(channel_id)
            .ok_or(SenderError::UnknownChannel { channel: channel_id })?;
        let object = ctx
            .world
            .object(channel.object)
            .ok_or(SenderError::ObjectGone {
                object: channel.object,
            })?;
        let class = ctx
            .registry
            .class(object.class)
            .ok_or(SenderError::MissingClassInfo {
                type_id: object.class,
            })?;

        // A rewritten field supersedes whatever earlier write is still
        // parked for it, even when the new value has nothing unresolved.
        for field in changed {
            let key = OutboxKey {
                channel: channel_id,
                object: channel.object,
                field: *field,
            };
            self.rep_outbox.reset(&key);
            self.handover_outbox.reset(&key);
        }

        let mut factory = ComponentFactory::new(ctx.resolver);
        let outgoing = factory.create_component_updates(class, object, changed);
        let entity_id = channel.entity_id;

        for item in outgoing {
            let outbox = match item.group {
                PropertyGroup::Handover => &mut self.handover_outbox,
                _ => &mut self.rep_outbox,
            };
            for (field, waiting_on) in item.unresolved {
                outbox.queue(
                    OutboxKey {
                        channel: channel_id,
                        object: channel.object,
                        field,
                    },
                    waiting_on,
                );
            }
            self.send_or_queue(ctx.authority, ctx.connection, entity_id, item.update);
        }

        if channel.interest_dirty && ctx.settings.query_based_interest {
            let interest = InterestFactory::new(ctx.registry, ctx.settings)
                .create_interest(class, channel, object, ctx.resolver);
            self.send_or_queue(ctx.authority, ctx.connection, entity_id, interest.to_update());
        }

        Ok(())
    }

    /// Assembles the full creation payload for a channel's entity and
    /// issues the create request. Unresolved fields are parked exactly as
    /// for steady-state updates, keyed off the new channel.
    pub fn create_entity(
        &mut self,
        ctx: &mut SenderContext<'_>,
        channel_id: ChannelId,
        params: &CreationParams,
    ) -> Result<RequestId, SenderError> {
        let channel = ctx
            .world
            .channel(channel_id)
            .ok_or(SenderError::UnknownChannel { channel: channel_id })?;
        let object = ctx
            .world
            .object(channel.object)
            .ok_or(SenderError::ObjectGone {
                object: channel.object,
            })?;
        let class = ctx
            .registry
            .class(object.class)
            .ok_or(SenderError::MissingClassInfo {
                type_id: object.class,
            })?;
        let owner_attribute = channel
            .owning_client
            .as_ref()
            .map(|client| client.worker_attribute.clone());

        let mut components = vec![
            Position::new(params.position).to_data(),
            Metadata::new(&class.class_path).to_data(),
            params.spawn_data.to_data(),
            EntityMetadata {
                stably_named_path: params.stably_named_path.clone(),
                owner_worker_attribute: owner_attribute.clone(),
                class_path: class.class_path.clone(),
                net_startup: params.net_startup,
            }
            .to_data(),
            entity_acl(ctx.settings, class, owner_attribute.as_deref()).to_data(),
            ComponentData::new(SERVER_RPC_ENDPOINT_COMPONENT_ID),
            ComponentData::new(CLIENT_RPC_ENDPOINT_COMPONENT_ID),
            ComponentData::new(MULTICAST_RPCS_COMPONENT_ID),
        ];
        if params.persistent {
            components.push(Persistence.to_data());
        }
        if class.singleton {
            components.push(Singleton.to_data());
        }
        if channel.owning_client.is_some() {
            components.push(Heartbeat.to_data());
            components.push(ComponentData::new(DEBUG_METRICS_COMPONENT_ID));
        }

        match &params.level_path {
            None => components.push(ComponentData::new(NOT_STREAMED_COMPONENT_ID)),
            Some(path) => match ctx.registry.component_id_for_level(path) {
                Some(component_id) => components.push(ComponentData::new(component_id)),
                None => warn!(
                    "No level component registered for {path}; entity {} gets none",
                    channel.entity_id
                ),
            },
        }

        let interest = InterestFactory::new(ctx.registry, ctx.settings)
            .create_interest(class, channel, object, ctx.resolver);
        components.push(interest.to_data());

        let stashed_rpcs = self
            .rpcs_on_entity_creation
            .remove(&channel_id)
            .unwrap_or_default();
        let clear_rpcs = !stashed_rpcs.is_empty();
        let mut creation_rpcs = ComponentData::new(RPCS_ON_ENTITY_CREATION_COMPONENT_ID);
        for payload in stashed_rpcs {
            creation_rpcs
                .fields
                .add(RPCS_ON_ENTITY_CREATION_DATA_ID, SchemaValue::Object(payload));
        }
        components.push(creation_rpcs);

        let mut factory = ComponentFactory::new(ctx.resolver);
        for (data, unresolved) in factory.create_component_data(class, object) {
            let is_handover =
                class.component_id(PropertyGroup::Handover) == Some(data.component_id);
            let outbox = if is_handover {
                &mut self.handover_outbox
            } else {
                &mut self.rep_outbox
            };
            for (field, waiting_on) in unresolved {
                outbox.queue(
                    OutboxKey {
                        channel: channel_id,
                        object: channel.object,
                        field,
                    },
                    waiting_on,
                );
            }
            components.push(data);
        }

        let request_id = ctx
            .connection
            .send_create_entity_request(channel.entity_id, components);
        self.pending_create_requests.insert(
            request_id,
            PendingCreate {
                channel: channel_id,
                entity_id: channel.entity_id,
                clear_rpcs,
            },
        );
        info!(
            "Sent create request {request_id} for entity {} ({})",
            channel.entity_id, class.class_path
        );
        Ok(request_id)
    }

    /// Matches a create-entity response to its channel. On success, any
    /// RPCs that rode along in the creation payload are cleared out of the
    /// entity's snapshot so late checkouts do not replay them. Failures
    /// are logged; the engine decides whether to retry creation.
    pub fn on_create_entity_response(
        &mut self,
        connection: &mut dyn Connection,
        request_id: RequestId,
        success: bool,
    ) -> Option<ChannelId> {
        let pending = self.pending_create_requests.remove(&request_id)?;
        if !success {
            warn!(
                "Create request {request_id} for channel {:?} failed",
                pending.channel
            );
            return Some(pending.channel);
        }
        if pending.clear_rpcs {
            let request = CommandRequest {
                component_id: RPCS_ON_ENTITY_CREATION_COMPONENT_ID,
                command_index: CLEAR_RPCS_ON_ENTITY_CREATION_COMMAND_INDEX,
                payload: SchemaObject::new(),
            };
            connection.send_command_request(pending.entity_id, request);
        }
        Some(pending.channel)
    }

    /// Tears down a channel's entity: parked writes are dropped and the
    /// delete request goes out.
    pub fn delete_entity(
        &mut self,
        connection: &mut dyn Connection,
        channel_id: ChannelId,
        entity_id: EntityId,
    ) -> RequestId {
        self.rep_outbox.reset_channel(channel_id);
        self.handover_outbox.reset_channel(channel_id);
        self.rpcs_on_entity_creation.remove(&channel_id);
        self.updates_queued_until_authority.remove(&entity_id);
        connection.send_delete_entity_request(entity_id)
    }

    /// Sends an RPC, parking it if the target or any argument is still
    /// unresolved. Reliable RPCs aimed at an entity whose create request
    /// is in flight are stashed into the creation payload instead.
    pub fn send_rpc(
        &mut self,
        ctx: &mut SenderContext<'_>,
        target: ObjectHandle,
        rpc: RpcInfo,
        args: Vec<FieldValue>,
    ) -> Result<(), SenderError> {
        let retry_index = self.next_retry_index;
        self.next_retry_index += 1;
        self.send_rpc_internal(
            ctx,
            PendingRpcParams {
                target,
                rpc,
                args,
                retry_index,
            },
        )
    }

    fn send_rpc_internal(
        &mut self,
        ctx: &mut SenderContext<'_>,
        params: PendingRpcParams,
    ) -> Result<(), SenderError> {
        if !ctx.resolver.is_alive(params.target) {
            trace!("Dropping RPC aimed at destroyed object {:?}", params.target);
            return Ok(());
        }

        let target_ref = ctx.resolver.resolve(params.target);
        let ObjectRef::Entity { entity, offset } = target_ref else {
            trace!(
                "Parking RPC {:?}: target {:?} unresolved",
                params.rpc.rpc_id,
                params.target
            );
            self.outgoing_rpcs
                .entry(params.target)
                .or_default()
                .push(params);
            return Ok(());
        };

        let mut factory = ComponentFactory::new(ctx.resolver);
        let (arg_fields, waiting_on) = factory.serialize_rpc_payload(&params.args);
        if let Some(blocker) = waiting_on.into_iter().next() {
            trace!(
                "Parking RPC {:?}: argument {:?} unresolved",
                params.rpc.rpc_id,
                blocker
            );
            self.outgoing_rpcs.entry(blocker).or_default().push(params);
            return Ok(());
        }

        if params.rpc.kind.is_reliable() {
            let payload = rpc_payload(offset, params.rpc.rpc_index, arg_fields);
            if let Some(channel_id) = ctx.world.channel_for_object(params.target) {
                let creating = ctx
                    .world
                    .channel(channel_id)
                    .is_some_and(|channel| channel.creating_new_entity);
                if creating {
                    trace!(
                        "Stashing RPC {:?} into creation payload of channel {channel_id:?}",
                        params.rpc.rpc_id
                    );
                    self.rpcs_on_entity_creation
                        .entry(channel_id)
                        .or_default()
                        .push(payload);
                    return Ok(());
                }
            }
            self.send_reliable(
                ctx.connection,
                ReliableRpcForRetry {
                    target_ref,
                    target: params.target,
                    component_id: params.rpc.kind.endpoint_component(),
                    rpc_index: params.rpc.rpc_index,
                    payload,
                    attempts: 1,
                    retry_index: params.retry_index,
                },
            );
            return Ok(());
        }

        let endpoint = params.rpc.kind.endpoint_component();
        if !ctx.authority.has_authority(entity, endpoint) {
            trace!(
                "No authority over RPC endpoint {endpoint} on entity {entity}; \
                 dropping unreliable RPC {:?}",
                params.rpc.rpc_id
            );
            return Ok(());
        }

        match params.rpc.kind {
            RpcKind::Multicast => {
                let payload = rpc_payload(offset, params.rpc.rpc_index, arg_fields);
                let mut update = ComponentUpdate::new(MULTICAST_RPCS_COMPONENT_ID);
                update
                    .events
                    .add(RPC_ENDPOINT_EVENT_ID, SchemaValue::Object(payload));
                ctx.connection.send_component_update(entity, update);
            }
            _ => {
                if ctx.settings.pack_unreliable_rpcs {
                    if let Some(controller_entity) = self.controller_entity(ctx, params.target) {
                        self.packed_rpcs
                            .entry(controller_entity)
                            .or_default()
                            .push(PackedRpc {
                                target_entity: entity,
                                offset,
                                rpc_index: params.rpc.rpc_index,
                                payload: arg_fields,
                            });
                        return Ok(());
                    }
                }
                let payload = rpc_payload(offset, params.rpc.rpc_index, arg_fields);
                let mut update = ComponentUpdate::new(endpoint);
                update
                    .events
                    .add(RPC_ENDPOINT_EVENT_ID, SchemaValue::Object(payload));
                ctx.connection.send_component_update(entity, update);
            }
        }
        Ok(())
    }

    /// The controller entity through which packed unreliable RPCs for
    /// `target` are routed, if its channel has an owning client whose
    /// controller is resolved.
    fn controller_entity(
        &self,
        ctx: &mut SenderContext<'_>,
        target: ObjectHandle,
    ) -> Option<EntityId> {
        let channel_id = ctx.world.channel_for_object(target)?;
        let channel = ctx.world.channel(channel_id)?;
        let controller = channel.owning_client.as_ref()?.controller;
        ctx.resolver.resolve(controller).entity_id()
    }

    fn send_reliable(&mut self, connection: &mut dyn Connection, rpc: ReliableRpcForRetry) {
        let Some(entity) = rpc.target_ref.entity_id() else {
            // Target lost its id between park and send; re-park would need
            // the original args, so drop and log.
            warn!("Reliable RPC target lost its entity id before send; dropping");
            return;
        };
        let request = CommandRequest {
            component_id: rpc.component_id,
            command_index: RPC_ENDPOINT_COMMAND_INDEX,
            payload: rpc.payload.clone(),
        };
        let request_id = connection.send_command_request(entity, request);
        self.pending_reliable.insert(request_id, rpc);
    }

    /// Handles the response to an in-flight reliable RPC. A timeout below
    /// the attempt cap re-enqueues the RPC and returns the backoff the
    /// driver should wait before calling [`Sender::flush_retry_rpcs`].
    pub fn on_command_response(
        &mut self,
        request_id: RequestId,
        code: CommandResponseCode,
    ) -> Option<Duration> {
        let mut rpc = self.pending_reliable.remove(&request_id)?;
        match code {
            CommandResponseCode::Success => None,
            CommandResponseCode::ApplicationError => {
                error!(
                    "Reliable RPC (retry index {}) failed with an application error; not retrying",
                    rpc.retry_index
                );
                None
            }
            CommandResponseCode::Timeout => {
                if rpc.attempts >= MAX_COMMAND_ATTEMPTS {
                    error!(
                        "Reliable RPC (retry index {}) abandoned after {} attempts",
                        rpc.retry_index, rpc.attempts
                    );
                    return None;
                }
                let base = command_retry_wait_time(rpc.attempts);
                // Spread concurrent timeouts so the retries do not land in
                // one burst.
                let wait = base.mul_f64(0.8 + 0.4 * fastrand::f64());
                rpc.attempts += 1;
                trace!(
                    "Reliable RPC (retry index {}) timed out; retry {} in {wait:?}",
                    rpc.retry_index,
                    rpc.attempts
                );
                self.retry_rpcs.push(rpc);
                Some(wait)
            }
        }
    }

    /// Retransmits every timed-out reliable RPC, in original send order
    /// regardless of which timed out first. Dead targets are dropped here,
    /// the first time the stale entry is touched.
    pub fn flush_retry_rpcs(
        &mut self,
        resolver: &dyn ObjectResolver,
        connection: &mut dyn Connection,
    ) {
        let mut batch = std::mem::take(&mut self.retry_rpcs);
        batch.sort_by_key(|rpc| rpc.retry_index);
        for rpc in batch {
            if !resolver.is_alive(rpc.target) {
                trace!(
                    "Dropping retry of RPC (retry index {}): target destroyed",
                    rpc.retry_index
                );
                continue;
            }
            self.send_reliable(connection, rpc);
        }
    }

    /// Flushes all packed unreliable RPCs accumulated this tick, one
    /// batched update per controller entity.
    pub fn flush_packed_rpcs(&mut self, connection: &mut dyn Connection) {
        for (controller_entity, rpcs) in std::mem::take(&mut self.packed_rpcs) {
            let mut update = ComponentUpdate::new(CLIENT_RPC_ENDPOINT_COMPONENT_ID);
            for rpc in rpcs {
                let event = update.events.add_object(RPC_ENDPOINT_PACKED_EVENT_ID);
                event.add_uint32(RPC_PAYLOAD_OFFSET_ID, rpc.offset);
                event.add_uint32(RPC_PAYLOAD_INDEX_ID, rpc.rpc_index);
                event.add(RPC_PAYLOAD_DATA_ID, SchemaValue::Object(rpc.payload));
                event.add_entity_id(PACKED_RPC_ENTITY_ID, rpc.target_entity);
            }
            connection.send_component_update(controller_entity, update);
        }
    }

    /// Releases everything parked on `object` now that it has a stable
    /// reference: outbox fields are re-serialized and sent, parked RPCs
    /// re-enter the send path.
    pub fn resolve_object(
        &mut self,
        ctx: &mut SenderContext<'_>,
        object: ObjectHandle,
    ) -> Result<(), SenderError> {
        let mut ready = self.rep_outbox.resolve(object);
        ready.extend(self.handover_outbox.resolve(object));

        // Group the released fields per channel so each object is
        // re-serialized once.
        let mut per_channel: HashMap<(ChannelId, ObjectHandle), Vec<FieldHandle>> = HashMap::new();
        for key in ready {
            per_channel
                .entry((key.channel, key.object))
                .or_default()
                .push(key.field);
        }
        for ((channel_id, _), mut fields) in per_channel {
            fields.sort_unstable();
            if ctx.world.channel(channel_id).is_none() {
                trace!("Dropping released fields for closed channel {channel_id:?}");
                continue;
            }
            self.send_component_updates(ctx, channel_id, &fields)?;
        }

        if let Some(parked) = self.outgoing_rpcs.remove(&object) {
            for params in parked {
                self.send_rpc_internal(ctx, params)?;
            }
        }
        Ok(())
    }

    /// Flushes every update queued for `entity_id`, in original enqueue
    /// order. Any authority gain on the entity releases the whole list:
    /// the runtime grants the worker's components in one burst after
    /// creation, and the queue exists only to cover that window.
    pub fn on_authority_gained(&mut self, connection: &mut dyn Connection, entity_id: EntityId) {
        let Some(queued) = self.updates_queued_until_authority.remove(&entity_id) else {
            return;
        };
        for update in queued {
            connection.send_component_update(entity_id, update);
        }
    }

    /// Recomputes and sends the entity's ACL, typically after ownership
    /// changed hands.
    pub fn update_entity_acl(
        &mut self,
        ctx: &mut SenderContext<'_>,
        entity_id: EntityId,
        class: &ClassInfo,
        owner_attribute: Option<&str>,
    ) {
        let update = entity_acl(ctx.settings, class, owner_attribute).to_update();
        self.send_or_queue(ctx.authority, ctx.connection, entity_id, update);
    }

    pub fn send_position_update(
        &mut self,
        ctx: &mut SenderContext<'_>,
        entity_id: EntityId,
        coords: Coordinates,
    ) {
        let update = Position::new(coords).to_update();
        self.send_or_queue(ctx.authority, ctx.connection, entity_id, update);
    }

    fn send_or_queue(
        &mut self,
        authority: &AuthorityView,
        connection: &mut dyn Connection,
        entity_id: EntityId,
        update: ComponentUpdate,
    ) {
        if authority.has_authority(entity_id, update.component_id) {
            connection.send_component_update(entity_id, update);
        } else {
            trace!(
                "No authority over component {} on entity {entity_id} yet; queueing update",
                update.component_id
            );
            self.updates_queued_until_authority
                .entry(entity_id)
                .or_default()
                .push(update);
        }
    }
}

/// The full ACL for an entity of `class`: servers read everything and
/// write the server-owned components; the owning client, when present,
/// writes its own RPC endpoint and heartbeat.
fn entity_acl(
    settings: &SpatialSettings,
    class: &ClassInfo,
    owner_attribute: Option<&str>,
) -> EntityAcl {
    let server_requirement: WorkerRequirementSet = settings
        .server_worker_types
        .iter()
        .map(|worker_type| attribute_set(worker_type))
        .collect();

    let mut read_acl = server_requirement.clone();
    if !class.server_only {
        read_acl.push(attribute_set(&settings.client_worker_attribute));
    }

    let mut acl = EntityAcl::new(read_acl);
    let mut server_components = vec![
        POSITION_COMPONENT_ID,
        ENTITY_ACL_COMPONENT_ID,
        ENTITY_METADATA_COMPONENT_ID,
        INTEREST_COMPONENT_ID,
        SERVER_RPC_ENDPOINT_COMPONENT_ID,
        MULTICAST_RPCS_COMPONENT_ID,
        RPCS_ON_ENTITY_CREATION_COMPONENT_ID,
    ];
    for group in PropertyGroup::ALL {
        if let Some(component_id) = class.component_id(group) {
            server_components.push(component_id);
        }
    }
    for component_id in server_components {
        acl.set_write_access(component_id, server_requirement.clone());
    }

    let client_requirement: WorkerRequirementSet = match owner_attribute {
        Some(attribute) => vec![attribute_set(attribute)],
        None => server_requirement,
    };
    acl.set_write_access(CLIENT_RPC_ENDPOINT_COMPONENT_ID, client_requirement.clone());
    acl.set_write_access(HEARTBEAT_COMPONENT_ID, client_requirement);

    acl
}

/// The standard RPC payload envelope: target offset, RPC index, argument
/// object.
fn rpc_payload(offset: ObjectOffset, rpc_index: u32, args: SchemaObject) -> SchemaObject {
    let mut payload = SchemaObject::new();
    payload.add_uint32(RPC_PAYLOAD_OFFSET_ID, offset);
    payload.add_uint32(RPC_PAYLOAD_INDEX_ID, rpc_index);
    payload.add(RPC_PAYLOAD_DATA_ID, SchemaValue::Object(args));
    payload
}


use shardspace_shared::{
    CommandRequest, CommandResponse, ComponentData, ComponentUpdate, EntityId, RequestId,
};

/// Outcome of a command delivered to this worker, reported back through
/// [`Connection::send_command_response`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandResponseCode {
    Success,
    Timeout,
    ApplicationError,
}

/// The worker's link to the runtime. All sends are fire-and-forget;
/// responses arrive later through the receive path, keyed by the returned
/// [`RequestId`].
pub trait Connection {
    fn send_component_update(&mut self, entity_id: EntityId, update: ComponentUpdate);

    fn send_create_entity_request(
        &mut self,
        entity_id: EntityId,
        components: Vec<ComponentData>,
    ) -> RequestId;

    fn send_delete_entity_request(&mut self, entity_id: EntityId) -> RequestId;

    fn send_command_request(&mut self, entity_id: EntityId, request: CommandRequest) -> RequestId;

    fn send_command_response(&mut self, request_id: RequestId, response: CommandResponse);

    fn send_command_failure(&mut self, request_id: RequestId, message: &str);
}

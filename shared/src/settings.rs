/// Tunables shared by the interest and sender pipelines. Loaded once at
/// worker startup and treated as immutable afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct SpatialSettings {
    /// Generate client interest queries instead of relying on the runtime's
    /// global checkout range.
    pub query_based_interest: bool,
    /// Also generate interest for server workers (on top of client interest).
    pub server_interest: bool,
    /// Batch unreliable RPCs through the owning client's controller entity
    /// rather than sending one update per target entity.
    pub pack_unreliable_rpcs: bool,
    /// Worker types allowed to read every entity and to write
    /// server-authoritative components.
    pub server_worker_types: Vec<String>,
    /// Attribute naming the owning client in per-client ACLs.
    pub client_worker_attribute: String,
}

impl Default for SpatialSettings {
    fn default() -> Self {
        Self {
            query_based_interest: true,
            server_interest: false,
            pack_unreliable_rpcs: false,
            server_worker_types: vec!["server".to_string()],
            client_worker_attribute: "client".to_string(),
        }
    }
}

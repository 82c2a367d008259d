use std::sync::Arc;

use service::enrich::ContactEnricher;
use service::serializer::SerializedStorage;

/// Shared handler state. The storage handle is the process-wide access lock.
#[derive(Clone)]
pub struct ServerState {
    pub storage: SerializedStorage,
    pub enricher: Arc<dyn ContactEnricher>,
}

impl ServerState {
    pub fn new(storage: SerializedStorage, enricher: Arc<dyn ContactEnricher>) -> Self {
        Self { storage, enricher }
    }
}

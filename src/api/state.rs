use crate::core::dispatcher::BulkDispatcher;
use crate::core::pacing::Pacer;
use crate::core::scheduler::DispatchScheduler;
use crate::domain::ports::{DeliveryTransport, TenantRegistry};
use std::sync::Arc;

/// Shared handler state. Cloned per request; everything inside is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<dyn TenantRegistry>,
    pub transport: Arc<dyn DeliveryTransport>,
    pub scheduler: DispatchScheduler,
    pub max_batch: usize,
}

impl AppState {
    pub fn new(
        registry: Arc<dyn TenantRegistry>,
        transport: Arc<dyn DeliveryTransport>,
        pacer: Pacer,
        max_batch: usize,
    ) -> Self {
        let dispatcher = BulkDispatcher::new(Arc::clone(&transport), pacer);
        Self {
            registry,
            transport,
            scheduler: DispatchScheduler::new(Arc::new(dispatcher)),
            max_batch,
        }
    }
}

use crate::domain::model::Tenant;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// The messaging backend that owns sessions and actually delivers messages.
#[async_trait]
pub trait DeliveryTransport: Send + Sync {
    async fn has_active_session(&self, session_id: &str) -> bool;
    async fn send_message(&self, session_id: &str, to: &str, body: &str) -> Result<()>;
}

/// Lookup of tenants by API key. Keys arrive already trimmed.
pub trait TenantRegistry: Send + Sync {
    fn find_by_api_key(&self, api_key: &str) -> Option<Tenant>;
    fn tenant_count(&self) -> usize;
}

/// Source of pacing delays within closed bounds.
pub trait DelaySampler: Send + Sync {
    fn sample(&self, min: Duration, max: Duration) -> Duration;
}

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

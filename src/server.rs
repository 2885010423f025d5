use crate::adapters::{HttpTransport, StaticTenantRegistry};
use crate::api::{create_router, AppState};
use crate::config::GatewayConfig;
use crate::core::pacing::Pacer;
use crate::domain::ports::TenantRegistry;
use crate::utils::error::Result;
use std::sync::Arc;

pub struct GatewayServer {
    config: GatewayConfig,
}

impl GatewayServer {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }

    /// Wires the adapters from configuration into shared handler state.
    pub fn build_state(&self) -> Result<AppState> {
        let registry = StaticTenantRegistry::new(self.config.tenants());
        tracing::info!("Found {} instance(s)", registry.tenant_count());

        let transport = HttpTransport::new(
            &self.config.transport.endpoint,
            self.config.transport_timeout(),
        )?;

        Ok(AppState::new(
            Arc::new(registry),
            Arc::new(transport),
            Pacer::new(self.config.pacing_policy()),
            self.config.bulk.max_messages,
        ))
    }

    /// Serves until SIGINT/SIGTERM, then drains in-flight bulk dispatches.
    pub async fn run(self) -> Result<()> {
        let state = self.build_state()?;
        let scheduler = state.scheduler.clone();
        let app = create_router(state);

        let address = self.config.bind_address();
        let listener = tokio::net::TcpListener::bind(&address).await?;
        tracing::info!("API listening on {}", address);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Shutting down...");
        let summary = scheduler.shutdown(self.config.shutdown_grace()).await;
        tracing::info!(
            completed = summary.completed,
            failed = summary.failed,
            abandoned = summary.abandoned,
            "Bulk dispatcher stopped"
        );

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

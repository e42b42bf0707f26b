// Adapters layer: concrete implementations of the domain ports (in-memory stores, REST backend, notifiers, storage).

pub mod http;
pub mod memory;
pub mod notifier;
pub mod pooling;
pub mod storage;

use crate::config::{BackendKind, DashboardConfig};
use crate::domain::ports::{BankingService, PoolingService, RouteRepository};
use crate::utils::error::{DashError, Result};
use std::time::Duration;

/// Stands in for the network round trip of a remote API.
pub(crate) async fn simulate_latency(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

/// The three backend seams, chosen at runtime from the configuration.
pub struct Backend {
    pub routes: Box<dyn RouteRepository>,
    pub banking: Box<dyn BankingService>,
    pub pooling: Box<dyn PoolingService>,
}

pub fn build_backend(config: &DashboardConfig) -> Result<Backend> {
    match config.backend_kind() {
        BackendKind::Memory => {
            tracing::info!(
                "🧪 Using in-memory backend (latency {:?})",
                config.latency()
            );
            let routes =
                memory::InMemoryRouteStore::new(config.seed_routes()).with_latency(config.latency());
            let banking = memory::InMemoryComplianceStore::new([config.seed_balance()])
                .with_latency(config.latency());

            Ok(Backend {
                routes: Box::new(routes),
                banking: Box::new(banking),
                pooling: Box::new(pooling::LocalPoolingService::new()),
            })
        }
        BackendKind::Http => {
            let endpoint =
                config
                    .backend
                    .endpoint
                    .as_deref()
                    .ok_or_else(|| DashError::MissingConfigError {
                        field: "backend.endpoint".to_string(),
                    })?;
            tracing::info!("🌐 Using compliance backend at {}", endpoint);

            let routes = http::HttpRouteRepository::new(endpoint, config.timeout())?;
            let compliance = http::HttpComplianceApi::new(endpoint, config.timeout())?;

            Ok(Backend {
                routes: Box::new(routes),
                banking: Box::new(compliance.clone()),
                pooling: Box::new(compliance),
            })
        }
    }
}

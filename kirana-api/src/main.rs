use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use kirana_api::{app, state::AppState};
use kirana_delivery::DeliveryLocationRegistry;
use kirana_order::{MutationCoordinator, OrderStore};
use kirana_store::InMemoryOrderGateway;
use tokio::sync::RwLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kirana_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = kirana_store::Config::load().expect("Failed to load config");
    tracing::info!("Starting Kirana API on port {}", config.server.port);

    let registry = Arc::new(RwLock::new(DeliveryLocationRegistry::new()));
    let store = Arc::new(RwLock::new(OrderStore::new()));

    let gateway = Arc::new(
        InMemoryOrderGateway::new(registry.clone())
            .with_latency(Duration::from_millis(config.upstream.simulated_latency_ms)),
    );

    let coordinator = Arc::new(MutationCoordinator::new(
        gateway.clone(),
        store.clone(),
        registry.clone(),
        Duration::from_millis(config.upstream.request_timeout_ms),
    ));

    if let Err(error) = coordinator.refresh().await {
        tracing::warn!(%error, "initial order load failed");
    }

    let app_state = AppState {
        store,
        registry,
        coordinator,
        gateway,
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

use kirana_core::gateway::OrderGateway;
use kirana_delivery::DeliveryLocationRegistry;
use kirana_order::{MutationCoordinator, OrderStore};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<OrderStore>>,
    pub registry: Arc<RwLock<DeliveryLocationRegistry>>,
    pub coordinator: Arc<MutationCoordinator>,
    pub gateway: Arc<dyn OrderGateway>,
}

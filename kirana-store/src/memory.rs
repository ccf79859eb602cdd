use async_trait::async_trait;
use kirana_core::gateway::OrderGateway;
use kirana_core::{CoreError, CoreResult};
use kirana_delivery::{DeliveryGuard, DeliveryLocationRegistry};
use kirana_order::engine::StatusTransitionEngine;
use kirana_shared::models::{Order, OrderStatus};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-process order service. Holds the authoritative order map and
/// re-validates every status change against the transition table and the
/// delivery guard, independently of whatever the client checked: the
/// client-side pre-check is an optimization, never a substitute.
///
/// Latency and transport-failure switches are injectable so concurrency
/// behavior can be exercised from tests.
pub struct InMemoryOrderGateway {
    orders: RwLock<HashMap<Uuid, Order>>,
    registry: Arc<RwLock<DeliveryLocationRegistry>>,
    latency: Duration,
    fail_transport: AtomicBool,
    mutation_calls: AtomicUsize,
}

impl InMemoryOrderGateway {
    pub fn new(registry: Arc<RwLock<DeliveryLocationRegistry>>) -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
            registry,
            latency: Duration::ZERO,
            fail_transport: AtomicBool::new(false),
            mutation_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub async fn seed(&self, orders: Vec<Order>) {
        let mut map = self.orders.write().await;
        for order in orders {
            map.insert(order.id, order);
        }
    }

    /// Simulate a network outage for every subsequent call.
    pub fn set_fail_transport(&self, fail: bool) {
        self.fail_transport.store(fail, Ordering::SeqCst);
    }

    /// How many `set_order_status` calls reached this service.
    pub fn mutation_call_count(&self) -> usize {
        self.mutation_calls.load(Ordering::SeqCst)
    }

    async fn simulate_transport(&self) -> CoreResult<()> {
        if self.latency > Duration::ZERO {
            tokio::time::sleep(self.latency).await;
        }
        if self.fail_transport.load(Ordering::SeqCst) {
            return Err(CoreError::Transport("simulated outage".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl OrderGateway for InMemoryOrderGateway {
    async fn list_orders(&self, search: Option<&str>) -> CoreResult<Vec<Order>> {
        self.simulate_transport().await?;
        let orders = self.orders.read().await;
        Ok(orders
            .values()
            .filter(|order| search.map_or(true, |term| order.matches(term)))
            .cloned()
            .collect())
    }

    async fn set_order_status(&self, order_id: Uuid, target: OrderStatus) -> CoreResult<Order> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_transport().await?;

        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(&order_id)
            .ok_or(CoreError::NotFound(order_id))?;

        // Server-side re-validation: the requested edge must exist in the
        // table and the guard must permit it.
        if StatusTransitionEngine::action_for(order.status, target).is_none() {
            return Err(CoreError::InvalidTransition {
                from: order.status,
                attempted: target.to_string(),
            });
        }
        {
            let registry = self.registry.read().await;
            if !DeliveryGuard::permits(order, &registry) {
                return Err(CoreError::DeliveryRestricted {
                    country: order
                        .shipping_address
                        .as_ref()
                        .and_then(DeliveryGuard::shipping_country),
                });
            }
        }

        order.update_status(target);
        tracing::debug!(order = %order_id, status = %target, "order status stored");
        Ok(order.clone())
    }
}

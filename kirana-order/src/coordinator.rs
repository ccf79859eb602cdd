use kirana_core::gateway::OrderGateway;
use kirana_core::{CoreError, CoreResult};
use kirana_delivery::DeliveryLocationRegistry;
use kirana_shared::models::{OrderAction, OrderStatus};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::engine::StatusTransitionEngine;
use crate::store::OrderStore;

/// Serializes transition requests per order: at most one mutation per
/// order id is in flight at any time, while different orders proceed
/// independently. There is no failed state held here; a failure is
/// reported once and the order returns to idle so a new attempt can be
/// made.
pub struct MutationCoordinator {
    gateway: Arc<dyn OrderGateway>,
    store: Arc<RwLock<OrderStore>>,
    registry: Arc<RwLock<DeliveryLocationRegistry>>,
    // Plain mutex, never held across an await; locked only to claim,
    // inspect, or release a slot.
    in_flight: Mutex<HashMap<Uuid, OrderAction>>,
    remote_timeout: Duration,
}

/// Claimed slot in the in-flight map. Releases the entry on drop, which
/// also covers the caller's future being dropped mid-request (for example
/// an HTTP client disconnecting), so an order can never stay busy after
/// its request dies.
struct InFlightSlot<'a> {
    slots: &'a Mutex<HashMap<Uuid, OrderAction>>,
    order_id: Uuid,
}

impl<'a> InFlightSlot<'a> {
    /// Claim the slot for an order, or `None` when one is already held.
    fn claim(
        slots: &'a Mutex<HashMap<Uuid, OrderAction>>,
        order_id: Uuid,
        action: OrderAction,
    ) -> Option<Self> {
        let mut map = slots.lock().unwrap_or_else(PoisonError::into_inner);
        if map.contains_key(&order_id) {
            return None;
        }
        map.insert(order_id, action);
        Some(Self { slots, order_id })
    }
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.order_id);
    }
}

impl MutationCoordinator {
    pub fn new(
        gateway: Arc<dyn OrderGateway>,
        store: Arc<RwLock<OrderStore>>,
        registry: Arc<RwLock<DeliveryLocationRegistry>>,
        remote_timeout: Duration,
    ) -> Self {
        Self {
            gateway,
            store,
            registry,
            in_flight: Mutex::new(HashMap::new()),
            remote_timeout,
        }
    }

    /// Request a transition for one order. Rejects with `Busy` before any
    /// network call when the order already has a mutation in flight, and
    /// with a validation or guard error when the advisory pre-check denies
    /// the action. The in-flight marker is released on every outcome,
    /// including timeouts and a cancelled caller, so a retry is always
    /// possible.
    pub async fn request_transition(
        &self,
        order_id: Uuid,
        action: OrderAction,
    ) -> CoreResult<OrderStatus> {
        let _slot = InFlightSlot::claim(&self.in_flight, order_id, action)
            .ok_or(CoreError::Busy(order_id))?;
        self.attempt(order_id, action).await
    }

    /// The action currently in flight for an order, if any.
    pub fn in_flight_action(&self, order_id: &Uuid) -> Option<OrderAction> {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(order_id)
            .copied()
    }

    /// Reload the full order collection from the order service.
    pub async fn refresh(&self) -> CoreResult<usize> {
        let orders = self.gateway.list_orders(None).await?;
        let count = orders.len();
        self.store.write().await.replace_all(orders);
        Ok(count)
    }

    async fn attempt(&self, order_id: Uuid, action: OrderAction) -> CoreResult<OrderStatus> {
        let order = self
            .store
            .read()
            .await
            .get(&order_id)
            .cloned()
            .ok_or(CoreError::NotFound(order_id))?;

        // Advisory pre-check only; the order service re-validates.
        let target = {
            let registry = self.registry.read().await;
            StatusTransitionEngine::validate(&order, action, &registry)?
        };

        let updated = match tokio::time::timeout(
            self.remote_timeout,
            self.gateway.set_order_status(order_id, target),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(CoreError::Transport(format!(
                    "order service did not answer within {}ms",
                    self.remote_timeout.as_millis()
                )))
            }
        };

        tracing::info!(
            order = %order_id,
            from = %order.status,
            to = %updated.status,
            action = %action,
            "transition applied"
        );

        {
            let mut store = self.store.write().await;
            store.mark_dirty(order_id);
            store.announce_status_change(order_id, order.status, updated.status);
        }

        // The mutation is already applied remotely; a failed reload only
        // leaves the order marked dirty for the next refresh.
        if let Err(error) = self.refresh().await {
            tracing::warn!(order = %order_id, %error, "reload after transition failed");
        }

        Ok(updated.status)
    }
}

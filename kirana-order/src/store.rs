use chrono::Utc;
use kirana_shared::events::{OrderStatusChangedEvent, OrdersRefreshedEvent, StoreEvent};
use kirana_shared::models::{Order, OrderStatus};
use std::collections::{HashMap, HashSet};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Local copy of the orders fetched from the order service, keyed by id.
/// The core owns this store and consumers subscribe to change events; the
/// presentation layer never holds the authoritative data itself.
pub struct OrderStore {
    orders: HashMap<Uuid, Order>,
    /// Orders whose remote state changed but whose local copy has not been
    /// reloaded yet. Cleared by the next successful `replace_all`.
    dirty: HashSet<Uuid>,
    events: broadcast::Sender<StoreEvent>,
}

impl OrderStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            orders: HashMap::new(),
            dirty: HashSet::new(),
            events,
        }
    }

    pub fn get(&self, order_id: &Uuid) -> Option<&Order> {
        self.orders.get(order_id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn all(&self) -> Vec<Order> {
        self.orders.values().cloned().collect()
    }

    /// Local counterpart of the server-side list filter.
    pub fn search(&self, term: &str) -> Vec<Order> {
        self.orders
            .values()
            .filter(|order| order.matches(term))
            .cloned()
            .collect()
    }

    pub fn is_dirty(&self, order_id: &Uuid) -> bool {
        self.dirty.contains(order_id)
    }

    pub fn mark_dirty(&mut self, order_id: Uuid) {
        self.dirty.insert(order_id);
    }

    /// Swap in a freshly fetched collection, clear all dirt, and notify
    /// subscribers.
    pub fn replace_all(&mut self, orders: Vec<Order>) {
        self.orders = orders.into_iter().map(|o| (o.id, o)).collect();
        self.dirty.clear();
        self.notify(StoreEvent::OrdersRefreshed(OrdersRefreshedEvent {
            count: self.orders.len(),
            timestamp: Utc::now().timestamp(),
        }));
    }

    /// Announce a remotely confirmed status change ahead of the reload.
    pub fn announce_status_change(&self, order_id: Uuid, from: OrderStatus, to: OrderStatus) {
        self.notify(StoreEvent::OrderStatusChanged(OrderStatusChangedEvent {
            order_id,
            from,
            to,
            timestamp: Utc::now().timestamp(),
        }));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    fn notify(&self, event: StoreEvent) {
        // Send only fails when nobody is subscribed, which is fine
        let _ = self.events.send(event);
    }
}

impl Default for OrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_all_keys_by_id() {
        let mut store = OrderStore::new();
        let order = Order::new("Asha Patel".to_string(), OrderStatus::Pending);
        let id = order.id;
        store.replace_all(vec![order]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&id).unwrap().status, OrderStatus::Pending);
    }

    #[test]
    fn test_replace_all_clears_dirty() {
        let mut store = OrderStore::new();
        let order = Order::new("Asha Patel".to_string(), OrderStatus::Pending);
        let id = order.id;
        store.mark_dirty(id);
        assert!(store.is_dirty(&id));
        store.replace_all(vec![order]);
        assert!(!store.is_dirty(&id));
    }

    #[test]
    fn test_search_filters_locally() {
        let mut store = OrderStore::new();
        let mut a = Order::new("Asha Patel".to_string(), OrderStatus::Pending);
        a.customer_email = Some("asha@example.com".to_string());
        let b = Order::new("Binod Rao".to_string(), OrderStatus::Paid);
        store.replace_all(vec![a, b]);

        assert_eq!(store.search("asha").len(), 1);
        assert_eq!(store.search("rao").len(), 1);
        assert_eq!(store.search("").len(), 2);
        assert!(store.search("zz-nobody").is_empty());
    }

    #[tokio::test]
    async fn test_subscribers_see_refresh_events() {
        let mut store = OrderStore::new();
        let mut rx = store.subscribe();
        store.replace_all(vec![Order::new("Asha Patel".to_string(), OrderStatus::Pending)]);

        match rx.recv().await.unwrap() {
            StoreEvent::OrdersRefreshed(event) => assert_eq!(event.count, 1),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}

use uuid::Uuid;

use crate::models::OrderStatus;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct OrdersRefreshedEvent {
    pub count: usize,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct OrderStatusChangedEvent {
    pub order_id: Uuid,
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub timestamp: i64,
}

/// Change notification pushed to subscribed consumers, so the presentation
/// layer re-renders on store changes instead of holding authoritative data.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    OrdersRefreshed(OrdersRefreshedEvent),
    OrderStatusChanged(OrderStatusChangedEvent),
}

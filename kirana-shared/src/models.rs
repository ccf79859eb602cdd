use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order status in the fulfillment lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Paid,
    Confirmed,
    Accepted,
    Packing,
    Ready,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
    /// Any status the remote order service reports that this build does
    /// not know about yet. Never a source or destination of a transition.
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Fixed display rank for operator review ordering. Smaller sorts first.
    pub fn rank(&self) -> u32 {
        match self {
            OrderStatus::Pending => 1,
            OrderStatus::Paid => 2,
            OrderStatus::Confirmed => 3,
            OrderStatus::Accepted => 4,
            OrderStatus::Packing => 5,
            OrderStatus::Ready => 6,
            OrderStatus::Shipped => 7,
            OrderStatus::Delivered => 8,
            OrderStatus::Cancelled => 9,
            OrderStatus::Refunded => 10,
            OrderStatus::Unknown => 999,
        }
    }

    /// Terminal statuses have no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Delivered | OrderStatus::Cancelled | OrderStatus::Refunded
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Accepted => "accepted",
            OrderStatus::Packing => "packing",
            OrderStatus::Ready => "ready",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
            OrderStatus::Unknown => "unknown",
        }
    }

    /// Every status this build knows about, in rank order.
    pub fn all() -> &'static [OrderStatus] {
        &[
            OrderStatus::Pending,
            OrderStatus::Paid,
            OrderStatus::Confirmed,
            OrderStatus::Accepted,
            OrderStatus::Packing,
            OrderStatus::Ready,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
            OrderStatus::Refunded,
        ]
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator action that triggers a status transition
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderAction {
    Accept,
    Reject,
    StartPacking,
    MarkReady,
    Ship,
    Deliver,
}

impl OrderAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderAction::Accept => "accept",
            OrderAction::Reject => "reject",
            OrderAction::StartPacking => "start_packing",
            OrderAction::MarkReady => "mark_ready",
            OrderAction::Ship => "ship",
            OrderAction::Deliver => "deliver",
        }
    }

    pub fn all() -> &'static [OrderAction] {
        &[
            OrderAction::Accept,
            OrderAction::Reject,
            OrderAction::StartPacking,
            OrderAction::MarkReady,
            OrderAction::Ship,
            OrderAction::Deliver,
        ]
    }
}

impl std::fmt::Display for OrderAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cod,
    Online,
    #[serde(other)]
    Other,
}

/// Shipping address as the order service reports it. Newer orders carry a
/// structured record; older ones a single free-text line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ShippingAddress {
    Structured {
        street: String,
        city: String,
        state: String,
        postal_code: String,
        country: String,
    },
    Legacy(String),
}

/// An individual product line within an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub id: Uuid,
    pub name: String,
    pub quantity: u32,
    pub price_minor: i64,
}

impl LineItem {
    pub fn new(name: String, quantity: u32, price_minor: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            quantity,
            price_minor,
        }
    }
}

/// The single source of truth for a customer's purchase. Created by the
/// external checkout process; mutated here only through the transition
/// engine, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub shipping_address: Option<ShippingAddress>,
    pub total_minor: i64,
    pub currency: String,
    pub items: Vec<LineItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(customer_name: String, status: OrderStatus) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            customer_name,
            customer_email: None,
            status,
            payment_method: PaymentMethod::Online,
            shipping_address: None,
            total_minor: 0,
            currency: "INR".to_string(),
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a line item and keep the total in sync
    pub fn add_item(&mut self, item: LineItem) {
        self.total_minor += item.price_minor * i64::from(item.quantity);
        self.items.push(item);
        self.updated_at = Utc::now();
    }

    pub fn update_status(&mut self, new_status: OrderStatus) {
        self.status = new_status;
        self.updated_at = Utc::now();
    }

    /// Case-insensitive match against id, customer name, and email, used by
    /// the list-orders search filter.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        if self.id.to_string().to_lowercase().contains(&term) {
            return true;
        }
        if self.customer_name.to_lowercase().contains(&term) {
            return true;
        }
        self.customer_email
            .as_deref()
            .is_some_and(|email| email.to_lowercase().contains(&term))
    }
}

/// A serviceable delivery area. The guard matches on country only; region
/// and city are kept for operator bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryLocation {
    pub id: Uuid,
    pub country: String,
    pub region: Option<String>,
    pub city: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl DeliveryLocation {
    pub fn new(country: String, region: Option<String>, city: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            country,
            region,
            city,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Packing).unwrap(),
            "\"packing\""
        );
        assert_eq!(
            serde_json::from_str::<OrderStatus>("\"paid\"").unwrap(),
            OrderStatus::Paid
        );
    }

    #[test]
    fn test_unknown_status_is_absorbed() {
        let status: OrderStatus = serde_json::from_str("\"awaiting_teleport\"").unwrap();
        assert_eq!(status, OrderStatus::Unknown);
        assert_eq!(status.rank(), 999);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Refunded.is_terminal());
        assert!(!OrderStatus::Shipped.is_terminal());
    }

    #[test]
    fn test_order_search_matching() {
        let mut order = Order::new("Asha Patel".to_string(), OrderStatus::Pending);
        order.customer_email = Some("asha@example.com".to_string());

        assert!(order.matches("asha"));
        assert!(order.matches("EXAMPLE.COM"));
        assert!(order.matches(&order.id.to_string()[..8]));
        assert!(!order.matches("nobody"));
        assert!(order.matches("  "));
    }

    #[test]
    fn test_add_item_updates_total() {
        let mut order = Order::new("Asha Patel".to_string(), OrderStatus::Pending);
        order.add_item(LineItem::new("Masala tin".to_string(), 2, 24900));
        assert_eq!(order.total_minor, 49800);
        assert_eq!(order.items.len(), 1);
    }

    #[test]
    fn test_legacy_address_round_trip() {
        let addr = ShippingAddress::Legacy("12 MG Road, Kochi, India".to_string());
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"12 MG Road, Kochi, India\"");
        let back: ShippingAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}

use async_trait::async_trait;
use kirana_shared::models::{Order, OrderStatus};
use uuid::Uuid;

use crate::CoreResult;

/// Boundary to the external order service. The service owns the orders;
/// this core only reads them and requests status changes. Implementations
/// must re-validate every mutation themselves: the client-side pre-check
/// is advisory, never a substitute.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Fetch all orders, optionally filtered server-side by a term matched
    /// against order id, customer name, and email.
    async fn list_orders(&self, search: Option<&str>) -> CoreResult<Vec<Order>>;

    /// The sole mutation entry point. Returns the order as the service
    /// sees it after the change.
    async fn set_order_status(&self, order_id: Uuid, target: OrderStatus) -> CoreResult<Order>;
}

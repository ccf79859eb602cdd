use kirana_shared::models::Order;
use serde::Deserialize;
use std::cmp::Ordering;

/// Display ordering for operator review. Sorting is a pure reordering
/// with no side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Status rank first, most recent first within a rank.
    #[default]
    Priority,
    /// Most recent first regardless of status.
    Recency,
}

pub struct OrderPrioritizer;

impl OrderPrioritizer {
    /// Sort in place. Total: ties on rank and `created_at` break on id, so
    /// the result is deterministic for any input.
    pub fn sort(orders: &mut [Order], mode: SortMode) {
        match mode {
            SortMode::Priority => orders.sort_by(Self::priority_cmp),
            SortMode::Recency => orders.sort_by(Self::recency_cmp),
        }
    }

    pub fn sorted(mut orders: Vec<Order>, mode: SortMode) -> Vec<Order> {
        Self::sort(&mut orders, mode);
        orders
    }

    fn priority_cmp(a: &Order, b: &Order) -> Ordering {
        a.status
            .rank()
            .cmp(&b.status.rank())
            .then_with(|| Self::recency_cmp(a, b))
    }

    fn recency_cmp(a: &Order, b: &Order) -> Ordering {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use kirana_shared::models::OrderStatus;
    use uuid::Uuid;

    fn order(status: OrderStatus, age_minutes: i64) -> Order {
        let mut order = Order::new("Asha Patel".to_string(), status);
        order.created_at = Utc::now() - Duration::minutes(age_minutes);
        order
    }

    #[test]
    fn test_priority_mode_orders_by_rank() {
        let mut orders = vec![
            order(OrderStatus::Delivered, 0),
            order(OrderStatus::Pending, 0),
            order(OrderStatus::Shipped, 0),
            order(OrderStatus::Paid, 0),
        ];
        OrderPrioritizer::sort(&mut orders, SortMode::Priority);
        let ranks: Vec<u32> = orders.iter().map(|o| o.status.rank()).collect();
        assert_eq!(ranks, vec![1, 2, 7, 8]);
    }

    #[test]
    fn test_equal_rank_breaks_on_recency() {
        let older = order(OrderStatus::Pending, 60);
        let newer = order(OrderStatus::Pending, 5);
        let mut orders = vec![older.clone(), newer.clone()];
        OrderPrioritizer::sort(&mut orders, SortMode::Priority);
        assert_eq!(orders[0].id, newer.id);
        assert_eq!(orders[1].id, older.id);
    }

    #[test]
    fn test_unknown_status_sorts_last() {
        let mut orders = vec![
            order(OrderStatus::Unknown, 0),
            order(OrderStatus::Refunded, 0),
            order(OrderStatus::Pending, 0),
        ];
        OrderPrioritizer::sort(&mut orders, SortMode::Priority);
        assert_eq!(orders.last().unwrap().status, OrderStatus::Unknown);
    }

    #[test]
    fn test_recency_mode_ignores_status() {
        let mut orders = vec![
            order(OrderStatus::Pending, 30),
            order(OrderStatus::Delivered, 1),
        ];
        OrderPrioritizer::sort(&mut orders, SortMode::Recency);
        assert_eq!(orders[0].status, OrderStatus::Delivered);
    }

    #[test]
    fn test_sort_is_stable_and_total_on_full_ties() {
        // Identical rank and created_at: id breaks the tie, so two sorts of
        // the same input agree exactly.
        let stamp = Utc::now();
        let mut orders: Vec<Order> = (0..8)
            .map(|_| {
                let mut o = order(OrderStatus::Paid, 0);
                o.created_at = stamp;
                o
            })
            .collect();

        let mut again = orders.clone();
        again.reverse();

        OrderPrioritizer::sort(&mut orders, SortMode::Priority);
        OrderPrioritizer::sort(&mut again, SortMode::Priority);

        let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let ids_again: Vec<Uuid> = again.iter().map(|o| o.id).collect();
        assert_eq!(ids, ids_again);

        // Applying the sort twice changes nothing
        OrderPrioritizer::sort(&mut orders, SortMode::Priority);
        assert_eq!(ids, orders.iter().map(|o| o.id).collect::<Vec<_>>());
    }
}

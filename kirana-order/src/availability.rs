//! Pure predicates over `status` alone. The guard is evaluated separately
//! so a consumer can distinguish "not yet eligible" from "eligible but
//! blocked". All predicates are derived from the transition table, which
//! keeps them in lock-step with it by construction.

use kirana_shared::models::{OrderAction, OrderStatus};

use crate::engine::StatusTransitionEngine;

/// True when the table has a row for this source status and action.
pub fn allows(status: OrderStatus, action: OrderAction) -> bool {
    StatusTransitionEngine::target(status, action).is_some()
}

/// Every action currently legal for a status, in declaration order.
pub fn available_actions(status: OrderStatus) -> Vec<OrderAction> {
    OrderAction::all()
        .iter()
        .copied()
        .filter(|action| allows(status, *action))
        .collect()
}

pub fn can_accept(status: OrderStatus) -> bool {
    allows(status, OrderAction::Accept)
}

pub fn can_reject(status: OrderStatus) -> bool {
    allows(status, OrderAction::Reject)
}

pub fn can_start_packing(status: OrderStatus) -> bool {
    allows(status, OrderAction::StartPacking)
}

pub fn can_mark_ready(status: OrderStatus) -> bool {
    allows(status, OrderAction::MarkReady)
}

pub fn can_ship(status: OrderStatus) -> bool {
    allows(status, OrderAction::Ship)
}

pub fn can_deliver(status: OrderStatus) -> bool {
    allows(status, OrderAction::Deliver)
}

use kirana_core::CoreError;
use kirana_delivery::{DeliveryGuard, DeliveryLocationRegistry};
use kirana_shared::models::{Order, OrderAction, OrderStatus};

/// The legal forward transitions: (source, triggering action, destination).
/// `confirmed` and `accepted` are two historical workflows merged over
/// time; both are kept as explicit entry points to packing rather than
/// normalizing one into the other. No transition leaves `delivered`,
/// `cancelled`, or `refunded`, and none enters `refunded`: that status is
/// reserved for a future external refund process.
pub const TRANSITIONS: &[(OrderStatus, OrderAction, OrderStatus)] = &[
    (OrderStatus::Pending, OrderAction::Accept, OrderStatus::Accepted),
    (OrderStatus::Paid, OrderAction::Accept, OrderStatus::Accepted),
    (OrderStatus::Pending, OrderAction::Reject, OrderStatus::Cancelled),
    (OrderStatus::Paid, OrderAction::Reject, OrderStatus::Cancelled),
    (OrderStatus::Confirmed, OrderAction::Reject, OrderStatus::Cancelled),
    (OrderStatus::Confirmed, OrderAction::Accept, OrderStatus::Accepted),
    (OrderStatus::Accepted, OrderAction::StartPacking, OrderStatus::Packing),
    (OrderStatus::Confirmed, OrderAction::StartPacking, OrderStatus::Packing),
    (OrderStatus::Packing, OrderAction::MarkReady, OrderStatus::Ready),
    (OrderStatus::Ready, OrderAction::Ship, OrderStatus::Shipped),
    (OrderStatus::Shipped, OrderAction::Deliver, OrderStatus::Delivered),
];

/// Encodes the order lifecycle finite-state machine. Requests naming a
/// transition outside the table are rejected; an illegal request is never
/// coerced into a legal one.
pub struct StatusTransitionEngine;

impl StatusTransitionEngine {
    /// Destination status for an action from a given source, if legal.
    pub fn target(from: OrderStatus, action: OrderAction) -> Option<OrderStatus> {
        TRANSITIONS
            .iter()
            .find(|(source, trigger, _)| *source == from && *trigger == action)
            .map(|(_, _, destination)| *destination)
    }

    /// The action that moves `from` to `to`, if the table names one. Used
    /// by the order service side, which receives a target status rather
    /// than an action.
    pub fn action_for(from: OrderStatus, to: OrderStatus) -> Option<OrderAction> {
        TRANSITIONS
            .iter()
            .find(|(source, _, destination)| *source == from && *destination == to)
            .map(|(_, trigger, _)| *trigger)
    }

    /// Validate an action against the table and the delivery guard.
    /// A structurally illegal request fails with `invalid_transition`; a
    /// legal one aimed at an unserviceable destination fails with the
    /// distinct `delivery_restricted` so the operator learns why.
    pub fn validate(
        order: &Order,
        action: OrderAction,
        registry: &DeliveryLocationRegistry,
    ) -> Result<OrderStatus, CoreError> {
        let target = Self::target(order.status, action).ok_or_else(|| {
            CoreError::InvalidTransition {
                from: order.status,
                attempted: action.to_string(),
            }
        })?;
        if !DeliveryGuard::permits(order, registry) {
            return Err(CoreError::DeliveryRestricted {
                country: order
                    .shipping_address
                    .as_ref()
                    .and_then(DeliveryGuard::shipping_country),
            });
        }
        Ok(target)
    }
}

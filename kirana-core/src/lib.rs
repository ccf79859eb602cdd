pub mod gateway;

use kirana_shared::models::OrderStatus;
use uuid::Uuid;

/// Every way a transition request can fail, across the whole core. Errors
/// always cross the boundary as values of this type, never as panics, and
/// each variant carries a stable code the presentation layer can key
/// messages on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("invalid transition from {from}: {attempted} is not allowed")]
    InvalidTransition {
        from: OrderStatus,
        /// The triggering action (client side) or the requested target
        /// status (order service side) that matched no row in the table.
        attempted: String,
    },

    #[error("delivery restricted: no active location serves {}", country.as_deref().unwrap_or("this address"))]
    DeliveryRestricted { country: Option<String> },

    #[error("credentials missing or expired")]
    Unauthorized,

    #[error("order not found: {0}")]
    NotFound(Uuid),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("order {0} already has a mutation in flight")]
    Busy(Uuid),
}

impl CoreError {
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::InvalidTransition { .. } => "invalid_transition",
            CoreError::DeliveryRestricted { .. } => "delivery_restricted",
            CoreError::Unauthorized => "unauthorized",
            CoreError::NotFound(_) => "not_found",
            CoreError::Transport(_) => "transport_error",
            CoreError::Busy(_) => "busy",
        }
    }

    /// Whether the caller may simply re-invoke the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::Transport(_) | CoreError::Busy(_))
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

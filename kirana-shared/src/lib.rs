pub mod events;
pub mod models;

pub use models::{
    DeliveryLocation, LineItem, Order, OrderAction, OrderStatus, PaymentMethod, ShippingAddress,
};

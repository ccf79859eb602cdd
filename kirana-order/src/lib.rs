pub mod availability;
pub mod coordinator;
pub mod engine;
pub mod prioritizer;
pub mod store;

pub use coordinator::MutationCoordinator;
pub use engine::StatusTransitionEngine;
pub use prioritizer::{OrderPrioritizer, SortMode};
pub use store::OrderStore;

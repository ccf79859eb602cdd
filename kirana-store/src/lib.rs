pub mod app_config;
pub mod memory;

pub use app_config::Config;
pub use memory::InMemoryOrderGateway;

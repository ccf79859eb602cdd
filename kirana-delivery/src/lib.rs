pub mod guard;
pub mod registry;
pub mod transfer;

pub use guard::DeliveryGuard;
pub use registry::{BulkToggleOutcome, DeliveryLocationRegistry, LocationUpdate, RegistryError};
pub use transfer::{ExportFormat, ImportSummary, LocationRecord};

use kirana_shared::models::{Order, ShippingAddress};

use crate::registry::DeliveryLocationRegistry;

/// Decides whether fulfillment actions are permitted for an order's
/// destination. Pure: reads the order and the registry, mutates neither,
/// so it can be evaluated once per candidate action without caching.
pub struct DeliveryGuard;

impl DeliveryGuard {
    /// Country-only match against the active registry entries. Orders with
    /// no usable address data are permitted: incomplete legacy records must
    /// not block operators (default-open).
    pub fn permits(order: &Order, registry: &DeliveryLocationRegistry) -> bool {
        let country = order
            .shipping_address
            .as_ref()
            .and_then(Self::shipping_country);
        match country {
            Some(country) => registry.serves_country(&country),
            None => true,
        }
    }

    /// Extract the destination country from an address. Legacy free-text
    /// lines are parsed by taking the text after the final comma; that is a
    /// heuristic, kept isolated here so it can be dropped once legacy data
    /// is migrated to structured addresses.
    pub fn shipping_country(address: &ShippingAddress) -> Option<String> {
        let raw = match address {
            ShippingAddress::Structured { country, .. } => country.as_str(),
            ShippingAddress::Legacy(line) => line.rsplit(',').next().unwrap_or(line),
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

use kirana_shared::models::DeliveryLocation;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::transfer::{ImportSummary, LocationRecord};

/// Holds the set of serviceable delivery areas consulted by the guard.
/// Orders evaluated after a mutation see it immediately; there is no
/// grandfathering of in-flight orders.
pub struct DeliveryLocationRegistry {
    locations: HashMap<Uuid, DeliveryLocation>,
}

/// Partial update for a single location. `None` leaves a field unchanged;
/// an empty `region`/`city` string clears the field.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LocationUpdate {
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub is_active: Option<bool>,
}

/// Result of a bulk toggle. When any requested id is missing, nothing is
/// mutated and `missing` lists the offenders, so a caller never sees a
/// partial silent success.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BulkToggleOutcome {
    pub updated: Vec<Uuid>,
    pub missing: Vec<Uuid>,
}

impl DeliveryLocationRegistry {
    pub fn new() -> Self {
        Self {
            locations: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn get(&self, id: &Uuid) -> Option<&DeliveryLocation> {
        self.locations.get(id)
    }

    /// All locations in a deterministic order (country, region, city, id).
    pub fn list(&self) -> Vec<DeliveryLocation> {
        let mut all: Vec<DeliveryLocation> = self.locations.values().cloned().collect();
        all.sort_by(|a, b| {
            a.country
                .cmp(&b.country)
                .then_with(|| a.region.cmp(&b.region))
                .then_with(|| a.city.cmp(&b.city))
                .then_with(|| a.id.cmp(&b.id))
        });
        all
    }

    pub fn active_count(&self) -> usize {
        self.locations.values().filter(|l| l.is_active).count()
    }

    /// True if any active location's country matches, ignoring case.
    pub fn serves_country(&self, country: &str) -> bool {
        let needle = country.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        self.locations
            .values()
            .any(|l| l.is_active && l.country.trim().to_lowercase() == needle)
    }

    pub fn create(
        &mut self,
        country: String,
        region: Option<String>,
        city: Option<String>,
    ) -> Result<DeliveryLocation, RegistryError> {
        if country.trim().is_empty() {
            return Err(RegistryError::MissingCountry);
        }
        let location = DeliveryLocation::new(country.trim().to_string(), region, city);
        self.locations.insert(location.id, location.clone());
        Ok(location)
    }

    pub fn update(
        &mut self,
        id: &Uuid,
        fields: LocationUpdate,
    ) -> Result<DeliveryLocation, RegistryError> {
        if let Some(country) = &fields.country {
            if country.trim().is_empty() {
                return Err(RegistryError::MissingCountry);
            }
        }
        let location = self
            .locations
            .get_mut(id)
            .ok_or(RegistryError::NotFound(*id))?;

        if let Some(country) = fields.country {
            location.country = country.trim().to_string();
        }
        if let Some(region) = fields.region {
            location.region = Some(region).filter(|r| !r.trim().is_empty());
        }
        if let Some(city) = fields.city {
            location.city = Some(city).filter(|c| !c.trim().is_empty());
        }
        if let Some(is_active) = fields.is_active {
            location.is_active = is_active;
        }
        Ok(location.clone())
    }

    /// Flip a location's active flag.
    pub fn toggle(&mut self, id: &Uuid) -> Result<DeliveryLocation, RegistryError> {
        let location = self
            .locations
            .get_mut(id)
            .ok_or(RegistryError::NotFound(*id))?;
        location.is_active = !location.is_active;
        tracing::info!(location = %location.id, country = %location.country, is_active = location.is_active, "delivery location toggled");
        Ok(location.clone())
    }

    /// Remove a location. Already-absent is not an error; returns whether
    /// anything was removed.
    pub fn delete(&mut self, id: &Uuid) -> bool {
        self.locations.remove(id).is_some()
    }

    /// Set `is_active` on every member of `ids`. All ids are checked up
    /// front; when any is missing, nothing changes.
    pub fn bulk_toggle(&mut self, ids: &[Uuid], is_active: bool) -> BulkToggleOutcome {
        let missing: Vec<Uuid> = ids
            .iter()
            .filter(|id| !self.locations.contains_key(id))
            .copied()
            .collect();
        if !missing.is_empty() {
            return BulkToggleOutcome {
                updated: Vec::new(),
                missing,
            };
        }
        let mut updated = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(location) = self.locations.get_mut(id) {
                location.is_active = is_active;
                updated.push(*id);
            }
        }
        BulkToggleOutcome {
            updated,
            missing: Vec::new(),
        }
    }

    /// Remove every member of `ids`; ids that no longer exist are skipped.
    /// Returns how many were actually removed.
    pub fn bulk_delete(&mut self, ids: &[Uuid]) -> usize {
        ids.iter()
            .filter(|id| self.locations.remove(id).is_some())
            .count()
    }

    /// Append parsed records as new, active locations. Rows without a
    /// country are skipped and counted, never fatal to the batch.
    pub fn bulk_import(&mut self, records: Vec<LocationRecord>) -> ImportSummary {
        let mut summary = ImportSummary::default();
        for record in records {
            if record.country.trim().is_empty() {
                summary.skipped += 1;
                continue;
            }
            let location = DeliveryLocation::new(
                record.country.trim().to_string(),
                record.region.filter(|r| !r.trim().is_empty()),
                record.city.filter(|c| !c.trim().is_empty()),
            );
            self.locations.insert(location.id, location);
            summary.imported += 1;
        }
        tracing::info!(imported = summary.imported, skipped = summary.skipped, "delivery location import finished");
        summary
    }
}

impl Default for DeliveryLocationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Delivery location not found: {0}")]
    NotFound(Uuid),

    #[error("Delivery location requires a country")]
    MissingCountry,
}

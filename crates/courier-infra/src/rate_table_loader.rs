//! Rate table loader from TOML
//!
//! A rate table file holds service types, the administrative area table and
//! the tariff rows:
//!
//! ```toml
//! [[service_types]]
//! id = 1
//! name = "Standard"
//! delivery_time = "2-3 days"
//!
//! [[areas]]
//! code = "79"
//! name = "Ho Chi Minh City"
//! region = "south"
//!
//! [[rates]]
//! service_type_id = 1
//! region_type = "intra-city"
//! base_price = 15000
//! included_weight_kg = 2
//! price_per_kg = 2500
//! effective_from = "2024-01-01"
//! ```

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use courier_domain::model::{Area, AreaTable, ServiceType, ShippingRate};
use courier_types::{Error, RegionType, Result};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

/// On-disk layout of a rate table file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateTableFile {
    #[serde(default)]
    pub service_types: Vec<ServiceType>,
    #[serde(default)]
    pub areas: Vec<Area>,
    #[serde(default)]
    pub rates: Vec<ShippingRate>,
}

impl RateTableFile {
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::RateTable(format!("Failed to serialize rate table: {}", e)))
    }
}

/// Validated, in-memory rate table
#[derive(Debug, Clone)]
pub struct RateTableLoader {
    service_types: HashMap<u32, ServiceType>,
    areas: AreaTable,
    rates: Vec<ShippingRate>,
}

impl RateTableLoader {
    /// Load a rate table from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::RateTable(format!("Failed to read rate table {}: {}", path.display(), e))
        })?;

        Self::load_from_str(&content)
    }

    /// Load a rate table from a TOML string
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let file: RateTableFile = toml::from_str(toml_content)
            .map_err(|e| Error::RateTable(format!("Failed to parse rate table TOML: {}", e)))?;

        Self::from_file(file)
    }

    /// Validate a parsed rate table
    pub fn from_file(file: RateTableFile) -> Result<Self> {
        let mut service_types = HashMap::new();
        for service in file.service_types {
            if service_types.contains_key(&service.id) {
                return Err(Error::RateTable(format!(
                    "Duplicate service type id: {}",
                    service.id
                )));
            }
            service_types.insert(service.id, service);
        }

        let mut areas = AreaTable::default();
        for area in file.areas {
            if let Some(existing) = areas.get(&area.code) {
                return Err(Error::RateTable(format!(
                    "Duplicate area code: {} ({} and {})",
                    area.code, existing.region, area.region
                )));
            }
            areas.insert(area);
        }

        for (index, rate) in file.rates.iter().enumerate() {
            validate_rate(rate, index, &service_types)?;
        }

        Ok(Self {
            service_types,
            areas,
            rates: file.rates,
        })
    }

    pub fn service_type(&self, id: u32) -> Option<&ServiceType> {
        self.service_types.get(&id)
    }

    /// Service types sorted by id
    pub fn all_service_types(&self) -> Vec<&ServiceType> {
        let mut services: Vec<_> = self.service_types.values().collect();
        services.sort_by_key(|s| s.id);
        services
    }

    pub fn rates(&self) -> &[ShippingRate] {
        &self.rates
    }

    pub fn rates_for(&self, service_type_id: u32, region_type: RegionType) -> Vec<&ShippingRate> {
        self.rates
            .iter()
            .filter(|r| r.matches(service_type_id, region_type))
            .collect()
    }

    pub fn areas(&self) -> &AreaTable {
        &self.areas
    }

    /// Append rate rows after validating them against the known service types
    pub fn add_rates(&mut self, rates: Vec<ShippingRate>) -> Result<usize> {
        let offset = self.rates.len();
        for (index, rate) in rates.iter().enumerate() {
            validate_rate(rate, offset + index, &self.service_types)?;
        }
        let added = rates.len();
        self.rates.extend(rates);
        Ok(added)
    }

    /// Convert back to the on-disk layout
    pub fn to_file(&self) -> RateTableFile {
        RateTableFile {
            service_types: self.all_service_types().into_iter().cloned().collect(),
            areas: self.areas.all_areas().into_iter().cloned().collect(),
            rates: self.rates.clone(),
        }
    }

    /// Write the table as TOML
    ///
    /// The content goes to a temporary file next to `path` which then
    /// replaces it, so a failed write leaves the previous table intact.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = self.to_file().to_toml_string()?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}

fn validate_rate(rate: &ShippingRate, index: usize, service_types: &HashMap<u32, ServiceType>) -> Result<()> {
    let row = index + 1;
    if !service_types.contains_key(&rate.service_type_id) {
        return Err(Error::RateTable(format!(
            "Rate #{} references unknown service type {}",
            row, rate.service_type_id
        )));
    }

    let amounts = [
        ("base_price", rate.base_price),
        ("included_weight_kg", rate.included_weight_kg),
        ("price_per_kg", rate.price_per_kg),
    ];
    for (field, value) in amounts {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::RateTable(format!(
                "Rate #{} has invalid {}: {}",
                row, field, value
            )));
        }
    }
    if !rate.surcharge.is_finite() {
        return Err(Error::RateTable(format!(
            "Rate #{} has invalid surcharge: {}",
            row, rate.surcharge
        )));
    }

    for tier in &rate.tiers {
        if !tier.max_weight_kg.is_finite() || tier.max_weight_kg <= 0.0 || !tier.price.is_finite() || tier.price < 0.0 {
            return Err(Error::RateTable(format!(
                "Rate #{} has invalid weight tier ({} kg, {})",
                row, tier.max_weight_kg, tier.price
            )));
        }
    }

    if let (Some(from), Some(until)) = (rate.effective_from, rate.effective_until) {
        if until < from {
            return Err(Error::RateTable(format!(
                "Rate #{} ends ({}) before it starts ({})",
                row, until, from
            )));
        }
    }

    Ok(())
}

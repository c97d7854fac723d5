//! File-based implementation of the tariff repositories

use std::path::{Path, PathBuf};

use courier_domain::model::{AreaTable, ServiceType, ShippingRate};
use courier_domain::repository::{RateRepository, ServiceTypeRepository};
use courier_types::{Error, RegionType};
use tracing::debug;

use crate::rate_table_loader::RateTableLoader;

/// File-based rate repository (TOML)
///
/// The table is read once and served from memory; imports write through to disk.
pub struct FileRateRepository {
    toml_path: PathBuf,
    loader: RateTableLoader,
}

impl FileRateRepository {
    /// Create a new repository from a TOML file path
    pub fn new(toml_path: PathBuf) -> Result<Self, Error> {
        if !toml_path.exists() {
            return Err(Error::FileNotFound(format!(
                "Rate table not found: {}",
                toml_path.display()
            )));
        }
        let loader = RateTableLoader::load_from_file(&toml_path)?;
        debug!(
            path = %toml_path.display(),
            rates = loader.rates().len(),
            areas = loader.areas().len(),
            "loaded rate table"
        );
        Ok(Self { toml_path, loader })
    }

    /// Get the TOML path
    pub fn toml_path(&self) -> &Path {
        &self.toml_path
    }

    /// Area table used for region classification
    pub fn areas(&self) -> &AreaTable {
        self.loader.areas()
    }

    /// Append imported rows and write the table back to disk
    pub fn import_rates(&mut self, rates: Vec<ShippingRate>) -> Result<usize, Error> {
        let mut updated = self.loader.clone();
        let added = updated.add_rates(rates)?;
        updated.save_to_file(&self.toml_path)?;
        self.loader = updated;
        Ok(added)
    }
}

impl RateRepository for FileRateRepository {
    fn find_rates(
        &self,
        service_type_id: u32,
        region_type: RegionType,
    ) -> Result<Vec<ShippingRate>, Error> {
        Ok(self
            .loader
            .rates_for(service_type_id, region_type)
            .into_iter()
            .cloned()
            .collect())
    }

    fn find_all(&self) -> Result<Vec<ShippingRate>, Error> {
        Ok(self.loader.rates().to_vec())
    }
}

impl ServiceTypeRepository for FileRateRepository {
    fn find_by_id(&self, id: u32) -> Result<Option<ServiceType>, Error> {
        Ok(self.loader.service_type(id).cloned())
    }

    fn find_all(&self) -> Result<Vec<ServiceType>, Error> {
        Ok(self.loader.all_service_types().into_iter().cloned().collect())
    }
}

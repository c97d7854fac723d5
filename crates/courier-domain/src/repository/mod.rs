//! Repository trait definitions for tariff data

use courier_types::{Error, RegionType};

use crate::model::{ServiceType, ShippingRate};

/// Read-only access to shipping rate rows
pub trait RateRepository {
    /// All rows for a (service type, region type) pair, regardless of effective dates
    fn find_rates(
        &self,
        service_type_id: u32,
        region_type: RegionType,
    ) -> Result<Vec<ShippingRate>, Error>;

    /// Every rate row
    fn find_all(&self) -> Result<Vec<ShippingRate>, Error>;
}

/// Read-only access to service tiers
pub trait ServiceTypeRepository {
    /// Find a service type by id
    fn find_by_id(&self, id: u32) -> Result<Option<ServiceType>, Error>;

    /// Every service type
    fn find_all(&self) -> Result<Vec<ServiceType>, Error>;
}

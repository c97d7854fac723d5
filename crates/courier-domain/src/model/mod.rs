//! Domain model types

pub mod area;
pub mod service_type;
pub mod shipping_rate;

pub use area::{Area, AreaTable};
pub use service_type::ServiceType;
pub use shipping_rate::{ShippingRate, WeightTier};

//! Domain services

pub mod region_classifier;
pub mod route_metrics;
pub mod shipping_fee;

pub use region_classifier::RegionClassifier;
pub use route_metrics::{
    calculate_distance, calculate_route_metrics, calculate_route_metrics_with,
    calculate_travel_time, calculate_travel_time_with, route_legs, TravelProfile,
    VehicleTravelParams,
};
pub use shipping_fee::{compute_fee, FeeBreakdown, ShippingCostEstimator};

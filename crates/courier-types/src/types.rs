//! Shared value types

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Vehicle used for a delivery route
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
pub enum VehicleType {
    #[default]
    Truck,
    Van,
    Motorcycle,
}

impl VehicleType {
    /// Parse a vehicle name, returning None for names outside the fleet
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "truck" => Some(VehicleType::Truck),
            "van" => Some(VehicleType::Van),
            "motorcycle" | "motorbike" => Some(VehicleType::Motorcycle),
            _ => None,
        }
    }

    /// Parse a vehicle name; anything unrecognised is treated as a truck
    pub fn from_name(name: &str) -> Self {
        Self::parse(name).unwrap_or(VehicleType::Truck)
    }

    pub fn label(&self) -> &'static str {
        match self {
            VehicleType::Truck => "Truck",
            VehicleType::Van => "Van",
            VehicleType::Motorcycle => "Motorcycle",
        }
    }
}

impl std::fmt::Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Relationship between sender and recipient areas, selects a tariff tier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegionType {
    /// Sender and recipient share the same area code
    IntraCity,
    /// Different area codes within the same higher-level region
    #[serde(alias = "same-region")]
    InterProvince,
    /// Different higher-level regions
    CrossRegion,
}

impl RegionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionType::IntraCity => "intra-city",
            RegionType::InterProvince => "inter-province",
            RegionType::CrossRegion => "cross-region",
        }
    }
}

impl std::fmt::Display for RegionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RegionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "intra-city" => Ok(RegionType::IntraCity),
            "inter-province" | "same-region" => Ok(RegionType::InterProvince),
            "cross-region" => Ok(RegionType::CrossRegion),
            other => Err(Error::InvalidInput(format!("Unknown region type: {}", other))),
        }
    }
}

/// Geographic point on a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Stop {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Parse a "lat,lon" pair
    pub fn parse(input: &str) -> Result<Self> {
        let mut parts = input.split(',').map(str::trim);
        let (lat, lon) = match (parts.next(), parts.next(), parts.next()) {
            (Some(lat), Some(lon), None) => (lat, lon),
            _ => {
                return Err(Error::InvalidInput(format!(
                    "Expected coordinates as \"lat,lon\", got: {}",
                    input
                )))
            }
        };
        Ok(Self::new(parse_coordinate(lat, "latitude")?, parse_coordinate(lon, "longitude")?))
    }

    /// Display name, falling back to the coordinates
    pub fn display_name(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("{:.6},{:.6}", self.latitude, self.longitude),
        }
    }
}

/// Parse a single coordinate value, rejecting text that is not a finite number
pub fn parse_coordinate(value: &str, field: &str) -> Result<f64> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::InvalidInput(format!("Malformed {}: {:?}", field, value))),
    }
}

/// Accumulated distance and time over a route
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMetrics {
    /// Kilometres, rounded to 2 decimals
    pub total_distance: f64,
    /// Whole minutes
    pub total_time: u64,
}

/// One leg between two consecutive stops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegMetrics {
    pub from: String,
    pub to: String,
    pub distance_km: f64,
    pub minutes: u32,
}

//! Tariff rows keyed by (service type, region type)

use chrono::NaiveDate;
use courier_types::RegionType;
use serde::{Deserialize, Serialize};

/// Flat price for parcels up to a weight breakpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTier {
    pub max_weight_kg: f64,
    pub price: f64,
}

/// Shipping tariff for one service tier on one region type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingRate {
    pub service_type_id: u32,
    pub region_type: RegionType,
    pub base_price: f64,
    /// Weight covered by the base price
    #[serde(default)]
    pub included_weight_kg: f64,
    /// Price per kg above the included weight (or above the last tier)
    pub price_per_kg: f64,
    /// Flat amount added after the weight-based price
    #[serde(default)]
    pub surcharge: f64,
    /// Optional weight breakpoints; when present they replace base_price
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tiers: Vec<WeightTier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_until: Option<NaiveDate>,
}

impl ShippingRate {
    pub fn new(service_type_id: u32, region_type: RegionType, base_price: f64, price_per_kg: f64) -> Self {
        Self {
            service_type_id,
            region_type,
            base_price,
            included_weight_kg: 0.0,
            price_per_kg,
            surcharge: 0.0,
            tiers: Vec::new(),
            effective_from: None,
            effective_until: None,
        }
    }

    pub fn matches(&self, service_type_id: u32, region_type: RegionType) -> bool {
        self.service_type_id == service_type_id && self.region_type == region_type
    }

    /// Whether the row applies on the given date (open-ended bounds always match)
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        let after_start = self.effective_from.map_or(true, |from| from <= date);
        let before_end = self.effective_until.map_or(true, |until| date <= until);
        after_start && before_end
    }

    /// Tiers ordered by ascending breakpoint
    pub fn sorted_tiers(&self) -> Vec<WeightTier> {
        let mut tiers = self.tiers.clone();
        tiers.sort_by(|a, b| a.max_weight_kg.total_cmp(&b.max_weight_kg));
        tiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_open_window_always_effective() {
        let rate = ShippingRate::new(1, RegionType::IntraCity, 15000.0, 2500.0);
        assert!(rate.is_effective_on(date(2000, 1, 1)));
        assert!(rate.is_effective_on(date(2099, 12, 31)));
    }

    #[test]
    fn test_window_bounds_inclusive() {
        let mut rate = ShippingRate::new(1, RegionType::IntraCity, 15000.0, 2500.0);
        rate.effective_from = Some(date(2024, 1, 1));
        rate.effective_until = Some(date(2024, 6, 30));
        assert!(rate.is_effective_on(date(2024, 1, 1)));
        assert!(rate.is_effective_on(date(2024, 6, 30)));
        assert!(!rate.is_effective_on(date(2023, 12, 31)));
        assert!(!rate.is_effective_on(date(2024, 7, 1)));
    }

    #[test]
    fn test_sorted_tiers() {
        let mut rate = ShippingRate::new(2, RegionType::CrossRegion, 0.0, 5000.0);
        rate.tiers = vec![
            WeightTier { max_weight_kg: 5.0, price: 60000.0 },
            WeightTier { max_weight_kg: 1.0, price: 30000.0 },
        ];
        let tiers = rate.sorted_tiers();
        assert_eq!(tiers[0].max_weight_kg, 1.0);
        assert_eq!(tiers[1].max_weight_kg, 5.0);
    }
}

//! Shipping fee estimation from the tariff table

use chrono::NaiveDate;
use courier_types::{Error, RegionType, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::ShippingRate;
use crate::repository::{RateRepository, ServiceTypeRepository};
use crate::service::region_classifier::RegionClassifier;

/// How a fee was assembled from a rate row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub service_type_id: u32,
    pub region_type: RegionType,
    pub weight_kg: f64,
    /// Base price, or the matching tier price for tiered rates
    pub base_price: f64,
    /// Weight-dependent part on top of the base price
    pub weight_charge: f64,
    pub surcharge: f64,
    /// Final fee in whole currency units
    pub total: u64,
}

/// Compute the fee for a weight under one rate row
///
/// Linear rates charge `base_price + max(0, weight - included) * price_per_kg`.
/// Tiered rates charge the first tier covering the weight, extrapolating with
/// `price_per_kg` past the last tier. The surcharge is added, then the total is
/// floored to the currency unit and clamped at zero.
pub fn compute_fee(rate: &ShippingRate, weight_kg: f64) -> FeeBreakdown {
    let (base_price, weight_charge) = if rate.tiers.is_empty() {
        let chargeable = (weight_kg - rate.included_weight_kg).max(0.0);
        (rate.base_price, chargeable * rate.price_per_kg)
    } else {
        let tiers = rate.sorted_tiers();
        match tiers.iter().find(|t| weight_kg <= t.max_weight_kg) {
            Some(tier) => (tier.price, 0.0),
            None => {
                // tiers is non-empty here
                let last = &tiers[tiers.len() - 1];
                (last.price, (weight_kg - last.max_weight_kg) * rate.price_per_kg)
            }
        }
    };

    let raw = base_price + weight_charge + rate.surcharge;
    let total = raw.floor().max(0.0) as u64;

    FeeBreakdown {
        service_type_id: rate.service_type_id,
        region_type: rate.region_type,
        weight_kg,
        base_price,
        weight_charge,
        surcharge: rate.surcharge,
        total,
    }
}

/// Estimates shipping fees against a snapshot of the tariff tables
pub struct ShippingCostEstimator<'a> {
    service_types: &'a dyn ServiceTypeRepository,
    rates: &'a dyn RateRepository,
    classifier: &'a dyn RegionClassifier,
    pricing_date: NaiveDate,
}

impl<'a> ShippingCostEstimator<'a> {
    pub fn new(
        service_types: &'a dyn ServiceTypeRepository,
        rates: &'a dyn RateRepository,
        classifier: &'a dyn RegionClassifier,
        pricing_date: NaiveDate,
    ) -> Self {
        Self {
            service_types,
            rates,
            classifier,
            pricing_date,
        }
    }

    /// Fee in whole currency units for a parcel
    pub fn estimate_shipping_fee(
        &self,
        weight_kg: f64,
        service_type_id: u32,
        sender_code: &str,
        recipient_code: &str,
    ) -> Result<u64> {
        self.quote_shipping_fee(weight_kg, service_type_id, sender_code, recipient_code)
            .map(|b| b.total)
    }

    /// Fee with the components it was built from
    pub fn quote_shipping_fee(
        &self,
        weight_kg: f64,
        service_type_id: u32,
        sender_code: &str,
        recipient_code: &str,
    ) -> Result<FeeBreakdown> {
        validate_weight(weight_kg)?;
        self.validate_service_type(service_type_id)?;

        let region_type = self.classifier.classify(sender_code, recipient_code)?;
        let rate = self.resolve_rate(service_type_id, region_type)?;
        let breakdown = compute_fee(&rate, weight_kg);

        debug!(
            service_type_id,
            region_type = %region_type,
            weight_kg,
            fee = breakdown.total,
            "estimated shipping fee"
        );
        Ok(breakdown)
    }

    /// The single rate row effective on the pricing date
    pub fn resolve_rate(&self, service_type_id: u32, region_type: RegionType) -> Result<ShippingRate> {
        let mut matching: Vec<ShippingRate> = self
            .rates
            .find_rates(service_type_id, region_type)?
            .into_iter()
            .filter(|r| r.matches(service_type_id, region_type) && r.is_effective_on(self.pricing_date))
            .collect();

        match matching.len() {
            0 => Err(Error::RateNotFound {
                service_type_id,
                region_type,
            }),
            1 => Ok(matching.remove(0)),
            count => Err(Error::AmbiguousRate {
                service_type_id,
                region_type,
                count,
            }),
        }
    }

    fn validate_service_type(&self, service_type_id: u32) -> Result<()> {
        match self.service_types.find_by_id(service_type_id)? {
            Some(service) if service.active => Ok(()),
            Some(service) => Err(Error::InvalidInput(format!(
                "Service type {} ({}) is not active",
                service.id, service.name
            ))),
            None => Err(Error::InvalidInput(format!(
                "Unknown service type: {}",
                service_type_id
            ))),
        }
    }
}

fn validate_weight(weight_kg: f64) -> Result<()> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "Weight must be a positive number of kg, got {}",
            weight_kg
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Area, AreaTable, ServiceType, WeightTier};

    struct MemoryTariffs {
        service_types: Vec<ServiceType>,
        rates: Vec<ShippingRate>,
    }

    impl RateRepository for MemoryTariffs {
        fn find_rates(&self, service_type_id: u32, region_type: RegionType) -> Result<Vec<ShippingRate>> {
            Ok(self
                .rates
                .iter()
                .filter(|r| r.matches(service_type_id, region_type))
                .cloned()
                .collect())
        }

        fn find_all(&self) -> Result<Vec<ShippingRate>> {
            Ok(self.rates.clone())
        }
    }

    impl ServiceTypeRepository for MemoryTariffs {
        fn find_by_id(&self, id: u32) -> Result<Option<ServiceType>> {
            Ok(self.service_types.iter().find(|s| s.id == id).cloned())
        }

        fn find_all(&self) -> Result<Vec<ServiceType>> {
            Ok(self.service_types.clone())
        }
    }

    fn service(id: u32, name: &str, active: bool) -> ServiceType {
        ServiceType {
            id,
            name: name.to_string(),
            delivery_time: None,
            active,
        }
    }

    fn areas() -> AreaTable {
        let area = |code: &str, region: &str| Area {
            code: code.to_string(),
            name: None,
            region: region.to_string(),
        };
        AreaTable::new(vec![area("79", "south"), area("74", "south"), area("01", "north")])
    }

    fn tariffs() -> MemoryTariffs {
        let mut intra = ShippingRate::new(1, RegionType::IntraCity, 15000.0, 2500.0);
        intra.included_weight_kg = 2.0;

        let mut inter = ShippingRate::new(1, RegionType::InterProvince, 25000.0, 4000.0);
        inter.included_weight_kg = 1.0;
        inter.surcharge = 3000.5;

        let mut express_cross = ShippingRate::new(2, RegionType::CrossRegion, 0.0, 8000.0);
        express_cross.tiers = vec![
            WeightTier { max_weight_kg: 3.0, price: 70000.0 },
            WeightTier { max_weight_kg: 1.0, price: 45000.0 },
        ];

        MemoryTariffs {
            service_types: vec![
                service(1, "Standard", true),
                service(2, "Express", true),
                service(3, "Retired economy", false),
            ],
            rates: vec![intra, inter, express_cross],
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    // ==========================================
    // compute_fee
    // ==========================================

    #[test]
    fn test_linear_within_included_weight() {
        let mut rate = ShippingRate::new(1, RegionType::IntraCity, 15000.0, 2500.0);
        rate.included_weight_kg = 2.0;
        assert_eq!(compute_fee(&rate, 1.5).total, 15000);
        assert_eq!(compute_fee(&rate, 2.0).total, 15000);
    }

    #[test]
    fn test_linear_above_included_weight_floors() {
        let mut rate = ShippingRate::new(1, RegionType::IntraCity, 15000.0, 2500.0);
        rate.included_weight_kg = 2.0;
        // 15000 + 0.5 * 2500 = 16250
        assert_eq!(compute_fee(&rate, 2.5).total, 16250);
        // 15000 + 0.3333 * 2500 = 15833.33 -> 15833
        assert_eq!(compute_fee(&rate, 2.0 + 1.0 / 3.0).total, 15833);
    }

    #[test]
    fn test_surcharge_added_before_floor() {
        let mut rate = ShippingRate::new(1, RegionType::InterProvince, 100.2, 0.0);
        rate.surcharge = 0.9;
        let fee = compute_fee(&rate, 1.0);
        assert_eq!(fee.total, 101);
        assert!((fee.surcharge - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_components_clamp_to_zero() {
        let mut rate = ShippingRate::new(1, RegionType::IntraCity, 1000.0, 0.0);
        rate.surcharge = -5000.0;
        assert_eq!(compute_fee(&rate, 1.0).total, 0);
    }

    #[test]
    fn test_tiers_pick_first_covering_tier() {
        let rate = &tariffs().rates[2];
        assert_eq!(compute_fee(rate, 0.4).total, 45000);
        assert_eq!(compute_fee(rate, 1.0).total, 45000);
        assert_eq!(compute_fee(rate, 1.01).total, 70000);
        assert_eq!(compute_fee(rate, 3.0).total, 70000);
    }

    #[test]
    fn test_tiers_extrapolate_past_last_tier() {
        let rate = &tariffs().rates[2];
        // 70000 + 1.5 * 8000
        let fee = compute_fee(rate, 4.5);
        assert_eq!(fee.total, 82000);
        assert!((fee.base_price - 70000.0).abs() < f64::EPSILON);
        assert!((fee.weight_charge - 12000.0).abs() < 1e-9);
    }

    // ==========================================
    // Estimator
    // ==========================================

    #[test]
    fn test_estimate_intra_city_is_deterministic() {
        let t = tariffs();
        let a = areas();
        let estimator = ShippingCostEstimator::new(&t, &t, &a, today());
        let first = estimator.estimate_shipping_fee(2.5, 1, "79", "79").unwrap();
        let second = estimator.estimate_shipping_fee(2.5, 1, "79", "79").unwrap();
        assert_eq!(first, 16250);
        assert_eq!(first, second);
    }

    #[test]
    fn test_quote_inter_province_breakdown() {
        let t = tariffs();
        let a = areas();
        let estimator = ShippingCostEstimator::new(&t, &t, &a, today());
        let quote = estimator.quote_shipping_fee(3.0, 1, "79", "74").unwrap();
        assert_eq!(quote.region_type, RegionType::InterProvince);
        // 25000 + 2 * 4000 + 3000.5 = 36000.5
        assert_eq!(quote.total, 36000);
    }

    #[test]
    fn test_estimate_cross_region_tiered() {
        let t = tariffs();
        let a = areas();
        let estimator = ShippingCostEstimator::new(&t, &t, &a, today());
        assert_eq!(estimator.estimate_shipping_fee(0.8, 2, "79", "01").unwrap(), 45000);
    }

    #[test]
    fn test_invalid_weight_rejected() {
        let t = tariffs();
        let a = areas();
        let estimator = ShippingCostEstimator::new(&t, &t, &a, today());
        for weight in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = estimator.estimate_shipping_fee(weight, 1, "79", "79");
            assert!(matches!(result, Err(Error::InvalidInput(_))), "weight {}", weight);
        }
    }

    #[test]
    fn test_unknown_and_inactive_service_rejected() {
        let t = tariffs();
        let a = areas();
        let estimator = ShippingCostEstimator::new(&t, &t, &a, today());
        assert!(matches!(
            estimator.estimate_shipping_fee(1.0, 42, "79", "79"),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            estimator.estimate_shipping_fee(1.0, 3, "79", "79"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_missing_rate_fails_loudly() {
        let t = tariffs();
        let a = areas();
        let estimator = ShippingCostEstimator::new(&t, &t, &a, today());
        // Express has no intra-city row
        let err = estimator.estimate_shipping_fee(1.0, 2, "79", "79").unwrap_err();
        assert!(matches!(
            err,
            Error::RateNotFound {
                service_type_id: 2,
                region_type: RegionType::IntraCity
            }
        ));
    }

    #[test]
    fn test_duplicate_effective_rows_are_ambiguous() {
        let mut t = tariffs();
        t.rates.push(ShippingRate::new(1, RegionType::IntraCity, 99999.0, 0.0));
        let a = areas();
        let estimator = ShippingCostEstimator::new(&t, &t, &a, today());
        let err = estimator.estimate_shipping_fee(1.0, 1, "79", "79").unwrap_err();
        assert!(matches!(err, Error::AmbiguousRate { count: 2, .. }));
    }

    #[test]
    fn test_expired_rows_are_ignored() {
        let mut t = tariffs();
        let mut old = ShippingRate::new(1, RegionType::IntraCity, 99999.0, 0.0);
        old.effective_until = NaiveDate::from_ymd_opt(2023, 12, 31);
        t.rates.push(old);
        let a = areas();
        let estimator = ShippingCostEstimator::new(&t, &t, &a, today());
        assert_eq!(estimator.estimate_shipping_fee(1.0, 1, "79", "79").unwrap(), 15000);
    }

    #[test]
    fn test_unknown_area_is_invalid_input() {
        let t = tariffs();
        let a = areas();
        let estimator = ShippingCostEstimator::new(&t, &t, &a, today());
        assert!(matches!(
            estimator.estimate_shipping_fee(1.0, 1, "79", "99"),
            Err(Error::InvalidInput(_))
        ));
    }
}

//! Quote and route estimation use cases

use chrono::NaiveDate;
use courier_domain::service::{
    calculate_route_metrics_with, calculate_travel_time_with, route_legs,
    FeeBreakdown, ShippingCostEstimator, TravelProfile,
};
use courier_infra::persistence::FileRateRepository;
use courier_types::{Error, LegMetrics, Result, RouteMetrics, Stop, VehicleType};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Config;
use crate::repository::open_rate_repo;

/// Parameters of a fee quote, as received from a caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub weight_kg: f64,
    #[serde(default)]
    pub service_type_id: Option<u32>,
    pub sender_code: String,
    pub recipient_code: String,
}

/// Caller-facing quote result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_fee: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl QuoteResponse {
    pub fn ok(fee: u64) -> Self {
        Self {
            success: true,
            shipping_fee: Some(fee),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            shipping_fee: None,
            message: Some(message.into()),
        }
    }
}

/// Route estimate with its per-leg breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteReport {
    pub vehicle: VehicleType,
    #[serde(flatten)]
    pub metrics: RouteMetrics,
    pub legs: Vec<LegMetrics>,
}

/// Shipping fee and route estimates over a loaded rate table
pub struct QuoteService {
    repo: FileRateRepository,
    pricing_date: NaiveDate,
    travel: TravelProfile,
}

impl QuoteService {
    /// Open the configured rate table
    pub fn open(config: &Config) -> Result<Self> {
        let repo = open_rate_repo(config)?;
        Ok(Self::new(repo, config.effective_pricing_date(), config.travel))
    }

    pub fn new(repo: FileRateRepository, pricing_date: NaiveDate, travel: TravelProfile) -> Self {
        Self {
            repo,
            pricing_date,
            travel,
        }
    }

    pub fn repository(&self) -> &FileRateRepository {
        &self.repo
    }

    pub fn estimator(&self) -> ShippingCostEstimator<'_> {
        ShippingCostEstimator::new(&self.repo, &self.repo, self.repo.areas(), self.pricing_date)
    }

    /// Fee with its breakdown; errors are returned unchanged
    pub fn estimate_fee(&self, request: &QuoteRequest) -> Result<FeeBreakdown> {
        let service_type_id = request
            .service_type_id
            .ok_or_else(|| Error::invalid_input("Missing service type id"))?;

        let breakdown = self.estimator().quote_shipping_fee(
            request.weight_kg,
            service_type_id,
            &request.sender_code,
            &request.recipient_code,
        )?;

        info!(
            service_type_id,
            sender = %request.sender_code,
            recipient = %request.recipient_code,
            region_type = %breakdown.region_type,
            fee = breakdown.total,
            "quoted shipping fee"
        );
        Ok(breakdown)
    }

    /// Fee quote in the response shape expected by callers
    pub fn quote(&self, request: &QuoteRequest) -> QuoteResponse {
        match self.estimate_fee(request) {
            Ok(breakdown) => QuoteResponse::ok(breakdown.total),
            Err(e) => {
                warn!(error = %e, "shipping fee quote failed");
                QuoteResponse::failure(e.user_message())
            }
        }
    }

    /// Travel minutes for a distance under the configured profile
    pub fn travel_time(&self, distance_km: f64, vehicle: VehicleType) -> u32 {
        calculate_travel_time_with(&self.travel, distance_km, vehicle)
    }

    /// Route totals and legs under the configured profile
    pub fn route(&self, stops: &[Stop], vehicle: VehicleType) -> RouteReport {
        estimate_route(&self.travel, stops, vehicle)
    }
}

/// Route totals and per-leg breakdown; needs no rate table
pub fn estimate_route(travel: &TravelProfile, stops: &[Stop], vehicle: VehicleType) -> RouteReport {
    let report = RouteReport {
        vehicle,
        metrics: calculate_route_metrics_with(travel, stops, vehicle),
        legs: route_legs(travel, stops, vehicle),
    };
    info!(
        stops = stops.len(),
        vehicle = %vehicle,
        distance_km = report.metrics.total_distance,
        minutes = report.metrics.total_time,
        "estimated route"
    );
    report
}

/// Resolve a vehicle name, falling back to a truck for unknown names
pub fn resolve_vehicle(name: &str) -> VehicleType {
    match VehicleType::parse(name) {
        Some(vehicle) => vehicle,
        None => {
            warn!(vehicle = name, "unknown vehicle type, using Truck speeds");
            VehicleType::Truck
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_json_success() {
        let json = serde_json::to_string(&QuoteResponse::ok(16250)).unwrap();
        assert_eq!(json, r#"{"success":true,"shippingFee":16250}"#);
    }

    #[test]
    fn test_response_json_failure() {
        let json = serde_json::to_string(&QuoteResponse::failure("This route or service is not supported")).unwrap();
        assert_eq!(
            json,
            r#"{"success":false,"message":"This route or service is not supported"}"#
        );
    }

    #[test]
    fn test_request_from_json() {
        let request: QuoteRequest = serde_json::from_str(
            r#"{"weightKg": 2.5, "serviceTypeId": 1, "senderCode": "79", "recipientCode": "01"}"#,
        )
        .unwrap();
        assert_eq!(request.service_type_id, Some(1));
        let missing: QuoteRequest =
            serde_json::from_str(r#"{"weightKg": 2.5, "senderCode": "79", "recipientCode": "01"}"#).unwrap();
        assert_eq!(missing.service_type_id, None);
    }

    #[test]
    fn test_resolve_vehicle_fallback() {
        assert_eq!(resolve_vehicle("van"), VehicleType::Van);
        assert_eq!(resolve_vehicle("bicycle"), VehicleType::Truck);
    }
}

//! Distance and travel time estimation for delivery routes

use courier_types::{Error, LegMetrics, Result, RouteMetrics, Stop, VehicleType};
use serde::{Deserialize, Serialize};

/// Mean Earth radius in km
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Speed and congestion buffer for one vehicle type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleTravelParams {
    /// Average speed in km/h
    pub speed_kmh: f64,
    /// Buffer added per km travelled, in minutes
    pub buffer_minutes_per_km: f64,
    /// Minimum buffer for any trip, in minutes
    pub min_buffer_minutes: f64,
}

/// Tunable travel heuristics for every vehicle type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TravelProfile {
    #[serde(default = "default_truck")]
    pub truck: VehicleTravelParams,
    #[serde(default = "default_van")]
    pub van: VehicleTravelParams,
    #[serde(default = "default_motorcycle")]
    pub motorcycle: VehicleTravelParams,
}

fn default_truck() -> VehicleTravelParams {
    VehicleTravelParams {
        speed_kmh: 60.0,
        buffer_minutes_per_km: 2.0,
        min_buffer_minutes: 30.0,
    }
}

fn default_van() -> VehicleTravelParams {
    VehicleTravelParams {
        speed_kmh: 70.0,
        buffer_minutes_per_km: 2.0,
        min_buffer_minutes: 30.0,
    }
}

fn default_motorcycle() -> VehicleTravelParams {
    VehicleTravelParams {
        speed_kmh: 35.0,
        buffer_minutes_per_km: 3.0,
        min_buffer_minutes: 10.0,
    }
}

impl Default for TravelProfile {
    fn default() -> Self {
        Self {
            truck: default_truck(),
            van: default_van(),
            motorcycle: default_motorcycle(),
        }
    }
}

impl TravelProfile {
    pub fn params(&self, vehicle: VehicleType) -> &VehicleTravelParams {
        match vehicle {
            VehicleType::Truck => &self.truck,
            VehicleType::Van => &self.van,
            VehicleType::Motorcycle => &self.motorcycle,
        }
    }

    /// Speeds must be finite and positive, buffers finite and non-negative
    pub fn validate(&self) -> Result<()> {
        for vehicle in [VehicleType::Truck, VehicleType::Van, VehicleType::Motorcycle] {
            let p = self.params(vehicle);
            if !p.speed_kmh.is_finite() || p.speed_kmh <= 0.0 {
                return Err(Error::invalid_input(format!(
                    "{} speed must be a positive number of km/h, got {}",
                    vehicle.label(),
                    p.speed_kmh
                )));
            }
            let buffers = [
                ("buffer_minutes_per_km", p.buffer_minutes_per_km),
                ("min_buffer_minutes", p.min_buffer_minutes),
            ];
            for (field, value) in buffers {
                if !value.is_finite() || value < 0.0 {
                    return Err(Error::invalid_input(format!(
                        "{} {} must be a non-negative number, got {}",
                        vehicle.label(),
                        field,
                        value
                    )));
                }
            }
        }
        Ok(())
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Great-circle distance in km between two points (Haversine), rounded to 2 decimals
pub fn calculate_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // rounding can push `a` just past 1 for near-antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    round2(EARTH_RADIUS_KM * c)
}

/// Estimated minutes to travel a distance with the default profile
pub fn calculate_travel_time(distance_km: f64, vehicle: VehicleType) -> u32 {
    calculate_travel_time_with(&TravelProfile::default(), distance_km, vehicle)
}

/// Estimated minutes to travel a distance: driving time plus a congestion buffer
pub fn calculate_travel_time_with(profile: &TravelProfile, distance_km: f64, vehicle: VehicleType) -> u32 {
    let params = profile.params(vehicle);
    let base = distance_km / params.speed_kmh * 60.0;
    let buffer = params
        .min_buffer_minutes
        .max(distance_km * params.buffer_minutes_per_km);
    (base + buffer).round() as u32
}

/// Total distance and time over an ordered route with the default profile
pub fn calculate_route_metrics(stops: &[Stop], vehicle: VehicleType) -> RouteMetrics {
    calculate_route_metrics_with(&TravelProfile::default(), stops, vehicle)
}

/// Total distance and time over an ordered route; legs are summed in the given order
pub fn calculate_route_metrics_with(profile: &TravelProfile, stops: &[Stop], vehicle: VehicleType) -> RouteMetrics {
    if stops.len() < 2 {
        return RouteMetrics::default();
    }

    let mut total_distance = 0.0;
    let mut total_time: u64 = 0;
    for pair in stops.windows(2) {
        let distance = leg_distance(&pair[0], &pair[1]);
        total_distance += distance;
        total_time += u64::from(calculate_travel_time_with(profile, distance, vehicle));
    }

    RouteMetrics {
        total_distance: round2(total_distance),
        total_time,
    }
}

/// Per-leg breakdown of a route
pub fn route_legs(profile: &TravelProfile, stops: &[Stop], vehicle: VehicleType) -> Vec<LegMetrics> {
    stops
        .windows(2)
        .map(|pair| {
            let distance_km = leg_distance(&pair[0], &pair[1]);
            LegMetrics {
                from: pair[0].display_name(),
                to: pair[1].display_name(),
                distance_km,
                minutes: calculate_travel_time_with(profile, distance_km, vehicle),
            }
        })
        .collect()
}

fn leg_distance(from: &Stop, to: &Stop) -> f64 {
    calculate_distance(from.latitude, from.longitude, to.latitude, to.longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Ho Chi Minh City: District 10 and District 1
    const HCM_D10: (f64, f64) = (10.762622, 106.660172);
    const HCM_D1: (f64, f64) = (10.776889, 106.700806);
    const HANOI: (f64, f64) = (21.028511, 105.804817);
    const DA_NANG: (f64, f64) = (16.054407, 108.202164);

    fn stop(p: (f64, f64)) -> Stop {
        Stop::new(p.0, p.1)
    }

    // ==========================================
    // Distance
    // ==========================================

    #[test]
    fn test_distance_within_city() {
        let d = calculate_distance(HCM_D10.0, HCM_D10.1, HCM_D1.0, HCM_D1.1);
        assert!(d > 4.5 && d < 6.0, "unexpected distance {}", d);
        assert!((d - 4.71).abs() < 1e-9);
    }

    #[test]
    fn test_distance_long_haul() {
        let d = calculate_distance(HCM_D10.0, HCM_D10.1, HANOI.0, HANOI.1);
        assert!((d - 1145.16).abs() < 1e-9);
    }

    #[test]
    fn test_distance_symmetric() {
        let points = [HCM_D10, HCM_D1, HANOI, DA_NANG, (-33.8688, 151.2093), (51.5074, -0.1278)];
        for a in points {
            for b in points {
                assert_eq!(
                    calculate_distance(a.0, a.1, b.0, b.1),
                    calculate_distance(b.0, b.1, a.0, a.1)
                );
            }
        }
    }

    #[test]
    fn test_profile_validation() {
        assert!(TravelProfile::default().validate().is_ok());

        let mut stalled = TravelProfile::default();
        stalled.truck.speed_kmh = 0.0;
        assert!(matches!(stalled.validate(), Err(Error::InvalidInput(_))));

        let mut negative = TravelProfile::default();
        negative.van.buffer_minutes_per_km = -1.0;
        assert!(negative.validate().is_err());

        let mut infinite = TravelProfile::default();
        infinite.motorcycle.min_buffer_minutes = f64::INFINITY;
        assert!(infinite.validate().is_err());
    }

    #[test]
    fn test_distance_antipodal_is_finite() {
        let d = calculate_distance(-87.5, 10.0, 87.5, -170.0);
        assert!((d - 20015.09).abs() < 0.01, "unexpected distance {}", d);

        let mut lat = -90.0;
        while lat <= 90.0 {
            let d = calculate_distance(lat, 10.0, -lat, -170.0);
            assert!(d.is_finite(), "NaN distance at lat={}", lat);
            assert!(calculate_travel_time(d, VehicleType::Truck) > 0);
            lat += 0.1;
        }
    }

    #[test]
    fn test_distance_same_point_is_zero() {
        assert_eq!(calculate_distance(HANOI.0, HANOI.1, HANOI.0, HANOI.1), 0.0);
        assert_eq!(calculate_distance(0.0, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_distance_nan_propagates() {
        assert!(calculate_distance(f64::NAN, 106.0, 10.0, 106.0).is_nan());
    }

    // ==========================================
    // Travel time
    // ==========================================

    #[test]
    fn test_travel_time_truck_60km() {
        // 60 min driving + max(30, 120) buffer
        assert_eq!(calculate_travel_time(60.0, VehicleType::Truck), 180);
    }

    #[test]
    fn test_travel_time_van() {
        // 70 km: 60 min driving + max(30, 140) buffer
        assert_eq!(calculate_travel_time(70.0, VehicleType::Van), 200);
    }

    #[test]
    fn test_travel_time_motorcycle() {
        // 7 km: 12 min driving + max(10, 21) buffer
        assert_eq!(calculate_travel_time(7.0, VehicleType::Motorcycle), 33);
        // 2 km: 3.43 min driving + floor of 10
        assert_eq!(calculate_travel_time(2.0, VehicleType::Motorcycle), 13);
    }

    #[test]
    fn test_travel_time_buffer_floors() {
        for i in 0..200 {
            let d = i as f64 * 0.37;
            assert!(calculate_travel_time(d, VehicleType::Motorcycle) >= 10);
            assert!(calculate_travel_time(d, VehicleType::Truck) >= 30);
            assert!(calculate_travel_time(d, VehicleType::Van) >= 30);
        }
        assert_eq!(calculate_travel_time(0.0, VehicleType::Truck), 30);
        assert_eq!(calculate_travel_time(0.0, VehicleType::Motorcycle), 10);
    }

    #[test]
    fn test_travel_time_custom_profile() {
        let mut profile = TravelProfile::default();
        profile.truck.speed_kmh = 30.0;
        profile.truck.min_buffer_minutes = 0.0;
        profile.truck.buffer_minutes_per_km = 0.0;
        assert_eq!(calculate_travel_time_with(&profile, 15.0, VehicleType::Truck), 30);
    }

    // ==========================================
    // Route metrics
    // ==========================================

    #[test]
    fn test_route_empty_and_single() {
        assert_eq!(calculate_route_metrics(&[], VehicleType::Truck), RouteMetrics::default());
        let single = calculate_route_metrics(&[stop(HANOI)], VehicleType::Van);
        assert_eq!(single.total_distance, 0.0);
        assert_eq!(single.total_time, 0);
    }

    #[test]
    fn test_route_single_leg_matches_functions() {
        let metrics = calculate_route_metrics(&[stop(HCM_D10), stop(HCM_D1)], VehicleType::Motorcycle);
        let d = calculate_distance(HCM_D10.0, HCM_D10.1, HCM_D1.0, HCM_D1.1);
        assert_eq!(metrics.total_distance, d);
        assert_eq!(metrics.total_time, calculate_travel_time(d, VehicleType::Motorcycle) as u64);
    }

    #[test]
    fn test_route_additive_over_legs() {
        let (a, b, c) = (stop(HCM_D10), stop(HANOI), stop(DA_NANG));
        for vehicle in [VehicleType::Truck, VehicleType::Van, VehicleType::Motorcycle] {
            let whole = calculate_route_metrics(&[a.clone(), b.clone(), c.clone()], vehicle);
            let first = calculate_route_metrics(&[a.clone(), b.clone()], vehicle);
            let second = calculate_route_metrics(&[b.clone(), c.clone()], vehicle);
            assert!((whole.total_distance - (first.total_distance + second.total_distance)).abs() < 1e-6);
            assert_eq!(whole.total_time, first.total_time + second.total_time);
        }
    }

    #[test]
    fn test_route_order_is_respected() {
        let forward = calculate_route_metrics(&[stop(HCM_D10), stop(HANOI), stop(HCM_D1)], VehicleType::Truck);
        let direct = calculate_route_metrics(&[stop(HCM_D10), stop(HCM_D1), stop(HANOI)], VehicleType::Truck);
        assert!(forward.total_distance > direct.total_distance);
    }

    #[test]
    fn test_route_legs_breakdown() {
        let stops = vec![
            stop(HCM_D10).with_label("Depot"),
            stop(HCM_D1),
            stop(DA_NANG).with_label("Da Nang hub"),
        ];
        let legs = route_legs(&TravelProfile::default(), &stops, VehicleType::Van);
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0].from, "Depot");
        assert_eq!(legs[1].to, "Da Nang hub");
        let metrics = calculate_route_metrics(&stops, VehicleType::Van);
        let summed: u64 = legs.iter().map(|l| l.minutes as u64).sum();
        assert_eq!(summed, metrics.total_time);
    }
}

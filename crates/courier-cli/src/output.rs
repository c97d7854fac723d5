//! Output formatting module

use courier_app::app::RouteReport;
use courier_domain::model::{ServiceType, ShippingRate};
use courier_domain::service::FeeBreakdown;
use courier_types::{OutputFormat, Result};
use serde::Serialize;

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn output_fee(output_format: OutputFormat, breakdown: &FeeBreakdown, service: Option<&ServiceType>) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(breakdown);
    }

    println!("\nShipping Fee");
    println!("============");
    match service {
        Some(s) => {
            println!("Service:         {} ({})", s.name, s.id);
            if let Some(ref eta) = s.delivery_time {
                println!("Delivery time:   {}", eta);
            }
        }
        None => println!("Service:         {}", breakdown.service_type_id),
    }
    println!("Region type:     {}", breakdown.region_type);
    println!("Weight:          {:.2} kg", breakdown.weight_kg);
    println!("-------------------------");
    println!("Base price:      {:.0}", breakdown.base_price);
    println!("Weight charge:   {:.0}", breakdown.weight_charge);
    if breakdown.surcharge != 0.0 {
        println!("Surcharge:       {:.0}", breakdown.surcharge);
    }
    println!("-------------------------");
    println!("Total:           {}", breakdown.total);
    Ok(())
}

pub fn output_distance(output_format: OutputFormat, distance_km: f64) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(&serde_json::json!({ "distanceKm": distance_km }));
    }
    println!("Distance: {:.2} km", distance_km);
    Ok(())
}

pub fn output_travel_time(output_format: OutputFormat, distance_km: f64, vehicle: &str, minutes: u32) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "distanceKm": distance_km,
            "vehicle": vehicle,
            "minutes": minutes,
        }));
    }
    println!(
        "Travel time: {} min ({:.2} km by {})",
        minutes, distance_km, vehicle
    );
    Ok(())
}

pub fn output_route(output_format: OutputFormat, report: &RouteReport) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(report);
    }

    println!("\nRoute Estimate ({})", report.vehicle);
    println!("==============================");
    if report.legs.is_empty() {
        println!("Fewer than two stops: nothing to travel.");
    } else {
        println!("{:<4} {:<22} {:<22} {:>10} {:>8}", "Leg", "From", "To", "Distance", "Time");
        println!("{}", "-".repeat(70));
        for (i, leg) in report.legs.iter().enumerate() {
            println!(
                "{:<4} {:<22} {:<22} {:>7.2} km {:>4} min",
                i + 1,
                truncate(&leg.from, 22),
                truncate(&leg.to, 22),
                leg.distance_km,
                leg.minutes
            );
        }
        println!("{}", "-".repeat(70));
    }
    println!("Total distance:  {:.2} km", report.metrics.total_distance);
    println!(
        "Total time:      {} min ({}h {:02}m)",
        report.metrics.total_time,
        report.metrics.total_time / 60,
        report.metrics.total_time % 60
    );
    Ok(())
}

pub fn output_rates(output_format: OutputFormat, services: &[ServiceType], rates: &[ShippingRate]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "serviceTypes": services,
            "rates": rates,
        }));
    }

    println!("\nService Types");
    println!("=============");
    for s in services {
        println!(
            "{:>3}  {:<24} {:<12} {}",
            s.id,
            truncate(&s.name, 24),
            s.delivery_time.as_deref().unwrap_or("-"),
            if s.active { "" } else { "(inactive)" }
        );
    }

    println!("\nRates");
    println!("=====");
    println!(
        "{:>3}  {:<15} {:>10} {:>8} {:>8} {:>8}  {}",
        "Svc", "Region", "Base", "Incl.kg", "Per kg", "Surch.", "Effective"
    );
    println!("{}", "-".repeat(80));
    for r in rates {
        let base = if r.tiers.is_empty() {
            format!("{:.0}", r.base_price)
        } else {
            format!("{} tiers", r.tiers.len())
        };
        println!(
            "{:>3}  {:<15} {:>10} {:>8.2} {:>8.0} {:>8.0}  {}",
            r.service_type_id,
            r.region_type.as_str(),
            base,
            r.included_weight_kg,
            r.price_per_kg,
            r.surcharge,
            effective_window(r)
        );
    }
    Ok(())
}

fn effective_window(rate: &ShippingRate) -> String {
    match (rate.effective_from, rate.effective_until) {
        (None, None) => "always".to_string(),
        (Some(from), None) => format!("from {}", from),
        (None, Some(until)) => format!("until {}", until),
        (Some(from), Some(until)) => format!("{} .. {}", from, until),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let truncated: String = s.chars().take(max_len.saturating_sub(2)).collect();
        format!("{}..", truncated)
    } else {
        s.to_string()
    }
}

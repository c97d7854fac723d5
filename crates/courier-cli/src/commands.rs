//! Command handlers

use std::path::PathBuf;

use courier_app::app::{
    estimate_route, generate_quote_report, quote_batch, resolve_vehicle, QuoteRequest, QuoteService,
};
use courier_app::config::Config;
use courier_app::repository::open_rate_repo;
use courier_domain::repository::{RateRepository, ServiceTypeRepository};
use courier_domain::service::{calculate_distance, calculate_travel_time_with};
use courier_infra::csv_loader::{load_rates_from_csv, load_shipments_from_csv, load_stops_from_csv};
use courier_types::{Error, OutputFormat, Result, Stop, VehicleType};
use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::output::{output_distance, output_fee, output_rates, output_route, output_travel_time};

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref rates) = cli.rates {
        config.rate_table = Some(rates.clone());
    }
    if cli.pricing_date.is_some() {
        config.pricing_date = cli.pricing_date;
    }
    let output_format = cli.format.unwrap_or(config.output_format);
    debug!(
        rate_table = ?config.rate_table,
        pricing_date = %config.effective_pricing_date(),
        vehicle = %config.vehicle,
        "resolved configuration"
    );

    match &cli.command {
        Commands::Fee {
            weight,
            service,
            from,
            to,
        } => cmd_fee(&config, output_format, quote_request(*weight, *service, from, to)),

        Commands::Quote {
            weight,
            service,
            from,
            to,
        } => cmd_quote(&config, quote_request(*weight, *service, from, to)),

        Commands::QuoteBatch { csv } => cmd_quote_batch(&config, csv.clone(), output_format),

        Commands::Distance { from, to } => cmd_distance(from, to, output_format),

        Commands::TravelTime { distance, vehicle } => {
            let vehicle = pick_vehicle(&config, vehicle.as_deref());
            cmd_travel_time(&config, *distance, vehicle, output_format)
        }

        Commands::Route {
            stops,
            csv,
            vehicle,
        } => {
            let vehicle = pick_vehicle(&config, vehicle.as_deref());
            cmd_route(&config, stops, csv.clone(), vehicle, output_format)
        }

        Commands::Rates { import } => cmd_rates(&config, import.clone(), output_format),

        Commands::Config {
            show,
            set_rate_table,
            set_output,
            set_vehicle,
            set_pricing_date,
            clear_pricing_date,
            reset,
        } => cmd_config(
            *show,
            set_rate_table.clone(),
            *set_output,
            set_vehicle.clone(),
            *set_pricing_date,
            *clear_pricing_date,
            *reset,
        ),
    }
}

fn quote_request(weight: f64, service: Option<u32>, from: &str, to: &str) -> QuoteRequest {
    QuoteRequest {
        weight_kg: weight,
        service_type_id: service,
        sender_code: from.to_string(),
        recipient_code: to.to_string(),
    }
}

fn pick_vehicle(config: &Config, name: Option<&str>) -> VehicleType {
    match name {
        Some(name) => resolve_vehicle(name),
        None => config.vehicle,
    }
}

fn cmd_fee(config: &Config, output_format: OutputFormat, request: QuoteRequest) -> Result<()> {
    let service = QuoteService::open(config)?;
    let breakdown = service.estimate_fee(&request)?;
    let service_type = service.repository().find_by_id(breakdown.service_type_id)?;
    output_fee(output_format, &breakdown, service_type.as_ref())
}

/// Always prints the response object, even for failed quotes
fn cmd_quote(config: &Config, request: QuoteRequest) -> Result<()> {
    let service = QuoteService::open(config)?;
    let response = service.quote(&request);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn cmd_quote_batch(config: &Config, csv_path: PathBuf, output_format: OutputFormat) -> Result<()> {
    if !csv_path.exists() {
        return Err(Error::FileNotFound(format!(
            "CSV file not found: {}",
            csv_path.display()
        )));
    }

    let service = QuoteService::open(config)?;

    eprintln!("Loading shipments from: {}", csv_path.display());
    let shipments = load_shipments_from_csv(&csv_path)?;
    eprintln!("  Loaded {} shipments", shipments.len());

    let results = quote_batch(&service, &shipments);

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        OutputFormat::Table => {
            println!("{}", generate_quote_report(&results));
        }
    }

    let failed = results.iter().filter(|r| !r.is_success()).count();
    if failed > 0 {
        eprintln!("\nWarning: {} shipment(s) could not be quoted", failed);
    }

    Ok(())
}

fn cmd_distance(from: &str, to: &str, output_format: OutputFormat) -> Result<()> {
    let from = Stop::parse(from)?;
    let to = Stop::parse(to)?;
    let distance = calculate_distance(from.latitude, from.longitude, to.latitude, to.longitude);
    output_distance(output_format, distance)
}

fn cmd_travel_time(config: &Config, distance: f64, vehicle: VehicleType, output_format: OutputFormat) -> Result<()> {
    if !distance.is_finite() || distance < 0.0 {
        return Err(Error::invalid_input(format!(
            "Distance must be a non-negative number of km, got {}",
            distance
        )));
    }
    let minutes = calculate_travel_time_with(&config.travel, distance, vehicle);
    output_travel_time(output_format, distance, vehicle.label(), minutes)
}

fn cmd_route(
    config: &Config,
    stop_args: &[String],
    csv: Option<PathBuf>,
    vehicle: VehicleType,
    output_format: OutputFormat,
) -> Result<()> {
    let stops = match csv {
        Some(path) => {
            if !path.exists() {
                return Err(Error::FileNotFound(format!(
                    "CSV file not found: {}",
                    path.display()
                )));
            }
            load_stops_from_csv(&path)?
        }
        None => stop_args
            .iter()
            .map(|s| Stop::parse(s))
            .collect::<Result<Vec<_>>>()?,
    };

    let report = estimate_route(&config.travel, &stops, vehicle);
    output_route(output_format, &report)
}

fn cmd_rates(config: &Config, import: Option<PathBuf>, output_format: OutputFormat) -> Result<()> {
    let mut repo = open_rate_repo(config)?;

    if let Some(csv_path) = import {
        if !csv_path.exists() {
            return Err(Error::FileNotFound(format!(
                "CSV file not found: {}",
                csv_path.display()
            )));
        }
        let rates = load_rates_from_csv(&csv_path)?;
        let added = repo.import_rates(rates)?;
        println!(
            "Imported {} rate(s) into {}",
            added,
            repo.toml_path().display()
        );
        return Ok(());
    }

    let services = ServiceTypeRepository::find_all(&repo)?;
    let mut rates = RateRepository::find_all(&repo)?;
    rates.sort_by(|a, b| {
        a.service_type_id
            .cmp(&b.service_type_id)
            .then(a.region_type.cmp(&b.region_type))
    });
    output_rates(output_format, &services, &rates)
}

fn cmd_config(
    show: bool,
    set_rate_table: Option<PathBuf>,
    set_output: Option<OutputFormat>,
    set_vehicle: Option<String>,
    set_pricing_date: Option<chrono::NaiveDate>,
    clear_pricing_date: bool,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(path) = set_rate_table {
        config.rate_table = Some(path);
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if let Some(name) = set_vehicle {
        config.vehicle = VehicleType::parse(&name).ok_or_else(|| {
            Error::invalid_input(format!(
                "Unknown vehicle type: {} (expected Truck, Van or Motorcycle)",
                name
            ))
        })?;
        modified = true;
    }

    if let Some(date) = set_pricing_date {
        config.pricing_date = Some(date);
        modified = true;
    }

    if clear_pricing_date {
        config.pricing_date = None;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}

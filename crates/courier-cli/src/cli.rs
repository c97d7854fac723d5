//! CLI definition using clap

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use courier_types::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "courier-estimator")]
#[command(version)]
#[command(about = "Shipping fee and delivery route estimation")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Rate table (TOML). Uses config value if not specified.
    #[arg(long, global = true)]
    pub rates: Option<PathBuf>,

    /// Price against rates effective on this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub pricing_date: Option<NaiveDate>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Estimate the shipping fee for a parcel
    Fee {
        /// Parcel weight in kg
        #[arg(long, short = 'w', allow_hyphen_values = true)]
        weight: f64,

        /// Service type id (e.g. 1 = Standard)
        #[arg(long, short = 's')]
        service: Option<u32>,

        /// Sender area code
        #[arg(long)]
        from: String,

        /// Recipient area code
        #[arg(long)]
        to: String,
    },

    /// Quote a parcel and print the caller response ({success, shippingFee, message})
    Quote {
        /// Parcel weight in kg
        #[arg(long, short = 'w', allow_hyphen_values = true)]
        weight: f64,

        /// Service type id
        #[arg(long, short = 's')]
        service: Option<u32>,

        /// Sender area code
        #[arg(long)]
        from: String,

        /// Recipient area code
        #[arg(long)]
        to: String,
    },

    /// Quote every shipment in a CSV file
    QuoteBatch {
        /// CSV with columns id, weight_kg, service_type_id, sender_code, recipient_code
        #[arg(long)]
        csv: PathBuf,
    },

    /// Great-circle distance between two points
    Distance {
        /// Start point as "lat,lon"
        #[arg(allow_hyphen_values = true)]
        from: String,

        /// End point as "lat,lon"
        #[arg(allow_hyphen_values = true)]
        to: String,
    },

    /// Estimated travel time for a distance
    TravelTime {
        /// Distance in km
        distance: f64,

        /// Vehicle type (Truck, Van, Motorcycle). Uses config value if not specified.
        #[arg(long)]
        vehicle: Option<String>,
    },

    /// Distance and time over an ordered list of stops
    Route {
        /// Stop as "lat,lon"; repeat in travel order
        #[arg(long = "stop", allow_hyphen_values = true)]
        stops: Vec<String>,

        /// CSV with columns latitude, longitude and optional label
        #[arg(long, conflicts_with = "stops")]
        csv: Option<PathBuf>,

        /// Vehicle type (Truck, Van, Motorcycle). Uses config value if not specified.
        #[arg(long)]
        vehicle: Option<String>,
    },

    /// List service types and rates, or import rates from CSV
    Rates {
        /// Append rates from a CSV file to the rate table
        #[arg(long)]
        import: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set rate table path
        #[arg(long)]
        set_rate_table: Option<PathBuf>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set default vehicle type
        #[arg(long)]
        set_vehicle: Option<String>,

        /// Pin the pricing date (YYYY-MM-DD)
        #[arg(long)]
        set_pricing_date: Option<NaiveDate>,

        /// Price against today's rates again
        #[arg(long)]
        clear_pricing_date: bool,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fee() {
        let cli = Cli::try_parse_from([
            "courier-estimator", "fee", "-w", "2.5", "-s", "1", "--from", "79", "--to", "01",
        ])
        .unwrap();
        match cli.command {
            Commands::Fee { weight, service, from, to } => {
                assert_eq!(weight, 2.5);
                assert_eq!(service, Some(1));
                assert_eq!(from, "79");
                assert_eq!(to, "01");
            }
            _ => panic!("expected fee command"),
        }
    }

    #[test]
    fn test_parse_route_with_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "courier-estimator", "route", "--stop", "-33.8688,151.2093", "--stop", "-37.8136,144.9631",
            "--vehicle", "Van", "-f", "json",
        ])
        .unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Json));
        match cli.command {
            Commands::Route { stops, csv, vehicle } => {
                assert_eq!(stops.len(), 2);
                assert!(csv.is_none());
                assert_eq!(vehicle.as_deref(), Some("Van"));
            }
            _ => panic!("expected route command"),
        }
    }

    #[test]
    fn test_parse_global_pricing_date() {
        let cli = Cli::try_parse_from([
            "courier-estimator", "rates", "--pricing-date", "2024-01-31",
        ])
        .unwrap();
        assert_eq!(cli.pricing_date, NaiveDate::from_ymd_opt(2024, 1, 31));
    }
}

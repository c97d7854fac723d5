//! Configuration management for courier-estimator
//!
//! Config stored at: ~/.config/courier-estimator/config.json

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use courier_domain::service::TravelProfile;
use courier_types::{ConfigError, OutputFormat, Result, VehicleType};
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "courier-estimator";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Rate table override (defaults to rates.toml in the config directory)
    #[serde(default)]
    pub rate_table: Option<PathBuf>,

    /// Default output format (json, table)
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,

    /// Vehicle used for route estimates when none is given
    #[serde(default)]
    pub vehicle: VehicleType,

    /// Price against rates effective on this date instead of today
    #[serde(default)]
    pub pricing_date: Option<NaiveDate>,

    /// Speeds and congestion buffers per vehicle type
    #[serde(default)]
    pub travel: TravelProfile,
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rate_table: None,
            output_format: default_output_format(),
            vehicle: VehicleType::default(),
            pricing_date: None,
            travel: TravelProfile::default(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join(APP_DIR);
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Rate table path, honoring the override
    pub fn rate_table_path(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.rate_table {
            return Ok(path.clone());
        }
        Ok(Self::config_dir()?.join("rates.toml"))
    }

    /// Date used to pick effective rate rows
    pub fn effective_pricing_date(&self) -> NaiveDate {
        self.pricing_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Load config from the default location, or use defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from a file, or use defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
            config
                .travel
                .validate()
                .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save config to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .map_err(|e| ConfigError::SaveError(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Courier Estimator Configuration")?;
        writeln!(f, "===============================")?;
        writeln!(f)?;
        writeln!(
            f,
            "Rate table:     {}",
            self.rate_table_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Output format:  {}", self.output_format)?;
        writeln!(f, "Vehicle:        {}", self.vehicle)?;
        writeln!(
            f,
            "Pricing date:   {}",
            self.pricing_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "(today)".to_string())
        )?;
        writeln!(f)?;
        writeln!(f, "Travel profile:  speed    buffer/km  min buffer")?;
        for vehicle in [VehicleType::Truck, VehicleType::Van, VehicleType::Motorcycle] {
            let p = self.travel.params(vehicle);
            writeln!(
                f,
                "  {:<12} {:>5.0} km/h {:>5.1} min {:>6.0} min",
                vehicle.label(),
                p.speed_kmh,
                p.buffer_minutes_per_km,
                p.min_buffer_minutes
            )?;
        }

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:    {}", path.display())?;
        }

        Ok(())
    }
}

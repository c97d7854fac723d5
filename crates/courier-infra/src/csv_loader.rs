//! CSV loaders for rate imports, batch shipments and route stops
//!
//! All files are UTF-8 with a header row. Column order does not matter;
//! columns are matched by header name.

use std::path::Path;

use chrono::NaiveDate;
use courier_domain::model::ShippingRate;
use courier_types::{Error, RegionType, Stop};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CsvLoaderError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid value in row {row}, column {column}: {value:?}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
}

impl From<CsvLoaderError> for Error {
    fn from(err: CsvLoaderError) -> Self {
        Error::Csv(err.to_string())
    }
}

/// One parcel to quote in a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentRow {
    pub id: String,
    pub weight_kg: f64,
    /// None when the cell is empty
    pub service_type_id: Option<u32>,
    pub sender_code: String,
    pub recipient_code: String,
}

/// Column lookup by header name
struct Columns {
    headers: csv::StringRecord,
}

impl Columns {
    fn new(headers: csv::StringRecord, required: &[&str]) -> Result<Self, CsvLoaderError> {
        for col in required {
            if !headers.iter().any(|h| h.eq_ignore_ascii_case(col)) {
                return Err(CsvLoaderError::MissingColumn(col.to_string()));
            }
        }
        Ok(Self { headers })
    }

    fn get<'r>(&self, record: &'r csv::StringRecord, column: &str) -> &'r str {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(column))
            .and_then(|idx| record.get(idx))
            .unwrap_or("")
    }
}

fn open_reader(path: &Path) -> Result<csv::Reader<std::fs::File>, CsvLoaderError> {
    let file = std::fs::File::open(path)?;
    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file))
}

fn invalid(row: usize, column: &str, value: &str) -> CsvLoaderError {
    CsvLoaderError::InvalidValue {
        row,
        column: column.to_string(),
        value: value.to_string(),
    }
}

fn parse_f64(value: &str, row: usize, column: &str) -> Result<f64, CsvLoaderError> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(invalid(row, column, value)),
    }
}

fn parse_optional_f64(value: &str, row: usize, column: &str) -> Result<f64, CsvLoaderError> {
    if value.is_empty() {
        Ok(0.0)
    } else {
        parse_f64(value, row, column)
    }
}

fn parse_u32(value: &str, row: usize, column: &str) -> Result<u32, CsvLoaderError> {
    value.parse::<u32>().map_err(|_| invalid(row, column, value))
}

fn parse_optional_date(value: &str, row: usize, column: &str) -> Result<Option<NaiveDate>, CsvLoaderError> {
    if value.is_empty() {
        return Ok(None);
    }
    let formats = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];
    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Ok(Some(date));
        }
    }
    Err(invalid(row, column, value))
}

/// Load tariff rows for import
///
/// Required columns: service_type_id, region_type, base_price, price_per_kg.
/// Optional: included_weight_kg, surcharge, effective_from, effective_until.
pub fn load_rates_from_csv(path: &Path) -> Result<Vec<ShippingRate>, CsvLoaderError> {
    let mut reader = open_reader(path)?;
    let columns = Columns::new(
        reader.headers()?.clone(),
        &["service_type_id", "region_type", "base_price", "price_per_kg"],
    )?;

    let mut rates = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        let row = row_idx + 2; // header is row 1

        let region_raw = columns.get(&record, "region_type");
        let region_type: RegionType = region_raw
            .parse()
            .map_err(|_| invalid(row, "region_type", region_raw))?;

        let mut rate = ShippingRate::new(
            parse_u32(columns.get(&record, "service_type_id"), row, "service_type_id")?,
            region_type,
            parse_f64(columns.get(&record, "base_price"), row, "base_price")?,
            parse_f64(columns.get(&record, "price_per_kg"), row, "price_per_kg")?,
        );
        rate.included_weight_kg =
            parse_optional_f64(columns.get(&record, "included_weight_kg"), row, "included_weight_kg")?;
        rate.surcharge = parse_optional_f64(columns.get(&record, "surcharge"), row, "surcharge")?;
        rate.effective_from =
            parse_optional_date(columns.get(&record, "effective_from"), row, "effective_from")?;
        rate.effective_until =
            parse_optional_date(columns.get(&record, "effective_until"), row, "effective_until")?;
        rates.push(rate);
    }

    Ok(rates)
}

/// Load parcels to quote
///
/// Required columns: id, weight_kg, service_type_id, sender_code, recipient_code.
/// An empty service_type_id is kept as missing so the quote can report it.
pub fn load_shipments_from_csv(path: &Path) -> Result<Vec<ShipmentRow>, CsvLoaderError> {
    let mut reader = open_reader(path)?;
    let columns = Columns::new(
        reader.headers()?.clone(),
        &["id", "weight_kg", "service_type_id", "sender_code", "recipient_code"],
    )?;

    let mut shipments = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        let row = row_idx + 2;

        let service_raw = columns.get(&record, "service_type_id");
        let service_type_id = if service_raw.is_empty() {
            None
        } else {
            Some(parse_u32(service_raw, row, "service_type_id")?)
        };

        shipments.push(ShipmentRow {
            id: columns.get(&record, "id").to_string(),
            weight_kg: parse_f64(columns.get(&record, "weight_kg"), row, "weight_kg")?,
            service_type_id,
            sender_code: columns.get(&record, "sender_code").to_string(),
            recipient_code: columns.get(&record, "recipient_code").to_string(),
        });
    }

    Ok(shipments)
}

/// Load an ordered list of route stops
///
/// Required columns: latitude, longitude. Optional: label.
pub fn load_stops_from_csv(path: &Path) -> Result<Vec<Stop>, CsvLoaderError> {
    let mut reader = open_reader(path)?;
    let columns = Columns::new(reader.headers()?.clone(), &["latitude", "longitude"])?;

    let mut stops = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        let row = row_idx + 2;

        let mut stop = Stop::new(
            parse_f64(columns.get(&record, "latitude"), row, "latitude")?,
            parse_f64(columns.get(&record, "longitude"), row, "longitude")?,
        );
        let label = columns.get(&record, "label");
        if !label.is_empty() {
            stop = stop.with_label(label);
        }
        stops.push(stop);
    }

    Ok(stops)
}

//! Batch quoting of shipments loaded from CSV

use courier_infra::csv_loader::ShipmentRow;
use courier_types::RegionType;
use serde::{Deserialize, Serialize};

use super::quote_service::{QuoteRequest, QuoteService};

/// Quote outcome for a single shipment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchQuoteResult {
    pub shipment: ShipmentRow,
    pub region_type: Option<RegionType>,
    pub shipping_fee: Option<u64>,
    pub error: Option<String>,
}

impl BatchQuoteResult {
    pub fn is_success(&self) -> bool {
        self.shipping_fee.is_some()
    }
}

/// Quote every shipment independently; one failure does not stop the batch
pub fn quote_batch(service: &QuoteService, shipments: &[ShipmentRow]) -> Vec<BatchQuoteResult> {
    shipments
        .iter()
        .map(|shipment| {
            let request = QuoteRequest {
                weight_kg: shipment.weight_kg,
                service_type_id: shipment.service_type_id,
                sender_code: shipment.sender_code.clone(),
                recipient_code: shipment.recipient_code.clone(),
            };
            match service.estimate_fee(&request) {
                Ok(breakdown) => BatchQuoteResult {
                    shipment: shipment.clone(),
                    region_type: Some(breakdown.region_type),
                    shipping_fee: Some(breakdown.total),
                    error: None,
                },
                Err(e) => BatchQuoteResult {
                    shipment: shipment.clone(),
                    region_type: None,
                    shipping_fee: None,
                    error: Some(e.user_message()),
                },
            }
        })
        .collect()
}

pub fn generate_quote_report(results: &[BatchQuoteResult]) -> String {
    let total = results.len();
    let quoted: Vec<_> = results.iter().filter(|r| r.is_success()).collect();
    let failed: Vec<_> = results.iter().filter(|r| !r.is_success()).collect();
    let total_fees: u64 = quoted.iter().filter_map(|r| r.shipping_fee).sum();

    let mut report = String::new();
    report.push_str("==================================================\n");
    report.push_str("              Shipping Quote Report               \n");
    report.push_str("==================================================\n\n");
    report.push_str("[Summary]\n");
    report.push_str(&format!("  Total shipments:   {}\n", total));
    report.push_str(&format!("  Quoted:            {}\n", quoted.len()));
    report.push_str(&format!("  Failed:            {}\n", failed.len()));
    report.push_str(&format!("  Total fees:        {}\n", total_fees));
    if !quoted.is_empty() {
        let average = total_fees as f64 / quoted.len() as f64;
        report.push_str(&format!("  Average fee:       {:.0}\n", average));
    }
    report.push('\n');

    if !quoted.is_empty() {
        report.push_str("[Quoted Shipments]\n");
        report.push_str("-".repeat(70).as_str());
        report.push('\n');
        report.push_str(&format!(
            "{:<12} {:>8} {:>7} {:<8} {:<8} {:<15} {:>10}\n",
            "ID", "Weight", "Service", "From", "To", "Region", "Fee"
        ));
        report.push_str("-".repeat(70).as_str());
        report.push('\n');
        for result in &quoted {
            let s = &result.shipment;
            report.push_str(&format!(
                "{:<12} {:>6.2}kg {:>7} {:<8} {:<8} {:<15} {:>10}\n",
                truncate_str(&s.id, 11),
                s.weight_kg,
                s.service_type_id.map(|id| id.to_string()).unwrap_or_default(),
                truncate_str(&s.sender_code, 7),
                truncate_str(&s.recipient_code, 7),
                result.region_type.map(|r| r.as_str()).unwrap_or("-"),
                result.shipping_fee.unwrap_or(0)
            ));
        }
        report.push('\n');
    }

    if !failed.is_empty() {
        report.push_str("[Failed Shipments]\n");
        report.push_str("-".repeat(70).as_str());
        report.push('\n');
        for result in &failed {
            report.push_str(&format!(
                "{:<12} {}\n",
                truncate_str(&result.shipment.id, 11),
                result.error.as_deref().unwrap_or("unknown error")
            ));
        }
        report.push('\n');
    }

    report.push_str("==================================================\n");
    report
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let truncated: String = s.chars().take(max_len.saturating_sub(2)).collect();
        format!("{}..", truncated)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str) -> ShipmentRow {
        ShipmentRow {
            id: id.to_string(),
            weight_kg: 1.0,
            service_type_id: Some(1),
            sender_code: "79".to_string(),
            recipient_code: "79".to_string(),
        }
    }

    #[test]
    fn test_report_summary() {
        let results = vec![
            BatchQuoteResult {
                shipment: row("A1"),
                region_type: Some(RegionType::IntraCity),
                shipping_fee: Some(15000),
                error: None,
            },
            BatchQuoteResult {
                shipment: row("A2"),
                region_type: Some(RegionType::IntraCity),
                shipping_fee: Some(17000),
                error: None,
            },
            BatchQuoteResult {
                shipment: row("A3"),
                region_type: None,
                shipping_fee: None,
                error: Some("This route or service is not supported".to_string()),
            },
        ];
        let report = generate_quote_report(&results);
        assert!(report.contains("Total shipments:   3"));
        assert!(report.contains("Quoted:            2"));
        assert!(report.contains("Total fees:        32000"));
        assert!(report.contains("Average fee:       16000"));
        assert!(report.contains("[Failed Shipments]"));
        assert!(report.contains("not supported"));
    }

    #[test]
    fn test_report_empty() {
        let report = generate_quote_report(&[]);
        assert!(report.contains("Total shipments:   0"));
        assert!(!report.contains("[Quoted Shipments]"));
        assert!(!report.contains("Average fee"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate_str("ORDER-2024-000123", 11), "ORDER-202..");
        assert_eq!(truncate_str("A1", 11), "A1");
    }
}

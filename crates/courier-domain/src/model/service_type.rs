//! Service tier definitions

use serde::{Deserialize, Serialize};

/// Delivery service tier selected by the sender (e.g. standard, express)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceType {
    pub id: u32,
    pub name: String,
    /// Human readable delivery promise, e.g. "2-3 days"
    #[serde(default)]
    pub delivery_time: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

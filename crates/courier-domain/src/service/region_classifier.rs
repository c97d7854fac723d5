//! Region classification of sender/recipient area pairs

use courier_types::{Error, RegionType, Result};

use crate::model::area::{normalize_code, AreaTable};

/// Maps a (sender, recipient) area code pair to the tariff region type
pub trait RegionClassifier {
    fn classify(&self, sender_code: &str, recipient_code: &str) -> Result<RegionType>;
}

impl RegionClassifier for AreaTable {
    fn classify(&self, sender_code: &str, recipient_code: &str) -> Result<RegionType> {
        let sender = require_code(sender_code, "sender")?;
        let recipient = require_code(recipient_code, "recipient")?;

        if sender == recipient {
            return Ok(RegionType::IntraCity);
        }

        let sender_region = self
            .region_of(&sender)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown sender area code: {}", sender_code.trim())))?;
        let recipient_region = self
            .region_of(&recipient)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown recipient area code: {}", recipient_code.trim())))?;

        if normalize_code(sender_region) == normalize_code(recipient_region) {
            Ok(RegionType::InterProvince)
        } else {
            Ok(RegionType::CrossRegion)
        }
    }
}

fn require_code(code: &str, role: &str) -> Result<String> {
    let normalized = normalize_code(code);
    if normalized.is_empty() {
        return Err(Error::InvalidInput(format!("Missing {} area code", role)));
    }
    Ok(normalized)
}

//! Administrative area data used to classify shipments

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// An administrative area (city/province) and the region it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Higher-level region, e.g. "north", "central", "south"
    pub region: String,
}

/// Lookup table of areas keyed by normalized code
#[derive(Debug, Clone, Default)]
pub struct AreaTable {
    areas: HashMap<String, Area>,
}

impl AreaTable {
    pub fn new(areas: impl IntoIterator<Item = Area>) -> Self {
        let mut table = Self::default();
        for area in areas {
            table.insert(area);
        }
        table
    }

    /// Insert an area, replacing any previous entry with the same code
    pub fn insert(&mut self, area: Area) {
        self.areas.insert(normalize_code(&area.code), area);
    }

    pub fn get(&self, code: &str) -> Option<&Area> {
        self.areas.get(&normalize_code(code))
    }

    pub fn region_of(&self, code: &str) -> Option<&str> {
        self.get(code).map(|a| a.region.as_str())
    }

    /// Areas sorted by code
    pub fn all_areas(&self) -> Vec<&Area> {
        let mut areas: Vec<_> = self.areas.values().collect();
        areas.sort_by(|a, b| a.code.cmp(&b.code));
        areas
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}

/// Area codes compare trimmed and case-insensitively
pub fn normalize_code(code: &str) -> String {
    code.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(code: &str, region: &str) -> Area {
        Area {
            code: code.to_string(),
            name: None,
            region: region.to_string(),
        }
    }

    #[test]
    fn test_lookup_is_normalized() {
        let table = AreaTable::new(vec![area("HCM", "south"), area("HN", "north")]);
        assert_eq!(table.region_of(" hcm "), Some("south"));
        assert_eq!(table.region_of("HN"), Some("north"));
        assert_eq!(table.region_of("DN"), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_insert_replaces() {
        let mut table = AreaTable::new(vec![area("79", "south")]);
        table.insert(area("79", "central"));
        assert_eq!(table.len(), 1);
        assert_eq!(table.region_of("79"), Some("central"));
    }
}

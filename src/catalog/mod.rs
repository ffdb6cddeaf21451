use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A boat class as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassHandicap {
    /// Label as written in the configuration
    pub label: String,
    pub py: u32,
}

/// Lookup table from boat-class label to class handicap.
///
/// Keys are matched case-insensitively after trimming. The catalog is an
/// explicit value handed to whoever resolves entries; nothing caches it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, u32>", into = "BTreeMap<String, u32>")]
pub struct HandicapCatalog {
    classes: BTreeMap<String, ClassHandicap>,
}

impl HandicapCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalised key for a class label: trimmed and upper-cased.
    pub fn key(label: &str) -> String {
        label.trim().to_uppercase()
    }

    pub fn insert(&mut self, label: &str, py: u32) {
        self.classes.insert(
            Self::key(label),
            ClassHandicap {
                label: label.trim().to_string(),
                py,
            },
        );
    }

    pub fn lookup(&self, label: &str) -> Option<u32> {
        self.classes.get(&Self::key(label)).map(|class| class.py)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.classes.contains_key(&Self::key(label))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Classes sorted by display label.
    pub fn classes(&self) -> Vec<&ClassHandicap> {
        let mut classes: Vec<&ClassHandicap> = self.classes.values().collect();
        classes.sort_by(|a, b| a.label.cmp(&b.label));
        classes
    }
}

impl From<BTreeMap<String, u32>> for HandicapCatalog {
    fn from(map: BTreeMap<String, u32>) -> Self {
        let mut catalog = HandicapCatalog::new();
        for (label, py) in &map {
            catalog.insert(label, *py);
        }
        catalog
    }
}

impl From<HandicapCatalog> for BTreeMap<String, u32> {
    fn from(catalog: HandicapCatalog) -> Self {
        catalog
            .classes
            .into_values()
            .map(|class| (class.label, class.py))
            .collect()
    }
}

impl<'a> FromIterator<(&'a str, u32)> for HandicapCatalog {
    fn from_iter<I: IntoIterator<Item = (&'a str, u32)>>(iter: I) -> Self {
        let mut catalog = HandicapCatalog::new();
        for (label, py) in iter {
            catalog.insert(label, py);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog: HandicapCatalog = [("Laser", 1100), ("DART 15 / SPRINT 15", 924)]
            .into_iter()
            .collect();
        assert_eq!(catalog.lookup("LASER"), Some(1100));
        assert_eq!(catalog.lookup(" laser "), Some(1100));
        assert_eq!(catalog.lookup("dart 15 / sprint 15"), Some(924));
        assert_eq!(catalog.lookup("Topper"), None);
        assert!(catalog.contains("laser"));
    }

    #[test]
    fn test_parse_from_yaml_map() {
        let yaml = r#"
"DART 15 / SPRINT 15": 924
Laser: 1100
"#;
        let catalog: HandicapCatalog = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.lookup("laser"), Some(1100));
    }

    #[test]
    fn test_classes_sorted_by_label() {
        let catalog: HandicapCatalog = [("Topper", 1365), ("Laser", 1100), ("Albacore", 1040)]
            .into_iter()
            .collect();
        let labels: Vec<&str> = catalog.classes().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Albacore", "Laser", "Topper"]);
    }

    #[test]
    fn test_serialises_back_to_labels() {
        let catalog: HandicapCatalog = [("Laser", 1100)].into_iter().collect();
        let json = serde_json::to_string(&catalog).unwrap();
        assert_eq!(json, r#"{"Laser":1100}"#);
    }
}

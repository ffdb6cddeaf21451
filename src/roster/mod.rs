use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::catalog::HandicapCatalog;

/// Quick-entry details for a regular helm/crew pairing, referenced from race
/// sheets by a short code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickEntry {
    pub code: String,
    pub helm: String,
    pub crew: String,
    /// Boat class key as stored in the catalog
    pub dinghy: String,
    pub py: u32,
    pub personal: u32,
    pub sail_number: String,
    pub age_group: String,
    pub fleet: String,
}

impl QuickEntry {
    /// Parse one roster line:
    /// `QE, helm, crew, class, sailno, personal, age group, fleet`.
    pub fn parse_line(line: &str, catalog: &HandicapCatalog) -> Result<Self> {
        let line = line.replace('\r', "");
        let line = line.trim();
        if line.is_empty() {
            bail!("empty quick-entry line");
        }

        let tokens: Vec<&str> = line.split(',').map(str::trim).collect();
        let [code, helm, crew, dinghy, sail_number, personal, age_group, fleet] = tokens[..] else {
            bail!(
                "quick-entry rows must contain 8 comma separated values: \
                 QE, helm, crew, class, sailno, personal, age group, fleet (found {})",
                tokens.len()
            );
        };

        let Some(py) = catalog.lookup(dinghy) else {
            bail!("unknown class '{}' for quick entry {}", dinghy, code);
        };

        let personal = if personal.is_empty() {
            0
        } else {
            personal.parse::<u32>().with_context(|| {
                format!("invalid personal handicap '{}' for quick entry {}", personal, code)
            })?
        };

        Ok(Self {
            code: code.to_string(),
            helm: helm.to_string(),
            crew: crew.to_string(),
            dinghy: HandicapCatalog::key(dinghy),
            py,
            personal,
            sail_number: sail_number.to_string(),
            age_group: or_default(age_group),
            fleet: or_default(fleet),
        })
    }
}

fn or_default(value: &str) -> String {
    if value.is_empty() {
        "S".to_string()
    } else {
        value.to_string()
    }
}

/// Quick entries keyed by upper-cased code.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    entries: HashMap<String, QuickEntry>,
}

impl Roster {
    pub fn parse(content: &str, catalog: &HandicapCatalog) -> Result<Self> {
        let mut entries = HashMap::new();
        for (number, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let entry = QuickEntry::parse_line(line, catalog)
                .with_context(|| format!("roster line {}", number + 1))?;
            entries.insert(entry.code.to_uppercase(), entry);
        }
        Ok(Self { entries })
    }

    pub fn load(path: &Path, catalog: &HandicapCatalog) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read roster file at {}", path.display()))?;
        Self::parse(&content, catalog)
            .with_context(|| format!("Failed to parse roster {}", path.display()))
    }

    pub fn get(&self, code: &str) -> Option<&QuickEntry> {
        self.entries.get(&code.trim().to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

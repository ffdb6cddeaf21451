use std::collections::HashMap;

use tracing::debug;

use super::types::{EntryPayload, RaceSheet};
use crate::catalog::HandicapCatalog;
use crate::roster::Roster;
use crate::scoring::{Entry, FinishCode};

/// Hands out `<PREFIX><NNN>` entry ids, reusing the id for a repeated
/// helm/crew/class combination.
#[derive(Debug, Default)]
pub struct EntryIdAllocator {
    prefix: String,
    assigned: HashMap<String, String>,
    next: usize,
}

impl EntryIdAllocator {
    /// PREFIX is the first four ASCII letters or digits of the upper-cased series name.
    pub fn for_series(series: &str) -> Self {
        let prefix: String = series
            .to_uppercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .take(4)
            .collect();
        Self {
            prefix,
            assigned: HashMap::new(),
            next: 1,
        }
    }

    pub fn id_for(&mut self, helm: &str, crew: &str, dinghy: &str) -> String {
        let key = format!("{}|{}|{}", helm, crew, dinghy);
        if let Some(existing) = self.assigned.get(&key) {
            return existing.clone();
        }
        let id = format!("{}{:03}", self.prefix, self.next);
        self.next += 1;
        self.assigned.insert(key, id.clone());
        id
    }
}

/// Turn a race sheet into scorer entries, resolving classes and quick entries.
/// Returns all validation errors at once (not just the first).
pub fn resolve_entries(
    sheet: &RaceSheet,
    catalog: &HandicapCatalog,
    roster: Option<&Roster>,
) -> Result<Vec<Entry>, Vec<String>> {
    let mut errors = Vec::new();
    let mut entries = Vec::with_capacity(sheet.entries.len());
    let mut ids = EntryIdAllocator::for_series(&sheet.metadata.series);

    for (i, payload) in sheet.entries.iter().enumerate() {
        let error_count = errors.len();

        let quick = match non_blank(&payload.qe) {
            Some(code) => match roster.and_then(|r| r.get(code)) {
                Some(qe) => Some(qe),
                None if roster.is_none() => {
                    errors.push(format!(
                        "entries[{}].qe: quick entry '{}' used but no roster is configured",
                        i, code
                    ));
                    None
                }
                None => {
                    errors.push(format!("entries[{}].qe: unknown quick-entry code '{}'", i, code));
                    None
                }
            },
            None => None,
        };

        let helm = pick(&payload.helm, quick.map(|q| q.helm.as_str()));
        if helm.is_empty() {
            errors.push(format!("entries[{}].helm: must not be blank", i));
        }
        let crew = pick(&payload.crew, quick.map(|q| q.crew.as_str()));

        let dinghy = HandicapCatalog::key(&pick(&payload.dinghy, quick.map(|q| q.dinghy.as_str())));
        let py = if dinghy.is_empty() {
            errors.push(format!("entries[{}].dinghy: must not be blank", i));
            0
        } else {
            catalog.lookup(&dinghy).unwrap_or_else(|| {
                errors.push(format!(
                    "entries[{}].dinghy: unknown dinghy class '{}'",
                    i,
                    payload.dinghy.as_deref().unwrap_or(&dinghy)
                ));
                0
            })
        };

        let fin_code = match FinishCode::parse_optional(payload.fin_code.as_deref().unwrap_or("")) {
            Ok(code) => code,
            Err(e) => {
                errors.push(format!("entries[{}].finCode: {}", i, e));
                None
            }
        };

        let time_seconds = match elapsed_seconds(payload) {
            Ok(seconds) => seconds,
            Err(e) => {
                errors.push(format!("entries[{}].time: {}", i, e));
                0
            }
        };

        if errors.len() > error_count {
            continue;
        }

        let entry_id = match non_blank(&payload.entry_id) {
            Some(id) => id.to_string(),
            None => ids.id_for(&helm, &crew, &dinghy),
        };

        entries.push(Entry {
            entry_id,
            helm,
            crew,
            dinghy,
            py,
            personal: payload
                .personal
                .or(quick.map(|q| q.personal))
                .unwrap_or(0),
            laps: payload.laps.unwrap_or(0),
            time_seconds,
            fin_code,
            sail_number: pick(&payload.sail_number, quick.map(|q| q.sail_number.as_str())),
        });
    }

    if errors.is_empty() {
        debug!(
            series = %sheet.metadata.series,
            entries = entries.len(),
            "resolved race sheet"
        );
        Ok(entries)
    } else {
        Err(errors)
    }
}

/// Elapsed seconds from `timeSeconds`, falling back to a `time` duration string.
fn elapsed_seconds(payload: &EntryPayload) -> Result<u64, String> {
    if let Some(seconds) = payload.time_seconds {
        return Ok(seconds);
    }
    match non_blank(&payload.time) {
        Some(text) => humantime::parse_duration(text)
            .map(|d| d.as_secs())
            .map_err(|e| format!("invalid duration '{}' - {}", text, e)),
        None => Ok(0),
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Explicit sheet value if present, otherwise the quick-entry value.
fn pick(explicit: &Option<String>, fallback: Option<&str>) -> String {
    non_blank(explicit)
        .or(fallback.map(str::trim))
        .unwrap_or("")
        .to_string()
}

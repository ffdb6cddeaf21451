use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::corrected::{self, CorrectedTimes};
use super::entry::{fin_code_text, Entry, FinishCode};
use super::ranking::award_places;

/// One line of the class-handicap ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRow {
    pub entry_id: String,
    pub helm: String,
    #[serde(default)]
    pub crew: String,
    #[serde(default)]
    pub dinghy: String,
    #[serde(default)]
    pub py: u32,
    #[serde(default)]
    pub laps: u32,
    #[serde(default)]
    pub time_seconds: u64,
    /// None when the entry was not timed
    pub corrected: Option<u64>,
    pub rank: Option<f64>,
    #[serde(default, with = "fin_code_text")]
    pub fin_code: Option<FinishCode>,
}

impl ClassRow {
    /// The finish code text for non-finishers, otherwise the corrected time.
    pub fn corrected_display(&self) -> String {
        match (self.fin_code, self.corrected) {
            (Some(code), _) => code.to_string(),
            (None, Some(value)) => value.to_string(),
            (None, None) => String::new(),
        }
    }
}

/// One line of the personal-handicap ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalRow {
    pub entry_id: String,
    pub helm: String,
    #[serde(default)]
    pub crew: String,
    pub personal_handicap: u32,
    pub corrected: Option<u64>,
    pub rank: Option<f64>,
}

/// Both rankings produced by scoring one race.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceResult {
    pub race_id: String,
    pub class_rows: Vec<ClassRow>,
    pub personal_rows: Vec<PersonalRow>,
}

impl RaceResult {
    pub fn is_empty(&self) -> bool {
        self.class_rows.is_empty() && self.personal_rows.is_empty()
    }
}

/// Score one race.
///
/// Non-finishers and untimed entries take `dnc_place` (default: entry count + 1)
/// in the class ranking. In the personal ranking only non-finishers take it;
/// an untimed entry there has no rank. Entries without a personal handicap
/// are left out of the personal ranking.
/// Every supplied entry appears in the class ranking.
pub fn score_race(
    race_id: impl Into<String>,
    entries: &[Entry],
    dnc_place: Option<f64>,
) -> RaceResult {
    let race_id = race_id.into();
    if entries.is_empty() {
        return RaceResult {
            race_id,
            ..RaceResult::default()
        };
    }

    let dnc = dnc_place
        .filter(|place| place.is_finite() && *place > 0.0)
        .unwrap_or((entries.len() + 1) as f64);

    let max_laps = entries
        .iter()
        .map(|entry| entry.laps)
        .filter(|laps| *laps > 0)
        .max()
        .unwrap_or(0);

    let times: Vec<CorrectedTimes> = entries
        .iter()
        .map(|entry| corrected::for_entry(entry, max_laps))
        .collect();

    debug!(
        race = %race_id,
        entries = entries.len(),
        max_laps,
        dnc,
        "scoring race"
    );

    let mut class_places = vec![dnc; entries.len()];
    let class_candidates: Vec<(usize, u64)> = entries
        .iter()
        .zip(&times)
        .enumerate()
        .filter(|(_, (entry, t))| !entry.has_finish_code() && t.class != 0)
        .map(|(index, (_, t))| (index, t.class))
        .collect();
    for (index, place) in award_places(&class_candidates) {
        class_places[index] = place;
    }

    // Untimed entries without a finish code stay unplaced on the personal track
    let mut personal_places: Vec<Option<f64>> = entries
        .iter()
        .map(|entry| entry.has_finish_code().then_some(dnc))
        .collect();
    let personal_candidates: Vec<(usize, u64)> = entries
        .iter()
        .zip(&times)
        .enumerate()
        .filter(|(_, (entry, t))| {
            !entry.has_finish_code() && t.personal != 0 && entry.personal != 0
        })
        .map(|(index, (_, t))| (index, t.personal))
        .collect();
    for (index, place) in award_places(&personal_candidates) {
        personal_places[index] = Some(place);
    }

    trace!(
        timed = class_candidates.len(),
        personal = personal_candidates.len(),
        "places awarded"
    );

    let class_rows = ranked_order(&class_places)
        .into_iter()
        .map(|index| {
            let entry = &entries[index];
            ClassRow {
                entry_id: entry.entry_id.clone(),
                helm: entry.helm.clone(),
                crew: entry.crew.clone(),
                dinghy: entry.dinghy.clone(),
                py: entry.py,
                laps: entry.laps,
                time_seconds: entry.time_seconds,
                corrected: non_zero(times[index].class),
                rank: Some(class_places[index]),
                fin_code: entry.fin_code,
            }
        })
        .collect();

    let personal_sort_keys: Vec<f64> = personal_places
        .iter()
        .map(|place| place.unwrap_or(dnc))
        .collect();
    let personal_rows = ranked_order(&personal_sort_keys)
        .into_iter()
        .filter(|index| entries[*index].personal != 0)
        .map(|index| {
            let entry = &entries[index];
            PersonalRow {
                entry_id: entry.entry_id.clone(),
                helm: entry.helm.clone(),
                crew: entry.crew.clone(),
                personal_handicap: entry.personal,
                corrected: non_zero(times[index].personal),
                rank: personal_places[index],
            }
        })
        .collect();

    RaceResult {
        race_id,
        class_rows,
        personal_rows,
    }
}

/// Entry indices ordered by place, stable on input order.
fn ranked_order(places: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..places.len()).collect();
    order.sort_by(|a, b| places[*a].total_cmp(&places[*b]));
    order
}

fn non_zero(value: u64) -> Option<u64> {
    (value != 0).then_some(value)
}

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, NaiveDate, Utc};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::resolve::resolve_entries;
use super::types::{RaceMetadata, RaceSheet};
use crate::catalog::HandicapCatalog;
use crate::output::{format_race_summary, render_html};
use crate::roster::Roster;
use crate::scoring::{score_race, validate_entries, ClassRow, PersonalRow, RaceResult};
use crate::standings::ScoredRace;

/// Metadata stored alongside a scored race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub series: String,
    pub race: String,
    #[serde(default)]
    pub race_number: Option<u32>,
    pub race_officer: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub start_time: Option<String>,
    pub filename: String,
    pub generated_at: DateTime<Utc>,
}

/// A persisted race result, as written by `score` and read back by `standings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub race_id: String,
    pub metadata: ReportMetadata,
    pub class_results: Vec<ClassRow>,
    pub personal_results: Vec<PersonalRow>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub html: String,
}

impl ScoreReport {
    /// Wrap a scored race with its sheet metadata and renderings.
    pub fn build(metadata: &RaceMetadata, result: RaceResult, generated_at: DateTime<Utc>) -> Self {
        let filename = metadata.filename();
        Self {
            race_id: filename.clone(),
            metadata: ReportMetadata {
                series: metadata.series.clone(),
                race: metadata.race.clone(),
                race_number: metadata.race_number,
                race_officer: metadata.race_officer.clone(),
                date: metadata.date,
                start_time: metadata.start_time_text(),
                filename,
                generated_at,
            },
            summary: format_race_summary(&result.class_rows),
            html: render_html(&result.class_rows, &result.personal_rows),
            class_results: result.class_rows,
            personal_results: result.personal_rows,
        }
    }

    /// Resolve, validate and score a race sheet in one go.
    ///
    /// Returns every resolution or validation problem at once.
    pub fn from_sheet(
        sheet: &RaceSheet,
        catalog: &HandicapCatalog,
        roster: Option<&Roster>,
        dnc_place: Option<f64>,
        generated_at: DateTime<Utc>,
    ) -> Result<Self, Vec<String>> {
        let entries = resolve_entries(sheet, catalog, roster)?;
        validate_entries(&entries)?;
        let result = score_race(sheet.metadata.filename(), &entries, dnc_place);
        Ok(Self::build(&sheet.metadata, result, generated_at))
    }

    pub fn to_result(&self) -> RaceResult {
        RaceResult {
            race_id: self.race_id.clone(),
            class_rows: self.class_results.clone(),
            personal_rows: self.personal_results.clone(),
        }
    }

    /// The race as the standings aggregator sees it.
    pub fn to_scored_race(&self) -> ScoredRace {
        ScoredRace {
            label: self.metadata.race.clone(),
            race_number: self.metadata.race_number,
            date: Some(self.metadata.date),
            start_time: self.metadata.start_time.clone(),
            result: self.to_result(),
        }
    }
}

/// Load a race sheet, parsing JSON for `.json` files and YAML otherwise.
pub fn load_sheet(path: &Path) -> Result<RaceSheet> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read race sheet at {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let sheet = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse race sheet: invalid JSON in {}", path.display()))?
    } else {
        serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse race sheet: invalid YAML in {}", path.display()))?
    };
    Ok(sheet)
}

/// Save a report atomically as `<dir>/<filename>.json`, creating `dir` if needed.
pub fn save_report(dir: &Path, report: &ScoreReport) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory at {}", dir.display()))?;
    }

    let path = dir.join(format!("{}.json", report.metadata.filename));
    let mut file = AtomicWriteFile::open(&path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, report).context("Failed to serialize score report")?;

    file.commit()
        .with_context(|| format!("Failed to save score report to {}", path.display()))?;

    Ok(path)
}

pub fn load_report(path: &Path) -> Result<ScoreReport> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open score report at {}", path.display()))?;
    serde_json::from_reader(file)
        .with_context(|| format!("Failed to load score report {}", path.display()))
}

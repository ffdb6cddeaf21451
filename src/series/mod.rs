use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::sheet::{load_report, ScoreReport};
use crate::standings::{compute_standings, ScoredRace, SeriesInfo, SeriesSettings, Standings};

/// A series definition file: identity, discard settings and the score reports
/// that make up the series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SeriesFile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub settings: SeriesSettings,
    /// Report paths or glob patterns, relative to the series file
    #[serde(default)]
    pub races: Vec<String>,
}

impl SeriesFile {
    pub fn info(&self) -> SeriesInfo {
        SeriesInfo {
            id: self.id.clone(),
            code: self.code.clone(),
            title: self.title.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            settings: self.settings,
        }
    }
}

/// A series definition together with its loaded reports in race order.
#[derive(Debug, Clone)]
pub struct Series {
    pub info: SeriesInfo,
    pub reports: Vec<ScoreReport>,
}

impl Series {
    pub fn scored_races(&self) -> Vec<ScoredRace> {
        self.reports.iter().map(ScoreReport::to_scored_race).collect()
    }

    pub fn standings(&self) -> Standings {
        compute_standings(&self.info, &self.scored_races())
    }
}

/// Load a series file and every score report it names.
pub fn load_series(path: &Path) -> Result<Series> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read series file at {}", path.display()))?;
    let file: SeriesFile = serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse series: invalid YAML in {}", path.display()))?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let paths = expand_race_paths(base, &file.races)?;

    let mut reports = paths
        .iter()
        .map(|p| load_report(p))
        .collect::<Result<Vec<_>>>()?;
    order_reports(&mut reports);

    debug!(series = %file.id, races = reports.len(), "loaded series");
    Ok(Series {
        info: file.info(),
        reports,
    })
}

/// Resolve each entry against `base`; globs expand in path order, and a path
/// matched more than once is kept at its first position.
pub fn expand_race_paths(base: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for pattern in patterns {
        let full = base.join(pattern.trim());
        let full_text = full.to_string_lossy();

        let matches: Vec<PathBuf> = if is_glob(pattern) {
            glob::glob(&full_text)
                .with_context(|| format!("Invalid race pattern '{}'", pattern))?
                .filter_map(|entry| match entry {
                    Ok(path) => Some(path),
                    Err(e) => {
                        warn!("Skipping unreadable path: {}", e);
                        None
                    }
                })
                .collect()
        } else {
            if !full.exists() {
                bail!("Score report not found at {}", full.display());
            }
            vec![full.clone()]
        };

        if matches.is_empty() {
            warn!(pattern = %pattern, "race pattern matched no reports");
        }
        for path in matches {
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }
    Ok(paths)
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Stable sort by race date, then start time, then generation time.
pub fn order_reports(reports: &mut [ScoreReport]) {
    reports.sort_by(|a, b| {
        let a = &a.metadata;
        let b = &b.metadata;
        a.date
            .cmp(&b.date)
            .then_with(|| a.start_time.cmp(&b.start_time))
            .then_with(|| a.generated_at.cmp(&b.generated_at))
    });
}

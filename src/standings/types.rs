use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::scoring::RaceResult;

/// Discard settings for a series.
///
/// Both fields are read leniently: `toCount` accepts an integer or a digit
/// string, `countAll` a boolean or a yes/no style string. Anything else is
/// treated as unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSettings {
    #[serde(default, deserialize_with = "lenient_count")]
    pub to_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub count_all: Option<bool>,
}

impl SeriesSettings {
    /// Number of best scores counted toward a total in a series of `race_count` races.
    ///
    /// An explicit non-negative `to_count` wins over the `ceil(races / 3) + 1`
    /// default, `count_all` overrides both, and the result is clamped to
    /// `0..=race_count`.
    pub fn discard_count(&self, race_count: usize) -> usize {
        let mut to_count = match self.to_count {
            Some(n) if n >= 0 => usize::try_from(n).unwrap_or(usize::MAX),
            _ if race_count > 0 => race_count.div_ceil(3) + 1,
            _ => 0,
        };
        if self.count_all.unwrap_or(false) {
            to_count = race_count;
        }
        to_count.min(race_count)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Int(i64),
    Bool(bool),
    Text(String),
    Other(serde::de::IgnoredAny),
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Loose>::deserialize(deserializer)?;
    Ok(match value {
        Some(Loose::Int(n)) => Some(n),
        Some(Loose::Text(s)) => {
            let s = s.trim();
            if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
                s.parse().ok()
            } else {
                None
            }
        }
        _ => None,
    })
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Loose>::deserialize(deserializer)?;
    Ok(match value {
        Some(Loose::Bool(b)) => Some(b),
        Some(Loose::Text(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "y" => Some(true),
            "false" | "0" | "no" | "n" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// Series identity plus its discard settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesInfo {
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
}

/// An already-scored race as fed to the aggregator, in series order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRace {
    pub label: String,
    pub race_number: Option<u32>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub result: RaceResult,
}

impl ScoredRace {
    pub fn new(label: impl Into<String>, result: RaceResult) -> Self {
        Self {
            label: label.into(),
            race_number: None,
            date: None,
            start_time: None,
            result,
        }
    }
}

/// Schedule line for one race of the series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceSummary {
    pub id: String,
    pub label: String,
    pub race_number: Option<u32>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
}

/// A competitor's score for one race on one track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCell {
    pub value: f64,
    pub is_dnc: bool,
    /// Selected into the competitor's total
    pub counted: bool,
}

impl ScoreCell {
    pub fn scored(value: f64) -> Self {
        Self {
            value,
            is_dnc: false,
            counted: false,
        }
    }

    pub fn dnc(value: f64) -> Self {
        Self {
            value,
            is_dnc: true,
            counted: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    Class,
    Personal,
}

impl Track {
    pub fn label(&self) -> &'static str {
        match self {
            Track::Class => "Class handicap",
            Track::Personal => "Personal handicap",
        }
    }
}

/// One helm's line in a leaderboard. `scores` has one cell per scheduled race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    pub helm: String,
    pub boats: Vec<String>,
    pub crews: Vec<String>,
    pub scores: Vec<ScoreCell>,
    pub total: Option<f64>,
    pub rank: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboard {
    pub track: Track,
    pub competitors: Vec<Competitor>,
}

impl Leaderboard {
    pub fn competitor(&self, helm: &str) -> Option<&Competitor> {
        self.competitors.iter().find(|c| c.helm == helm)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSummary {
    pub id: String,
    pub code: String,
    pub title: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub to_count: usize,
    pub count_all: bool,
    pub race_count: usize,
    pub competitor_count: usize,
    pub dnc_value: f64,
}

/// Full standings for a series: schedule plus one leaderboard per track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standings {
    pub series: SeriesSummary,
    pub races: Vec<RaceSummary>,
    pub class_results: Leaderboard,
    pub personal_results: Leaderboard,
}

impl Standings {
    pub fn leaderboard(&self, track: Track) -> &Leaderboard {
        match track {
            Track::Class => &self.class_results,
            Track::Personal => &self.personal_results,
        }
    }
}

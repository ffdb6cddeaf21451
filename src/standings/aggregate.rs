use std::collections::HashMap;

use tracing::debug;

use super::types::{
    Competitor, Leaderboard, RaceSummary, ScoreCell, ScoredRace, SeriesInfo, SeriesSummary,
    Standings, Track,
};
use crate::scoring::PersonalRow;

/// Scores a helm collected across the series, keyed by race position.
/// `None` records a personal row that carried no rank.
struct CompetitorRecord {
    helm: String,
    boats: Vec<String>,
    crews: Vec<String>,
    class_scores: HashMap<usize, Option<f64>>,
    personal_scores: HashMap<usize, Option<f64>>,
}

impl CompetitorRecord {
    fn new(helm: &str) -> Self {
        Self {
            helm: helm.to_string(),
            boats: Vec::new(),
            crews: Vec::new(),
            class_scores: HashMap::new(),
            personal_scores: HashMap::new(),
        }
    }

    fn add_boat(&mut self, dinghy: &str) {
        if !dinghy.is_empty() && !self.boats.iter().any(|b| b == dinghy) {
            self.boats.push(dinghy.to_string());
        }
    }

    fn add_crew(&mut self, crew: &str, dinghy: &str) {
        if crew.is_empty() {
            return;
        }
        let label = if dinghy.is_empty() {
            crew.to_string()
        } else {
            format!("{} ({})", crew, dinghy)
        };
        if !self.crews.contains(&label) {
            self.crews.push(label);
        }
    }
}

/// Aggregate scored races into class and personal leaderboards.
///
/// Races are processed in the order given; that order defines the schedule
/// and breaks ties between equal per-race scores. Races with a blank id and
/// rows with a blank helm are skipped.
pub fn compute_standings(series: &SeriesInfo, races: &[ScoredRace]) -> Standings {
    let mut schedule: Vec<RaceSummary> = Vec::new();
    let mut records: Vec<CompetitorRecord> = Vec::new();
    let mut by_helm: HashMap<String, usize> = HashMap::new();

    for race in races {
        let race_id = race.result.race_id.trim();
        if race_id.is_empty() {
            debug!(label = %race.label, "skipping race without an id");
            continue;
        }

        let race_index = schedule.len();
        let label = race.label.trim();
        schedule.push(RaceSummary {
            id: race_id.to_string(),
            label: if label.is_empty() {
                format!("Race {}", race_index + 1)
            } else {
                label.to_string()
            },
            race_number: race.race_number,
            date: race.date,
            start_time: race.start_time.clone(),
        });

        let personal_by_entry: HashMap<&str, &PersonalRow> = race
            .result
            .personal_rows
            .iter()
            .filter(|row| !row.entry_id.trim().is_empty())
            .map(|row| (row.entry_id.trim(), row))
            .collect();

        for (index, row) in race.result.class_rows.iter().enumerate() {
            let helm = row.helm.trim();
            if helm.is_empty() {
                continue;
            }

            let slot = *by_helm.entry(helm.to_string()).or_insert_with(|| {
                records.push(CompetitorRecord::new(helm));
                records.len() - 1
            });
            let record = &mut records[slot];

            let dinghy = row.dinghy.trim();
            record.add_boat(dinghy);
            record.add_crew(row.crew.trim(), dinghy);

            let rank = row.rank.unwrap_or((index + 1) as f64);
            record.class_scores.insert(race_index, Some(rank));

            if let Some(personal) = personal_by_entry.get(row.entry_id.trim()) {
                record.personal_scores.insert(race_index, personal.rank);
            }
        }
    }

    let race_count = schedule.len();
    let competitor_count = records.len();
    let dnc_value = (competitor_count + 1) as f64;
    let to_count = series.settings.discard_count(race_count);

    debug!(
        series = %series.id,
        race_count,
        competitor_count,
        to_count,
        "computing standings"
    );

    let build = |track: Track| {
        let competitors = records
            .iter()
            .map(|record| {
                let scores = match track {
                    Track::Class => &record.class_scores,
                    Track::Personal => &record.personal_scores,
                };
                let (cells, total) = build_scores(scores, race_count, to_count, dnc_value);
                Competitor {
                    helm: record.helm.clone(),
                    boats: record.boats.clone(),
                    crews: record.crews.clone(),
                    scores: cells,
                    total,
                    rank: None,
                }
            })
            .collect();
        Leaderboard {
            track,
            competitors: assign_ranks(competitors),
        }
    };

    let class_results = build(Track::Class);
    let personal_results = build(Track::Personal);

    Standings {
        series: SeriesSummary {
            id: series.id.clone(),
            code: series.code.clone(),
            title: series.title.clone(),
            start_date: series.start_date,
            end_date: series.end_date,
            to_count,
            count_all: series.settings.count_all.unwrap_or(false),
            race_count,
            competitor_count,
            dnc_value,
        },
        races: schedule,
        class_results,
        personal_results,
    }
}

/// Fill one cell per race, marking the `to_count` lowest as counted.
///
/// Missing races score `dnc_value`. Equal values are selected in race order.
fn build_scores(
    scores: &HashMap<usize, Option<f64>>,
    race_count: usize,
    to_count: usize,
    dnc_value: f64,
) -> (Vec<ScoreCell>, Option<f64>) {
    let mut cells: Vec<ScoreCell> = (0..race_count)
        .map(|race| match scores.get(&race).copied().flatten() {
            Some(value) => ScoreCell::scored(value),
            None => ScoreCell::dnc(dnc_value),
        })
        .collect();

    if to_count == 0 {
        return (cells, None);
    }

    let mut order: Vec<usize> = (0..cells.len()).collect();
    order.sort_by(|a, b| cells[*a].value.total_cmp(&cells[*b].value));

    let mut total = 0.0;
    for &race in order.iter().take(to_count) {
        cells[race].counted = true;
        total += cells[race].value;
    }
    (cells, Some(total))
}

/// Order by total (no total last), then case-insensitive helm; rank those with a total.
fn assign_ranks(mut competitors: Vec<Competitor>) -> Vec<Competitor> {
    competitors.sort_by(|a, b| {
        let a_total = a.total.unwrap_or(f64::INFINITY);
        let b_total = b.total.unwrap_or(f64::INFINITY);
        a_total
            .total_cmp(&b_total)
            .then_with(|| a.helm.to_lowercase().cmp(&b.helm.to_lowercase()))
    });
    for (index, competitor) in competitors.iter_mut().enumerate() {
        competitor.rank = competitor.total.map(|_| (index + 1) as u32);
    }
    competitors
}

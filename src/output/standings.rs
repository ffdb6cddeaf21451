use owo_colors::OwoColorize;

use super::formatter::{format_rank, get_terminal_width, pad, truncate_name};
use crate::standings::{Leaderboard, ScoreCell, Standings, Track};

/// Score cell text: discarded scores in parentheses, DNC marked as such.
pub fn format_cell(cell: &ScoreCell) -> String {
    let value = if cell.is_dnc {
        format!("{}d", format_rank(cell.value))
    } else {
        format_rank(cell.value)
    };
    if cell.counted {
        value
    } else {
        format!("({})", value)
    }
}

fn format_total(total: Option<f64>) -> String {
    total.map(format_rank).unwrap_or_else(|| "-".to_string())
}

/// Colored terminal leaderboard for one track
///
/// Shows a header line with series and discard settings, then one row per competitor.
pub fn format_leaderboard(standings: &Standings, track: Track, use_colors: bool) -> String {
    let board = standings.leaderboard(track);
    let series = &standings.series;

    let mut lines = Vec::new();
    let title = if series.title.is_empty() {
        series.id.clone()
    } else {
        series.title.clone()
    };
    let heading = format!("{} - {}", title, track.label());
    lines.push(if use_colors {
        heading.bold().to_string()
    } else {
        heading
    });
    lines.push(format!(
        "{} races, best {} count, DNC scores {}",
        series.race_count,
        series.to_count,
        format_rank(series.dnc_value)
    ));

    if board.competitors.is_empty() {
        lines.push("No competitors.".to_string());
        return lines.join("\n");
    }
    lines.push(String::new());

    let cell_width = 7;
    let fixed = 6 + 2 + 2 + 7 + standings.races.len() * (cell_width + 1);
    let name_width = get_terminal_width()
        .map(|w| w.saturating_sub(fixed).clamp(12, 28))
        .unwrap_or(28);

    let mut header = format!("{:>4}  {}", "Rank", pad("Helm", name_width));
    for i in 0..standings.races.len() {
        header.push_str(&format!(" {:>width$}", format!("R{}", i + 1), width = cell_width));
    }
    header.push_str(&format!("  {:>6}", "Total"));
    lines.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });

    for competitor in &board.competitors {
        let rank = format!(
            "{:>4}",
            competitor.rank.map(|r| r.to_string()).unwrap_or_default()
        );
        let rank = match (use_colors, competitor.rank) {
            (true, Some(1)) => rank.green().bold().to_string(),
            (true, Some(2..=3)) => rank.green().to_string(),
            _ => rank,
        };

        let mut line = format!(
            "{}  {}",
            rank,
            pad(&truncate_name(&competitor.helm, name_width), name_width)
        );
        for cell in &competitor.scores {
            let text = format!("{:>width$}", format_cell(cell), width = cell_width);
            let text = if !use_colors {
                text
            } else if cell.is_dnc {
                text.dimmed().to_string()
            } else if !cell.counted {
                text.yellow().to_string()
            } else {
                text
            };
            line.push(' ');
            line.push_str(&text);
        }
        line.push_str(&format!("  {:>6}", format_total(competitor.total)));
        lines.push(line);
    }

    lines.join("\n")
}

/// Tab-separated leaderboard rows for scripting
/// Columns: track, rank, helm, boats, one cell per race, total (no headers, no colors)
pub fn format_leaderboard_tsv(board: &Leaderboard) -> String {
    board
        .competitors
        .iter()
        .map(|competitor| {
            let mut fields = vec![
                board.track.label().to_string(),
                competitor.rank.map(|r| r.to_string()).unwrap_or_default(),
                competitor.helm.clone(),
                competitor.boats.join(", "),
            ];
            fields.extend(competitor.scores.iter().map(format_cell));
            fields.push(competitor.total.map(format_rank).unwrap_or_default());
            fields.join("\t")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{score_race, Entry};
    use crate::standings::{compute_standings, ScoredRace, SeriesInfo, SeriesSettings};

    fn standings() -> Standings {
        let first = score_race(
            "r1",
            &[
                Entry::new("E1", "Alice", "LASER", 1100).with_finish(3, 2400),
                Entry::new("E2", "Cara", "LASER", 1100).with_finish(3, 2300),
            ],
            None,
        );
        let second = score_race(
            "r2",
            &[Entry::new("E1", "Alice", "LASER", 1100).with_finish(3, 2200)],
            None,
        );
        let series = SeriesInfo {
            id: "spring".to_string(),
            title: "Spring Series".to_string(),
            settings: SeriesSettings {
                to_count: Some(1),
                count_all: None,
            },
            ..SeriesInfo::default()
        };
        compute_standings(
            &series,
            &[ScoredRace::new("Race A", first), ScoredRace::new("Race B", second)],
        )
    }

    #[test]
    fn test_format_cell() {
        assert_eq!(format_cell(&ScoreCell::scored(2.5)), "(2.5)");
        let mut counted = ScoreCell::scored(2.5);
        counted.counted = true;
        assert_eq!(format_cell(&counted), "2.5");
        assert_eq!(format_cell(&ScoreCell::dnc(3.0)), "(3d)");
        let mut counted_dnc = ScoreCell::dnc(3.0);
        counted_dnc.counted = true;
        assert_eq!(format_cell(&counted_dnc), "3d");
    }

    #[test]
    fn test_leaderboard_plain() {
        let text = format_leaderboard(&standings(), Track::Class, false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Spring Series - Class handicap");
        assert_eq!(lines[1], "2 races, best 1 count, DNC scores 3");
        assert!(lines[3].contains("R1") && lines[3].contains("R2") && lines[3].contains("Total"));
        // Alice: 2 then 1, best one counts
        assert!(lines[4].contains("Alice"));
        assert!(lines[4].contains("(2)"));
        assert!(lines[4].trim_end().ends_with('1'));
        // Cara: 1 then DNC
        assert!(lines[5].contains("Cara"));
        assert!(lines[5].contains("(3d)"));
    }

    #[test]
    fn test_personal_track_without_handicaps_is_all_dnc() {
        let text = format_leaderboard(&standings(), Track::Personal, false);
        assert!(text.starts_with("Spring Series - Personal handicap"));
        let alice = text.lines().find(|l| l.contains("Alice")).unwrap();
        assert!(alice.contains("3d"));
        assert!(alice.contains("(3d)"));
    }

    #[test]
    fn test_leaderboard_without_races() {
        let empty = compute_standings(&SeriesInfo::default(), &[]);
        let text = format_leaderboard(&empty, Track::Class, false);
        assert!(text.ends_with("No competitors."));
        assert_eq!(format_leaderboard_tsv(&empty.class_results), "");
    }

    #[test]
    fn test_leaderboard_tsv() {
        let s = standings();
        let tsv = format_leaderboard_tsv(&s.class_results);
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Class handicap\t1\tAlice\tLASER\t(2)\t1\t1");
        assert_eq!(lines[1], "Class handicap\t2\tCara\tLASER\t1\t(3d)\t1");
    }
}

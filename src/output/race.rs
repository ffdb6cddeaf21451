use owo_colors::OwoColorize;

use super::formatter::{format_optional_rank, get_terminal_width, pad, truncate_name};
use crate::scoring::{datum_delta, ClassRow, PersonalRow, RaceResult, ScoringError};

const HTML_STYLE: &str = "<style>\
th{font-size: 12px; border: 1px solid black; text-align: center; padding: 2px;}\
table {border-collapse: collapse;}\
table#PY tr:nth-child(odd) td{background-color: #f2f2f2;}\
table#personal tr:nth-child(even) td{background-color: #a2a2a2;}\
table#personal {float: left; margin-left: 16px;}\
table#PY {float: left;}\
td {text-align: center; font-size: 12px; border: 1px solid black; padding: 2px;}\
</style>";

/// Plain-text summary of the class ranking, one fixed-width line per entry.
pub fn format_race_summary(rows: &[ClassRow]) -> String {
    let mut lines = vec!["ID    Helm                Class     Time  Laps  Corrected Place".to_string()];
    for row in rows {
        lines.push(format!(
            "{}{}{}{}{}{}{}",
            pad(&row.entry_id, 6),
            pad(&row.helm, 20),
            pad(&row.dinghy, 10),
            pad(&row.time_seconds.to_string(), 6),
            pad(&row.laps.to_string(), 6),
            pad(&row.corrected.unwrap_or(0).to_string(), 10),
            format_optional_rank(row.rank)
        ));
    }
    lines.join("\n")
}

/// Minimal two-table HTML page: class ranking and personal ranking.
pub fn render_html(class_rows: &[ClassRow], personal_rows: &[PersonalRow]) -> String {
    let mut html = String::from("<html><head>");
    html.push_str(HTML_STYLE);
    html.push_str("</head><body>");

    html.push_str("<table id='PY'>");
    html.push_str(&header_row(&[
        "Entry ID",
        "Helm/<br>Crew",
        "Class",
        "PY",
        "Laps",
        "Time",
        "Corrected",
        "Rank",
    ]));
    for row in class_rows {
        html.push_str("<tr>");
        html.push_str(&td(&row.entry_id));
        html.push_str(&helm_crew_cell(&row.helm, &row.crew));
        html.push_str(&td(&row.dinghy));
        html.push_str(&td(&row.py.to_string()));
        html.push_str(&td(&row.laps.to_string()));
        html.push_str(&td(&row.time_seconds.to_string()));
        html.push_str(&td(&row.corrected_display()));
        html.push_str(&td(&format_optional_rank(row.rank)));
        html.push_str("</tr>");
    }
    html.push_str("</table>");

    html.push_str("<table id='personal'>");
    html.push_str(&header_row(&[
        "Helm/<br>Crew",
        "Personal<br>Handicap",
        "Corrected",
        "Rank",
    ]));
    for row in personal_rows {
        html.push_str("<tr>");
        html.push_str(&helm_crew_cell(&row.helm, &row.crew));
        html.push_str(&td(&row.personal_handicap.to_string()));
        html.push_str(&td(&row.corrected.map(|c| c.to_string()).unwrap_or_default()));
        html.push_str(&td(&format_optional_rank(row.rank)));
        html.push_str("</tr>");
    }
    html.push_str("</table>");

    html.push_str("</body></html>");
    html
}

fn header_row(headers: &[&str]) -> String {
    let cells: String = headers.iter().map(|h| format!("<th>{}</th>", h)).collect();
    format!("<tr>{}</tr>", cells)
}

fn td(value: &str) -> String {
    format!("<td>{}</td>", html_escape::encode_text(value))
}

fn helm_crew_cell(helm: &str, crew: &str) -> String {
    format!(
        "<td>{}<br>{}</td>",
        html_escape::encode_text(helm),
        html_escape::encode_text(crew)
    )
}

/// Terminal table for both rankings of a race.
///
/// With a `datum`, a Delta column shows each corrected class time against it.
pub fn format_race_table(
    result: &RaceResult,
    use_colors: bool,
    datum: Option<f64>,
) -> Result<String, ScoringError> {
    if result.class_rows.is_empty() {
        return Ok("No entries.".to_string());
    }

    let name_width = get_terminal_width()
        .map(|w| w.saturating_sub(60).clamp(12, 32))
        .unwrap_or(32);

    let mut lines = Vec::new();
    let mut header = format!(
        "{:>6}  {}  {}  {:>5}  {:>4}  {:>6}  {:>9}",
        "Place",
        pad("Helm / Crew", name_width),
        pad("Class", 12),
        "PY",
        "Laps",
        "Time",
        "Corrected"
    );
    if datum.is_some() {
        header.push_str(&format!("  {:>6}", "Delta"));
    }
    lines.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });

    for row in &result.class_rows {
        let place = format!("{:>6}", format_optional_rank(row.rank));
        let mut line = format!(
            "{}  {}  {}  {:>5}  {:>4}  {:>6}  {:>9}",
            if use_colors && row.fin_code.is_none() {
                place.bold().to_string()
            } else {
                place
            },
            pad(&truncate_name(&helm_and_crew(&row.helm, &row.crew), name_width), name_width),
            pad(&truncate_name(&row.dinghy, 12), 12),
            row.py,
            row.laps,
            row.time_seconds,
            if use_colors && row.fin_code.is_some() {
                format!("{:>9}", row.corrected_display()).red().to_string()
            } else {
                row.corrected_display()
            }
        );
        if let Some(datum) = datum {
            let delta = datum_delta(row.corrected.unwrap_or(0), datum)?;
            line.push_str(&format!("  {:>6}", delta));
        }
        lines.push(line);
    }

    if !result.personal_rows.is_empty() {
        lines.push(String::new());
        let header = format!(
            "{:>6}  {}  {:>8}  {:>9}",
            "Place",
            pad("Helm / Crew", name_width),
            "Personal",
            "Corrected"
        );
        lines.push(if use_colors {
            header.bold().to_string()
        } else {
            header
        });
        for row in &result.personal_rows {
            lines.push(format!(
                "{:>6}  {}  {:>8}  {:>9}",
                format_optional_rank(row.rank),
                pad(&truncate_name(&helm_and_crew(&row.helm, &row.crew), name_width), name_width),
                row.personal_handicap,
                row.corrected.map(|c| c.to_string()).unwrap_or_default()
            ));
        }
    }

    Ok(lines.join("\n"))
}

/// Tab-separated class and personal rows for scripting
/// Columns: track, rank, entry id, helm, crew, class, corrected (no headers, no colors)
pub fn format_race_tsv(result: &RaceResult) -> String {
    let class = result.class_rows.iter().map(|row| {
        format!(
            "class\t{}\t{}\t{}\t{}\t{}\t{}",
            format_optional_rank(row.rank),
            row.entry_id,
            row.helm,
            row.crew,
            row.dinghy,
            row.corrected_display()
        )
    });
    let personal = result.personal_rows.iter().map(|row| {
        format!(
            "personal\t{}\t{}\t{}\t{}\t\t{}",
            format_optional_rank(row.rank),
            row.entry_id,
            row.helm,
            row.crew,
            row.corrected.map(|c| c.to_string()).unwrap_or_default()
        )
    });
    class.chain(personal).collect::<Vec<_>>().join("\n")
}

fn helm_and_crew(helm: &str, crew: &str) -> String {
    if crew.is_empty() {
        helm.to_string()
    } else {
        format!("{} / {}", helm, crew)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{score_race, Entry, FinishCode};

    fn sample_result() -> RaceResult {
        score_race(
            "R1",
            &[
                Entry::new("TEST001", "Alice", "DART 15", 924)
                    .with_crew("Bob")
                    .with_finish(4, 3600)
                    .with_personal(950),
                Entry::new("TEST002", "Cara", "DART 15", 924).with_finish(4, 3720),
                Entry::new("TEST003", "Eve", "DART 15", 924).with_code(FinishCode::Dnf),
            ],
            None,
        )
    }

    #[test]
    fn test_summary_lists_every_entry() {
        let result = sample_result();
        let summary = format_race_summary(&result.class_rows);
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("ID    Helm"));
        assert!(lines[1].starts_with("TEST001Alice"));
        assert!(lines[1].ends_with("3896      1"));
        assert!(lines[3].ends_with("0         4"));
    }

    #[test]
    fn test_summary_places_drop_trailing_zero() {
        let result = score_race(
            "R1",
            &[
                Entry::new("E1", "A", "LASER", 1000).with_finish(1, 100),
                Entry::new("E2", "B", "LASER", 1000).with_finish(1, 100),
                Entry::new("E3", "C", "LASER", 1000).with_finish(1, 150),
            ],
            None,
        );
        let summary = format_race_summary(&result.class_rows);
        let places: Vec<&str> = summary
            .lines()
            .skip(1)
            .map(|line| line.rsplit(' ').next().unwrap())
            .collect();
        assert_eq!(places, vec!["1.5", "1.5", "3"]);
    }

    #[test]
    fn test_html_contains_both_tables() {
        let result = sample_result();
        let html = render_html(&result.class_rows, &result.personal_rows);
        assert!(html.starts_with("<html"));
        assert!(html.contains("<table id='PY'>"));
        assert!(html.contains("<table id='personal'>"));
        assert!(html.contains("Entry ID"));
        assert!(html.contains("<td>Alice<br>Bob</td>"));
        assert!(html.contains("<td>DNF</td>"));
        assert!(html.contains("<td>950</td>"));
    }

    #[test]
    fn test_html_escapes_names() {
        let result = score_race(
            "R1",
            &[Entry::new("E1", "<b>Al</b>", "LASER", 1100).with_finish(1, 600)],
            None,
        );
        let html = render_html(&result.class_rows, &result.personal_rows);
        assert!(html.contains("&lt;b&gt;Al&lt;/b&gt;"));
    }

    #[test]
    fn test_race_table_plain() {
        let table = format_race_table(&sample_result(), false, None).unwrap();
        assert!(table.contains("Alice / Bob"));
        assert!(table.contains("DNF"));
        assert!(!table.contains("Delta"));
    }

    #[test]
    fn test_race_table_with_datum() {
        let table = format_race_table(&sample_result(), false, Some(3896.0)).unwrap();
        assert!(table.contains("Delta"));
        assert!(table.contains("1000"));
    }

    #[test]
    fn test_race_table_zero_datum_fails() {
        let err = format_race_table(&sample_result(), false, Some(0.0)).unwrap_err();
        assert_eq!(err, ScoringError::InvalidDatum(0.0));
    }

    #[test]
    fn test_race_table_empty() {
        let result = score_race("R1", &[], None);
        assert_eq!(format_race_table(&result, false, None).unwrap(), "No entries.");
    }

    #[test]
    fn test_race_tsv() {
        let tsv = format_race_tsv(&sample_result());
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "class\t1\tTEST001\tAlice\tBob\tDART 15\t3896");
        assert_eq!(lines[2], "class\t4\tTEST003\tEve\t\tDART 15\tDNF");
        assert!(lines[3].starts_with("personal\t1\tTEST001"));
    }
}

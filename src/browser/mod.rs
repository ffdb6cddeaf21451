use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::sheet::ScoreReport;

/// Open a URL or local file in the user's default browser
///
/// # Errors
/// Returns error if browser cannot be opened (e.g., no browser available)
pub fn open_url(url: &str) -> Result<()> {
    webbrowser::open(url)
        .with_context(|| format!("Failed to open browser for URL: {}", url))?;
    Ok(())
}

/// Write the report's HTML rendering next to its JSON as `<dir>/<filename>.html`.
pub fn write_html(dir: &Path, report: &ScoreReport) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory at {}", dir.display()))?;

    let path = dir.join(format!("{}.html", report.metadata.filename));
    let mut file = AtomicWriteFile::open(&path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(report.html.as_bytes())
        .context("Failed to write HTML report")?;
    file.commit()
        .with_context(|| format!("Failed to save HTML report to {}", path.display()))?;
    Ok(path)
}

/// Write the HTML rendering and open it in the browser.
pub fn open_report(dir: &Path, report: &ScoreReport) -> Result<PathBuf> {
    let path = write_html(dir, report)?;
    info!(path = %path.display(), "opening report");
    open_url(&path.to_string_lossy())?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{score_race, Entry};
    use crate::sheet::RaceMetadata;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_write_html() {
        let metadata = RaceMetadata {
            series: "Spring".to_string(),
            race: "Race 1".to_string(),
            race_officer: "Jo".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            race_number: None,
            start_time: None,
        };
        let result = score_race(
            "",
            &[Entry::new("E1", "Alice", "LASER", 1100).with_finish(1, 600)],
            None,
        );
        let report = ScoreReport::build(&metadata, result, Utc::now());

        let dir = tempfile::tempdir().unwrap();
        let path = write_html(dir.path(), &report).unwrap();
        assert_eq!(path, dir.path().join("Spring_Race_1_Jo_01-03-2025.html"));
        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("<td>Alice<br></td>"));
    }
}

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Race details entered by the race officer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceMetadata {
    pub series: String,
    pub race: String,
    pub race_officer: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub race_number: Option<u32>,
    #[serde(default, with = "clock_time")]
    pub start_time: Option<NaiveTime>,
}

impl RaceMetadata {
    /// `<series>_<race>_<officer>_<dd-mm-YYYY>`, with every run of characters
    /// other than letters, digits, `-` and `_` collapsed to one `_`.
    pub fn filename(&self) -> String {
        let raw = format!(
            "{}_{}_{}_{}",
            self.series,
            self.race,
            self.race_officer,
            self.date.format("%d-%m-%Y")
        );

        let mut name = String::with_capacity(raw.len());
        let mut in_run = false;
        for c in raw.chars() {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                name.push(c);
                in_run = false;
            } else if !in_run {
                name.push('_');
                in_run = true;
            }
        }
        name
    }

    /// Start time as `HH:MM:SS`, if one was given.
    pub fn start_time_text(&self) -> Option<String> {
        self.start_time.map(|t| t.format("%H:%M:%S").to_string())
    }
}

/// One raw entry line from a race sheet.
///
/// Either the helm/crew/dinghy fields or a quick-entry code must identify the
/// boat; explicit fields override the quick entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EntryPayload {
    #[serde(default)]
    pub entry_id: Option<String>,
    #[serde(default)]
    pub qe: Option<String>,
    #[serde(default)]
    pub helm: Option<String>,
    #[serde(default)]
    pub crew: Option<String>,
    #[serde(default)]
    pub dinghy: Option<String>,
    #[serde(default)]
    pub sail_number: Option<String>,
    #[serde(default)]
    pub personal: Option<u32>,
    #[serde(default)]
    pub laps: Option<u32>,
    #[serde(default)]
    pub time_seconds: Option<u64>,
    /// Elapsed time as a human duration, e.g. "62m 30s"
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub fin_code: Option<String>,
}

/// A race sheet: metadata plus the entries as written down on the water.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceSheet {
    pub metadata: RaceMetadata,
    #[serde(default)]
    pub entries: Vec<EntryPayload>,
}

/// Serde adapter for an optional wall-clock time written as `HH:MM` or `HH:MM:SS`.
pub mod clock_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(t) => serializer.serialize_str(&t.format("%H:%M:%S").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => parse(text).map(Some).map_err(serde::de::Error::custom),
        }
    }

    pub fn parse(text: &str) -> Result<NaiveTime, String> {
        NaiveTime::parse_from_str(text, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
            .map_err(|_| format!("invalid start time '{}', expected HH:MM or HH:MM:SS", text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> RaceMetadata {
        RaceMetadata {
            series: "Spring Series".to_string(),
            race: "Race 1".to_string(),
            race_officer: "J. Smith".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            race_number: Some(1),
            start_time: None,
        }
    }

    #[test]
    fn test_filename_collapses_separators() {
        assert_eq!(metadata().filename(), "Spring_Series_Race_1_J_Smith_01-03-2025");
    }

    #[test]
    fn test_filename_keeps_dashes() {
        let mut meta = metadata();
        meta.series = "Frostbite--Winter".to_string();
        meta.race = "R/2 (pm)".to_string();
        assert_eq!(meta.filename(), "Frostbite--Winter_R_2_pm__J_Smith_01-03-2025");
    }

    #[test]
    fn test_parse_yaml_sheet() {
        let yaml = r#"
metadata:
  series: Spring
  race: Race 1
  raceOfficer: Jo
  date: 2025-03-01
  raceNumber: 1
  startTime: "10:30"
entries:
  - helm: Alice
    crew: Bob
    dinghy: Laser
    laps: 3
    timeSeconds: 2400
  - qe: CE
    time: 41m 20s
  - helm: Eve
    dinghy: Laser
    finCode: dnf
"#;
        let sheet: RaceSheet = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(sheet.metadata.race_number, Some(1));
        assert_eq!(
            sheet.metadata.start_time,
            Some(NaiveTime::from_hms_opt(10, 30, 0).unwrap())
        );
        assert_eq!(sheet.metadata.start_time_text().as_deref(), Some("10:30:00"));
        assert_eq!(sheet.entries.len(), 3);
        assert_eq!(sheet.entries[1].qe.as_deref(), Some("CE"));
        assert_eq!(sheet.entries[1].time.as_deref(), Some("41m 20s"));
        assert_eq!(sheet.entries[2].fin_code.as_deref(), Some("dnf"));
    }

    #[test]
    fn test_invalid_start_time_rejected() {
        let json = r#"{"series":"S","race":"R","raceOfficer":"O","date":"2025-03-01","startTime":"half ten"}"#;
        let err = serde_json::from_str::<RaceMetadata>(json).unwrap_err();
        assert!(err.to_string().contains("invalid start time"));
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Finish-code text outside DNF, DNC, OCS, RET, DSQ.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown finish code '{0}'")]
pub struct ParseFinishCodeError(pub String);

/// Non-finish status. An entry carrying one of these is never timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FinishCode {
    /// Did not finish
    Dnf,
    /// Did not compete
    Dnc,
    /// On course side at the start
    Ocs,
    /// Retired
    Ret,
    /// Disqualified
    Dsq,
}

impl FinishCode {
    pub const ALL: [FinishCode; 5] = [
        FinishCode::Dnf,
        FinishCode::Dnc,
        FinishCode::Ocs,
        FinishCode::Ret,
        FinishCode::Dsq,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FinishCode::Dnf => "DNF",
            FinishCode::Dnc => "DNC",
            FinishCode::Ocs => "OCS",
            FinishCode::Ret => "RET",
            FinishCode::Dsq => "DSQ",
        }
    }

    /// Parse an optional code where the empty string means "finished normally".
    pub fn parse_optional(s: &str) -> Result<Option<Self>, ParseFinishCodeError> {
        let s = s.trim();
        if s.is_empty() {
            Ok(None)
        } else {
            s.parse().map(Some)
        }
    }
}

impl FromStr for FinishCode {
    type Err = ParseFinishCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        FinishCode::ALL
            .into_iter()
            .find(|code| code.as_str() == upper)
            .ok_or_else(|| ParseFinishCodeError(s.trim().to_string()))
    }
}

impl fmt::Display for FinishCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serde adapter storing `Option<FinishCode>` as text, `""` for a normal finish.
pub mod fin_code_text {
    use super::FinishCode;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(code: &Option<FinishCode>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(code.map(|c| c.as_str()).unwrap_or(""))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<FinishCode>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        FinishCode::parse_optional(&raw).map_err(serde::de::Error::custom)
    }
}

/// One boat's raw finish data for a single race.
///
/// The class handicap (`py`) is already resolved from the boat class; the
/// engine never looks class labels up itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Unique within the series
    pub entry_id: String,
    pub helm: String,
    #[serde(default)]
    pub crew: String,
    /// Boat class label
    pub dinghy: String,
    /// Class handicap (Portsmouth Yardstick number)
    pub py: u32,
    /// Personal handicap, 0 when the helm has none
    #[serde(default)]
    pub personal: u32,
    #[serde(default)]
    pub laps: u32,
    #[serde(default)]
    pub time_seconds: u64,
    #[serde(default, with = "fin_code_text")]
    pub fin_code: Option<FinishCode>,
    #[serde(default)]
    pub sail_number: String,
}

impl Entry {
    pub fn new(
        entry_id: impl Into<String>,
        helm: impl Into<String>,
        dinghy: impl Into<String>,
        py: u32,
    ) -> Self {
        Self {
            entry_id: entry_id.into(),
            helm: helm.into(),
            crew: String::new(),
            dinghy: dinghy.into(),
            py,
            personal: 0,
            laps: 0,
            time_seconds: 0,
            fin_code: None,
            sail_number: String::new(),
        }
    }

    pub fn with_crew(mut self, crew: impl Into<String>) -> Self {
        self.crew = crew.into();
        self
    }

    pub fn with_finish(mut self, laps: u32, time_seconds: u64) -> Self {
        self.laps = laps;
        self.time_seconds = time_seconds;
        self
    }

    pub fn with_personal(mut self, personal: u32) -> Self {
        self.personal = personal;
        self
    }

    pub fn with_code(mut self, code: FinishCode) -> Self {
        self.fin_code = Some(code);
        self
    }

    pub fn with_sail_number(mut self, sail_number: impl Into<String>) -> Self {
        self.sail_number = sail_number.into();
        self
    }

    pub fn has_finish_code(&self) -> bool {
        self.fin_code.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_code_parse_case_insensitive() {
        assert_eq!("dnf".parse::<FinishCode>().unwrap(), FinishCode::Dnf);
        assert_eq!(" Dsq ".parse::<FinishCode>().unwrap(), FinishCode::Dsq);
    }

    #[test]
    fn test_finish_code_parse_unknown() {
        let err = "XYZ".parse::<FinishCode>().unwrap_err();
        assert_eq!(err, ParseFinishCodeError("XYZ".to_string()));
        assert_eq!(err.to_string(), "unknown finish code 'XYZ'");
    }

    #[test]
    fn test_parse_optional_blank_is_none() {
        assert_eq!(FinishCode::parse_optional("").unwrap(), None);
        assert_eq!(FinishCode::parse_optional("   ").unwrap(), None);
        assert_eq!(
            FinishCode::parse_optional("ret").unwrap(),
            Some(FinishCode::Ret)
        );
    }

    #[test]
    fn test_entry_json_blank_fin_code() {
        let json = r#"{"entryId":"SPR001","helm":"Alice","dinghy":"LASER","py":1100,"laps":3,"timeSeconds":2400,"finCode":""}"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.fin_code, None);
        assert_eq!(entry.personal, 0);
        assert_eq!(entry.crew, "");

        let back = serde_json::to_value(&entry).unwrap();
        assert_eq!(back["finCode"], "");
    }

    #[test]
    fn test_entry_json_with_fin_code() {
        let json = r#"{"entryId":"SPR002","helm":"Eve","dinghy":"LASER","py":1100,"finCode":"dnc"}"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.fin_code, Some(FinishCode::Dnc));
        assert_eq!(entry.laps, 0);
        assert!(entry.has_finish_code());
    }
}

use super::entry::{Entry, FinishCode};
use super::error::ScoringError;

/// Handicap-corrected times for one entry, scaled by 1000 for integer
/// precision. Zero means "not timed".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorrectedTimes {
    pub class: u64,
    pub personal: u64,
}

impl CorrectedTimes {
    pub const NOT_TIMED: CorrectedTimes = CorrectedTimes {
        class: 0,
        personal: 0,
    };

    pub fn is_timed(&self) -> bool {
        self.class != 0
    }
}

/// Normalise an elapsed time to the full course and correct it by handicap.
///
/// `corrected_class = floor(time * max_laps * 1000 / laps / py)` and, when a
/// personal handicap is set, `corrected_personal = floor(corrected_class * 1000 / personal)`.
/// All arithmetic is integer and truncating.
pub fn corrected_times(
    laps: u32,
    time_seconds: u64,
    py: u32,
    max_laps: u32,
    personal: u32,
    fin_code: Option<FinishCode>,
) -> CorrectedTimes {
    if fin_code.is_some() || laps == 0 || time_seconds == 0 || py == 0 {
        return CorrectedTimes::NOT_TIMED;
    }

    let numerator = u128::from(time_seconds) * u128::from(max_laps) * 1000;
    let class = narrow(numerator / u128::from(laps) / u128::from(py));

    let personal = if personal != 0 {
        narrow(u128::from(class) * 1000 / u128::from(personal))
    } else {
        0
    };

    CorrectedTimes { class, personal }
}

/// Corrected times for an entry in a race whose longest course was `max_laps`.
pub fn for_entry(entry: &Entry, max_laps: u32) -> CorrectedTimes {
    corrected_times(
        entry.laps,
        entry.time_seconds,
        entry.py,
        max_laps,
        entry.personal,
        entry.fin_code,
    )
}

/// Ratio of a corrected class time to a reference datum, scaled by 1000 and rounded.
///
/// Returns 0 for an untimed entry. A zero datum is a caller error.
pub fn datum_delta(corrected_class: u64, datum: f64) -> Result<i64, ScoringError> {
    if datum == 0.0 || !datum.is_finite() {
        return Err(ScoringError::InvalidDatum(datum));
    }
    if corrected_class == 0 {
        return Ok(0);
    }
    Ok((corrected_class as f64 / datum * 1000.0).round() as i64)
}

fn narrow(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

use thiserror::Error;

/// Failures the scoring core can signal.
///
/// Degenerate entries (zero laps, zero time, zero handicap) never produce an
/// error; they are scored as "not timed" instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    /// A reference datum of zero (or a non-finite datum) was supplied to
    /// [`datum_delta`](super::corrected::datum_delta).
    #[error("invalid datum {0}: datum must be a non-zero finite number")]
    InvalidDatum(f64),
}

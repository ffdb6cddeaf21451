pub mod corrected;
pub mod engine;
pub mod entry;
pub mod error;
pub mod ranking;
pub mod validation;

pub use corrected::{corrected_times, datum_delta, CorrectedTimes};
pub use engine::{score_race, ClassRow, PersonalRow, RaceResult};
pub use entry::{Entry, FinishCode, ParseFinishCodeError};
pub use error::ScoringError;
pub use validation::validate_entries;

pub mod report;
pub mod resolve;
pub mod types;

pub use report::{load_report, load_sheet, save_report, ReportMetadata, ScoreReport};
pub use resolve::{resolve_entries, EntryIdAllocator};
pub use types::{EntryPayload, RaceMetadata, RaceSheet};

pub mod formatter;
pub mod race;
pub mod standings;

pub use formatter::{format_rank, should_use_colors};
pub use race::{format_race_summary, format_race_table, format_race_tsv, render_html};
pub use standings::{format_leaderboard, format_leaderboard_tsv};

pub mod aggregate;
pub mod types;

pub use aggregate::compute_standings;
pub use types::{
    Competitor, Leaderboard, RaceSummary, ScoreCell, ScoredRace, SeriesInfo, SeriesSettings,
    SeriesSummary, Standings, Track,
};

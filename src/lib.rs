//! Handicap dinghy race scoring.
//!
//! Races are scored on two tracks: class handicap (Portsmouth Yardstick) and
//! personal handicap. Scored races are persisted as reports and aggregated
//! into best-N-of-M series standings.

pub mod browser;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod output;
pub mod roster;
pub mod scoring;
pub mod series;
pub mod sheet;
pub mod standings;

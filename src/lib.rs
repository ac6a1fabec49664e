//! Scoring and comparative analytics for cross-country team results.
//!
//! Every function takes the full collection of normalized result records and
//! returns a freshly computed value; nothing is cached between calls.

pub mod athletes;
pub mod config;
pub mod filters;
pub mod loader;
pub mod models;
pub mod pack;
pub mod ranking;
pub mod report;
pub mod rivals;
pub mod scoring;
pub mod targets;
pub mod teams;
pub mod trend;

#[cfg(test)]
mod fixtures;

pub use models::{
    PackGapResult, PlacementDetail, ResultRecord, ResultStatus, RivalDetail, RivalLookupResult,
    RivalSummary, RivalWindowOptions, TeamScoreOptions, TeamScoreResult, TeamTrendPoint,
    TieBreakers,
};
pub use pack::compute_pack_gaps;
pub use ranking::{rank_teams, teams_that_beat_us, top_rivals};
pub use rivals::nearest_rivals_by_athlete;
pub use scoring::compute_team_score;
pub use targets::build_target_segments;
pub use teams::canonical_team;
pub use trend::trend_by_team;

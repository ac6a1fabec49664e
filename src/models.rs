use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TOP_N: usize = 5;
pub const DEFAULT_WINDOW_SECONDS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultStatus {
    Finished,
    Dnf,
    Dq,
    NoResult,
}

/// One athlete's normalized result at one meet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub meet: String,
    pub date: String,
    pub division: String,
    pub team: String,
    pub athlete: String,
    pub gender: String,
    pub grade: Option<i32>,
    pub place: Option<u32>,
    pub time_seconds: Option<f64>,
    pub status: ResultStatus,
}

impl ResultRecord {
    pub fn is_finisher(&self) -> bool {
        self.status == ResultStatus::Finished && self.place.is_some()
    }

    /// Finish time, only for FINISHED rows carrying a finite value.
    pub fn finish_time(&self) -> Option<f64> {
        if self.status != ResultStatus::Finished {
            return None;
        }
        self.time_seconds.filter(|value| value.is_finite())
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_meet_date(&self.date)
    }
}

/// Parses the date formats seen in season exports. A bare season year maps to Jan 1.
pub fn parse_meet_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    if trimmed.len() == 4 && trimmed.chars().all(|c| c.is_ascii_digit()) {
        let year: i32 = trimmed.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }

    None
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamScoreOptions {
    pub top_n: usize,
}

impl Default for TeamScoreOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl TeamScoreOptions {
    pub fn with_top_n(top_n: usize) -> Self {
        Self { top_n }
    }

    /// Scoring depth actually used; a depth of zero is treated as one.
    pub fn depth(&self) -> usize {
        self.top_n.max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RivalWindowOptions {
    pub window_sec: f64,
}

impl Default for RivalWindowOptions {
    fn default() -> Self {
        Self {
            window_sec: DEFAULT_WINDOW_SECONDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementDetail {
    pub athlete: String,
    pub place: u32,
    pub time_seconds: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TieBreakers {
    pub sixth: Option<PlacementDetail>,
    pub seventh: Option<PlacementDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamScoreResult {
    pub meet: String,
    pub team: String,
    pub top_n: usize,
    /// Sum of the scoring places; `None` for an incomplete squad.
    pub score: Option<u32>,
    pub placements: Vec<PlacementDetail>,
    pub finisher_count: usize,
    pub tie_breakers: TieBreakers,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PackGapResult {
    pub gap_1_to_5_seconds: Option<f64>,
    pub gap_1_to_7_seconds: Option<f64>,
    pub top5_std_dev_seconds: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RivalDetail {
    pub athlete: String,
    pub team: String,
    /// Rival time minus target time; negative means the rival was faster.
    pub delta_seconds: f64,
    pub time_seconds: f64,
    pub place: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RivalLookupResult {
    pub athlete: String,
    pub team: String,
    pub time_seconds: Option<f64>,
    pub rivals: Vec<RivalDetail>,
    pub window_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RivalSummary {
    pub opponent: String,
    /// Reference average minus opponent average; negative means the opponent was faster.
    pub average_time_gap_seconds: Option<f64>,
    /// Reference score minus opponent score; positive means the opponent scored better.
    pub score_difference: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamTrendPoint {
    pub meet: String,
    pub date: String,
    pub score: Option<u32>,
    pub average_top_n_time_seconds: Option<f64>,
    pub pack_gap_seconds: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMetrics {
    pub team: String,
    pub division: String,
    pub meet: String,
    pub athlete_count: usize,
    pub average_time_seconds: Option<f64>,
    pub best_time_seconds: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteMetrics {
    pub athlete: String,
    pub team: String,
    pub gender: String,
    pub grade: Option<i32>,
    pub meet_count: usize,
    pub average_time_seconds: Option<f64>,
    pub best_time_seconds: Option<f64>,
}

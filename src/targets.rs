use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::athletes::is_record_newer;
use crate::filters::SegmentFilter;
use crate::models::{ResultRecord, TeamScoreOptions, TeamScoreResult};
use crate::ranking::teams_that_beat_us;
use crate::scoring::{cmp_place, compute_team_score, normalize_key};
use crate::teams::{canonical_team, team_color, TeamColor};

/// Average gap under which an opponent is within reach.
pub const CLOSE_GAP_SECONDS: f64 = 10.0;
/// Average gap over which an opponent is a long-term target.
pub const STRETCH_GAP_SECONDS: f64 = 45.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetBadge {
    /// Equal score, lost on the 6th or 7th runner.
    Tie,
    Close,
    Stretch,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetOpponent {
    pub team: String,
    pub score_difference: Option<i64>,
    pub average_time_gap_seconds: Option<f64>,
    pub finisher_count: usize,
    pub badges: Vec<TargetBadge>,
    pub color: Option<TeamColor>,
}

/// The opponents that beat a team at its most recent meet in one
/// division/gender/grade segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetSegment {
    pub id: String,
    pub division: String,
    pub gender: String,
    pub grade: Option<i32>,
    pub meet: String,
    pub date: String,
    pub opponents: Vec<TargetOpponent>,
}

fn segment_id(record: &ResultRecord) -> String {
    let grade = record
        .grade
        .map(|grade| grade.to_string())
        .unwrap_or_else(|| "all".to_string());
    format!(
        "{}::{}::{}",
        normalize_key(&record.division),
        normalize_key(&record.gender),
        grade
    )
}

fn badges(
    ours: &TeamScoreResult,
    theirs: &TeamScoreResult,
    score_difference: Option<i64>,
    average_gap: Option<f64>,
) -> Vec<TargetBadge> {
    let mut badges = Vec::new();

    if score_difference == Some(0) {
        let sixth = |result: &TeamScoreResult| result.tie_breakers.sixth.as_ref().map(|p| p.place);
        let seventh =
            |result: &TeamScoreResult| result.tie_breakers.seventh.as_ref().map(|p| p.place);
        if cmp_place(sixth(theirs), sixth(ours)).is_lt()
            || cmp_place(seventh(theirs), seventh(ours)).is_lt()
        {
            badges.push(TargetBadge::Tie);
        }
    }

    if let Some(gap) = average_gap.map(f64::abs) {
        if gap < CLOSE_GAP_SECONDS {
            badges.push(TargetBadge::Close);
        }
        if gap > STRETCH_GAP_SECONDS {
            badges.push(TargetBadge::Stretch);
        }
    }

    badges
}

fn build_segment(
    records: &[ResultRecord],
    team: &str,
    id: String,
    latest: &ResultRecord,
    options: &TeamScoreOptions,
) -> TargetSegment {
    let rows = SegmentFilter::from_record(latest).apply(records);
    let ours = compute_team_score(&rows, &latest.meet, team, options);

    let opponents = if ours.score.is_none() {
        tracing::debug!(segment = %id, meet = %latest.meet, "no team score in segment");
        Vec::new()
    } else {
        teams_that_beat_us(&rows, &latest.meet, team, options)
            .into_iter()
            .map(|summary| {
                let theirs = compute_team_score(&rows, &latest.meet, &summary.opponent, options);
                TargetOpponent {
                    badges: badges(
                        &ours,
                        &theirs,
                        summary.score_difference,
                        summary.average_time_gap_seconds,
                    ),
                    color: team_color(&summary.opponent),
                    finisher_count: theirs.finisher_count,
                    score_difference: summary.score_difference,
                    average_time_gap_seconds: summary.average_time_gap_seconds,
                    team: summary.opponent,
                }
            })
            .collect()
    };

    TargetSegment {
        id,
        division: latest.division.clone(),
        gender: latest.gender.clone(),
        grade: latest.grade,
        meet: latest.meet.clone(),
        date: latest.date.clone(),
        opponents,
    }
}

fn compare_segments(a: &TargetSegment, b: &TargetSegment) -> Ordering {
    let by_grade = match (a.grade, b.grade) {
        (Some(a_grade), Some(b_grade)) => a_grade.cmp(&b_grade),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    a.division
        .cmp(&b.division)
        .then_with(|| a.gender.cmp(&b.gender))
        .then(by_grade)
        .then_with(|| a.id.cmp(&b.id))
}

/// One target segment per division/gender/grade the team raced in, each built
/// from the team's most recent meet in that segment.
pub fn build_target_segments(
    records: &[ResultRecord],
    team_name: &str,
    options: &TeamScoreOptions,
) -> Vec<TargetSegment> {
    let team = canonical_team(team_name);
    let team_key = normalize_key(&team);
    if team_key.is_empty() {
        return Vec::new();
    }

    let mut latest: BTreeMap<String, &ResultRecord> = BTreeMap::new();
    for record in records
        .iter()
        .filter(|record| normalize_key(&canonical_team(&record.team)) == team_key)
    {
        match latest.entry(segment_id(record)) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(mut slot) => {
                if is_record_newer(record, slot.get()) {
                    slot.insert(record);
                }
            }
        }
    }

    let mut segments: Vec<TargetSegment> = latest
        .into_iter()
        .map(|(id, record)| build_segment(records, &team, id, record, options))
        .collect();
    segments.sort_by(compare_segments);
    segments
}

use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::filters::SegmentFilter;
use crate::models::{
    AthleteMetrics, ResultRecord, ResultStatus, RivalDetail, RivalWindowOptions, TeamMetrics,
    TeamScoreOptions,
};
use crate::ranking::teams_that_beat_us;
use crate::rivals::nearest_rivals_by_athlete;
use crate::scoring::{cmp_time, normalize_key};
use crate::teams::canonical_team;

/// Meet-over-meet changes smaller than this read as even.
pub const EVEN_DELTA_SECONDS: f64 = 0.1;
const FALLBACK_RIVALS: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct AthleteAggregate {
    pub id: String,
    pub name: String,
    pub team: String,
    pub canonical_team: String,
    pub division: String,
    pub gender: String,
    pub grade: Option<i32>,
    pub latest: ResultRecord,
    pub results: Vec<ResultRecord>,
}

fn slug(value: &str) -> String {
    let mut slug = String::new();
    let mut pending_dash = false;

    for c in normalize_key(value).chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        "na".to_string()
    } else {
        slug
    }
}

/// Stable athlete identifier, e.g. `alice-hart--xc-hawks`.
pub fn make_athlete_id(name: &str, team: &str) -> String {
    format!("{}--{}", slug(name), slug(team))
}

fn compare_dates(a: &ResultRecord, b: &ResultRecord) -> Ordering {
    match (a.parsed_date(), b.parsed_date()) {
        (Some(a_date), Some(b_date)) => a_date.cmp(&b_date),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn is_record_newer(candidate: &ResultRecord, baseline: &ResultRecord) -> bool {
    match (candidate.parsed_date(), baseline.parsed_date()) {
        (Some(candidate_date), Some(baseline_date)) if candidate_date != baseline_date => {
            candidate_date > baseline_date
        }
        (Some(_), None) => true,
        (None, Some(_)) => false,
        _ => candidate.meet > baseline.meet,
    }
}

/// Groups results by athlete and canonical team.
pub fn build_athlete_index(records: &[ResultRecord]) -> BTreeMap<String, AthleteAggregate> {
    let mut index: BTreeMap<String, AthleteAggregate> = BTreeMap::new();

    for record in records {
        let name = record.athlete.trim();
        if name.is_empty() {
            continue;
        }

        let resolved_team = {
            let canonical = canonical_team(&record.team);
            if canonical.is_empty() {
                record.team.clone()
            } else {
                canonical
            }
        };
        let id = make_athlete_id(name, &resolved_team);

        let existing = match index.entry(id) {
            Entry::Vacant(slot) => {
                let id = slot.key().clone();
                slot.insert(AthleteAggregate {
                    id,
                    name: name.to_string(),
                    team: record.team.clone(),
                    canonical_team: resolved_team,
                    division: record.division.clone(),
                    gender: record.gender.clone(),
                    grade: record.grade,
                    latest: record.clone(),
                    results: vec![record.clone()],
                });
                continue;
            }
            Entry::Occupied(slot) => slot.into_mut(),
        };

        existing.results.push(record.clone());

        if is_record_newer(record, &existing.latest) {
            existing.latest = record.clone();
            existing.division = record.division.clone();
            existing.gender = record.gender.clone();
            if record.grade.is_some() {
                existing.grade = record.grade;
            }
            existing.team = record.team.clone();
            existing.canonical_team = resolved_team;
        }
    }

    index
}

pub fn sort_results_chronologically(records: &[ResultRecord]) -> Vec<ResultRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        compare_dates(a, b)
            .then_with(|| a.meet.cmp(&b.meet))
            .then_with(|| cmp_time(a.finish_time(), b.finish_time()))
            .then_with(|| a.athlete.cmp(&b.athlete))
    });
    sorted
}

/// One row per meet appearance, preferring finished and faster rows.
pub fn unique_meets(records: &[ResultRecord]) -> Vec<ResultRecord> {
    let mut by_meet: Vec<(String, ResultRecord)> = Vec::new();

    for record in records {
        let key = format!("{}::{}", normalize_key(&record.meet), record.date);
        let Some(position) = by_meet
            .iter()
            .position(|(existing_key, _)| *existing_key == key)
        else {
            by_meet.push((key, record.clone()));
            continue;
        };
        let existing = &mut by_meet[position].1;

        let finished = record.status == ResultStatus::Finished;
        let existing_finished = existing.status == ResultStatus::Finished;
        let replace = (finished && !existing_finished)
            || (finished
                && existing_finished
                && cmp_time(record.finish_time(), existing.finish_time()).is_lt())
            || is_record_newer(record, existing);

        if replace {
            *existing = record.clone();
        }
    }

    by_meet.into_iter().map(|(_, record)| record).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaDirection {
    Faster,
    Slower,
    Even,
}

impl DeltaDirection {
    pub fn from_delta(delta_seconds: Option<f64>) -> Self {
        match delta_seconds {
            Some(delta) if delta.abs() >= EVEN_DELTA_SECONDS => {
                if delta < 0.0 {
                    Self::Faster
                } else {
                    Self::Slower
                }
            }
            _ => Self::Even,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AthleteMeetDetail {
    pub meet: String,
    pub date: String,
    pub status: ResultStatus,
    pub time_seconds: Option<f64>,
    /// Change against the previous meet with a finishing time.
    pub delta_seconds: Option<f64>,
    pub direction: DeltaDirection,
    pub top_opponents: Vec<String>,
    pub rivals: Vec<RivalDetail>,
}

/// Rivals from teams that beat us; the closest few when none qualify.
fn focus_rivals(rivals: Vec<RivalDetail>, opponents: &[String]) -> Vec<RivalDetail> {
    if !opponents.is_empty() {
        let focused: Vec<RivalDetail> = rivals
            .iter()
            .filter(|rival| opponents.contains(&rival.team))
            .cloned()
            .collect();
        if !focused.is_empty() {
            return focused;
        }
    }
    rivals.into_iter().take(FALLBACK_RIVALS).collect()
}

/// Meet-by-meet breakdown for one athlete, oldest first. Each meet is
/// compared within the athlete's segment (meet, division, gender, grade).
pub fn athlete_meet_details(
    records: &[ResultRecord],
    aggregate: &AthleteAggregate,
    options: &TeamScoreOptions,
    rival_options: &RivalWindowOptions,
) -> Vec<AthleteMeetDetail> {
    let team = match canonical_team(&aggregate.team) {
        team if team.is_empty() => aggregate.canonical_team.clone(),
        team => team,
    };

    let mut previous_time: Option<f64> = None;
    let mut details = Vec::new();

    for entry in sort_results_chronologically(&unique_meets(&aggregate.results)) {
        let rows = SegmentFilter::from_record(&entry).apply(records);
        let top_opponents: Vec<String> = teams_that_beat_us(&rows, &entry.meet, &team, options)
            .into_iter()
            .map(|summary| summary.opponent)
            .collect();
        let lookup = nearest_rivals_by_athlete(&rows, &entry.meet, &aggregate.name, rival_options);

        let time_seconds = entry.finish_time();
        let delta_seconds = time_seconds
            .zip(previous_time)
            .map(|(current, previous)| current - previous);
        if time_seconds.is_some() {
            previous_time = time_seconds;
        }

        details.push(AthleteMeetDetail {
            rivals: focus_rivals(lookup.rivals, &top_opponents),
            direction: DeltaDirection::from_delta(delta_seconds),
            meet: entry.meet,
            date: entry.date,
            status: entry.status,
            time_seconds,
            delta_seconds,
            top_opponents,
        });
    }

    details
}

fn time_stats<I: IntoIterator<Item = f64>>(times: I) -> (Option<f64>, Option<f64>) {
    let times: Vec<f64> = times.into_iter().collect();
    if times.is_empty() {
        return (None, None);
    }
    let average = times.iter().sum::<f64>() / times.len() as f64;
    let best = times.iter().copied().fold(f64::INFINITY, f64::min);
    (Some(average), Some(best))
}

pub fn athlete_metrics(aggregate: &AthleteAggregate) -> AthleteMetrics {
    let meets: HashSet<String> = aggregate
        .results
        .iter()
        .map(|record| normalize_key(&record.meet))
        .collect();
    let (average, best) =
        time_stats(aggregate.results.iter().filter_map(ResultRecord::finish_time));

    AthleteMetrics {
        athlete: aggregate.name.clone(),
        team: aggregate.canonical_team.clone(),
        gender: aggregate.gender.clone(),
        grade: aggregate.grade,
        meet_count: meets.len(),
        average_time_seconds: average,
        best_time_seconds: best,
    }
}

/// Per-team summary of one meet, ordered by team name.
pub fn team_metrics(records: &[ResultRecord], meet_id: &str) -> Vec<TeamMetrics> {
    let meet_key = normalize_key(meet_id);
    let mut teams: BTreeMap<String, Vec<&ResultRecord>> = BTreeMap::new();

    for record in records
        .iter()
        .filter(|record| normalize_key(&record.meet) == meet_key)
    {
        let team = canonical_team(&record.team);
        if team.is_empty() {
            continue;
        }
        teams.entry(team).or_default().push(record);
    }

    teams
        .into_iter()
        .map(|(team, rows)| {
            let athletes: HashSet<String> = rows
                .iter()
                .map(|record| normalize_key(&record.athlete))
                .collect();
            let (average, best) = time_stats(rows.iter().filter_map(|record| record.finish_time()));
            TeamMetrics {
                division: rows.first().map(|record| record.division.clone()).unwrap_or_default(),
                meet: rows.first().map(|record| record.meet.clone()).unwrap_or_default(),
                team,
                athlete_count: athletes.len(),
                average_time_seconds: average,
                best_time_seconds: best,
            }
        })
        .collect()
}

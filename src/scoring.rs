use std::cmp::Ordering;

use crate::models::{PlacementDetail, ResultRecord, TeamScoreOptions, TeamScoreResult, TieBreakers};
use crate::teams::canonical_team;

/// Case- and whitespace-insensitive key used for meet, team and athlete matching.
pub fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Orders optional times ascending with missing values last.
pub(crate) fn cmp_time(a: Option<f64>, b: Option<f64>) -> Ordering {
    a.unwrap_or(f64::INFINITY)
        .total_cmp(&b.unwrap_or(f64::INFINITY))
}

/// Orders optional places ascending with missing values last.
pub(crate) fn cmp_place(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// place, then time, then athlete name.
fn compare_by_place(a: &ResultRecord, b: &ResultRecord) -> Ordering {
    cmp_place(a.place, b.place)
        .then_with(|| cmp_time(a.finish_time(), b.finish_time()))
        .then_with(|| a.athlete.cmp(&b.athlete))
}

/// Eligible finishers of one team at one meet, in scoring order.
pub(crate) fn team_finishers<'a>(
    records: &'a [ResultRecord],
    meet_id: &str,
    team_name: &str,
) -> Vec<&'a ResultRecord> {
    let meet_key = normalize_key(meet_id);
    let team_key = normalize_key(&canonical_team(team_name));

    let mut finishers: Vec<&ResultRecord> = records
        .iter()
        .filter(|record| normalize_key(&record.meet) == meet_key)
        .filter(|record| normalize_key(&canonical_team(&record.team)) == team_key)
        .filter(|record| record.is_finisher())
        .collect();

    finishers.sort_by(|a, b| compare_by_place(a, b));
    finishers
}

fn placement(record: &ResultRecord) -> Option<PlacementDetail> {
    Some(PlacementDetail {
        athlete: record.athlete.clone(),
        place: record.place?,
        time_seconds: record.finish_time(),
    })
}

pub fn compute_team_score(
    records: &[ResultRecord],
    meet_id: &str,
    team_name: &str,
    options: &TeamScoreOptions,
) -> TeamScoreResult {
    let top_n = options.depth();
    let canonical = canonical_team(team_name);
    let finishers = team_finishers(records, meet_id, &canonical);

    let placements: Vec<PlacementDetail> = finishers
        .iter()
        .take(top_n)
        .filter_map(|record| placement(record))
        .collect();

    let score = if placements.len() == top_n {
        let total = placements
            .iter()
            .try_fold(0u32, |total, entry| total.checked_add(entry.place));
        if total.is_none() {
            tracing::warn!(meet = meet_id, team = %canonical, "place sum overflows, no team score");
        }
        total
    } else {
        tracing::debug!(
            meet = meet_id,
            team = %canonical,
            finishers = finishers.len(),
            top_n,
            "incomplete squad, no team score"
        );
        None
    };

    let tie_breakers = TieBreakers {
        sixth: finishers.get(top_n).and_then(|record| placement(record)),
        seventh: finishers.get(top_n + 1).and_then(|record| placement(record)),
    };

    TeamScoreResult {
        meet: meet_id.to_string(),
        team: canonical,
        top_n,
        score,
        placements,
        finisher_count: finishers.len(),
        tie_breakers,
    }
}

/// Mean time of the placements; `None` when empty or when any time is missing.
pub fn average_placement_time(placements: &[PlacementDetail]) -> Option<f64> {
    if placements.is_empty() {
        return None;
    }

    let times: Vec<f64> = placements
        .iter()
        .filter_map(|entry| entry.time_seconds.filter(|value| value.is_finite()))
        .collect();

    if times.len() != placements.len() {
        return None;
    }

    Some(times.iter().sum::<f64>() / times.len() as f64)
}

/// Average top-N time, only when the team fielded a full scoring squad.
pub fn full_squad_average(result: &TeamScoreResult) -> Option<f64> {
    if result.placements.len() == result.top_n {
        average_placement_time(&result.placements)
    } else {
        None
    }
}

/// Comparative order between two teams at the same meet; `Less` means `a` ranks higher.
///
/// Scored teams beat unscored ones, then lower score, 6th runner, 7th runner,
/// placement-by-placement, and finally team name.
pub fn compare_team_scores(a: &TeamScoreResult, b: &TeamScoreResult) -> Ordering {
    let by_name = || normalize_key(&a.team).cmp(&normalize_key(&b.team));

    let (a_score, b_score) = match (a.score, b.score) {
        (None, None) => return by_name(),
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(a_score), Some(b_score)) => (a_score, b_score),
    };

    let sixth = |result: &TeamScoreResult| result.tie_breakers.sixth.as_ref().map(|p| p.place);
    let seventh = |result: &TeamScoreResult| result.tie_breakers.seventh.as_ref().map(|p| p.place);

    a_score
        .cmp(&b_score)
        .then_with(|| cmp_place(sixth(a), sixth(b)))
        .then_with(|| cmp_place(seventh(a), seventh(b)))
        .then_with(|| compare_placements(&a.placements, &b.placements))
        .then_with(by_name)
}

fn compare_placements(a: &[PlacementDetail], b: &[PlacementDetail]) -> Ordering {
    let length = a.len().max(b.len());
    (0..length)
        .map(|index| {
            cmp_place(
                a.get(index).map(|entry| entry.place),
                b.get(index).map(|entry| entry.place),
            )
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

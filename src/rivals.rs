use crate::models::{RivalDetail, RivalLookupResult, RivalWindowOptions, ResultRecord};
use crate::scoring::normalize_key;
use crate::teams::canonical_team;

/// Opposing-team finishers whose time at the meet is within the window of the athlete's.
///
/// When the athlete appears more than once at the meet the fastest row is
/// used. An unknown athlete yields an empty lookup with no time and no team.
pub fn nearest_rivals_by_athlete(
    records: &[ResultRecord],
    meet_id: &str,
    athlete_name: &str,
    options: &RivalWindowOptions,
) -> RivalLookupResult {
    let window_seconds = options.window_sec.max(0.0);
    let meet_key = normalize_key(meet_id);
    let athlete_key = normalize_key(athlete_name);

    let meet_rows: Vec<(f64, &ResultRecord)> = records
        .iter()
        .filter(|record| normalize_key(&record.meet) == meet_key)
        .filter_map(|record| record.finish_time().map(|time| (time, record)))
        .collect();

    let target = meet_rows
        .iter()
        .filter(|(_, record)| normalize_key(&record.athlete) == athlete_key)
        .min_by(|(a, _), (b, _)| a.total_cmp(b));

    let Some(&(target_time, target)) = target else {
        tracing::debug!(meet = meet_id, athlete = athlete_name, "athlete not found at meet");
        return RivalLookupResult {
            athlete: athlete_name.to_string(),
            team: String::new(),
            time_seconds: None,
            rivals: Vec::new(),
            window_seconds,
        };
    };

    let target_team = canonical_team(&target.team);
    let target_key = normalize_key(&target_team);

    let mut rivals: Vec<RivalDetail> = meet_rows
        .iter()
        .filter_map(|&(time, record)| {
            let team = canonical_team(&record.team);
            if normalize_key(&team) == target_key {
                return None;
            }
            let delta_seconds = time - target_time;
            (delta_seconds.abs() <= window_seconds).then(|| RivalDetail {
                athlete: record.athlete.clone(),
                team,
                delta_seconds,
                time_seconds: time,
                place: record.place,
            })
        })
        .collect();

    rivals.sort_by(|a, b| {
        a.delta_seconds
            .abs()
            .total_cmp(&b.delta_seconds.abs())
            .then_with(|| a.delta_seconds.total_cmp(&b.delta_seconds))
            .then_with(|| a.athlete.cmp(&b.athlete))
    });

    RivalLookupResult {
        athlete: target.athlete.clone(),
        team: target_team,
        time_seconds: Some(target_time),
        rivals,
        window_seconds,
    }
}

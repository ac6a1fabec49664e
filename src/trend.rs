use std::cmp::Ordering;

use crate::models::{parse_meet_date, ResultRecord, TeamScoreOptions, TeamTrendPoint};
use crate::pack::compute_pack_gaps;
use crate::scoring::{compute_team_score, full_squad_average, normalize_key};
use crate::teams::canonical_team;

struct MeetEntry {
    key: String,
    meet: String,
    date: String,
}

/// Dated points first in date order, undated after, meet name last.
fn compare_points(a: &TeamTrendPoint, b: &TeamTrendPoint) -> Ordering {
    let by_date = match (parse_meet_date(&a.date), parse_meet_date(&b.date)) {
        (Some(a_date), Some(b_date)) => a_date.cmp(&b_date),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_date.then_with(|| a.meet.cmp(&b.meet))
}

/// Season series for one team: one point per meet it appeared in.
pub fn trend_by_team(
    records: &[ResultRecord],
    team_name: &str,
    options: &TeamScoreOptions,
) -> Vec<TeamTrendPoint> {
    let canonical = canonical_team(team_name);
    let team_key = normalize_key(&canonical);

    let mut meets: Vec<MeetEntry> = Vec::new();
    for record in records {
        if normalize_key(&canonical_team(&record.team)) != team_key {
            continue;
        }

        let key = normalize_key(&record.meet);
        match meets.iter().position(|entry| entry.key == key) {
            Some(index) => {
                let entry = &mut meets[index];
                if entry.date.trim().is_empty() && !record.date.trim().is_empty() {
                    entry.date = record.date.clone();
                }
            }
            None => meets.push(MeetEntry {
                key,
                meet: record.meet.trim().to_string(),
                date: record.date.clone(),
            }),
        }
    }

    let mut points: Vec<TeamTrendPoint> = meets
        .into_iter()
        .map(|entry| {
            let score = compute_team_score(records, &entry.meet, &canonical, options);
            let pack = compute_pack_gaps(records, &entry.meet, &canonical);
            TeamTrendPoint {
                average_top_n_time_seconds: full_squad_average(&score),
                score: score.score,
                pack_gap_seconds: pack.gap_1_to_5_seconds,
                meet: entry.meet,
                date: entry.date,
            }
        })
        .collect();

    points.sort_by(compare_points);
    points
}

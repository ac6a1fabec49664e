use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::filters::SeasonFilters;
use crate::models::{ResultRecord, RivalSummary, TeamScoreOptions, TeamScoreResult};
use crate::scoring::{compare_team_scores, compute_team_score, full_squad_average, normalize_key};
use crate::teams::canonical_team;

/// Opponents reported by `top_rivals`.
pub const TOP_RIVAL_COUNT: usize = 2;

/// Distinct canonical teams at a meet as (key, display) pairs, in first-seen order.
fn teams_at_meet(meet_rows: &[ResultRecord]) -> Vec<(String, String)> {
    let mut seen = HashSet::new();
    let mut teams = Vec::new();

    for record in meet_rows {
        let canonical = canonical_team(&record.team);
        let key = normalize_key(&canonical);
        if !key.is_empty() && seen.insert(key.clone()) {
            teams.push((key, canonical));
        }
    }

    teams
}

fn meet_rows(records: &[ResultRecord], meet_id: &str) -> Vec<ResultRecord> {
    let meet_key = normalize_key(meet_id);
    records
        .iter()
        .filter(|record| normalize_key(&record.meet) == meet_key)
        .cloned()
        .collect()
}

/// Every team at the meet, best first.
pub fn rank_teams(
    records: &[ResultRecord],
    meet_id: &str,
    options: &TeamScoreOptions,
) -> Vec<TeamScoreResult> {
    let rows = meet_rows(records, meet_id);
    let mut results: Vec<TeamScoreResult> = teams_at_meet(&rows)
        .into_iter()
        .map(|(_, display)| compute_team_score(&rows, meet_id, &display, options))
        .collect();

    results.sort_by(compare_team_scores);
    results
}

/// Opponents that ranked strictly ahead of the reference team at a meet, best first.
///
/// Empty when the meet is unknown, the team did not race there, or the team
/// did not field a full scoring squad.
pub fn teams_that_beat_us(
    records: &[ResultRecord],
    meet_id: &str,
    team_name: &str,
    options: &TeamScoreOptions,
) -> Vec<RivalSummary> {
    let rows = meet_rows(records, meet_id);
    if rows.is_empty() {
        return Vec::new();
    }

    let team_key = normalize_key(&canonical_team(team_name));
    let teams = teams_at_meet(&rows);
    if !teams.iter().any(|(key, _)| *key == team_key) {
        tracing::debug!(meet = meet_id, team = team_name, "team did not race at meet");
        return Vec::new();
    }

    let mut ours = None;
    let mut opponents = Vec::new();
    for (key, display) in &teams {
        let result = compute_team_score(&rows, meet_id, display, options);
        if *key == team_key {
            ours = Some(result);
        } else {
            opponents.push(result);
        }
    }

    let Some(ours) = ours.filter(|result| result.score.is_some()) else {
        return Vec::new();
    };

    let mut beating: Vec<TeamScoreResult> = opponents
        .into_iter()
        .filter(|result| compare_team_scores(result, &ours).is_lt())
        .collect();
    beating.sort_by(compare_team_scores);

    let our_average = full_squad_average(&ours);
    beating
        .iter()
        .map(|result| RivalSummary {
            opponent: result.team.clone(),
            average_time_gap_seconds: our_average
                .zip(full_squad_average(result))
                .map(|(ours, theirs)| ours - theirs),
            score_difference: ours
                .score
                .zip(result.score)
                .map(|(ours, theirs)| i64::from(ours) - i64::from(theirs)),
        })
        .collect()
}

/// The opponents that most consistently beat a team across every meet in
/// the filtered rows.
///
/// At each meet the `n` teams ahead earn points by rank: `n` for the best
/// down to 1 for the last. The team filter is ignored so opponents stay in
/// scope. Equal totals fall back to team name.
pub fn top_rivals(
    records: &[ResultRecord],
    team_name: &str,
    filters: &SeasonFilters,
    options: &TeamScoreOptions,
) -> Vec<String> {
    let scope = SeasonFilters {
        team: None,
        ..filters.clone()
    };
    let rows = scope.apply(records);
    let meets: BTreeSet<String> = rows
        .iter()
        .map(|record| normalize_key(&record.meet))
        .collect();

    let mut points: BTreeMap<String, usize> = BTreeMap::new();
    for meet in &meets {
        let beating = teams_that_beat_us(&rows, meet, team_name, options);
        let count = beating.len();
        for (index, summary) in beating.into_iter().enumerate() {
            *points.entry(summary.opponent).or_default() += count - index;
        }
    }

    let mut ranked: Vec<(String, usize)> = points.into_iter().collect();
    ranked.sort_by(|(a_team, a_points), (b_team, b_points)| {
        b_points.cmp(a_points).then_with(|| a_team.cmp(b_team))
    });
    ranked
        .into_iter()
        .take(TOP_RIVAL_COUNT)
        .map(|(team, _)| team)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{finisher, season};

    #[test]
    fn lists_opponents_that_finished_ahead() {
        let records = season();
        let result =
            teams_that_beat_us(&records, "Invite A", "hawks", &TeamScoreOptions::default());

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].opponent, "Speedsters");
        assert_eq!(result[0].score_difference, Some(12));
        let gap = result[0].average_time_gap_seconds.expect("both squads are full");
        assert!((gap - 5.0).abs() < 1e-9);
    }

    #[test]
    fn incomplete_reference_squad_returns_empty() {
        let records = season();
        let result =
            teams_that_beat_us(&records, "Invite C", "XC Hawks", &TeamScoreOptions::default());
        assert!(result.is_empty());
    }

    #[test]
    fn unknown_meet_or_absent_team_returns_empty() {
        let records = season();
        let options = TeamScoreOptions::default();
        assert!(teams_that_beat_us(&records, "Invite Z", "XC Hawks", &options).is_empty());
        assert!(teams_that_beat_us(&records, "Invite B", "Joggers", &options).is_empty());
    }

    #[test]
    fn incomplete_opponent_never_beats_a_scored_team() {
        let mut records = season();
        // Four St Leo runners all ahead of the Hawks, but no scoring five.
        for (offset, name) in ["Leo A", "Leo B", "Leo C", "Leo D"].iter().enumerate() {
            records.push(finisher(
                "Invite B",
                "2024-09-15",
                "St Leo",
                name,
                offset as u32 + 1,
                340.0,
            ));
        }
        let result =
            teams_that_beat_us(&records, "Invite B", "XC Hawks", &TeamScoreOptions::default());
        let opponents: Vec<&str> = result.iter().map(|r| r.opponent.as_str()).collect();
        assert_eq!(opponents, vec!["Speedsters"]);
    }

    #[test]
    fn reference_team_is_never_listed_and_every_entry_ranks_ahead() {
        let records = season();
        let options = TeamScoreOptions::default();
        let ours = compute_team_score(&records, "Invite A", "Joggers", &options);
        let result = teams_that_beat_us(&records, "Invite A", "joggers club", &options);

        let opponents: Vec<&str> = result.iter().map(|r| r.opponent.as_str()).collect();
        assert_eq!(opponents, vec!["Speedsters", "XC Hawks"]);
        for summary in &result {
            let theirs = compute_team_score(&records, "Invite A", &summary.opponent, &options);
            assert!(compare_team_scores(&theirs, &ours).is_lt());
        }
        assert_eq!(result[1].score_difference, Some(54 - 42));
    }

    #[test]
    fn equal_scores_resolved_by_sixth_runner() {
        let mut records = Vec::new();
        for (team, places) in [("Alpha", [1, 4, 5, 8, 12, 13]), ("Beta", [2, 3, 6, 9, 10, 20])] {
            for (index, place) in places.iter().enumerate() {
                let athlete = format!("{team} {index}");
                records.push(finisher("Tie", "", team, &athlete, *place, 300.0 + *place as f64));
            }
        }
        let options = TeamScoreOptions::default();
        assert_eq!(compute_team_score(&records, "Tie", "Alpha", &options).score, Some(30));
        assert_eq!(compute_team_score(&records, "Tie", "Beta", &options).score, Some(30));

        let beat_beta = teams_that_beat_us(&records, "Tie", "Beta", &options);
        assert_eq!(beat_beta.len(), 1);
        assert_eq!(beat_beta[0].opponent, "Alpha");
        assert_eq!(beat_beta[0].score_difference, Some(0));
        assert!(teams_that_beat_us(&records, "Tie", "Alpha", &options).is_empty());
    }

    #[test]
    fn reference_with_extra_runners_against_short_opponent() {
        // Hawks field seven at Invite A. St Ann's four runners take places 2-5,
        // ahead of every Hawk but one, yet an unscored squad cannot outrank them.
        let mut records = season();
        for (offset, name) in ["Ann A", "Ann B", "Ann C", "Ann D"].iter().enumerate() {
            records.push(finisher(
                "Invite A",
                "2024-09-01",
                "St Ann",
                name,
                offset as u32 + 2,
                356.0 + offset as f64,
            ));
        }
        let options = TeamScoreOptions::default();
        let st_ann = compute_team_score(&records, "Invite A", "St Ann", &options);
        assert_eq!(st_ann.score, None);
        assert_eq!(st_ann.placements.len(), 4);

        let result = teams_that_beat_us(&records, "Invite A", "XC Hawks", &options);
        let opponents: Vec<&str> = result.iter().map(|r| r.opponent.as_str()).collect();
        assert_eq!(opponents, vec!["Speedsters"]);
    }

    #[test]
    fn ranks_every_team_at_meet() {
        let records = season();
        let ranking = rank_teams(&records, "invite a", &TeamScoreOptions::default());
        let teams: Vec<(&str, Option<u32>)> =
            ranking.iter().map(|r| (r.team.as_str(), r.score)).collect();
        assert_eq!(
            teams,
            vec![("Speedsters", Some(30)), ("XC Hawks", Some(42)), ("Joggers", Some(54))]
        );
        assert!(rank_teams(&records, "nowhere", &TeamScoreOptions::default()).is_empty());
    }

    #[test]
    fn unscored_teams_rank_last_by_name() {
        let records = vec![
            finisher("Small", "", "Zulu", "Z1", 1, 300.0),
            finisher("Small", "", "Alpha", "A1", 2, 301.0),
        ];
        let ranking = rank_teams(&records, "Small", &TeamScoreOptions::default());
        let teams: Vec<&str> = ranking.iter().map(|r| r.team.as_str()).collect();
        assert_eq!(teams, vec!["Alpha", "Zulu"]);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let records = season();
        let options = TeamScoreOptions::default();
        assert_eq!(
            teams_that_beat_us(&records, "Invite A", "Joggers", &options),
            teams_that_beat_us(&records, "Invite A", "Joggers", &options)
        );
        assert_eq!(
            rank_teams(&records, "Invite A", &options),
            rank_teams(&records, "Invite A", &options)
        );
    }

    #[test]
    fn top_rivals_weight_each_meet_by_rank() {
        let records = season();
        let options = TeamScoreOptions::default();
        let all = SeasonFilters::default();
        assert_eq!(top_rivals(&records, "XC Hawks", &all, &options), vec!["Speedsters"]);
        assert_eq!(
            top_rivals(&records, "Joggers", &all, &options),
            vec!["Speedsters", "XC Hawks"]
        );
    }

    #[test]
    fn top_rivals_keep_the_two_highest_totals() {
        let mut records = season();
        for index in 0..5u32 {
            let time = 350.0 + index as f64;
            let leo = format!("Leo {index}");
            let hawk = format!("Hawk D{index}");
            let jogger = format!("Jogger D{index}");
            records.push(finisher("Invite D", "2024-10-10", "St Leo", &leo, 1 + index, time));
            records.push(finisher(
                "Invite D",
                "2024-10-10",
                "XC Hawks",
                &hawk,
                6 + index,
                time + 20.0,
            ));
            records.push(finisher(
                "Invite D",
                "2024-10-10",
                "Joggers",
                &jogger,
                11 + index,
                time + 40.0,
            ));
            records.push(finisher("Invite E", "2024-10-20", "St Leo", &leo, 1 + index, time));
            records.push(finisher(
                "Invite E",
                "2024-10-20",
                "Joggers",
                &jogger,
                6 + index,
                time + 30.0,
            ));
        }

        // St Leo 2 + 1, Speedsters 2, XC Hawks 1 + 1; the tie goes to the name.
        let options = TeamScoreOptions::default();
        let rivals = top_rivals(&records, "Joggers", &SeasonFilters::default(), &options);
        assert_eq!(rivals, vec!["St Leo", "Speedsters"]);
    }

    #[test]
    fn top_rivals_respect_filters_but_not_the_team_filter() {
        let records = season();
        let options = TeamScoreOptions::default();
        let boys = SeasonFilters {
            gender: Some("M".to_string()),
            ..SeasonFilters::default()
        };
        assert!(top_rivals(&records, "Joggers", &boys, &options).is_empty());

        let own_team = SeasonFilters {
            team: Some("Joggers".to_string()),
            meet: Some("Invite A".to_string()),
            ..SeasonFilters::default()
        };
        assert_eq!(
            top_rivals(&records, "Joggers", &own_team, &options),
            vec!["Speedsters", "XC Hawks"]
        );
    }
}

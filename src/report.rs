use std::fmt::Write;

use crate::models::{ResultRecord, TeamScoreOptions};
use crate::pack::compute_pack_gaps;
use crate::ranking::{rank_teams, teams_that_beat_us};
use crate::scoring::{compute_team_score, full_squad_average};
use crate::teams::canonical_team;
use crate::trend::trend_by_team;

/// Renders seconds as `m:ss.s`.
pub fn format_seconds(seconds: f64) -> String {
    let tenths = (seconds * 10.0).round() as i64;
    let minutes = tenths / 600;
    let remainder = tenths % 600;
    format!("{}:{:02}.{}", minutes, remainder / 10, remainder % 10)
}

pub fn format_optional_seconds(seconds: Option<f64>) -> String {
    seconds.map(format_seconds).unwrap_or_else(|| "n/a".to_string())
}

pub fn format_optional_gap(seconds: Option<f64>) -> String {
    seconds
        .map(|value| format!("{value:.1}s"))
        .unwrap_or_else(|| "n/a".to_string())
}

pub fn format_score(score: Option<u32>) -> String {
    score
        .map(|value| value.to_string())
        .unwrap_or_else(|| "incomplete".to_string())
}

pub fn build_meet_report(
    records: &[ResultRecord],
    meet: &str,
    team: &str,
    options: &TeamScoreOptions,
) -> String {
    let canonical = canonical_team(team);
    let score = compute_team_score(records, meet, &canonical, options);
    let pack = compute_pack_gaps(records, meet, &canonical);
    let ranking = rank_teams(records, meet, options);
    let beaten_by = teams_that_beat_us(records, meet, &canonical, options);

    let mut output = String::new();

    let _ = writeln!(output, "# Meet Report: {} at {}", canonical, meet);
    let _ = writeln!(
        output,
        "Score {} from {} finishers (top {})",
        format_score(score.score),
        score.finisher_count,
        score.top_n
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Scoring Runners");

    if score.placements.is_empty() {
        let _ = writeln!(output, "No finishers recorded for this meet.");
    } else {
        for placement in score.placements.iter() {
            let _ = writeln!(
                output,
                "- #{} {} ({})",
                placement.place,
                placement.athlete,
                format_optional_seconds(placement.time_seconds)
            );
        }
        for (label, runner) in [
            ("6th", score.tie_breakers.sixth.as_ref()),
            ("7th", score.tie_breakers.seventh.as_ref()),
        ] {
            if let Some(runner) = runner {
                let _ = writeln!(
                    output,
                    "- {} runner: #{} {}",
                    label, runner.place, runner.athlete
                );
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Pack");
    let _ = writeln!(output, "- 1-5 gap: {}", format_optional_gap(pack.gap_1_to_5_seconds));
    let _ = writeln!(output, "- 1-7 gap: {}", format_optional_gap(pack.gap_1_to_7_seconds));
    let _ = writeln!(
        output,
        "- top 5 std dev: {}",
        format_optional_gap(pack.top5_std_dev_seconds)
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Team Standings");

    if ranking.is_empty() {
        let _ = writeln!(output, "No teams recorded for this meet.");
    } else {
        for (index, result) in ranking.iter().enumerate() {
            let _ = writeln!(
                output,
                "{}. {} {} (avg {})",
                index + 1,
                result.team,
                format_score(result.score),
                format_optional_seconds(full_squad_average(result))
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Teams That Beat Us");

    if beaten_by.is_empty() {
        let _ = writeln!(output, "No scored opponents finished ahead.");
    } else {
        for summary in beaten_by.iter() {
            let _ = writeln!(
                output,
                "- {}: {} points better, avg gap {}",
                summary.opponent,
                summary
                    .score_difference
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "n/a".to_string()),
                format_optional_gap(summary.average_time_gap_seconds)
            );
        }
    }

    output
}

pub fn build_season_report(
    records: &[ResultRecord],
    team: &str,
    options: &TeamScoreOptions,
) -> String {
    let canonical = canonical_team(team);
    let points = trend_by_team(records, &canonical, options);

    let mut output = String::new();
    let _ = writeln!(output, "# Season Report: {}", canonical);
    let _ = writeln!(output);

    if points.is_empty() {
        let _ = writeln!(output, "No meets recorded for this team.");
        return output;
    }

    let _ = writeln!(output, "| Meet | Date | Score | Avg top {} | 1-5 gap |", options.depth());
    let _ = writeln!(output, "| --- | --- | --- | --- | --- |");
    for point in points.iter() {
        let _ = writeln!(
            output,
            "| {} | {} | {} | {} | {} |",
            point.meet,
            if point.date.is_empty() { "-" } else { point.date.as_str() },
            format_score(point.score),
            format_optional_seconds(point.average_top_n_time_seconds),
            format_optional_gap(point.pack_gap_seconds)
        );
    }

    output
}

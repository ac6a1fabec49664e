use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use xc_team_analytics::athletes::{
    athlete_meet_details, athlete_metrics, build_athlete_index, make_athlete_id,
};
use xc_team_analytics::config::{Settings, RESULTS_PATH_ENV};
use xc_team_analytics::filters::SeasonFilters;
use xc_team_analytics::loader::load_records;
use xc_team_analytics::models::{DEFAULT_TOP_N, DEFAULT_WINDOW_SECONDS};
use xc_team_analytics::report::{
    build_meet_report, build_season_report, format_optional_gap, format_optional_seconds,
    format_score, format_seconds,
};
use xc_team_analytics::scoring::full_squad_average;
use xc_team_analytics::teams::{team_color, TeamColor};
use xc_team_analytics::{
    build_target_segments, canonical_team, compute_pack_gaps, compute_team_score,
    nearest_rivals_by_athlete, rank_teams, teams_that_beat_us, top_rivals, trend_by_team,
};

#[derive(Parser)]
#[command(name = "xc-analytics")]
#[command(about = "Cross-country team scoring and comparative analytics", long_about = None)]
struct Cli {
    /// Normalized season results (.csv or .json)
    #[arg(long, global = true)]
    results: Option<PathBuf>,
    /// Scoring depth
    #[arg(long, global = true, default_value_t = DEFAULT_TOP_N)]
    top_n: usize,
    /// Rival time window in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_WINDOW_SECONDS)]
    window_sec: f64,
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Team score with placements and tie-breakers
    Score {
        #[arg(long)]
        meet: String,
        #[arg(long)]
        team: String,
    },
    /// Pack gaps and spread for a team
    Pack {
        #[arg(long)]
        meet: String,
        #[arg(long)]
        team: String,
    },
    /// Opposing finishers close to an athlete's time
    Rivals {
        #[arg(long)]
        meet: String,
        #[arg(long)]
        athlete: String,
    },
    /// Teams that outscored a team at a meet
    Beat {
        #[arg(long)]
        meet: String,
        #[arg(long)]
        team: String,
    },
    /// Every team at a meet in finishing order
    Rank {
        #[arg(long)]
        meet: String,
    },
    /// Meet-by-meet season trend for a team
    Trend {
        #[arg(long)]
        team: String,
    },
    /// Athlete summaries, optionally filtered
    Athletes {
        #[arg(long)]
        meet: Option<String>,
        #[arg(long)]
        team: Option<String>,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        grade: Option<i32>,
        #[arg(long)]
        division: Option<String>,
    },
    /// Opponents to chase in each division, gender and grade
    Targets {
        #[arg(long)]
        team: String,
    },
    /// The two opponents that beat a team most often
    TopRivals {
        #[arg(long)]
        team: String,
        #[arg(long)]
        division: Option<String>,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        grade: Option<i32>,
    },
    /// Meet-by-meet history for one athlete
    Athlete {
        #[arg(long)]
        name: String,
        #[arg(long)]
        team: String,
    },
    /// Resolve team names to their canonical form
    Canon { names: Vec<String> },
    /// Write a markdown report for a meet, or for the season when no meet is given
    Report {
        #[arg(long)]
        team: String,
        #[arg(long)]
        meet: Option<String>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[derive(Serialize)]
struct CanonicalName {
    raw: String,
    canonical: String,
    color: Option<TeamColor>,
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = if matches!(cli.command, Commands::Canon { .. }) {
        Settings {
            json: cli.json,
            ..Settings::default()
        }
    } else {
        Settings::resolve(
            cli.results,
            std::env::var(RESULTS_PATH_ENV).ok(),
            cli.top_n,
            cli.window_sec,
            cli.json,
        )?
    };
    let records = if settings.results_path.as_os_str().is_empty() {
        Vec::new()
    } else {
        load_records(&settings.results_path)?
    };
    let options = settings.score_options();

    match cli.command {
        Commands::Score { meet, team } => {
            let result = compute_team_score(&records, &meet, &team, &options);
            if settings.json {
                return print_json(&result);
            }

            println!(
                "{} at {}: score {} ({} finishers)",
                result.team,
                result.meet,
                format_score(result.score),
                result.finisher_count
            );
            for placement in result.placements.iter() {
                println!(
                    "- #{} {} {}",
                    placement.place,
                    placement.athlete,
                    format_optional_seconds(placement.time_seconds)
                );
            }
            if let Some(sixth) = &result.tie_breakers.sixth {
                println!("  6th: #{} {}", sixth.place, sixth.athlete);
            }
            if let Some(seventh) = &result.tie_breakers.seventh {
                println!("  7th: #{} {}", seventh.place, seventh.athlete);
            }
        }
        Commands::Pack { meet, team } => {
            let result = compute_pack_gaps(&records, &meet, &team);
            if settings.json {
                return print_json(&result);
            }

            println!("{} at {}:", canonical_team(&team), meet);
            println!("- 1-5 gap: {}", format_optional_gap(result.gap_1_to_5_seconds));
            println!("- 1-7 gap: {}", format_optional_gap(result.gap_1_to_7_seconds));
            println!("- top 5 std dev: {}", format_optional_gap(result.top5_std_dev_seconds));
        }
        Commands::Rivals { meet, athlete } => {
            let result =
                nearest_rivals_by_athlete(&records, &meet, &athlete, &settings.rival_options());
            if settings.json {
                return print_json(&result);
            }

            let Some(time) = result.time_seconds else {
                println!("No finishing time for {athlete} at {meet}.");
                return Ok(());
            };
            println!(
                "{} ({}) ran {}; rivals within {:.1}s:",
                result.athlete,
                result.team,
                format_seconds(time),
                result.window_seconds
            );
            for rival in result.rivals.iter() {
                println!(
                    "- {} ({}) {:+.1}s",
                    rival.athlete, rival.team, rival.delta_seconds
                );
            }
        }
        Commands::Beat { meet, team } => {
            let result = teams_that_beat_us(&records, &meet, &team, &options);
            if settings.json {
                return print_json(&result);
            }

            if result.is_empty() {
                println!("No scored opponents finished ahead.");
                return Ok(());
            }
            for summary in result.iter() {
                println!(
                    "- {}: {} points better, avg gap {}",
                    summary.opponent,
                    summary.score_difference.unwrap_or_default(),
                    format_optional_gap(summary.average_time_gap_seconds)
                );
            }
        }
        Commands::Rank { meet } => {
            let ranking = rank_teams(&records, &meet, &options);
            if settings.json {
                return print_json(&ranking);
            }

            for (index, result) in ranking.iter().enumerate() {
                println!(
                    "{}. {} {} (avg {})",
                    index + 1,
                    result.team,
                    format_score(result.score),
                    format_optional_seconds(full_squad_average(result))
                );
            }
        }
        Commands::Trend { team } => {
            let points = trend_by_team(&records, &team, &options);
            if settings.json {
                return print_json(&points);
            }

            for point in points.iter() {
                println!(
                    "- {} ({}): score {}, avg {}, 1-5 gap {}",
                    point.meet,
                    point.date,
                    format_score(point.score),
                    format_optional_seconds(point.average_top_n_time_seconds),
                    format_optional_gap(point.pack_gap_seconds)
                );
            }
        }
        Commands::Athletes {
            meet,
            team,
            gender,
            grade,
            division,
        } => {
            let filters = SeasonFilters {
                meet,
                team,
                gender,
                grade,
                division,
            };
            let rows = filters.apply(&records);
            let metrics: Vec<_> = build_athlete_index(&rows)
                .values()
                .map(athlete_metrics)
                .collect();
            if settings.json {
                return print_json(&metrics);
            }

            for athlete in metrics.iter() {
                println!(
                    "- {} ({}) {} meets, best {}, avg {}",
                    athlete.athlete,
                    athlete.team,
                    athlete.meet_count,
                    format_optional_seconds(athlete.best_time_seconds),
                    format_optional_seconds(athlete.average_time_seconds)
                );
            }
        }
        Commands::Targets { team } => {
            let segments = build_target_segments(&records, &team, &options);
            if settings.json {
                return print_json(&segments);
            }

            for segment in segments.iter() {
                println!(
                    "{} {} grade {} at {} ({})",
                    segment.division,
                    segment.gender,
                    segment
                        .grade
                        .map(|grade| grade.to_string())
                        .unwrap_or_else(|| "all".to_string()),
                    segment.meet,
                    segment.date
                );
                for opponent in segment.opponents.iter() {
                    println!(
                        "- {}: {} points, avg gap {} {:?}",
                        opponent.team,
                        opponent.score_difference.unwrap_or_default(),
                        format_optional_gap(opponent.average_time_gap_seconds),
                        opponent.badges
                    );
                }
            }
        }
        Commands::TopRivals {
            team,
            division,
            gender,
            grade,
        } => {
            let filters = SeasonFilters {
                division,
                gender,
                grade,
                ..SeasonFilters::default()
            };
            let rivals = top_rivals(&records, &team, &filters, &options);
            if settings.json {
                return print_json(&rivals);
            }

            for (index, rival) in rivals.iter().enumerate() {
                println!("{}. {}", index + 1, rival);
            }
        }
        Commands::Athlete { name, team } => {
            let index = build_athlete_index(&records);
            let id = make_athlete_id(&name, &canonical_team(&team));
            let aggregate = index
                .get(&id)
                .with_context(|| format!("no results for {name} ({team})"))?;
            let details =
                athlete_meet_details(&records, aggregate, &options, &settings.rival_options());
            if settings.json {
                return print_json(&details);
            }

            for detail in details.iter() {
                println!(
                    "- {} ({}): {} {:?}, beaten by [{}]",
                    detail.meet,
                    detail.date,
                    format_optional_seconds(detail.time_seconds),
                    detail.direction,
                    detail.top_opponents.join(", ")
                );
                for rival in detail.rivals.iter() {
                    println!(
                        "    {} ({}) {:+.1}s",
                        rival.athlete, rival.team, rival.delta_seconds
                    );
                }
            }
        }
        Commands::Report { team, meet, out } => {
            let report = match meet.as_deref() {
                Some(meet) => build_meet_report(&records, meet, &team, &options),
                None => build_season_report(&records, &team, &options),
            };
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Canon { names } => {
            let resolved: Vec<CanonicalName> = names
                .iter()
                .map(|name| {
                    let canonical = canonical_team(name);
                    CanonicalName {
                        color: team_color(&canonical),
                        raw: name.clone(),
                        canonical,
                    }
                })
                .collect();
            if settings.json {
                return print_json(&resolved);
            }

            for name in resolved.iter() {
                match name.color {
                    Some(color) => {
                        println!("{} -> {} ({})", name.raw, name.canonical, color.primary)
                    }
                    None => println!("{} -> {}", name.raw, name.canonical),
                }
            }
        }
    }

    Ok(())
}

mod calendar;
mod logging;
mod models;
mod report;
mod stats;
mod store;
mod tui;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use log::info;
use std::io::Write;
use std::path::PathBuf;

use calendar::{HolidayCalendar, TAIWAN_NOTICE_POLICY};
use models::{Event, EventKind, Level, Settings, new_event_id};
use report::ReportScope;
use stats::{Stats, compute_stats, recommended_dates};
use store::{Repository, SqliteStore};

#[derive(Parser)]
#[command(name = "gauge")]
#[command(about = "Workplace stress journal - log the bad days and count down to the exit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a stress or happiness event
    Log {
        /// Event kind
        #[arg(value_enum)]
        kind: EventKind,

        /// Points (1 = minor, 2 = moderate, 3 = severe)
        #[arg(value_parser = clap::value_parser!(u8).range(1..=3))]
        points: u8,

        /// What happened
        description: String,

        /// Comma-separated tags
        #[arg(short, long)]
        tags: Option<String>,
    },

    /// List logged events
    List {
        /// Filter by kind (stress, happy)
        #[arg(short, long, value_enum)]
        kind: Option<EventKind>,

        /// Filter by tag
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Show event details
    Show {
        /// Event ID
        id: String,
    },

    /// Delete an event
    Delete {
        /// Event ID
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// View or change profile settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },

    /// Show the countdown numbers
    Stats {
        /// Emit the stats record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render the printable report
    Report {
        /// Which events to include
        #[arg(short, long, value_enum, default_value = "all")]
        scope: ReportScope,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Browse events in the terminal dashboard
    Browse,
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Show current settings and suggested target dates
    Show,

    /// Update settings (unset flags keep their current value)
    Set {
        /// Your name, used on the printable report
        #[arg(long)]
        name: Option<String>,

        /// Onboarding date (YYYY-MM-DD)
        #[arg(long)]
        onboarding: Option<NaiveDate>,

        /// Target resignation date (YYYY-MM-DD)
        #[arg(long)]
        target: Option<NaiveDate>,

        /// Remove the onboarding date
        #[arg(long, conflicts_with = "onboarding")]
        clear_onboarding: bool,

        /// Remove the target resignation date
        #[arg(long, conflicts_with = "target")]
        clear_target: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let store = SqliteStore::open()?;

    // Diagnostics go to rotating files next to the database; losing them is
    // not worth failing the command over.
    let log_dir = store
        .path()
        .parent()
        .map(|p| p.join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"));
    let _logger = logging::init(&log_dir)
        .map_err(|e| eprintln!("warning: file logging disabled: {e}"))
        .ok();

    let calendar = HolidayCalendar::taiwan();
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Log {
            kind,
            points,
            description,
            tags,
        } => {
            if description.trim().is_empty() {
                bail!("Description must not be empty");
            }
            let mut journal = store.load()?;
            let event = Event {
                id: new_event_id(),
                date: Local::now(),
                kind,
                points,
                description,
                tags: parse_tags(tags.as_deref()),
            };
            let id = event.id.clone();
            journal.add_event(event);
            store.save(&journal)?;
            info!("logged {} event {id} ({points} pts)", kind.label());

            let stats = compute_stats(
                &journal.events,
                &journal.settings,
                today,
                &calendar,
                &TAIWAN_NOTICE_POLICY,
            );
            println!("Logged {} event {id} ({points} pts).", kind.label());
            match kind {
                EventKind::Stress => println!(
                    "{} more stress point(s) until the exit moves one day closer.",
                    stats.stress_points_until_next_day
                ),
                EventKind::Happy => println!(
                    "{} more happy point(s) until the exit moves one day out.",
                    stats.happy_points_until_next_day
                ),
            }
        }

        Commands::List { kind, tag } => {
            let journal = store.load()?;
            let events: Vec<&Event> = journal
                .events
                .iter()
                .filter(|e| kind.is_none_or(|k| e.kind == k))
                .filter(|e| {
                    tag.as_deref()
                        .is_none_or(|t| e.tags.iter().any(|x| x.eq_ignore_ascii_case(t)))
                })
                .collect();

            if events.is_empty() {
                println!("No events found.");
            } else {
                println!(
                    "{:<10} {:<17} {:<7} {:>3}  {:<16} {}",
                    "ID", "DATE", "KIND", "PTS", "TAGS", "DESCRIPTION"
                );
                println!("{}", "-".repeat(80));
                for event in events {
                    println!(
                        "{:<10} {:<17} {:<7} {:>3}  {:<16} {}",
                        event.id,
                        event.date.format("%Y-%m-%d %H:%M"),
                        event.kind.label(),
                        event.points,
                        truncate(&event.tags.join(","), 14),
                        truncate(&event.description, 38)
                    );
                }
            }
        }

        Commands::Show { id } => {
            let journal = store.load()?;
            match journal.find_event(&id) {
                Some(event) => {
                    println!("Event {}", event.id);
                    println!("Date: {}", event.date.format("%Y-%m-%d %H:%M"));
                    println!("Kind: {}", event.kind.label());
                    match Level::from_points(event.points) {
                        Some(level) => {
                            println!("Level: {}", level.label(event.kind));
                            println!("Typical: {}", level.examples(event.kind));
                        }
                        None => println!("Points: {}", event.points),
                    }
                    if !event.tags.is_empty() {
                        println!("Tags: {}", event.tags.join(", "));
                    }
                    println!("\n{}", textwrap::fill(&event.description, 70));
                }
                None => {
                    println!("Event '{id}' not found.");
                }
            }
        }

        Commands::Delete { id, yes } => {
            let mut journal = store.load()?;
            let Some(event) = journal.find_event(&id) else {
                println!("Event '{id}' not found.");
                return Ok(());
            };
            let summary = format!(
                "Delete {} event \"{}\" from {}? This cannot be undone.",
                event.kind.label(),
                truncate(&event.description, 40),
                event.date.format("%Y-%m-%d")
            );
            if !yes && !confirm(&summary)? {
                println!("Kept event {id}.");
                return Ok(());
            }
            journal.remove_event(&id);
            store.save(&journal)?;
            info!("deleted event {id}");
            println!("Deleted event {id}.");
        }

        Commands::Settings { command } => match command {
            SettingsCommands::Show => {
                let journal = store.load()?;
                print_settings(&journal.settings);
            }

            SettingsCommands::Set {
                name,
                onboarding,
                target,
                clear_onboarding,
                clear_target,
            } => {
                let mut journal = store.load()?;
                if let Some(name) = name {
                    journal.settings.name = name;
                }
                if let Some(onboarding) = onboarding {
                    journal.settings.onboarding_date = Some(onboarding);
                }
                if let Some(target) = target {
                    journal.settings.target_resignation_date = Some(target);
                }
                if clear_onboarding {
                    journal.settings.onboarding_date = None;
                }
                if clear_target {
                    journal.settings.target_resignation_date = None;
                }
                store.save(&journal)?;
                info!("settings updated");
                println!("Settings saved.\n");
                print_settings(&journal.settings);
            }
        },

        Commands::Stats { json } => {
            let journal = store.load()?;
            let stats = compute_stats(
                &journal.events,
                &journal.settings,
                today,
                &calendar,
                &TAIWAN_NOTICE_POLICY,
            );
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_stats(&stats, &journal.settings);
            }
        }

        Commands::Report { scope, output } => {
            let journal = store.load()?;
            let stats = compute_stats(
                &journal.events,
                &journal.settings,
                today,
                &calendar,
                &TAIWAN_NOTICE_POLICY,
            );
            let text = report::render(&journal, &stats, scope, today);
            match output {
                Some(path) => {
                    std::fs::write(&path, &text)
                        .with_context(|| format!("Failed to write to {}", path.display()))?;
                    println!("Report written to {}", path.display());
                }
                None => print!("{text}"),
            }
        }

        Commands::Browse => {
            let journal = store.load()?;
            let stats = compute_stats(
                &journal.events,
                &journal.settings,
                today,
                &calendar,
                &TAIWAN_NOTICE_POLICY,
            );
            tui::run_browse(&journal, stats)?;
        }
    }

    Ok(())
}

fn print_settings(settings: &Settings) {
    let name = if settings.name.is_empty() {
        "not set"
    } else {
        settings.name.as_str()
    };
    println!("Name:       {name}");
    println!("Onboarding: {}", format_opt_date(settings.onboarding_date));
    println!(
        "Target:     {}",
        format_opt_date(settings.target_resignation_date)
    );

    let rec = recommended_dates(settings.onboarding_date);
    if let (Some(adaptation), Some(experience)) = (rec.adaptation_date, rec.experience_date) {
        println!("\nSuggested targets from your onboarding date:");
        println!("  12-month mark (fully settled in):  {adaptation}");
        println!("  15-month mark (experience counts): {experience}");
    }
}

fn print_stats(stats: &Stats, settings: &Settings) {
    let Some(projected) = stats.projected_resignation_date else {
        println!("Welcome to gauge.");
        println!("Set a target resignation date to count down the working days you");
        println!("actually have left:");
        println!("  gauge settings set --onboarding 2023-04-01 --target 2025-06-30");
        println!(
            "\nLogged so far: stress {} pts, happiness {} pts.",
            stats.total_stress_points, stats.total_happy_points
        );
        return;
    };

    if let Some(days) = stats.remaining_working_days {
        println!("Remaining working days: {days}   (weekends and Taiwan holidays excluded)");
    }
    let target = settings
        .target_resignation_date
        .map(|d| d.to_string())
        .unwrap_or_default();
    println!(
        "Projected resignation:  {projected}   (target {target}, -{} stress +{} happy)",
        stats.stress_days_earned, stats.happy_days_earned
    );
    println!();
    println!(
        "Stress     {:>3} pts -> {} day(s) earned, {} point(s) to the next",
        stats.total_stress_points, stats.stress_days_earned, stats.stress_points_until_next_day
    );
    println!(
        "Happiness  {:>3} pts -> {} day(s) earned, {} point(s) to the next",
        stats.total_happy_points, stats.happy_days_earned, stats.happy_points_until_next_day
    );

    match (stats.tenure_months, stats.legal_notice_days) {
        (Some(tenure), Some(notice)) if notice > 0 => {
            println!();
            println!(
                "Tenure: {tenure} month(s) -> statutory notice {notice} day(s){}",
                stats
                    .legal_notice_date
                    .map(|d| format!(", hand it in by {d}"))
                    .unwrap_or_default()
            );
        }
        (Some(tenure), Some(_)) => {
            println!();
            println!("Tenure: {tenure} month(s) -> no statutory notice required yet");
        }
        _ => {
            println!();
            println!("Set an onboarding date to compute your statutory notice period.");
        }
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn parse_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn format_opt_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string())
        .unwrap_or_else(|| "not set".to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tags_splits_trims_and_drops_empties() {
        assert_eq!(
            parse_tags(Some("overtime, boss ,,meeting ")),
            vec!["overtime", "boss", "meeting"]
        );
        assert!(parse_tags(Some("")).is_empty());
        assert!(parse_tags(None).is_empty());
    }

    #[test]
    fn truncate_keeps_short_strings_and_is_char_safe() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long description here", 10), "a very ...");
        // Multi-byte input must not split inside a character.
        assert_eq!(truncate("天天加班到半夜真的受不了", 8), "天天加班到...");
    }
}

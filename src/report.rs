use chrono::NaiveDate;

use crate::models::{Event, EventKind, Journal};
use crate::stats::Stats;

const DESCRIPTION_WIDTH: usize = 46;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportScope {
    #[default]
    All,
    Stress,
    Happy,
}

impl ReportScope {
    fn includes(self, kind: EventKind) -> bool {
        match self {
            ReportScope::All => true,
            ReportScope::Stress => kind == EventKind::Stress,
            ReportScope::Happy => kind == EventKind::Happy,
        }
    }

    fn title(self) -> &'static str {
        match self {
            ReportScope::All => "Full career assessment report",
            ReportScope::Stress => "Resignation case file (stress events)",
            ReportScope::Happy => "Reasons to stay (happy events)",
        }
    }
}

/// Renders the printable report over the journal and its derived stats.
/// Pure text in, text out; the caller decides between stdout and a file.
pub fn render(journal: &Journal, stats: &Stats, scope: ReportScope, today: NaiveDate) -> String {
    let mut out = String::new();
    let title = format!("Career Pressure Gauge - {}", scope.title());
    out.push_str(&title);
    out.push('\n');
    out.push_str(&"=".repeat(title.len()));
    out.push_str("\n\n");

    let name = if journal.settings.name.is_empty() {
        "not set"
    } else {
        journal.settings.name.as_str()
    };
    out.push_str(&format!("Name:            {}\n", name));
    out.push_str(&format!(
        "Onboarding date: {}\n",
        format_opt_date(journal.settings.onboarding_date)
    ));
    out.push_str(&format!("Exported:        {}\n", today.format("%Y-%m-%d")));
    if scope.includes(EventKind::Stress) {
        out.push_str(&format!(
            "Total stress:    {} pts\n",
            stats.total_stress_points
        ));
    }
    if scope.includes(EventKind::Happy) {
        out.push_str(&format!(
            "Total happiness: {} pts\n",
            stats.total_happy_points
        ));
    }
    out.push('\n');

    if scope == ReportScope::All {
        out.push_str("Projection summary\n");
        out.push_str("------------------\n");
        out.push_str(&format!(
            "Passion worn down by stress:  -{} day(s)\n",
            stats.stress_days_earned
        ));
        out.push_str(&format!(
            "Resignation delayed by joy:   +{} day(s)\n",
            stats.happy_days_earned
        ));
        out.push_str(&format!(
            "Remaining working days:       {} (weekends and holidays excluded)\n",
            format_opt_count(stats.remaining_working_days)
        ));
        out.push_str(&format!(
            "Projected resignation date:   {}\n",
            format_opt_date(stats.projected_resignation_date)
        ));
        out.push('\n');
    }

    if scope.includes(EventKind::Stress) {
        render_section(
            &mut out,
            "Resignation reasons (stress events)",
            journal,
            EventKind::Stress,
        );
    }
    if scope.includes(EventKind::Happy) {
        render_section(
            &mut out,
            "Reasons to stay (happy events)",
            journal,
            EventKind::Happy,
        );
    }

    out.push_str("Generated by gauge. For personal records only.\n");
    out
}

fn render_section(out: &mut String, title: &str, journal: &Journal, kind: EventKind) {
    out.push_str(title);
    out.push('\n');
    out.push_str(&"-".repeat(title.len()));
    out.push('\n');

    // Oldest first so the report reads as a chronology.
    let mut events: Vec<&Event> = journal.events.iter().filter(|e| e.kind == kind).collect();
    events.sort_by_key(|e| e.date);

    if events.is_empty() {
        out.push_str("No records.\n\n");
        return;
    }

    out.push_str(&format!(
        "{:<17} {:>3}  {:<18} {}\n",
        "DATE", "PTS", "TAGS", "DESCRIPTION"
    ));
    for event in events {
        let tags = event.tags.join(",");
        let wrapped = textwrap::fill(&event.description, DESCRIPTION_WIDTH);
        let mut lines = wrapped.lines();
        let first = lines.next().unwrap_or("");
        out.push_str(&format!(
            "{:<17} {:>3}  {:<18} {}\n",
            event.date.format("%Y-%m-%d %H:%M"),
            event.points,
            truncate_tags(&tags),
            first
        ));
        for line in lines {
            out.push_str(&format!("{:<41} {}\n", "", line));
        }
    }
    out.push('\n');
}

fn truncate_tags(tags: &str) -> String {
    if tags.chars().count() <= 18 {
        tags.to_string()
    } else {
        let head: String = tags.chars().take(15).collect();
        format!("{head}...")
    }
}

fn format_opt_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "not set".to_string())
}

fn format_opt_count(count: Option<u32>) -> String {
    count
        .map(|c| c.to_string())
        .unwrap_or_else(|| "n/a".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{HolidayCalendar, TAIWAN_NOTICE_POLICY};
    use crate::models::{Event, Settings, new_event_id};
    use crate::stats::compute_stats;
    use chrono::{Local, TimeZone};

    fn journal() -> Journal {
        let mut journal = Journal {
            events: vec![],
            settings: Settings {
                name: "Alex".to_string(),
                onboarding_date: NaiveDate::from_ymd_opt(2023, 4, 1),
                target_resignation_date: NaiveDate::from_ymd_opt(2025, 1, 10),
            },
        };
        journal.add_event(Event {
            id: new_event_id(),
            date: Local.with_ymd_and_hms(2024, 10, 1, 9, 0, 0).unwrap(),
            kind: EventKind::Stress,
            points: 3,
            description: "midnight release with no compensation".to_string(),
            tags: vec!["overtime".to_string()],
        });
        journal.add_event(Event {
            id: new_event_id(),
            date: Local.with_ymd_and_hms(2024, 10, 15, 15, 0, 0).unwrap(),
            kind: EventKind::Happy,
            points: 2,
            description: "team shipped the migration without incident".to_string(),
            tags: vec!["team".to_string()],
        });
        journal
    }

    fn render_scope(scope: ReportScope) -> String {
        let journal = journal();
        let today = NaiveDate::from_ymd_opt(2024, 12, 2).unwrap();
        let stats = compute_stats(
            &journal.events,
            &journal.settings,
            today,
            &HolidayCalendar::taiwan(),
            &TAIWAN_NOTICE_POLICY,
        );
        render(&journal, &stats, scope, today)
    }

    #[test]
    fn full_report_carries_both_sections_and_summary() {
        let text = render_scope(ReportScope::All);
        assert!(text.contains("Full career assessment report"));
        assert!(text.contains("Resignation reasons (stress events)"));
        assert!(text.contains("Reasons to stay (happy events)"));
        assert!(text.contains("Projected resignation date:   2025-01-09"));
        assert!(text.contains("midnight release"));
        assert!(text.contains("team shipped"));
    }

    #[test]
    fn stress_scope_excludes_happy_rows() {
        let text = render_scope(ReportScope::Stress);
        assert!(text.contains("midnight release"));
        assert!(!text.contains("team shipped"));
        assert!(!text.contains("Total happiness"));
        assert!(!text.contains("Projection summary"));
    }

    #[test]
    fn happy_scope_excludes_stress_rows() {
        let text = render_scope(ReportScope::Happy);
        assert!(text.contains("team shipped"));
        assert!(!text.contains("midnight release"));
        assert!(!text.contains("Total stress"));
    }

    #[test]
    fn empty_sections_say_so() {
        let journal = Journal::default();
        let today = NaiveDate::from_ymd_opt(2024, 12, 2).unwrap();
        let stats = compute_stats(
            &journal.events,
            &journal.settings,
            today,
            &HolidayCalendar::taiwan(),
            &TAIWAN_NOTICE_POLICY,
        );
        let text = render(&journal, &stats, ReportScope::All, today);
        assert!(text.contains("No records."));
        assert!(text.contains("Name:            not set"));
        assert!(text.contains("Remaining working days:       n/a"));
    }

    #[test]
    fn sections_sort_oldest_first() {
        let mut journal = journal();
        journal.add_event(Event {
            id: new_event_id(),
            date: Local.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap(),
            kind: EventKind::Stress,
            points: 1,
            description: "earliest entry".to_string(),
            tags: vec![],
        });
        let today = NaiveDate::from_ymd_opt(2024, 12, 2).unwrap();
        let stats = compute_stats(
            &journal.events,
            &journal.settings,
            today,
            &HolidayCalendar::taiwan(),
            &TAIWAN_NOTICE_POLICY,
        );
        let text = render(&journal, &stats, ReportScope::Stress, today);
        let earliest = text.find("earliest entry").unwrap();
        let later = text.find("midnight release").unwrap();
        assert!(earliest < later);
    }
}

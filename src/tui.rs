use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event as TermEvent, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;

use crate::models::{Event, EventKind, Journal, Level};
use crate::stats::Stats;

struct AppState {
    events: Vec<Event>,
    filter: Option<EventKind>,
    selected: usize,
    scroll_offset: u16,
    stats: Stats,
}

impl AppState {
    fn new(journal: &Journal, stats: Stats) -> Self {
        Self {
            events: journal.events.clone(),
            filter: None,
            selected: 0,
            scroll_offset: 0,
            stats,
        }
    }

    fn visible(&self) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| self.filter.is_none_or(|kind| e.kind == kind))
            .collect()
    }

    fn current(&self) -> Option<&Event> {
        self.visible().get(self.selected).copied()
    }

    fn next(&mut self) {
        let count = self.visible().len();
        if count > 0 && self.selected < count - 1 {
            self.selected += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_offset = 0;
        }
    }

    fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(3);
    }

    fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }

    fn cycle_filter(&mut self) {
        self.filter = match self.filter {
            None => Some(EventKind::Stress),
            Some(EventKind::Stress) => Some(EventKind::Happy),
            Some(EventKind::Happy) => None,
        };
        self.selected = 0;
        self.scroll_offset = 0;
    }
}

/// Read-only dashboard over a journal snapshot. All mutations stay on the
/// CLI, so there is nothing to save on exit.
pub fn run_browse(journal: &Journal, stats: Stats) -> Result<()> {
    if journal.events.is_empty() {
        println!("No events logged yet. Add one with: gauge log");
        return Ok(());
    }

    let mut state = AppState::new(journal, stats);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
) -> Result<()> {
    let mut list_state = ListState::default();
    list_state.select(Some(0));

    loop {
        terminal.draw(|frame| draw(frame, state, &mut list_state))?;

        if let TermEvent::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Down | KeyCode::Char('j') => state.next(),
                KeyCode::Up | KeyCode::Char('k') => state.prev(),
                KeyCode::Char('J') | KeyCode::PageDown => state.scroll_down(),
                KeyCode::Char('K') | KeyCode::PageUp => state.scroll_up(),
                KeyCode::Tab => state.cycle_filter(),
                _ => {}
            }
            list_state.select(Some(state.selected));
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame, state: &AppState, list_state: &mut ListState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let summary = Paragraph::new(build_summary(&state.stats))
        .block(Block::default().borders(Borders::ALL).title(" Countdown "));
    frame.render_widget(summary, rows[0]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);

    let visible = state.visible();
    let items: Vec<ListItem> = visible
        .iter()
        .map(|event| {
            let marker = match event.kind {
                EventKind::Stress => "!",
                EventKind::Happy => "+",
            };
            let description = if event.description.chars().count() > 30 {
                let head: String = event.description.chars().take(27).collect();
                format!("{head}...")
            } else {
                event.description.clone()
            };
            ListItem::new(format!(
                "{} {}p {} {}",
                marker,
                event.points,
                event.date.format("%m-%d"),
                description
            ))
        })
        .collect();

    let filter_label = match state.filter {
        None => "all",
        Some(EventKind::Stress) => "stress",
        Some(EventKind::Happy) => "happy",
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!(
            " Events - {} ({}) ",
            filter_label,
            visible.len()
        )))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, panes[0], list_state);

    let detail = build_detail(state);
    let detail_widget = Paragraph::new(detail)
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll_offset, 0));
    frame.render_widget(detail_widget, panes[1]);

    let help = Paragraph::new(" j/k:navigate  J/K:scroll  Tab:filter  q:quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, rows[2]);
}

fn build_summary(stats: &Stats) -> Text<'static> {
    let mut lines: Vec<Line> = Vec::new();

    match (stats.remaining_working_days, stats.projected_resignation_date) {
        (Some(days), Some(date)) => {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{days} working day(s) left"),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("   say goodbye on {}", date.format("%Y-%m-%d"))),
            ]));
        }
        _ => {
            lines.push(Line::from(
                "No target set. Run `gauge settings set --target <date>` to start the countdown.",
            ));
        }
    }

    lines.push(Line::from(vec![
        Span::styled(
            format!("stress {} pts", stats.total_stress_points),
            Style::default().fg(Color::Red),
        ),
        Span::raw(format!(
            " (-{} day(s), {} to next)   ",
            stats.stress_days_earned, stats.stress_points_until_next_day
        )),
        Span::styled(
            format!("happiness {} pts", stats.total_happy_points),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(format!(
            " (+{} day(s), {} to next)",
            stats.happy_days_earned, stats.happy_points_until_next_day
        )),
    ]));

    match (stats.tenure_months, stats.legal_notice_days) {
        (Some(tenure), Some(notice)) if notice > 0 => {
            let deadline = stats
                .legal_notice_date
                .map(|d| format!("hand in notice by {}", d.format("%Y-%m-%d")))
                .unwrap_or_default();
            lines.push(Line::from(format!(
                "tenure {tenure} month(s)   statutory notice {notice} day(s)   {deadline}"
            )));
        }
        (Some(tenure), Some(_)) => {
            lines.push(Line::from(format!(
                "tenure {tenure} month(s)   no statutory notice required"
            )));
        }
        _ => {}
    }

    Text::from(lines)
}

fn build_detail(state: &AppState) -> Text<'static> {
    let Some(event) = state.current() else {
        return Text::raw("No event selected");
    };

    let mut lines: Vec<Line> = Vec::new();

    let kind_style = match event.kind {
        EventKind::Stress => Style::default().fg(Color::Red),
        EventKind::Happy => Style::default().fg(Color::Cyan),
    };
    let level_label = Level::from_points(event.points)
        .map(|level| level.label(event.kind))
        .unwrap_or("unknown level");
    lines.push(Line::from(Span::styled(
        format!("{} - {}", event.kind.label(), level_label),
        kind_style.add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(format!(
        "{}  id {}",
        event.date.format("%Y-%m-%d %H:%M"),
        event.id
    )));

    if !event.tags.is_empty() {
        lines.push(Line::from(format!("tags: {}", event.tags.join(", "))));
    }

    lines.push(Line::from(""));
    for line in textwrap::fill(&event.description, 70).lines() {
        lines.push(Line::from(line.to_string()));
    }

    Text::from(lines)
}

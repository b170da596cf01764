use pawtrack::{clock::Clock, diary::HealthKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use super::screen::Screen;
use crate::App;

pub struct DiaryScreen;

impl<C: Clock> Screen<C> for DiaryScreen {
    fn render(&self, app: &App<C>, f: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(0)])
            .split(area);

        render_profile(app, f, rows[0]);
        render_health_log(app, f, rows[1]);
    }

    fn hints(&self) -> &'static str {
        " a add record · k record kind · n/b/g/w edit name/breed/age/weight "
    }
}

fn render_profile<C: Clock>(app: &App<C>, f: &mut Frame, area: Rect) {
    let profile = app.diary.profile();
    let label = Style::default().add_modifier(Modifier::DIM);
    let field = |name: &'static str, value: &str| {
        Line::from(vec![
            Span::styled(format!("{name:<8}"), label),
            Span::raw(value.to_string()),
        ])
    };

    let next_vaccination = match app.diary.next_vaccination() {
        Some(date) => Span::styled(
            date.format("%Y-%m-%d").to_string(),
            Style::default().fg(Color::Yellow),
        ),
        None => Span::styled("not planned", label),
    };

    let text = vec![
        Line::from(Span::styled(
            profile.name.clone(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        field("Breed", &profile.breed),
        field("Age", &profile.age),
        field("Weight", &profile.weight),
        Line::from(vec![Span::styled("Next vaccination ", label), next_vaccination]),
    ];
    f.render_widget(
        Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(" 🐶 Profile ")),
        area,
    );
}

fn kind_color(kind: HealthKind) -> Color {
    match kind {
        HealthKind::Vaccination => Color::Green,
        HealthKind::Checkup => Color::Cyan,
        HealthKind::Medication => Color::Magenta,
        HealthKind::Grooming => Color::Blue,
        HealthKind::Other => Color::Gray,
    }
}

fn render_health_log<C: Clock>(app: &App<C>, f: &mut Frame, area: Rect) {
    let header = Row::new(vec!["Date", "Kind", "Notes"])
        .style(Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED));

    let rows = app.diary.records().iter().map(|record| {
        Row::new(vec![
            Cell::from(record.date.format("%Y-%m-%d").to_string()),
            Cell::from(record.kind.to_string()).style(Style::default().fg(kind_color(record.kind))),
            Cell::from(record.notes.clone()),
        ])
    });

    let next_kind = app.diary_state.kind;
    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .column_spacing(2)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Health log ")
            .title(
                Line::from(Span::styled(
                    format!(" next entry: {next_kind} "),
                    Style::default().fg(kind_color(next_kind)),
                ))
                .right_aligned(),
            ),
    );
    f.render_widget(table, area);
}

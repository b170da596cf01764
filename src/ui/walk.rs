use pawtrack::{clock::Clock, position::GeoPoint, walk::WalkStatus};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as RouteLine},
        BarChart, Block, Borders, Gauge, Paragraph,
    },
    Frame,
};

use super::{charting, screen::Screen};
use crate::App;

/// Bars shown in the recent walks chart
const RECENT_WALKS: usize = 7;

pub struct WalkScreen;

impl<C: Clock> Screen<C> for WalkScreen {
    fn render(&self, app: &App<C>, f: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // timer
                Constraint::Length(3), // goal gauge
                Constraint::Length(3), // weekly summary
                Constraint::Min(0),    // charts
            ])
            .split(area);

        render_timer(app, f, rows[0]);
        render_goal(app, f, rows[1]);
        render_summary(app, f, rows[2]);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[3]);
        render_recent_walks(app, f, bottom[0]);
        render_route(app, f, bottom[1]);
    }

    fn hints(&self) -> &'static str {
        " Space/Enter start or end walk · Tab switch page · q quit "
    }
}

fn render_timer<C: Clock>(app: &App<C>, f: &mut Frame, area: Rect) {
    let weather = &app.weather;
    let (button, color) = match app.walk.status() {
        WalkStatus::Idle => ("▶ start walk", Color::Green),
        WalkStatus::Active => ("■ end walk", Color::Red),
    };

    let text = vec![
        Line::from(Span::styled(
            app.walk.formatted_elapsed(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("[Space] {button}"),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Walk ")
        .title(
            Line::from(format!(
                " ☀ {} {}°C · humidity {}% ",
                weather.condition, weather.temperature_c, weather.humidity_pct
            ))
            .right_aligned(),
        );
    f.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(block),
        area,
    );
}

fn render_goal<C: Clock>(app: &App<C>, f: &mut Frame, area: Rect) {
    let pct = app.walk.progress_percent();
    let color = if app.walk.goal_reached() {
        Color::Green
    } else {
        Color::Yellow
    };
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Daily goal {} min ", app.walk.goal_minutes())),
        )
        .gauge_style(Style::default().fg(color))
        .ratio((pct / 100.0).clamp(0.0, 1.0))
        .label(format!("{pct:.0}%"));
    f.render_widget(gauge, area);
}

fn render_summary<C: Clock>(app: &App<C>, f: &mut Frame, area: Rect) {
    let summary = app.history.weekly_summary(app.walk.today());
    let line = Line::from(format!(
        "{} walks · {} km · {} min · {} km/h avg",
        summary.walks,
        charting::format_label(summary.total_km),
        summary.total_minutes,
        charting::format_label(summary.avg_speed_kmh),
    ));
    f.render_widget(
        Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Last 7 days "),
        ),
        area,
    );
}

fn render_recent_walks<C: Clock>(app: &App<C>, f: &mut Frame, area: Rect) {
    let bars = charting::recent_walk_bars(app.history.list(), RECENT_WALKS);
    let data: Vec<(&str, u64)> = bars.iter().map(|(label, v)| (label.as_str(), *v)).collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Recent walks (min) "),
        )
        .data(data.as_slice())
        .bar_width(5)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Yellow))
        .value_style(Style::default().fg(Color::Black).bg(Color::Yellow));
    f.render_widget(chart, area);
}

/// The running walk's path, or the latest saved walk when idle
fn route_to_show<C: Clock>(app: &App<C>) -> (&[GeoPoint], &'static str) {
    if app.walk.is_active() {
        (app.walk.path(), " Route (live) ")
    } else {
        let last = app
            .history
            .list()
            .first()
            .map(|r| r.path.as_slice())
            .unwrap_or(&[]);
        (last, " Route (last walk) ")
    }
}

fn render_route<C: Clock>(app: &App<C>, f: &mut Frame, area: Rect) {
    let (path, title) = route_to_show(app);
    let (x_bounds, y_bounds) = charting::route_bounds(path);
    let coords: Vec<(f64, f64)> = path.iter().map(|p| (p.lng, p.lat)).collect();

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(move |ctx| {
            for pair in coords.windows(2) {
                ctx.draw(&RouteLine::new(
                    pair[0].0,
                    pair[0].1,
                    pair[1].0,
                    pair[1].1,
                    Color::Cyan,
                ));
            }
            if let Some(&(x, y)) = coords.last() {
                ctx.print(x, y, Span::styled("●", Style::default().fg(Color::Yellow)));
            }
        });
    f.render_widget(canvas, area);
}

use pawtrack::{
    clock::Clock,
    facilities::Facility,
    position::{GeoPoint, DEFAULT_LOCATION},
    util::truncate_to_width,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{canvas::Canvas, Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::{charting, screen::Screen};
use crate::App;

pub struct FacilitiesScreen;

impl<C: Clock> Screen<C> for FacilitiesScreen {
    fn render(&self, app: &App<C>, f: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[1]);

        render_filter_bar(app, f, rows[0]);
        render_list(app, f, body[0]);
        render_map(app, f, body[1]);
    }

    fn hints(&self) -> &'static str {
        " / search · c category · ↑↓ select · f favorite "
    }
}

fn render_filter_bar<C: Clock>(app: &App<C>, f: &mut Frame, area: Rect) {
    let filter = &app.facility_state.filter;
    let dim = Style::default().add_modifier(Modifier::DIM);
    let query = if filter.query.is_empty() {
        Span::styled("(none)", dim)
    } else {
        Span::raw(filter.query.clone())
    };
    let category = match filter.category {
        Some(c) => Span::styled(format!("{} {c}", c.icon()), Style::default().fg(Color::Cyan)),
        None => Span::raw("All"),
    };
    let favorites = app.facilities.favorites().len();

    let line = Line::from(vec![
        Span::styled("Search ", dim),
        query,
        Span::styled("   Category ", dim),
        category,
        Span::styled(format!("   ♥ {favorites} favorites"), Style::default().fg(Color::Red)),
    ]);
    f.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL).title(" Nearby ")),
        area,
    );
}

fn facility_item(facility: &Facility, width: usize) -> ListItem<'static> {
    let heart = if facility.is_favorite {
        Span::styled(" ♥", Style::default().fg(Color::Red))
    } else {
        Span::raw("")
    };
    let title = Line::from(vec![
        Span::raw(format!("{} ", facility.category.icon())),
        Span::styled(
            facility.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  ★ {:.1}  {:.1} km", facility.rating, facility.distance_km),
            Style::default().fg(Color::Yellow),
        ),
        heart,
    ]);
    let details = format!(
        "   {} · {} · {}",
        facility.address, facility.hours, facility.phone
    );
    let details = Line::from(Span::styled(
        truncate_to_width(&details, width),
        Style::default().add_modifier(Modifier::DIM),
    ));
    ListItem::new(vec![title, details])
}

fn render_list<C: Clock>(app: &App<C>, f: &mut Frame, area: Rect) {
    let visible = app.facilities.filter(&app.facility_state.filter);
    let width = area.width.saturating_sub(4) as usize;

    if visible.is_empty() {
        f.render_widget(
            Paragraph::new("No facilities match").block(Block::default().borders(Borders::ALL)),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = visible.iter().map(|fac| facility_item(fac, width)).collect();
    let selected = app.facility_state.selected.min(visible.len() - 1);
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▶ ");

    let mut state = ListState::default().with_selected(Some(selected));
    f.render_stateful_widget(list, area, &mut state);
}

/// Plot the filtered facilities around the user's location
fn render_map<C: Clock>(app: &App<C>, f: &mut Frame, area: Rect) {
    let visible = app.facilities.filter(&app.facility_state.filter);
    let selected = app
        .facility_state
        .selected
        .min(visible.len().saturating_sub(1));

    let points: Vec<GeoPoint> = visible
        .iter()
        .map(|fac| fac.position)
        .chain([DEFAULT_LOCATION])
        .collect();
    let (x_bounds, y_bounds) = charting::route_bounds(&points);

    let mut marks: Vec<(f64, f64, bool)> = visible
        .iter()
        .enumerate()
        .map(|(idx, fac)| (fac.position.lng, fac.position.lat, idx == selected))
        .collect();
    // selected one last so it stays on top
    marks.sort_by_key(|m| m.2);

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(" Map "))
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(move |ctx| {
            ctx.print(
                DEFAULT_LOCATION.lng,
                DEFAULT_LOCATION.lat,
                Span::styled("◆", Style::default().fg(Color::Cyan)),
            );
            for &(x, y, is_selected) in &marks {
                let mark = if is_selected {
                    Span::styled(
                        "●",
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled("•", Style::default().fg(Color::Red))
                };
                ctx.print(x, y, mark);
            }
        });
    f.render_widget(canvas, area);
}

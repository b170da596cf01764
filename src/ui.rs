pub mod charting;
pub mod community;
pub mod diary;
pub mod facilities;
pub mod screen;
pub mod walk;

use pawtrack::{clock::Clock, toast::ToastLevel};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use self::screen::current_screen;
use crate::{App, InputPrompt, Page};

/// Draw the whole screen: header, current page, toast line and the tab bar
/// (replaced by the text prompt while one is open)
pub fn draw<C: Clock>(app: &App<C>, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(0),    // page
            Constraint::Length(1), // toast
            Constraint::Length(3), // tab bar or prompt
        ])
        .split(f.area());

    let screen = current_screen::<C>(app.page);

    render_header(app, f, chunks[0]);
    screen.render(app, f, chunks[1]);
    render_toast(app, f, chunks[2]);
    match &app.input {
        Some(prompt) => render_prompt(prompt, f, chunks[3]),
        None => render_tab_bar(app.page, screen.hints(), f, chunks[3]),
    }
}

fn render_header<C: Clock>(app: &App<C>, f: &mut Frame, area: Rect) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut spans = vec![
        Span::styled("🐾 pawtrack", bold.fg(Color::Yellow)),
        Span::raw("  ·  "),
        Span::styled(app.diary.profile().name.clone(), bold),
    ];
    if app.walk.is_active() {
        spans.push(Span::raw("  ·  "));
        spans.push(Span::styled(
            format!("● walking {}", app.walk.formatted_elapsed()),
            Style::default().fg(Color::Green),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_toast<C: Clock>(app: &App<C>, f: &mut Frame, area: Rect) {
    let Some(toast) = app.toasts.current() else {
        return;
    };
    let color = match toast.level {
        ToastLevel::Success => Color::Green,
        ToastLevel::Info => Color::Cyan,
    };
    let line = Paragraph::new(Span::styled(
        toast.message.as_str(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    f.render_widget(line, area);
}

fn render_tab_bar(page: Page, hints: &str, f: &mut Frame, area: Rect) {
    let titles = Page::ALL
        .iter()
        .enumerate()
        .map(|(idx, p)| format!("{} {} {}", idx + 1, p.icon(), p));

    let tabs = Tabs::new(titles)
        .select(page.index())
        .block(
            Block::default()
                .borders(Borders::TOP)
                .title(Span::styled(hints, Style::default().add_modifier(Modifier::DIM))),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        );
    f.render_widget(tabs, area);
}

fn render_prompt(prompt: &InputPrompt, f: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::raw(prompt.buffer.as_str()),
        Span::styled("█", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(format!(" {} (Enter to submit, Esc to cancel) ", prompt.purpose.label()));
    f.render_widget(Paragraph::new(line).block(block), area);
}

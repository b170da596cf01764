use chrono::{DateTime, Local};
use pawtrack::{
    clock::Clock,
    community::{FeedTab, Post},
    util::{relative_time, truncate_to_width},
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

use super::screen::Screen;
use crate::App;

pub struct CommunityScreen;

impl<C: Clock> Screen<C> for CommunityScreen {
    fn render(&self, app: &App<C>, f: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        render_tabs(app, f, rows[0]);

        let now = Local::now();
        match app.community_state.detail.and_then(|id| app.community.get(id)) {
            Some(post) => render_detail(post, now, f, rows[1]),
            None => render_feed(app, now, f, rows[1]),
        }
    }

    fn hints(&self) -> &'static str {
        " / search · t tab · ↑↓ select · Enter open · l like · c comment · p post "
    }
}

fn render_tabs<C: Clock>(app: &App<C>, f: &mut Frame, area: Rect) {
    let state = &app.community_state;
    let selected = FeedTab::ALL
        .iter()
        .position(|t| *t == state.tab)
        .unwrap_or(0);
    let title = if state.query.is_empty() {
        " Community ".to_string()
    } else {
        format!(" Community · \"{}\" ", state.query)
    };

    let tabs = Tabs::new(FeedTab::ALL.iter().map(|t| t.to_string()))
        .select(selected)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

fn likes_span(post: &Post) -> Span<'static> {
    if post.liked {
        Span::styled(format!("♥ {}", post.likes), Style::default().fg(Color::Red))
    } else {
        Span::raw(format!("♡ {}", post.likes))
    }
}

fn byline(post: &Post, now: DateTime<Local>) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            post.author.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" · {}", relative_time(post.created_at, now)),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ])
}

fn footer(post: &Post) -> Line<'static> {
    let tags = post
        .tags
        .iter()
        .map(|t| format!("#{t}"))
        .collect::<Vec<_>>()
        .join(" ");
    Line::from(vec![
        likes_span(post),
        Span::raw(format!("  💬 {}  ", post.comments.len())),
        Span::styled(tags, Style::default().fg(Color::Cyan)),
    ])
}

fn render_feed<C: Clock>(app: &App<C>, now: DateTime<Local>, f: &mut Frame, area: Rect) {
    let posts = app
        .community
        .view(app.community_state.tab, &app.community_state.query);

    if posts.is_empty() {
        f.render_widget(
            Paragraph::new("No posts yet").block(Block::default().borders(Borders::ALL)),
            area,
        );
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = posts
        .iter()
        .map(|post| {
            ListItem::new(vec![
                byline(post, now),
                Line::from(truncate_to_width(&post.content, width)),
                footer(post),
                Line::default(),
            ])
        })
        .collect();

    let selected = app.community_state.selected.min(posts.len() - 1);
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▶ ");
    let mut state = ListState::default().with_selected(Some(selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_detail(post: &Post, now: DateTime<Local>, f: &mut Frame, area: Rect) {
    let mut text = vec![
        byline(post, now),
        Line::default(),
        Line::from(post.content.clone()),
        Line::default(),
        footer(post),
        Line::default(),
        Line::from(Span::styled(
            format!("Comments ({})", post.comments.len()),
            Style::default().add_modifier(Modifier::UNDERLINED),
        )),
    ];
    for comment in &post.comments {
        text.push(Line::from(vec![
            Span::styled(
                format!("{}: ", comment.author.name),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(comment.content.clone()),
            Span::styled(
                format!("  {}", relative_time(comment.created_at, now)),
                Style::default().add_modifier(Modifier::DIM),
            ),
        ]));
    }

    f.render_widget(
        Paragraph::new(text).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Post {} (Esc to close) ", post.id)),
        ),
        area,
    );
}

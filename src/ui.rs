//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! ## For contributors
//!
//! * Every screen is a bordered body on top and a one-line status bar below.
//! * The planet list is virtualized: only the rows in
//!   [`IncrementalList::window`](crate::list::IncrementalList::window) are
//!   turned into [`ListItem`]s, no matter how many planets are loaded.
//! * Drawing the list records the viewport height on the list, which is what
//!   the near-bottom check in [`App::on_render`] measures against.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Row, Table},
    Frame,
};

use crate::app::{App, Screen};
use crate::storage::Storage;

/// Draw the complete UI for one frame.
pub fn draw<S: Storage>(app: &mut App<S>, frame: &mut Frame) {
    let [main_area, status_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    match app.screen {
        Screen::List => draw_planet_list(app, frame, main_area),
        Screen::Detail => draw_detail(app, frame, main_area),
        Screen::Wishlist => draw_wishlist(app, frame, main_area),
    }
    draw_status_bar(app, frame, status_area);
}

/// Render the infinite-scroll planet list.
fn draw_planet_list<S: Storage>(app: &mut App<S>, frame: &mut Frame, area: Rect) {
    let list = &mut app.list;
    list.set_viewport(area.height.saturating_sub(2) as usize);

    let window = list.window();
    let rows: Vec<ListItem> = list.items[window.clone()]
        .iter()
        .enumerate()
        .map(|(i, planet)| {
            let position = window.start + i + 1;
            let favorite = app.store.contains(&position.to_string());
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{position:>4} "),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    if favorite { "★ " } else { "  " },
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(planet.name.clone(), Style::default().fg(Color::White)),
            ]))
        })
        .collect();

    let mut state = ListState::default()
        .with_offset(list.offset() - window.start)
        .with_selected(list.selected.map(|s| s - window.start));

    let mut title = String::from(" Planets ");
    if list.is_loading() {
        title.push_str("(loading…) ");
    }

    let widget = List::new(rows)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(widget, area, &mut state);
}

/// Render a single planet and its wishlist state.
fn draw_detail<S: Storage>(app: &App<S>, frame: &mut Frame, area: Rect) {
    let Some(detail) = &app.detail else {
        return;
    };

    let block = Block::default()
        .title(format!(" Planet {} ", detail.id))
        .borders(Borders::ALL);

    if detail.loading {
        frame.render_widget(Paragraph::new("Loading…").block(block), area);
        return;
    }
    let Some(planet) = &detail.planet else {
        let msg = detail.error.as_deref().unwrap_or("Planet not available");
        frame.render_widget(
            Paragraph::new(Span::styled(msg.to_string(), Style::default().fg(Color::Red)))
                .block(block),
            area,
        );
        return;
    };

    let favorite = detail.is_favorited(&app.store);
    let block = Block::default()
        .title(format!(" {} ", planet.name))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [table_area, button_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    let rows = planet.attributes().into_iter().map(|(label, value)| {
        Row::new(vec![
            Span::styled(label, Style::default().fg(Color::Cyan)),
            Span::raw(":"),
            Span::raw(value),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(16),
            Constraint::Length(1),
            Constraint::Min(1),
        ],
    );
    frame.render_widget(table, table_area);

    let button = if favorite {
        Span::styled(
            "[f] Remove from Wishlist",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            "[f] Add to Wishlist",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            button,
            Span::raw("   "),
            Span::styled("[Esc] Return", Style::default().fg(Color::DarkGray)),
        ])),
        button_area,
    );
}

/// Render the current wishlist page and the page selector.
fn draw_wishlist<S: Storage>(app: &App<S>, frame: &mut Frame, area: Rect) {
    let Some(view) = &app.wishlist else {
        return;
    };

    let block = Block::default()
        .title(format!(" Wishlist ({}) ", view.len()))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [list_area, pager_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    if view.loading {
        frame.render_widget(Paragraph::new("Loading…"), list_area);
    } else if view.current_items().is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No planets in the wishlist yet.",
                Style::default().fg(Color::DarkGray),
            )),
            list_area,
        );
    } else {
        let rows: Vec<ListItem> = view
            .current_items()
            .iter()
            .map(|p| ListItem::new(p.name.clone()))
            .collect();
        let mut state = ListState::default().with_selected(Some(view.selected));
        let widget = List::new(rows)
            .highlight_style(
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .bg(Color::DarkGray),
            )
            .highlight_symbol("▸ ");
        frame.render_stateful_widget(widget, list_area, &mut state);
    }

    let pager: Vec<Span> = (1..=view.page_count())
        .map(|n| {
            let style = if n == view.current_page() {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Yellow)
            };
            Span::styled(format!(" {n} "), style)
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(pager)), pager_area);
}

/// Render the bottom status bar.
fn draw_status_bar<S: Storage>(app: &App<S>, frame: &mut Frame, area: Rect) {
    let (message, help) = match app.screen {
        Screen::List => (
            app.status.clone(),
            "q: quit  ↑/↓: scroll  Enter: open  w: wishlist  r: reload",
        ),
        Screen::Detail => (app.status.clone(), "f: toggle favorite  Esc: back  w: wishlist"),
        Screen::Wishlist => (
            app.wishlist
                .as_ref()
                .and_then(|v| v.error.clone())
                .unwrap_or_else(|| app.status.clone()),
            "←/→: page  1-9: jump  Enter: open  Esc: list",
        ),
    };

    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(message, Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(
            format!("{} planets  {} ★", app.list.items.len(), app.store.len()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  "),
        Span::raw(help),
    ]));
    frame.render_widget(status, area);
}

use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::stats_card::StatsCard;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use chrono::{DateTime, Local, Utc};
use rps_api::PlayerHand;

static TABS: &[&str; 2] = &["Live", "Player"];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Live => draw_live(f, layout.main, app),
            MenuItem::Player => draw_player(f, layout.main, app),
            MenuItem::Help => draw_placeholder(
                f,
                layout.main,
                "Help: q=quit  1=Live  2=Player  /=search  m=load more  p=page size  j/k=scroll  f=full screen  \"=logs",
            ),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }
        draw_status_bar(f, layout.status, app);
        draw_loading_spinner(f, f.area(), app, loading);
    });

    if let Err(e) = result {
        log::error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let selected = tab_index(app.state.active_tab, app.state.previous_tab);

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(selected)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

/// Help has no tab of its own, so the tab it was opened from stays selected.
fn tab_index(active: MenuItem, previous: MenuItem) -> usize {
    match active {
        MenuItem::Live => 0,
        MenuItem::Player => 1,
        MenuItem::Help => match previous {
            MenuItem::Player => 1,
            _ => 0,
        },
    }
}

fn draw_live(f: &mut Frame, area: Rect, app: &App) {
    let title = format!(" Games In Progress ({}) ", app.state.in_progress.len());
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.state.in_progress.is_empty() {
        let msg = if app.state.live.connected {
            "Waiting for games to begin..."
        } else {
            "Connecting to live feed..."
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    // Newest first; older games fall off the bottom of the pane.
    let rows: Vec<Row> = app
        .state
        .in_progress
        .newest_first()
        .take(inner.height.saturating_sub(1) as usize)
        .map(|g| {
            Row::new(vec![
                Cell::from(g.player_a.name.clone()),
                Cell::from(g.player_b.name.clone()),
                Cell::from(format_time(g.t, "%H:%M:%S")),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [Constraint::Percentage(40), Constraint::Percentage(40), Constraint::Percentage(20)],
    )
    .header(header_row(&["Player A", "Player B", "Started"]));
    f.render_widget(table, inner);
}

fn draw_player(f: &mut Frame, area: Rect, app: &App) {
    let [info_area, games_area] =
        Layout::vertical([Constraint::Length(11), Constraint::Fill(1)]).areas(area);

    let block = default_border(Color::White).title(" Player Information ");
    let inner = block.inner(info_area);
    f.render_widget(block, info_area);

    let [input_area, card_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(inner);
    draw_search_input(f, input_area, app);

    match app.state.player.name.as_deref() {
        Some(query) => f.render_widget(
            StatsCard { query, stats: app.state.player.stats.as_ref() },
            card_area,
        ),
        None => f.render_widget(
            Paragraph::new("Press / to look up a player by name.")
                .style(Style::default().fg(Color::DarkGray)),
            card_area,
        ),
    }

    draw_player_games(f, games_area, app);
}

fn draw_search_input(f: &mut Frame, area: Rect, app: &App) {
    let search = &app.state.search;
    let (mode, text, style) = if search.composing {
        ("typing", format!("> {}_", search.input), Style::default().fg(Color::Yellow))
    } else {
        (
            "search",
            "Press / or Enter to type a name. Enter submits, Esc cancels.".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    };
    let block = default_border(Color::DarkGray).title(format!(" {mode} "));
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(text).style(style), inner);
}

fn draw_player_games(f: &mut Frame, area: Rect, app: &App) {
    let view = &app.state.player;
    let total = view.stats.as_ref().map_or(0, |s| s.total_games);
    let title = match view.name.as_deref() {
        Some(name) => format!(
            " Games Played By {name} ({} of {total}) | m=load {} more  p=page size ",
            view.visible_rows, view.page_size
        ),
        None => " Games Played ".to_string(),
    };
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let games = view.visible_games(&app.state.index);
    if games.is_empty() {
        return;
    }

    let rows: Vec<Row> = games
        .iter()
        .skip(view.scroll_offset as usize)
        .take(inner.height.saturating_sub(1) as usize)
        .map(|g| {
            Row::new(vec![
                Cell::from(format_time(g.t, "%d.%m.%Y %H:%M:%S")),
                Cell::from(format_side(&g.player_a)),
                Cell::from(format_side(&g.player_b)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [Constraint::Length(20), Constraint::Fill(1), Constraint::Fill(1)],
    )
    .header(header_row(&["Time", "Player A", "Player B"]));
    f.render_widget(table, inner);
}

fn header_row<'a>(titles: &[&'a str]) -> Row<'a> {
    Row::new(titles.iter().map(|t| Cell::from(*t)))
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD))
}

fn format_side(side: &PlayerHand) -> String {
    match side.played {
        Some(hand) => format!("{} [{hand}]", side.name),
        None => side.name.clone(),
    }
}

fn format_time(t: DateTime<Utc>, fmt: &str) -> String {
    t.with_timezone(&Local).format(fmt).to_string()
}

fn draw_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let history = &app.state.history;
    let history_label = if history.finished {
        format!("history done ({} pages, {} games)", history.pages, history.games)
    } else {
        format!("history page {} ({} games)", history.pages, history.games)
    };
    let (live_label, live_color) = if app.state.live.connected {
        ("live", Color::Green)
    } else {
        ("offline", Color::Red)
    };

    let mut spans = vec![
        Span::styled(format!(" {live_label} "), Style::default().fg(live_color)),
        Span::styled(
            format!(
                " {} players  {} games  {} live results  {history_label}",
                app.state.index.player_count(),
                app.state.index.game_count(),
                app.state.live.results,
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(err) = app.state.last_error.as_deref() {
        spans.push(Span::styled(format!("  {err}"), Style::default().fg(Color::Red)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray));
    f.render_widget(logs, area);
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        inner,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rps_api::Hand;

    #[test]
    fn side_shows_hand_once_resolved() {
        let open = PlayerHand { name: "Aino".into(), played: None };
        let done = PlayerHand { name: "Aino".into(), played: Some(Hand::Scissors) };
        assert_eq!(format_side(&open), "Aino");
        assert_eq!(format_side(&done), "Aino [SCISSORS]");
    }

    #[test]
    fn help_keeps_the_tab_it_was_opened_from() {
        assert_eq!(tab_index(MenuItem::Live, MenuItem::Player), 0);
        assert_eq!(tab_index(MenuItem::Player, MenuItem::Live), 1);
        assert_eq!(tab_index(MenuItem::Help, MenuItem::Player), 1);
        assert_eq!(tab_index(MenuItem::Help, MenuItem::Live), 0);
    }
}

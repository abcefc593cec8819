use crate::app::{App, MenuItem};
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::Mutex;

pub async fn handle_key_bindings(key_event: KeyEvent, app: &Arc<Mutex<App>>) {
    let mut guard = app.lock().await;

    if guard.state.search.composing {
        match (key_event.code, key_event.modifiers) {
            (Char('c'), KeyModifiers::CONTROL) => {
                crate::cleanup_terminal();
                std::process::exit(0);
            }
            (KeyCode::Enter, _) => guard.submit_search(),
            (KeyCode::Esc, _) => guard.state.search.cancel(),
            (KeyCode::Backspace, _) => {
                guard.state.search.input.pop();
            }
            (Char(c), _) => guard.state.search.input.push(c),
            _ => {}
        }
        return;
    }

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Live),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Player),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Player lookup
        (_, Char('/') | Char('i'), _) => guard.start_search(),
        (MenuItem::Player, KeyCode::Enter, _) => guard.start_search(),
        (MenuItem::Player, Char('m'), _) => guard.load_more_games(),
        (MenuItem::Player, Char('p'), _) => guard.cycle_page_size(),
        (MenuItem::Player, Char('j') | KeyCode::Down, _) => guard.state.player.scroll_down(),
        (MenuItem::Player, Char('k') | KeyCode::Up, _) => guard.state.player.scroll_up(),
        (MenuItem::Player, KeyCode::Esc, _) => guard.update_tab(MenuItem::Live),

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}

use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use log::{debug, info, warn};
use rps_api::index::MergeOrder;
use rps_api::{GameRecord, LiveEvent};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Live,
    Player,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        let app = Self::with_settings(AppSettings::load());

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    pub fn with_settings(settings: AppSettings) -> Self {
        Self {
            state: AppState::new(&settings),
            settings,
        }
    }

    // -----------------------------------------------------------------------
    // History feed, driven from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_history_page(&mut self, games: Vec<GameRecord>) {
        self.state.history.pages += 1;
        let touches_view = games.iter().any(|g| self.state.player.is_viewing(g));
        let merged = self.state.index.merge_all(games, MergeOrder::Append);
        self.state.history.games += merged;
        if touches_view {
            self.state.player.refresh(&self.state.index);
        }
    }

    pub fn on_history_finished(&mut self, pages: usize, games: usize) {
        info!("history loaded: {pages} pages, {games} games, {} players", self.state.index.player_count());
        self.state.history.finished = true;
    }

    // -----------------------------------------------------------------------
    // Live feed
    // -----------------------------------------------------------------------

    pub fn on_live_event(&mut self, event: LiveEvent) {
        match event {
            LiveEvent::Begin(game) => {
                if !self.state.in_progress.begin(game) {
                    debug!("duplicate begin ignored");
                }
            }
            LiveEvent::Result(game) => {
                let game_id = game.game_id.clone();
                let touches_view = self.state.player.is_viewing(&game);
                if self.state.index.merge(game, MergeOrder::Prepend) {
                    self.state.live.results += 1;
                } else {
                    warn!("result for {game_id} was already indexed");
                }
                if self.state.in_progress.finish(&game_id).is_none() {
                    debug!("result for {game_id} arrived without a begin");
                }
                if touches_view {
                    self.state.player.refresh(&self.state.index);
                }
            }
        }
    }

    pub fn on_live_connected(&mut self) {
        info!("live feed connected to {}", self.state.live.endpoint);
        self.state.live.connected = true;
    }

    pub fn on_live_disconnected(&mut self) {
        if self.state.live.connected {
            warn!("live feed disconnected, retrying...");
        }
        self.state.live.connected = false;
    }

    pub fn on_live_error(&mut self, message: String) {
        warn!("{message}");
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Player lookup
    // -----------------------------------------------------------------------

    pub fn start_search(&mut self) {
        self.update_tab(MenuItem::Player);
        self.state.search.start();
    }

    pub fn submit_search(&mut self) {
        if let Some(name) = self.state.search.submit() {
            self.search_player(name);
        }
    }

    pub fn search_player(&mut self, name: String) {
        debug!("player lookup: {name}");
        self.state.player.show(name, &self.state.index);
    }

    pub fn load_more_games(&mut self) {
        self.state.player.load_more(&self.state.index);
    }

    pub fn cycle_page_size(&mut self) {
        self.state.player.cycle_page_size();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rps_api::{Hand, PlayerHand};

    fn record(id: &str, a: (&str, Option<Hand>), b: (&str, Option<Hand>)) -> GameRecord {
        GameRecord {
            game_id: id.to_string(),
            t: Utc::now(),
            player_a: PlayerHand { name: a.0.to_string(), played: a.1 },
            player_b: PlayerHand { name: b.0.to_string(), played: b.1 },
        }
    }

    fn app() -> App {
        App::with_settings(AppSettings::default())
    }

    fn history_ids(app: &App, name: &str) -> Vec<String> {
        app.state
            .index
            .lookup(name)
            .map(|l| l.iter().map(|g| g.game_id.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn begin_then_result_moves_game_into_history() {
        let mut app = app();
        app.on_live_event(LiveEvent::Begin(record("x", ("Aino", None), ("Ukko", None))));
        assert!(app.state.in_progress.contains("x"));

        app.on_live_event(LiveEvent::Result(record(
            "x",
            ("Aino", Some(Hand::Rock)),
            ("Ukko", Some(Hand::Paper)),
        )));
        assert!(!app.state.in_progress.contains("x"));
        assert_eq!(history_ids(&app, "Aino"), vec!["x"]);
        assert_eq!(history_ids(&app, "Ukko"), vec!["x"]);
        assert_eq!(app.state.live.results, 1);
    }

    #[test]
    fn result_without_begin_still_merges() {
        let mut app = app();
        app.on_live_event(LiveEvent::Begin(record("other", ("A", None), ("B", None))));
        app.on_live_event(LiveEvent::Result(record(
            "y",
            ("Aino", Some(Hand::Scissors)),
            ("Ukko", Some(Hand::Paper)),
        )));
        assert_eq!(history_ids(&app, "Aino"), vec!["y"]);
        assert_eq!(app.state.in_progress.len(), 1);
    }

    #[test]
    fn live_results_are_prepended_to_history() {
        let mut app = app();
        app.on_history_page(vec![
            record("h1", ("Aino", Some(Hand::Rock)), ("Ukko", Some(Hand::Rock))),
            record("h2", ("Ukko", Some(Hand::Paper)), ("Aino", Some(Hand::Rock))),
        ]);
        app.on_live_event(LiveEvent::Result(record(
            "l1",
            ("Aino", Some(Hand::Paper)),
            ("Marjatta", Some(Hand::Rock)),
        )));
        assert_eq!(history_ids(&app, "Aino"), vec!["l1", "h1", "h2"]);
        assert_eq!(history_ids(&app, "Marjatta"), vec!["l1"]);
        assert_eq!(app.state.history.games, 2);
    }

    #[test]
    fn search_reports_not_found_and_then_updates() {
        let mut app = app();
        app.search_player("Aino".into());
        assert_eq!(app.state.player.name.as_deref(), Some("Aino"));
        assert!(app.state.player.stats.is_none());

        app.on_history_page(vec![record(
            "h1",
            ("Aino", Some(Hand::Rock)),
            ("Ukko", Some(Hand::Scissors)),
        )]);
        let stats = app.state.player.stats.as_ref().expect("refreshed after merge");
        assert_eq!(stats.wins, 1);
        assert_eq!(app.state.player.visible_rows, 1);
    }

    #[test]
    fn blank_search_leaves_view_empty() {
        let mut app = app();
        app.start_search();
        assert_eq!(app.state.active_tab, MenuItem::Player);
        app.submit_search();
        assert!(app.state.player.name.is_none());
    }
}

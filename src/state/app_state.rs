use crate::app::MenuItem;
use crate::state::app_settings::{AppSettings, PAGE_SIZES};
use rps_api::GameRecord;
use rps_api::index::PlayerIndex;
use rps_api::stats::{PlayerStats, player_stats};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Games in progress
// ---------------------------------------------------------------------------

/// Games that have begun but not produced a result yet, in arrival order.
#[derive(Debug, Default)]
pub struct InProgressGames {
    games: Vec<GameRecord>,
}

impl InProgressGames {
    /// Returns false if a game with the same id is already listed.
    pub fn begin(&mut self, game: GameRecord) -> bool {
        if self.contains(&game.game_id) {
            return false;
        }
        self.games.push(game);
        true
    }

    /// Remove and return the listed game with `game_id`, if it was ever seen.
    pub fn finish(&mut self, game_id: &str) -> Option<GameRecord> {
        let pos = self.games.iter().position(|g| g.game_id == game_id)?;
        Some(self.games.remove(pos))
    }

    pub fn contains(&self, game_id: &str) -> bool {
        self.games.iter().any(|g| g.game_id == game_id)
    }

    /// Most recently begun game first.
    pub fn newest_first(&self) -> std::iter::Rev<std::slice::Iter<'_, GameRecord>> {
        self.games.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Player lookup view
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct PlayerView {
    /// Last submitted name; None until the first search.
    pub name: Option<String>,
    /// None with a name set means the player was not found.
    pub stats: Option<PlayerStats>,
    /// Rows of the player's game list currently rendered.
    pub visible_rows: usize,
    pub page_size: usize,
    pub scroll_offset: u16,
}

impl PlayerView {
    pub fn new(page_size: usize) -> Self {
        Self { page_size, ..Self::default() }
    }

    /// Run a new query and reset the list to a single page.
    pub fn show(&mut self, name: String, index: &PlayerIndex) {
        self.stats = player_stats(index, &name);
        self.visible_rows = self.page_size.min(total_games(index, &name));
        self.scroll_offset = 0;
        self.name = Some(name);
    }

    /// Recompute statistics after the index changed. The row count grows to
    /// fill the first page as games arrive and never shrinks.
    pub fn refresh(&mut self, index: &PlayerIndex) {
        let Some(name) = self.name.as_deref() else {
            return;
        };
        self.stats = player_stats(index, name);
        let first_page = self.page_size.min(total_games(index, name));
        self.visible_rows = self.visible_rows.max(first_page);
    }

    pub fn load_more(&mut self, index: &PlayerIndex) {
        let Some(name) = self.name.as_deref() else {
            return;
        };
        let total = total_games(index, name);
        self.visible_rows = (self.visible_rows + self.page_size).min(total);
    }

    pub fn cycle_page_size(&mut self) {
        let pos = PAGE_SIZES.iter().position(|s| *s == self.page_size).unwrap_or(0);
        self.page_size = PAGE_SIZES[(pos + 1) % PAGE_SIZES.len()];
    }

    pub fn is_viewing(&self, game: &GameRecord) -> bool {
        self.name
            .as_deref()
            .is_some_and(|n| game.player_a.name == n || game.player_b.name == n)
    }

    /// The first `visible_rows` games of the player's list.
    pub fn visible_games<'a>(&self, index: &'a PlayerIndex) -> Vec<&'a Arc<GameRecord>> {
        let Some(list) = self.name.as_deref().and_then(|n| index.lookup(n)) else {
            return Vec::new();
        };
        list.iter().take(self.visible_rows).collect()
    }

    pub fn scroll_down(&mut self) {
        let max = self.visible_rows.saturating_sub(1) as u16;
        self.scroll_offset = (self.scroll_offset + 1).min(max);
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }
}

fn total_games(index: &PlayerIndex, name: &str) -> usize {
    index.lookup(name).map_or(0, |l| l.len())
}

// ---------------------------------------------------------------------------
// Search input
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct SearchInput {
    pub input: String,
    pub composing: bool,
}

impl SearchInput {
    pub fn start(&mut self) {
        self.composing = true;
        self.input.clear();
    }

    pub fn cancel(&mut self) {
        self.composing = false;
        self.input.clear();
    }

    /// Take the typed name. Blank input just closes the prompt.
    pub fn submit(&mut self) -> Option<String> {
        let text = self.input.trim().to_string();
        self.cancel();
        (!text.is_empty()).then_some(text)
    }
}

// ---------------------------------------------------------------------------
// Feed status
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct HistoryStatus {
    pub pages: usize,
    pub games: usize,
    pub finished: bool,
}

#[derive(Debug, Default)]
pub struct LiveStatus {
    pub endpoint: String,
    pub connected: bool,
    pub results: usize,
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub index: PlayerIndex,
    pub in_progress: InProgressGames,
    pub player: PlayerView,
    pub search: SearchInput,
    pub history: HistoryStatus,
    pub live: LiveStatus,
}

impl AppState {
    pub fn new(settings: &AppSettings) -> Self {
        Self {
            player: PlayerView::new(settings.page_size),
            live: LiveStatus {
                endpoint: settings.live_ws.clone(),
                ..LiveStatus::default()
            },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rps_api::index::MergeOrder;
    use rps_api::{Hand, PlayerHand};

    fn game(id: &str, a: &str, b: &str) -> GameRecord {
        GameRecord {
            game_id: id.to_string(),
            t: Utc::now(),
            player_a: PlayerHand { name: a.to_string(), played: Some(Hand::Rock) },
            player_b: PlayerHand { name: b.to_string(), played: Some(Hand::Paper) },
        }
    }

    fn index_with(name: &str, count: usize) -> PlayerIndex {
        let mut index = PlayerIndex::new();
        for i in 0..count {
            index.merge(game(&format!("g{i}"), name, "Opponent"), MergeOrder::Append);
        }
        index
    }

    #[test]
    fn in_progress_begin_and_finish() {
        let mut live = InProgressGames::default();
        assert!(live.begin(game("x", "A", "B")));
        assert!(!live.begin(game("x", "A", "B")));
        assert_eq!(live.len(), 1);
        assert!(live.finish("x").is_some());
        assert!(live.finish("x").is_none());
        assert!(live.is_empty());
    }

    #[test]
    fn load_more_adds_one_page() {
        let index = index_with("Aino", 250);
        let mut view = PlayerView::new(100);
        view.show("Aino".into(), &index);
        assert_eq!(view.visible_rows, 100);
        view.load_more(&index);
        assert_eq!(view.visible_rows, 200);
        assert_eq!(view.visible_games(&index).len(), 200);
    }

    #[test]
    fn load_more_caps_at_total() {
        let index = index_with("Aino", 250);
        let mut view = PlayerView::new(100);
        view.show("Aino".into(), &index);
        view.load_more(&index);
        view.load_more(&index);
        assert_eq!(view.visible_rows, 250);
        view.load_more(&index);
        assert_eq!(view.visible_rows, 250);
    }

    #[test]
    fn new_query_resets_to_one_page() {
        let index = index_with("Aino", 30);
        let mut view = PlayerView::new(100);
        view.show("Aino".into(), &index);
        assert_eq!(view.visible_rows, 30);

        view.show("Nobody".into(), &index);
        assert!(view.stats.is_none());
        assert_eq!(view.visible_rows, 0);
        assert!(view.visible_games(&index).is_empty());
    }

    #[test]
    fn page_size_cycles_through_options() {
        let mut view = PlayerView::new(100);
        let seen: Vec<usize> = (0..4)
            .map(|_| {
                view.cycle_page_size();
                view.page_size
            })
            .collect();
        assert_eq!(seen, vec![500, 1000, 5000, 100]);
    }

    #[test]
    fn refresh_finds_player_that_appears_later() {
        let mut index = PlayerIndex::new();
        let mut view = PlayerView::new(100);
        view.show("Aino".into(), &index);
        assert!(view.stats.is_none());

        index.merge(game("g1", "Aino", "Ukko"), MergeOrder::Prepend);
        view.refresh(&index);
        assert_eq!(view.stats.as_ref().map(|s| s.total_games), Some(1));
        assert_eq!(view.visible_rows, 1);
    }

    #[test]
    fn refresh_fills_first_page_as_history_arrives() {
        let mut index = index_with("Aino", 30);
        let mut view = PlayerView::new(100);
        view.show("Aino".into(), &index);
        assert_eq!(view.visible_rows, 30);

        for i in 30..80 {
            index.merge(game(&format!("g{i}"), "Aino", "Opponent"), MergeOrder::Append);
        }
        view.refresh(&index);
        assert_eq!(view.stats.as_ref().map(|s| s.total_games), Some(80));
        assert_eq!(view.visible_rows, 80);
        assert_eq!(view.visible_games(&index).len(), 80);
    }

    #[test]
    fn refresh_keeps_rows_loaded_beyond_first_page() {
        let mut index = index_with("Aino", 250);
        let mut view = PlayerView::new(100);
        view.show("Aino".into(), &index);
        view.load_more(&index);
        assert_eq!(view.visible_rows, 200);

        index.merge(game("late", "Aino", "Opponent"), MergeOrder::Append);
        view.refresh(&index);
        assert_eq!(view.visible_rows, 200);
    }

    #[test]
    fn in_progress_lists_newest_first() {
        let mut live = InProgressGames::default();
        live.begin(game("first", "A", "B"));
        live.begin(game("second", "C", "D"));
        live.begin(game("third", "E", "F"));
        live.finish("second");

        let ids: Vec<&str> = live.newest_first().map(|g| g.game_id.as_str()).collect();
        assert_eq!(ids, vec!["third", "first"]);
    }

    #[test]
    fn blank_search_is_ignored() {
        let mut search = SearchInput::default();
        search.start();
        search.input.push_str("   ");
        assert_eq!(search.submit(), None);
        assert!(!search.composing);

        search.start();
        search.input.push_str(" Aino Jokinen ");
        assert_eq!(search.submit().as_deref(), Some("Aino Jokinen"));
    }
}

//! Name → games lookup table shared by the history loader and the live feed.
//!
//! A game between two different players is stored in both players' lists so a
//! lookup by name never has to scan every game. Records are shared through
//! `Arc`, so the second copy costs one pointer.

use crate::GameRecord;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

pub type GameList = VecDeque<Arc<GameRecord>>;

/// Where a merged game lands in each participant's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOrder {
    /// History path: feed order.
    Append,
    /// Live path: most recent first.
    Prepend,
}

#[derive(Debug, Default)]
pub struct PlayerIndex {
    entries: HashMap<String, GameList>,
    merged_ids: HashSet<String>,
    all: Vec<Arc<GameRecord>>,
}

impl PlayerIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `game` into the entry of each distinct participant, creating
    /// entries as needed. Returns false without touching anything when the
    /// game id has already been merged.
    pub fn merge(&mut self, game: GameRecord, order: MergeOrder) -> bool {
        if !self.merged_ids.insert(game.game_id.clone()) {
            return false;
        }

        let game = Arc::new(game);
        let mut names = vec![game.player_a.name.as_str()];
        if !game.is_self_game() {
            names.push(game.player_b.name.as_str());
        }

        for name in names {
            let list = self.entries.entry(name.to_string()).or_default();
            match order {
                MergeOrder::Append => list.push_back(Arc::clone(&game)),
                MergeOrder::Prepend => list.push_front(Arc::clone(&game)),
            }
        }

        self.all.push(game);
        true
    }

    /// Merge a batch, returning how many games were new.
    pub fn merge_all(&mut self, games: impl IntoIterator<Item = GameRecord>, order: MergeOrder) -> usize {
        games
            .into_iter()
            .map(|g| self.merge(g, order))
            .filter(|merged| *merged)
            .count()
    }

    pub fn lookup(&self, name: &str) -> Option<&GameList> {
        self.entries.get(name)
    }

    /// Every distinct game, in merge order.
    pub fn all_games(&self) -> &[Arc<GameRecord>] {
        &self.all
    }

    pub fn contains_game(&self, game_id: &str) -> bool {
        self.merged_ids.contains(game_id)
    }

    pub fn player_count(&self) -> usize {
        self.entries.len()
    }

    pub fn game_count(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Hand;
    use crate::test_util::game;

    fn ids(list: &GameList) -> Vec<&str> {
        list.iter().map(|g| g.game_id.as_str()).collect()
    }

    #[test]
    fn merge_creates_entries_for_both_players() {
        let mut index = PlayerIndex::new();
        assert!(index.merge(game("g1", ("Aino", Hand::Rock), ("Ukko", Hand::Paper)), MergeOrder::Append));

        assert_eq!(index.player_count(), 2);
        assert_eq!(ids(index.lookup("Aino").unwrap()), vec!["g1"]);
        assert_eq!(ids(index.lookup("Ukko").unwrap()), vec!["g1"]);
        assert!(index.lookup("Marjatta").is_none());
    }

    #[test]
    fn every_game_lands_once_per_participant() {
        let mut index = PlayerIndex::new();
        let games = [
            game("g1", ("Aino", Hand::Rock), ("Ukko", Hand::Paper)),
            game("g2", ("Ukko", Hand::Rock), ("Marjatta", Hand::Paper)),
            game("g3", ("Marjatta", Hand::Scissors), ("Aino", Hand::Paper)),
            game("g4", ("Aino", Hand::Scissors), ("Aino", Hand::Rock)),
        ];
        index.merge_all(games.clone(), MergeOrder::Append);

        for g in &games {
            for name in [&g.player_a.name, &g.player_b.name] {
                let hits = index
                    .lookup(name)
                    .unwrap()
                    .iter()
                    .filter(|x| x.game_id == g.game_id)
                    .count();
                assert_eq!(hits, 1, "{} in {name}", g.game_id);
            }
        }
        assert_eq!(index.game_count(), 4);
        assert_eq!(ids(index.lookup("Aino").unwrap()), vec!["g1", "g3", "g4"]);
    }

    #[test]
    fn self_game_is_stored_once() {
        let mut index = PlayerIndex::new();
        index.merge(game("g1", ("Aino", Hand::Rock), ("Aino", Hand::Paper)), MergeOrder::Prepend);
        assert_eq!(index.player_count(), 1);
        assert_eq!(index.lookup("Aino").unwrap().len(), 1);
    }

    #[test]
    fn prepend_puts_live_games_first() {
        let mut index = PlayerIndex::new();
        index.merge(game("old", ("Aino", Hand::Rock), ("Ukko", Hand::Paper)), MergeOrder::Append);
        index.merge(game("live", ("Aino", Hand::Rock), ("Ukko", Hand::Paper)), MergeOrder::Prepend);
        assert_eq!(ids(index.lookup("Aino").unwrap()), vec!["live", "old"]);

        let all: Vec<_> = index.all_games().iter().map(|g| g.game_id.as_str()).collect();
        assert_eq!(all, vec!["old", "live"]);
    }

    #[test]
    fn duplicate_game_id_is_ignored() {
        let mut index = PlayerIndex::new();
        let g = game("g1", ("Aino", Hand::Rock), ("Ukko", Hand::Paper));
        assert!(index.merge(g.clone(), MergeOrder::Append));
        assert!(!index.merge(g, MergeOrder::Prepend));
        assert_eq!(index.lookup("Aino").unwrap().len(), 1);
        assert_eq!(index.game_count(), 1);
        assert!(index.contains_game("g1"));
    }
}

pub mod client;
pub mod index;
pub mod stats;
pub mod wire;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Domain types, independent of the wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Hand {
    Rock,
    Paper,
    Scissors,
}

impl Hand {
    /// Precedence order used for tie-breaks: ROCK, PAPER, SCISSORS.
    pub const ALL: [Hand; 3] = [Hand::Rock, Hand::Paper, Hand::Scissors];

    pub fn beats(self, other: Hand) -> bool {
        matches!(
            (self, other),
            (Hand::Rock, Hand::Scissors) | (Hand::Paper, Hand::Rock) | (Hand::Scissors, Hand::Paper)
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            Hand::Rock => "ROCK",
            Hand::Paper => "PAPER",
            Hand::Scissors => "SCISSORS",
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerHand {
    pub name: String,
    /// None until the game has been resolved.
    pub played: Option<Hand>,
}

/// A single game as received from either feed. Never mutated after decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub game_id: String,
    pub t: DateTime<Utc>,
    pub player_a: PlayerHand,
    pub player_b: PlayerHand,
}

impl GameRecord {
    /// Returns `(player, opponent)` for `name`. Player A wins the lookup when
    /// both sides carry the same name.
    pub fn side_of(&self, name: &str) -> (&PlayerHand, &PlayerHand) {
        if self.player_a.name == name {
            (&self.player_a, &self.player_b)
        } else {
            (&self.player_b, &self.player_a)
        }
    }

    pub fn is_self_game(&self) -> bool {
        self.player_a.name == self.player_b.name
    }
}

/// One page of the cursor-driven history feed.
#[derive(Debug, Clone, Default)]
pub struct HistoryPage {
    pub games: Vec<GameRecord>,
    /// None once the feed is exhausted.
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveEvent {
    Begin(GameRecord),
    Result(GameRecord),
}

impl LiveEvent {
    pub fn game(&self) -> &GameRecord {
        match self {
            LiveEvent::Begin(game) | LiveEvent::Result(game) => game,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            LiveEvent::Begin(_) => "GAME_BEGIN",
            LiveEvent::Result(_) => "GAME_RESULT",
        }
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::*;
    use chrono::TimeZone;

    pub fn game(id: &str, a: (&str, Hand), b: (&str, Hand)) -> GameRecord {
        GameRecord {
            game_id: id.to_string(),
            t: Utc.timestamp_millis_opt(1_600_000_000_000).unwrap(),
            player_a: PlayerHand { name: a.0.to_string(), played: Some(a.1) },
            player_b: PlayerHand { name: b.0.to_string(), played: Some(b.1) },
        }
    }
}

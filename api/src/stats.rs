use crate::Hand;
use crate::index::PlayerIndex;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandCounts {
    pub rock: u32,
    pub paper: u32,
    pub scissors: u32,
}

impl HandCounts {
    pub fn record(&mut self, hand: Hand) {
        match hand {
            Hand::Rock => self.rock += 1,
            Hand::Paper => self.paper += 1,
            Hand::Scissors => self.scissors += 1,
        }
    }

    pub fn get(&self, hand: Hand) -> u32 {
        match hand {
            Hand::Rock => self.rock,
            Hand::Paper => self.paper,
            Hand::Scissors => self.scissors,
        }
    }

    /// The hand with the highest count. Ties go to the earlier hand in
    /// ROCK, PAPER, SCISSORS order; None when nothing was counted.
    pub fn mode(&self) -> Option<Hand> {
        let mut best: Option<Hand> = None;
        for hand in Hand::ALL {
            let count = self.get(hand);
            if count > best.map_or(0, |b| self.get(b)) {
                best = Some(hand);
            }
        }
        best
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStats {
    pub name: String,
    pub total_games: usize,
    pub wins: usize,
    /// Rounded to the nearest whole percent, halves rounding up.
    pub win_percentage: u32,
    pub hand_counts: HandCounts,
    pub most_played: Option<Hand>,
}

/// Aggregate statistics for `name`, or None when the index has never seen it.
/// Draws count as non-wins.
pub fn player_stats(index: &PlayerIndex, name: &str) -> Option<PlayerStats> {
    let games = index.lookup(name)?;

    let mut hand_counts = HandCounts::default();
    let mut wins = 0;
    for game in games {
        let (me, them) = game.side_of(name);
        let Some(mine) = me.played else {
            continue;
        };
        hand_counts.record(mine);
        if them.played.is_some_and(|theirs| mine.beats(theirs)) {
            wins += 1;
        }
    }

    let total_games = games.len();
    Some(PlayerStats {
        name: name.to_string(),
        total_games,
        wins,
        win_percentage: win_percentage(wins, total_games),
        hand_counts,
        most_played: hand_counts.mode(),
    })
}

fn win_percentage(wins: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * wins as f64 / total as f64).round() as u32
}

use serde::{Deserialize, Serialize};

/// A tracked player: one row in the `players` table.
///
/// `name` is the case-sensitive primary key. `score` accumulates the deltas
/// applied by `Ledger::add_score` and may go negative; `times_added` counts
/// how many times a delta was applied and never goes below zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub score: i64,
    pub times_added: i64,
}

impl Player {
    /// Mean score per recorded update.
    ///
    /// Only meaningful for players that have been updated at least once;
    /// callers must filter `times_added == 0` first.
    pub fn average_score(&self) -> f64 {
        debug_assert!(self.times_added > 0, "average_score on never-updated player");
        self.score as f64 / self.times_added as f64
    }
}

/// Read-only leaderboard projection of a [`Player`] with its display rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based position after sorting by times_added desc, name asc.
    pub rank: usize,
    pub name: String,
    pub score: i64,
    pub times_added: i64,
}

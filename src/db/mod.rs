use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub mod models;
use models::Player;

/// Errors surfaced by the score ledger.
///
/// `PlayerNotFound` is the only per-player failure; everything else the
/// store can produce (I/O, corruption, busy database) is `Unavailable` and
/// aborts the operation that hit it.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("player \"{0}\" is not registered")]
    PlayerNotFound(String),
    #[error("score store unavailable: {0}")]
    Unavailable(#[from] rusqlite::Error),
}

/// Persistent score ledger: the single source of truth for players.
///
/// One long-lived SQLite connection behind a mutex; every operation is a
/// single statement executed under the lock, so `add_score` and `reset_all`
/// are atomic with respect to each other and never interleave partially.
#[derive(Clone)]
pub struct Ledger {
    conn: Arc<Mutex<Connection>>,
}

impl Ledger {
    /// Open (or create) the SQLite database at the given path.
    pub fn open(path: &str) -> Result<Self, LedgerError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let ledger = Ledger {
            conn: Arc::new(Mutex::new(conn)),
        };
        ledger.run_migrations()?;
        Ok(ledger)
    }

    /// Run schema migrations (idempotent).
    fn run_migrations(&self) -> Result<(), LedgerError> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(())
    }

    // ── Roster management ────────────────────────────────────────────────────

    /// Register a player with score 0 and count 0. No-op if already present.
    pub fn register_player(&self, name: &str) -> Result<(), LedgerError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO players (player_name) VALUES (?1)",
            params![name],
        )?;
        Ok(())
    }

    /// Delete a player's record. No-op if absent.
    pub fn remove_player(&self, name: &str) -> Result<(), LedgerError> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM players WHERE player_name = ?1", params![name])?;
        Ok(())
    }

    // ── Score mutation ───────────────────────────────────────────────────────

    /// Apply a score delta to a registered player and bump its update count.
    ///
    /// This is the ledger's sole mutation primitive for scores: one UPDATE
    /// with RETURNING, so the new totals come back from the same atomic
    /// statement. Fails with [`LedgerError::PlayerNotFound`] (and changes
    /// nothing) when the name is not registered.
    pub fn add_score(&self, name: &str, delta: i64) -> Result<(i64, i64), LedgerError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "UPDATE players
             SET score = score + ?1, timesAdded = timesAdded + 1
             WHERE player_name = ?2
             RETURNING score, timesAdded",
            params![delta, name],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => LedgerError::PlayerNotFound(name.to_string()),
            other => LedgerError::Unavailable(other),
        })
    }

    /// Reset every player's score and update count to zero. Irreversible.
    pub fn reset_all(&self) -> Result<(), LedgerError> {
        let conn = self.conn.lock().unwrap();
        conn.execute("UPDATE players SET score = 0, timesAdded = 0", [])?;
        Ok(())
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    /// Look up a single player by exact name.
    pub fn get_player(&self, name: &str) -> Result<Option<Player>, LedgerError> {
        let conn = self.conn.lock().unwrap();
        let player = conn
            .query_row(
                "SELECT player_name, score, timesAdded FROM players WHERE player_name = ?1",
                params![name],
                map_player,
            )
            .optional()?;
        Ok(player)
    }

    /// All players, unordered as stored.
    pub fn list_players(&self) -> Result<Vec<Player>, LedgerError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT player_name, score, timesAdded FROM players")?;
        let players = stmt
            .query_map([], map_player)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(players)
    }

    /// Snapshot of the known player names for the resolver.
    ///
    /// Sorted ascending by name: the resolver breaks similarity ties by
    /// first position in this list, so the ordering is part of the contract.
    pub fn roster(&self) -> Result<Vec<String>, LedgerError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT player_name FROM players ORDER BY player_name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }
}

// ── SQL helpers ────────────────────────────────────────────────────────────────

fn map_player(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    Ok(Player {
        name: row.get(0)?,
        score: row.get(1)?,
        times_added: row.get(2)?,
    })
}

/// SQLite schema (idempotent CREATE IF NOT EXISTS).
///
/// The camelCase `timesAdded` column is load-bearing: `players.db` files
/// already in the wild use it. Any migration must preserve the three fields
/// and the uniqueness of `player_name`.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS players (
    player_name TEXT    PRIMARY KEY,
    score       INTEGER NOT NULL DEFAULT 0,
    timesAdded  INTEGER NOT NULL DEFAULT 0
);
"#;

use tracing::debug;

use super::parser::extract_pairs;
use super::resolver::resolve;
use crate::db::{Ledger, LedgerError};

/// Per-pair result of one reconciliation pass. Built for the caller's
/// report; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// The candidate resolved to a registered player whose totals were
    /// updated; carries the new totals returned by the ledger.
    Resolved {
        name: String,
        score: i64,
        times_added: i64,
    },
    /// No roster name was similar enough (or the player vanished between
    /// snapshot and update); the ledger was left untouched for this pair.
    Unresolved { candidate: String },
}

/// Run one reconciliation pass: parse the OCR text, resolve each candidate
/// against a fresh roster snapshot, and apply resolved scores to the ledger.
///
/// Always yields exactly one outcome per extracted pair, in input order.
/// An empty result means the parser found nothing; callers must report
/// that as "no data", which is distinct from every pair being unresolved.
/// Only store unavailability aborts the pass; per-pair misses never do.
pub fn reconcile(text: &str, ledger: &Ledger) -> Result<Vec<ResolutionOutcome>, LedgerError> {
    let pairs = extract_pairs(text);
    debug!("Extracted {} pair(s) from OCR text", pairs.len());

    let mut outcomes = Vec::with_capacity(pairs.len());
    for pair in pairs {
        // Snapshot per pair, not per batch, so late registrations are seen.
        let roster = ledger.roster()?;
        match resolve(&pair.name, &roster) {
            Some(matched) => match ledger.add_score(matched, pair.score) {
                Ok((score, times_added)) => {
                    debug!(
                        "Credited {} to {} (total {}, updated {} time(s))",
                        pair.score, matched, score, times_added
                    );
                    outcomes.push(ResolutionOutcome::Resolved {
                        name: matched.to_string(),
                        score,
                        times_added,
                    });
                }
                // Removed between snapshot and update: treat as a miss.
                Err(LedgerError::PlayerNotFound(_)) => outcomes.push(ResolutionOutcome::Unresolved {
                    candidate: pair.name,
                }),
                Err(err) => return Err(err),
            },
            None => {
                debug!("No roster match for candidate \"{}\"", pair.name);
                outcomes.push(ResolutionOutcome::Unresolved {
                    candidate: pair.name,
                });
            }
        }
    }

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with(names: &[&str]) -> Ledger {
        let ledger = Ledger::open(":memory:").unwrap();
        for name in names {
            ledger.register_player(name).unwrap();
        }
        ledger
    }

    #[test]
    fn test_reconcile_end_to_end() {
        let ledger = ledger_with(&["Alice", "Bob"]);

        let outcomes = reconcile("Alice\n15\nRandom\n3", &ledger).unwrap();
        assert_eq!(
            outcomes,
            vec![
                ResolutionOutcome::Resolved {
                    name: "Alice".into(),
                    score: 15,
                    times_added: 1,
                },
                ResolutionOutcome::Unresolved {
                    candidate: "Random".into(),
                },
            ]
        );

        let alice = ledger.get_player("Alice").unwrap().unwrap();
        assert_eq!((alice.score, alice.times_added), (15, 1));
        let bob = ledger.get_player("Bob").unwrap().unwrap();
        assert_eq!((bob.score, bob.times_added), (0, 0));
    }

    #[test]
    fn test_empty_text_yields_empty_report() {
        let ledger = ledger_with(&["Alice"]);
        assert!(reconcile("", &ledger).unwrap().is_empty());
    }

    #[test]
    fn test_fuzzy_candidate_credits_registered_player() {
        let ledger = ledger_with(&["Alice"]);
        let outcomes = reconcile("Alicee\n4", &ledger).unwrap();
        assert_eq!(
            outcomes,
            vec![ResolutionOutcome::Resolved {
                name: "Alice".into(),
                score: 4,
                times_added: 1,
            }]
        );
    }

    #[test]
    fn test_all_unresolved_is_not_an_empty_report() {
        let ledger = ledger_with(&["Alice"]);
        let outcomes = reconcile("Xqzwv\n3", &ledger).unwrap();
        assert_eq!(
            outcomes,
            vec![ResolutionOutcome::Unresolved {
                candidate: "Xqzwv".into(),
            }]
        );
    }

    #[test]
    fn test_totals_accumulate_across_passes() {
        let ledger = ledger_with(&["Alice"]);
        reconcile("Alice\n10", &ledger).unwrap();
        let outcomes = reconcile("Alice\n5", &ledger).unwrap();
        assert_eq!(
            outcomes,
            vec![ResolutionOutcome::Resolved {
                name: "Alice".into(),
                score: 15,
                times_added: 2,
            }]
        );
    }

    #[test]
    fn test_unavailable_store_aborts_pass() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("players.db");
        let path = path.to_str().unwrap();
        let ledger = Ledger::open(path).unwrap();
        ledger.register_player("Alice").unwrap();

        // Yank the table out from under the open connection
        rusqlite::Connection::open(path)
            .unwrap()
            .execute_batch("DROP TABLE players")
            .unwrap();

        let err = reconcile("Alice\n5", &ledger).unwrap_err();
        assert!(matches!(err, LedgerError::Unavailable(_)));
    }
}

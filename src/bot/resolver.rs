/// Minimum normalized similarity for a candidate to resolve to a roster
/// name. Loose enough to absorb a couple of misread characters per name,
/// tight enough that unrelated names stay unresolved.
pub const SIMILARITY_THRESHOLD: f64 = 0.6;

/// Resolve an OCR name candidate against the roster of known players.
///
/// Scores every roster name with normalized Levenshtein similarity (0–1)
/// and returns the best one when it reaches [`SIMILARITY_THRESHOLD`],
/// otherwise `None`. Equal similarities keep the earliest roster entry
/// (only a strictly better score replaces the current best while scanning
/// in slice order), so callers get the same answer for the same roster
/// ordering every time. [`crate::db::Ledger::roster`] hands the names over
/// sorted for exactly that reason.
///
/// Pure function over the snapshot; the roster is never mutated.
pub fn resolve<'r>(candidate: &str, roster: &'r [String]) -> Option<&'r str> {
    let mut best: Option<(&'r str, f64)> = None;

    for name in roster {
        let similarity = strsim::normalized_levenshtein(candidate, name);
        let improved = match best {
            Some((_, best_similarity)) => similarity > best_similarity,
            None => true,
        };
        if improved {
            best = Some((name.as_str(), similarity));
        }
    }

    match best {
        Some((name, similarity)) if similarity >= SIMILARITY_THRESHOLD => Some(name),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_exact_match_resolves() {
        let roster = roster(&["Alice", "Bob"]);
        assert_eq!(resolve("Alice", &roster), Some("Alice"));
    }

    #[test]
    fn test_close_candidate_resolves_to_best_name() {
        // "Alise" is one edit from "Alice" (0.8) and three from "Alicia"
        // (0.5), so the ranking is unambiguous.
        let roster = roster(&["Alice", "Alicia", "Bob"]);
        assert_eq!(resolve("Alise", &roster), Some("Alice"));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let roster = roster(&["Alice", "Alicia", "Bob"]);
        let first = resolve("Alise", &roster);
        for _ in 0..3 {
            assert_eq!(resolve("Alise", &roster), first);
        }
    }

    #[test]
    fn test_garbage_candidate_has_no_match() {
        let roster = roster(&["Alice", "Bob"]);
        assert_eq!(resolve("Zzzxx", &roster), None);
    }

    #[test]
    fn test_empty_roster_has_no_match() {
        assert_eq!(resolve("Alice", &[]), None);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // Two edits over length five is exactly 0.6.
        let roster = roster(&["Alice"]);
        assert_eq!(resolve("Alxxe", &roster), Some("Alice"));
    }

    #[test]
    fn test_tie_keeps_first_roster_entry() {
        // Both names sit one edit from the candidate; the earlier wins.
        let roster = roster(&["abcx", "abcy"]);
        assert_eq!(resolve("abcd", &roster), Some("abcx"));
    }

    #[test]
    fn test_similarity_is_case_sensitive() {
        let roster = roster(&["Alice"]);
        // One differing char still clears the threshold...
        assert_eq!(resolve("alice", &roster), Some("Alice"));
        // ...but a fully upper-cased candidate is four edits away.
        assert_eq!(resolve("ALICE", &roster), None);
    }
}

use crate::db::models::{LeaderboardEntry, Player};

/// Order players for display: most-updated first, name ascending on equal
/// counts, with a 1-based rank assigned by position.
pub fn rank(mut players: Vec<Player>) -> Vec<LeaderboardEntry> {
    players.sort_by(|a, b| {
        b.times_added
            .cmp(&a.times_added)
            .then_with(|| a.name.cmp(&b.name))
    });
    players
        .into_iter()
        .enumerate()
        .map(|(i, p)| LeaderboardEntry {
            rank: i + 1,
            name: p.name,
            score: p.score,
            times_added: p.times_added,
        })
        .collect()
}

/// The player with the lowest score. Equal scores keep the first player
/// encountered, as a stable ascending-score sort would.
pub fn find_worst(players: &[Player]) -> Option<&Player> {
    let mut worst: Option<&Player> = None;
    for player in players {
        match worst {
            Some(current) if current.score <= player.score => {}
            _ => worst = Some(player),
        }
    }
    worst
}

/// The "shamer": the player with the highest update count, considering only
/// players that have been updated at least once. Equal counts keep the
/// first player encountered. `None` when nobody has been updated.
pub fn find_most_updated(players: &[Player]) -> Option<&Player> {
    let mut shamer: Option<&Player> = None;
    for player in players.iter().filter(|p| p.times_added > 0) {
        match shamer {
            Some(current) if current.times_added >= player.times_added => {}
            _ => shamer = Some(player),
        }
    }
    shamer
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn player(name: &str, score: i64, times_added: i64) -> Player {
        Player {
            name: name.to_string(),
            score,
            times_added,
        }
    }

    #[test]
    fn test_rank_by_count_desc_then_name_asc() {
        let entries = rank(vec![
            player("A", 10, 2),
            player("B", 10, 5),
            player("C", 0, 5),
        ]);
        let order: Vec<(&str, usize)> = entries
            .iter()
            .map(|e| (e.name.as_str(), e.rank))
            .collect();
        assert_eq!(order, vec![("B", 1), ("C", 2), ("A", 3)]);
    }

    #[test]
    fn test_rank_empty_board() {
        assert!(rank(Vec::new()).is_empty());
    }

    #[test]
    fn test_find_worst_minimum_score() {
        let players = vec![player("A", 4, 1), player("B", -2, 3), player("C", 9, 0)];
        assert_eq!(find_worst(&players).unwrap().name, "B");
    }

    #[test]
    fn test_find_worst_tie_keeps_first() {
        let players = vec![player("B", 3, 1), player("A", 3, 1)];
        assert_eq!(find_worst(&players).unwrap().name, "B");
    }

    #[test]
    fn test_find_worst_empty() {
        assert!(find_worst(&[]).is_none());
    }

    #[test]
    fn test_find_most_updated_skips_never_updated() {
        let players = vec![player("A", 50, 0), player("B", 10, 2), player("C", 30, 4)];
        assert_eq!(find_most_updated(&players).unwrap().name, "C");
    }

    #[test]
    fn test_find_most_updated_none_when_all_zero() {
        let players = vec![player("A", 50, 0), player("B", 10, 0)];
        assert!(find_most_updated(&players).is_none());
    }

    #[test]
    fn test_find_most_updated_tie_keeps_first() {
        let players = vec![player("B", 1, 3), player("A", 2, 3)];
        assert_eq!(find_most_updated(&players).unwrap().name, "B");
    }

    #[test]
    fn test_average_score_of_shamer() {
        let players = vec![player("A", 7, 2)];
        let shamer = find_most_updated(&players).unwrap();
        assert_relative_eq!(shamer.average_score(), 3.5, epsilon = 1e-9);
    }
}

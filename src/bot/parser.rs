/// A candidate name with the score that followed it, as read off one
/// scoreboard screenshot. The name is raw OCR output, unvalidated until the
/// resolver has a go at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPair {
    pub name: String,
    pub score: i64,
}

/// Extract (name, score) pairs from raw OCR text.
///
/// Strict alternation over non-empty trimmed lines: a line made entirely of
/// ASCII decimal digits is a score and pairs with the pending name; any
/// other line becomes the pending name. A digit line with no pending name
/// is discarded, and a pending name with no digit line before the next name
/// (or end of input) is silently dropped, so two consecutive name lines
/// keep only the second. OCR that loses a score line therefore loses its
/// name line too; that lossy heuristic is kept deliberately for
/// compatibility.
///
/// A leading minus sign fails the digit test, so negative numbers are never
/// scores; the line is treated as a name like any other text. Digit lines
/// too large for `i64` are skipped outright (the store holds 64-bit
/// integers). Zero pairs is a valid result and means "nothing extracted".
pub fn extract_pairs(text: &str) -> Vec<ExtractedPair> {
    let mut pairs = Vec::new();
    let mut pending: Option<&str> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(score) = line.parse::<i64>() {
                if let Some(name) = pending.take() {
                    pairs.push(ExtractedPair {
                        name: name.to_string(),
                        score,
                    });
                }
            }
        } else {
            pending = Some(line);
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(name: &str, score: i64) -> ExtractedPair {
        ExtractedPair {
            name: name.to_string(),
            score,
        }
    }

    #[test]
    fn test_alternating_pairs() {
        let pairs = extract_pairs("Alice\n10\nBob\n3");
        assert_eq!(pairs, vec![pair("Alice", 10), pair("Bob", 3)]);
    }

    #[test]
    fn test_negative_number_is_not_a_score() {
        // "-5" fails the digit-only test, so it becomes a pending name that
        // "Carol" then overwrites; Bob's pair is lost.
        let pairs = extract_pairs("Alice\n10\nBob\n-5\nCarol\n7");
        assert_eq!(pairs, vec![pair("Alice", 10), pair("Carol", 7)]);
    }

    #[test]
    fn test_leading_bare_number_discarded() {
        let pairs = extract_pairs("5\nAlice\n10");
        assert_eq!(pairs, vec![pair("Alice", 10)]);
    }

    #[test]
    fn test_trailing_name_never_emitted() {
        let pairs = extract_pairs("Alice\n10\nBob");
        assert_eq!(pairs, vec![pair("Alice", 10)]);
    }

    #[test]
    fn test_second_name_overwrites_first() {
        let pairs = extract_pairs("Alice\nBob\n7");
        assert_eq!(pairs, vec![pair("Bob", 7)]);
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert!(extract_pairs("").is_empty());
        assert!(extract_pairs("\n  \n\t\n").is_empty());
    }

    #[test]
    fn test_lines_are_trimmed() {
        let pairs = extract_pairs("  Alice  \n\n  10 ");
        assert_eq!(pairs, vec![pair("Alice", 10)]);
    }

    #[test]
    fn test_leading_zeros_parse() {
        let pairs = extract_pairs("Alice\n007");
        assert_eq!(pairs, vec![pair("Alice", 7)]);
    }

    #[test]
    fn test_non_ascii_digits_are_names() {
        // Arabic-Indic digits are text, not scores: they take over the
        // pending-name slot and pair with the next ASCII digit line.
        let pairs = extract_pairs("Alice\n١٢٣\n9");
        assert_eq!(pairs, vec![pair("١٢٣", 9)]);
    }

    #[test]
    fn test_digit_line_beyond_i64_is_skipped() {
        let pairs = extract_pairs("Alice\n99999999999999999999\n7");
        assert_eq!(pairs, vec![pair("Alice", 7)]);
    }

    #[test]
    fn test_reparse_of_serialized_output_is_identical() {
        let first = extract_pairs("Noise here\nAlice\n10\n12\nBob\n-1\nCarol\n7");
        let serialized = first
            .iter()
            .map(|p| format!("{}\n{}", p.name, p.score))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(extract_pairs(&serialized), first);
    }
}

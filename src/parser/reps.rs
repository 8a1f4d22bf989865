use std::sync::LazyLock;

use regex::Regex;

// Rep range shapes: "4 sets of 10", "12,10,8,8", "15/15,12/12,10/10"
static SET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\sset").unwrap());
static REP_LIST_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+,\d+").unwrap());
static SUPERSET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+/\d+,").unwrap());

/// Whether a text fragment reads like a rep-range description.
///
/// Unanchored substring match, so a fragment like "Day 1 set" would trigger
/// it. Weak heuristic, kept as-is.
pub fn is_rep_range(text: &str) -> bool {
    SET_RE.is_match(text) || REP_LIST_RE.is_match(text) || SUPERSET_RE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_counts() {
        assert!(is_rep_range("4 sets of 15"));
        assert!(is_rep_range("3 sets to Failure"));
    }

    #[test]
    fn comma_lists() {
        assert!(is_rep_range("12,10,8,10,12"));
        assert!(is_rep_range("12,10"));
    }

    #[test]
    fn supersets() {
        assert!(is_rep_range("15/15,12/12,10/10"));
    }

    #[test]
    fn plain_notes() {
        assert!(!is_rep_range("Shoulder width grip"));
        assert!(!is_rep_range("(Rope attachment)"));
        assert!(!is_rep_range(""));
    }

    #[test]
    fn no_digits_never_matches() {
        assert!(!is_rep_range("sets of reps"));
        assert!(!is_rep_range("pause at bottom"));
    }

    #[test]
    fn lone_number_is_not_a_range() {
        assert!(!is_rep_range("Day 1"));
        assert!(!is_rep_range("10"));
    }
}

use std::collections::HashSet;

use chrono::{DateTime, Utc};

/// Lower-case, trim, and collapse interior whitespace runs to a single space.
pub fn normalise(s: &str) -> String {
    let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

/// Jaccard similarity over whitespace-tokenised word sets.
///
/// Two empty strings are defined as identical (1.0); exactly one empty is
/// defined as maximally dissimilar (0.0).
pub fn jaccard(a: &str, b: &str) -> f64 {
    let tokens_a: HashSet<&str> = a.split_whitespace().collect();
    let tokens_b: HashSet<&str> = b.split_whitespace().collect();

    if tokens_a.is_empty() && tokens_b.is_empty() {
        return 1.0;
    }
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection = tokens_a.intersection(&tokens_b).count();
    let union = tokens_a.union(&tokens_b).count();
    intersection as f64 / union as f64
}

/// Deduplicate a list of timestamps and return them in ascending order.
pub fn unique_sorted_times(times: &[DateTime<Utc>]) -> Vec<DateTime<Utc>> {
    let mut set: Vec<DateTime<Utc>> = Vec::new();
    for t in times {
        if !set.contains(t) {
            set.push(*t);
        }
    }
    set.sort();
    set
}

/// Deduplicate a list of strings, preserving first-seen order.
pub fn unique_strings(items: &[String]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        if seen.insert(item.as_str()) {
            out.push(item.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn normalise_collapses_whitespace_and_case() {
        assert_eq!(normalise("  GG   gg  "), "gg gg");
    }

    #[test]
    fn jaccard_identity() {
        assert_eq!(jaccard("buy now link", "buy now link"), 1.0);
    }

    #[test]
    fn jaccard_both_empty_is_one() {
        assert_eq!(jaccard("", ""), 1.0);
    }

    #[test]
    fn jaccard_one_empty_is_zero() {
        assert_eq!(jaccard("", "hi"), 0.0);
    }

    #[test]
    fn jaccard_reordered_tokens_scenario() {
        // Matches the literal similar-message burst scenario: rearranged
        // tokens of "buy now link" all score 1.0 against each other.
        let variants = ["buy now link", "buy link now", "now buy link", "link buy now"];
        for a in &variants {
            for b in &variants {
                assert_eq!(jaccard(a, b), 1.0);
            }
        }
    }

    #[test]
    fn jaccard_is_symmetric() {
        let a = "hello world";
        let b = "world foo";
        assert_eq!(jaccard(a, b), jaccard(b, a));
    }

    #[test]
    fn unique_sorted_times_dedupes_and_orders() {
        let t0 = Utc.timestamp_opt(100, 0).unwrap();
        let t1 = Utc.timestamp_opt(50, 0).unwrap();
        let out = unique_sorted_times(&[t0, t1, t0]);
        assert_eq!(out, vec![t1, t0]);
    }

    #[test]
    fn unique_strings_preserves_first_seen_order() {
        let items: Vec<String> = ["b", "a", "b", "c", "a"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(unique_strings(&items), vec!["b", "a", "c"]);
    }
}

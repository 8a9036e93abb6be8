//! Elements, set input parsing and display ordering
//!
//! Elements are opaque strings compared byte for byte. Numeric-looking tokens stay
//! strings; numbers only matter when ordering elements for display.

use std::cmp::Ordering;
use std::collections::BTreeSet;

/// A single set member
pub type Element = String;

/// A finite set of elements
pub type ElementSet = BTreeSet<Element>;

/// Parse free-form set input such as `{1, 2,3}  4`
///
/// Braces are dropped wherever they appear and commas count as whitespace. Empty tokens
/// are discarded, so any input (including the empty string) yields a set.
pub fn parse_set_input(raw: &str) -> ElementSet {
    raw.replace(&['{', '}'][..], "")
        .replace(',', " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Order elements for display: numerically when every element is an integer,
/// lexically otherwise.
pub fn display_order(set: &ElementSet) -> Vec<&str> {
    let numeric: Option<Vec<(i64, &str)>> = set
        .iter()
        .map(|element| element.parse::<i64>().ok().map(|n| (n, element.as_str())))
        .collect();

    match numeric {
        Some(mut pairs) => {
            pairs.sort();
            pairs.into_iter().map(|(_, element)| element).collect()
        }
        None => set.iter().map(String::as_str).collect(),
    }
}

/// Ordering used for membership tables: shorter tokens first, then lexical.
pub fn universe_order(a: &str, b: &str) -> Ordering {
    a.chars()
        .count()
        .cmp(&b.chars().count())
        .then_with(|| a.cmp(b))
}

/// Sort elements with [`universe_order`].
pub fn sorted_universe(set: &ElementSet) -> Vec<&str> {
    let mut elements: Vec<&str> = set.iter().map(String::as_str).collect();
    elements.sort_by(|a, b| universe_order(a, b));
    elements
}

/// Render a set as `{ 1, 2, 3 }`, or `∅` when empty.
pub fn format_set(set: &ElementSet) -> String {
    if set.is_empty() {
        "∅".to_string()
    } else {
        format!("{{ {} }}", display_order(set).join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> ElementSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_braces_commas_and_whitespace() {
        assert_eq!(parse_set_input("{1, 2,3}  4"), set(&["1", "2", "3", "4"]));
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_set_input("").is_empty());
        assert!(parse_set_input(" { , } ").is_empty());
    }

    #[test]
    fn test_parse_keeps_tokens_verbatim() {
        let parsed = parse_set_input("01 1 apple Apple");
        assert_eq!(parsed.len(), 4);
        assert!(parsed.contains("01"));
        assert!(parsed.contains("1"));
    }

    #[test]
    fn test_parse_drops_braces_inside_tokens() {
        assert_eq!(parse_set_input("a{b}c"), set(&["abc"]));
    }

    #[test]
    fn test_display_order_numeric() {
        let numbers = set(&["10", "9", "-1", "2"]);
        assert_eq!(display_order(&numbers), vec!["-1", "2", "9", "10"]);
    }

    #[test]
    fn test_display_order_falls_back_to_lexical() {
        let mixed = set(&["10", "9", "b", "a"]);
        assert_eq!(display_order(&mixed), vec!["10", "9", "a", "b"]);
    }

    #[test]
    fn test_sorted_universe_by_length_then_lexical() {
        let words = set(&["ccc", "b", "aa", "a"]);
        assert_eq!(sorted_universe(&words), vec!["a", "b", "aa", "ccc"]);
    }

    #[test]
    fn test_format_set() {
        assert_eq!(format_set(&set(&["3", "1"])), "{ 1, 3 }");
        assert_eq!(format_set(&ElementSet::new()), "∅");
    }
}

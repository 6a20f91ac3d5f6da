//! Keyword frequency ranking

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

lazy_static! {
    // Whole words of three or more ASCII letters
    static ref KEYWORD_REGEX: Regex =
        Regex::new(r"\b[a-zA-Z]{3,}\b").expect("keyword pattern is valid");
}

/// Most frequent words of three or more ASCII letters, most frequent first
///
/// Words are lowercased. Equal counts keep the order in which the words
/// first appeared.
///
/// # Examples
///
/// ```
/// use gleaner::analysis::keyword_density;
///
/// let words = keyword_density("Rust is fast. rust is safe. Go is fast too.", 2);
/// assert_eq!(words, vec!["rust", "fast"]);
/// ```
pub fn keyword_density(text: &str, top_n: usize) -> Vec<String> {
    // word -> (count, first position)
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();

    for (position, word) in words(text).enumerate() {
        counts.entry(word).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<_> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));

    ranked.into_iter().take(top_n).map(|(word, _)| word).collect()
}

/// Whole words of at least three ASCII letters
///
/// A word touching a digit or underscore does not count, so `abc1` yields
/// nothing.
fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    KEYWORD_REGEX
        .find_iter(text)
        .map(|word| word.as_str().to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ties_keep_first_occurrence() {
        let words = keyword_density("beta alpha beta alpha gamma", 3);
        assert_eq!(words, vec!["beta", "alpha", "gamma"]);
    }

    #[test]
    fn test_short_and_mixed_tokens_ignored() {
        let words = keyword_density("an ox is at abc1 snake_case café word", 10);
        assert_eq!(words, vec!["word"]);
    }

    #[test]
    fn test_case_folded() {
        let words = keyword_density("Crawler CRAWLER crawler page", 1);
        assert_eq!(words, vec!["crawler"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(keyword_density("", 5).is_empty());
        assert!(keyword_density("some words", 0).is_empty());
    }
}

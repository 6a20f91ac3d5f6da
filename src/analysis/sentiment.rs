//! Lexicon-based sentiment scoring

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WORD_REGEX: Regex = Regex::new(r"\b\w+\b").expect("word pattern is valid");
}

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "positive", "happy", "success", "benefit",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "sad", "negative", "failure", "harm", "angry",
];

/// Net count of positive minus negative lexicon words
///
/// Words are runs of letters, digits and underscores, compared in lowercase.
pub fn sentiment_weight(text: &str) -> i64 {
    let text = text.to_lowercase();
    WORD_REGEX
        .find_iter(&text)
        .map(|word| {
            let word = word.as_str();
            if POSITIVE_WORDS.contains(&word) {
                1
            } else if NEGATIVE_WORDS.contains(&word) {
                -1
            } else {
                0
            }
        })
        .sum()
}

/// Coarse label for a sentiment score
pub fn sentiment_label(score: i64) -> &'static str {
    match score {
        s if s > 3 => "Strongly Positive",
        s if s > 0 => "Positive",
        0 => "Neutral",
        s if s > -3 => "Negative",
        _ => "Strongly Negative",
    }
}

/// Label and score of `text`, e.g. `Positive (score 2)`
pub fn sentiment_details(text: &str) -> String {
    sentiment_details_for(sentiment_weight(text))
}

/// Label and score for an already computed score
pub fn sentiment_details_for(score: i64) -> String {
    format!("{} (score {})", sentiment_label(score), score)
}

//! Lexicon-based text heuristics backing the analysis and validation tools.
//!
//! Everything here works on word lists and simple counts. The
//! [`SentimentEstimator`] trait is the swap point if a model-backed
//! estimator ever replaces the word lists.

use std::collections::HashSet;

const POSITIVE_WORDS: &[&str] = &["good", "great", "excellent", "amazing", "helpful", "useful"];

const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "terrible",
    "awful",
    "useless",
    "poor",
    "disappointing",
];

const STOPWORDS: &[&str] = &["this", "that", "with", "from", "they", "have", "been", "will"];

/// Words that state absolute claims worth fact-checking.
pub const ABSOLUTE_WORDS: &[&str] = &[
    "best", "worst", "always", "never", "all", "none", "everyone", "nobody",
];

/// Emotionally charged words that hint at bias.
pub const EMOTIONAL_WORDS: &[&str] = &[
    "terrible",
    "amazing",
    "awful",
    "fantastic",
    "horrible",
    "incredible",
];

const CONTRADICTION_PAIRS: &[(&str, &str)] = &[
    ("yes", "no"),
    ("true", "false"),
    ("increase", "decrease"),
    ("positive", "negative"),
    ("good", "bad"),
    ("high", "low"),
];

// ─────────────────────────────────────────────────────────────────────────────
// Sentiment
// ─────────────────────────────────────────────────────────────────────────────

/// Sentiment label for a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

/// Estimates text sentiment.
pub trait SentimentEstimator: Send + Sync {
    fn sentiment(&self, text: &str) -> Sentiment;
}

/// Word-list sentiment estimator.
///
/// Counts positive and negative vocabulary hits; the larger count wins,
/// ties are neutral.
#[derive(Debug, Clone, Default)]
pub struct LexiconSentiment;

impl SentimentEstimator for LexiconSentiment {
    fn sentiment(&self, text: &str) -> Sentiment {
        let lower = text.to_lowercase();
        let positive = POSITIVE_WORDS.iter().filter(|w| lower.contains(*w)).count();
        let negative = NEGATIVE_WORDS.iter().filter(|w| lower.contains(*w)).count();
        if positive > negative {
            Sentiment::Positive
        } else if negative > positive {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Structural Heuristics
// ─────────────────────────────────────────────────────────────────────────────

/// Average word length of the text, 0.0 for empty input.
pub fn average_word_length(text: &str) -> f64 {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return 0.0;
    }
    let total: usize = words.iter().map(|w| w.len()).sum();
    total as f64 / words.len() as f64
}

/// Complexity bucket by average word length.
pub fn complexity_label(text: &str) -> &'static str {
    let avg = average_word_length(text);
    if avg > 6.0 {
        "high"
    } else if avg > 4.0 {
        "medium"
    } else {
        "low"
    }
}

/// Up to five topic words by descending frequency: longer than four
/// characters and not a stopword. Ties keep first-seen order.
pub fn key_topics(text: &str) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for word in text.to_lowercase().split_whitespace() {
        let word = word.trim_matches(|c: char| !c.is_alphanumeric());
        if word.len() > 4 && !STOPWORDS.contains(&word) {
            match counts.iter_mut().find(|(w, _)| w == word) {
                Some((_, n)) => *n += 1,
                None => counts.push((word.to_string(), 1)),
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(5).map(|(w, _)| w).collect()
}

/// Words longer than four characters that repeat across the text, by
/// descending frequency.
pub fn repeated_themes(text: &str, limit: usize) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for word in text.to_lowercase().split_whitespace() {
        match counts.iter_mut().find(|(w, _)| w == word) {
            Some((_, n)) => *n += 1,
            None => counts.push((word.to_string(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .filter(|(w, n)| w.len() > 4 && *n > 1)
        .take(limit)
        .collect()
}

/// Count of absolute-claim words in the text.
pub fn absolute_claim_count(text: &str) -> usize {
    let lower = text.to_lowercase();
    lower
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| ABSOLUTE_WORDS.contains(w))
        .count()
}

/// Count of emotionally charged words in the text.
pub fn emotional_word_count(text: &str) -> usize {
    let lower = text.to_lowercase();
    EMOTIONAL_WORDS.iter().filter(|w| lower.contains(*w)).count()
}

/// Contradiction pairs where both sides appear in the text.
pub fn contradiction_pairs(text: &str) -> Vec<(&'static str, &'static str)> {
    let lower = text.to_lowercase();
    let words: HashSet<&str> = lower
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .collect();
    CONTRADICTION_PAIRS
        .iter()
        .filter(|(a, b)| words.contains(a) && words.contains(b))
        .copied()
        .collect()
}

/// Quality score for synthesized text, in `[0.0, 1.0]`.
///
/// Base 0.5, bumped for length, structure and balanced wording.
pub fn quality_score(text: &str) -> f64 {
    let mut score: f64 = 0.5;
    if text.len() > 200 {
        score += 0.1;
    }
    if text.len() > 500 {
        score += 0.1;
    }
    if text.contains('\n') {
        score += 0.1;
    }
    if text.contains('.') {
        score += 0.1;
    }
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > 10 {
        let avg = average_word_length(text);
        if (4.0..=8.0).contains(&avg) {
            score += 0.2;
        }
    }
    score.min(1.0)
}

/// Source reliability estimate, in `[0.0, 1.0]`.
///
/// Base 0.5; search-derived sources, longer content and research
/// vocabulary each add to it.
pub fn source_reliability(content: &str, source_type: &str) -> f64 {
    let mut score: f64 = 0.5;
    if source_type == "search" {
        score += 0.2;
    }
    if content.len() > 100 {
        score += 0.1;
    }
    let lower = content.to_lowercase();
    if ["study", "research", "data", "analysis"]
        .iter()
        .any(|w| lower.contains(w))
    {
        score += 0.2;
    }
    score.min(1.0)
}

/// Word-overlap relevance between two texts (Jaccard on lowercase word
/// sets), in `[0.0, 1.0]`.
pub fn word_overlap_relevance(a: &str, b: &str) -> f64 {
    let set_a: HashSet<String> = a.to_lowercase().split_whitespace().map(String::from).collect();
    let set_b: HashSet<String> = b.to_lowercase().split_whitespace().map(String::from).collect();
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    intersection as f64 / union as f64
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

//! Query classification heuristics.
//!
//! The [`QueryClassifier`] trait is the seam between the keyword-based
//! heuristics used today and anything smarter a future implementation may
//! want to plug in; the orchestration code only sees the trait.
//!
//! All functions here are pure and never touch the network.

use serde::{Deserialize, Serialize};

/// Vocabulary indicating a query needs fresh external information.
///
/// Shared between the search tool's `can_handle` scoring and the workflow
/// engine's `requires_search` decision.
pub const RECENCY_INDICATORS: &[&str] = &[
    "current", "latest", "recent", "today", "news", "weather", "price",
];

/// True if the text contains any recency indicator (case-insensitive
/// substring match).
pub fn contains_recency_indicator(text: &str) -> bool {
    let lower = text.to_lowercase();
    RECENCY_INDICATORS.iter().any(|word| lower.contains(word))
}

// ─────────────────────────────────────────────────────────────────────────────
// Query Type
// ─────────────────────────────────────────────────────────────────────────────

/// Broad category of a user query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    Informational,
    Creative,
    Analytical,
    Assistance,
    General,
}

impl QueryType {
    /// Stable string name.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Informational => "informational",
            QueryType::Creative => "creative",
            QueryType::Analytical => "analytical",
            QueryType::Assistance => "assistance",
            QueryType::General => "general",
        }
    }

    /// The response strategy used by the synthesis step for this type.
    pub fn response_strategy(&self) -> &'static str {
        match self {
            QueryType::Informational => "provide_detailed_facts",
            QueryType::Creative => "generate_creative_content",
            QueryType::Analytical => "provide_structured_analysis",
            QueryType::Assistance => "offer_helpful_guidance",
            QueryType::General => "conversational_response",
        }
    }
}

impl std::fmt::Display for QueryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Query complexity bucket, by word count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryComplexity {
    Simple,
    Medium,
    Complex,
}

impl QueryComplexity {
    /// Stable string name.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryComplexity::Simple => "simple",
            QueryComplexity::Medium => "medium",
            QueryComplexity::Complex => "complex",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Classifier Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Classifies user queries for workflow routing.
///
/// Implementations must be pure: no I/O, no side effects, deterministic
/// for a given query.
pub trait QueryClassifier: Send + Sync {
    /// Classify the broad query category.
    fn query_type(&self, query: &str) -> QueryType;

    /// Decide whether the query needs an external web search.
    fn requires_search(&self, query: &str) -> bool;

    /// Bucket the query's complexity.
    fn complexity(&self, query: &str) -> QueryComplexity;
}

/// Keyword-bucket classifier.
#[derive(Debug, Clone, Default)]
pub struct KeywordClassifier;

impl QueryClassifier for KeywordClassifier {
    fn query_type(&self, query: &str) -> QueryType {
        let lower = query.to_lowercase();
        let contains_any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

        if contains_any(&["what", "how", "why", "when", "where", "who"]) {
            QueryType::Informational
        } else if contains_any(&["create", "make", "build", "generate", "write"]) {
            QueryType::Creative
        } else if contains_any(&["analyze", "compare", "evaluate", "assess"]) {
            QueryType::Analytical
        } else if contains_any(&["help", "assistance", "support"]) {
            QueryType::Assistance
        } else {
            QueryType::General
        }
    }

    fn requires_search(&self, query: &str) -> bool {
        contains_recency_indicator(query)
    }

    fn complexity(&self, query: &str) -> QueryComplexity {
        let word_count = query.split_whitespace().count();
        if word_count < 5 {
            QueryComplexity::Simple
        } else if word_count < 15 {
            QueryComplexity::Medium
        } else {
            QueryComplexity::Complex
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recency_indicator_matches() {
        assert!(contains_recency_indicator("what's the weather today"));
        assert!(contains_recency_indicator("LATEST news please"));
        assert!(contains_recency_indicator("current price of gold"));
        assert!(!contains_recency_indicator("explain recursion"));
        assert!(!contains_recency_indicator("tell me a fun fact"));
    }

    #[test]
    fn test_query_type_buckets() {
        let c = KeywordClassifier;
        assert_eq!(c.query_type("what is rust"), QueryType::Informational);
        assert_eq!(c.query_type("write a poem"), QueryType::Creative);
        assert_eq!(c.query_type("compare these options"), QueryType::Analytical);
        assert_eq!(c.query_type("please help me"), QueryType::Assistance);
        assert_eq!(c.query_type("good morning"), QueryType::General);
    }

    #[test]
    fn test_query_type_precedence_is_informational_first() {
        // "how do I build X" hits both informational and creative buckets;
        // informational wins.
        let c = KeywordClassifier;
        assert_eq!(
            c.query_type("how do I build a website"),
            QueryType::Informational
        );
    }

    #[test]
    fn test_complexity_buckets() {
        let c = KeywordClassifier;
        assert_eq!(c.complexity("hi"), QueryComplexity::Simple);
        assert_eq!(
            c.complexity("what is the capital of France please"),
            QueryComplexity::Medium
        );
        let long = "one two three four five six seven eight nine ten eleven twelve thirteen fourteen fifteen";
        assert_eq!(c.complexity(long), QueryComplexity::Complex);
    }

    #[test]
    fn test_requires_search_routing() {
        let c = KeywordClassifier;
        assert!(c.requires_search("what's the weather today"));
        assert!(!c.requires_search("explain recursion"));
    }

    #[test]
    fn test_response_strategy_map() {
        assert_eq!(
            QueryType::Informational.response_strategy(),
            "provide_detailed_facts"
        );
        assert_eq!(
            QueryType::General.response_strategy(),
            "conversational_response"
        );
    }
}

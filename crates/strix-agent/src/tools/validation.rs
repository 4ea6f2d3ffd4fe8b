//! Content validation tool: quality, completeness, accuracy, consistency.

use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Map, Value};
use std::sync::LazyLock;
use std::time::Instant;

use crate::lexicon;
use crate::tool::Tool;
use crate::types::{ToolRequest, ToolResult, ToolType};

// Numbers, percentages, decimals, or four-digit years.
static DATA_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+%|\d+\.\d+|\d{4}").expect("data pattern is valid")
});

const INTRO_INDICATORS: &[&str] = &["introduction", "overview", "summary", "background"];
const CONCLUSION_INDICATORS: &[&str] =
    &["conclusion", "summary", "in summary", "to conclude", "finally"];
const EXAMPLE_INDICATORS: &[&str] = &["example", "for instance", "such as", "like", "including"];
const SOURCE_INDICATORS: &[&str] = &["according to", "study", "research", "report", "survey"];
const VAGUE_WORDS: &[&str] = &["some", "many", "several", "often", "usually", "generally"];
const SPECIFIC_WORDS: &[&str] = &["exactly", "precisely", "specifically", "particularly"];
const FACTUAL_INDICATORS: &[&str] = &["is", "are", "was", "were", "has", "have", "will", "can"];
const TRANSITION_WORDS: &[&str] = &[
    "however",
    "therefore",
    "furthermore",
    "moreover",
    "additionally",
    "consequently",
];

/// Checks content quality and flags claims worth verifying.
pub struct ValidationTool;

impl ValidationTool {
    pub const NAME: &'static str = "validation";

    pub fn new() -> Self {
        Self
    }

    fn validate(content: &str, validation_type: &str) -> Value {
        let mut findings = Map::new();
        findings.insert(
            "quality_score".into(),
            json!(lexicon::quality_score(content)),
        );
        findings.insert("completeness".into(), Self::completeness(content));
        findings.insert(
            "accuracy_indicators".into(),
            Self::accuracy_indicators(content),
        );
        findings.insert("consistency".into(), Self::consistency(content));
        findings.insert("clarity".into(), json!(Self::clarity(content)));

        if validation_type == "comprehensive" {
            findings.insert(
                "fact_check_flags".into(),
                json!(Self::fact_check_flags(content)),
            );
            findings.insert("bias_indicators".into(), json!(Self::bias_indicators(content)));
            findings.insert(
                "recommendations".into(),
                json!(Self::recommendations(content)),
            );
        }

        Value::Object(findings)
    }

    fn contains_any(text: &str, indicators: &[&str]) -> bool {
        let lower = text.to_lowercase();
        indicators.iter().any(|word| lower.contains(word))
    }

    fn completeness(content: &str) -> Value {
        let first = match content.split_once('\n') {
            Some((head, _)) => head.to_string(),
            None => content.chars().take(200).collect(),
        };
        let last = match content.rsplit_once('\n') {
            Some((_, tail)) => tail.to_string(),
            None => {
                let chars: Vec<char> = content.chars().collect();
                chars[chars.len().saturating_sub(200)..].iter().collect()
            }
        };

        json!({
            "has_introduction": Self::contains_any(&first, INTRO_INDICATORS),
            "has_conclusion": Self::contains_any(&last, CONCLUSION_INDICATORS),
            "addresses_main_points": content.split('\n').count() > 2 || content.split('.').count() > 3,
            "provides_examples": Self::contains_any(content, EXAMPLE_INDICATORS),
        })
    }

    fn accuracy_indicators(content: &str) -> Value {
        let lower = content.to_lowercase();
        let vague = VAGUE_WORDS.iter().filter(|w| lower.contains(*w)).count();
        let specific = SPECIFIC_WORDS.iter().filter(|w| lower.contains(*w)).count();

        json!({
            "has_sources": Self::contains_any(content, SOURCE_INDICATORS),
            "has_data": DATA_PATTERN.is_match(content),
            "specific_details": specific >= vague,
            "verifiable_claims": Self::contains_any(content, FACTUAL_INDICATORS),
        })
    }

    fn consistency(content: &str) -> Value {
        json!({
            "tone_consistency": Self::tone_consistency(content),
            "terminology_consistency": Self::terminology_consistency(content),
            "logical_flow": Self::contains_any(content, TRANSITION_WORDS),
        })
    }

    // Low variance in sentence length reads as a consistent tone.
    fn tone_consistency(content: &str) -> bool {
        let sentences: Vec<&str> = content
            .split('.')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if sentences.len() < 3 {
            return true;
        }
        let lengths: Vec<f64> = sentences
            .iter()
            .map(|s| s.split_whitespace().count() as f64)
            .collect();
        let avg = lengths.iter().sum::<f64>() / lengths.len() as f64;
        let variance =
            lengths.iter().map(|l| (l - avg).powi(2)).sum::<f64>() / lengths.len() as f64;
        variance < avg
    }

    // Repeated long words suggest terminology is used consistently.
    fn terminology_consistency(content: &str) -> bool {
        let lower = content.to_lowercase();
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for word in lower.split_whitespace().filter(|w| w.len() > 6) {
            match counts.iter_mut().find(|(w, _)| *w == word) {
                Some((_, n)) => *n += 1,
                None => counts.push((word, 1)),
            }
        }
        counts.iter().any(|(_, n)| *n > 1)
    }

    fn clarity(content: &str) -> f64 {
        let mut score: f64 = 0.5;

        let sentences: Vec<&str> = content
            .split('.')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if !sentences.is_empty() {
            let avg_sentence_length = sentences
                .iter()
                .map(|s| s.split_whitespace().count())
                .sum::<usize>() as f64
                / sentences.len() as f64;
            if avg_sentence_length <= 20.0 {
                score += 0.2;
            }
        }

        let has_words = content.split_whitespace().next().is_some();
        if has_words && lexicon::average_word_length(content) <= 6.0 {
            score += 0.2;
        }

        if content.contains('\n') {
            score += 0.1;
        }

        score.min(1.0)
    }

    fn fact_check_flags(content: &str) -> Vec<String> {
        let lower = content.to_lowercase();
        let mut flags: Vec<String> = lexicon::ABSOLUTE_WORDS
            .iter()
            .filter(|word| lower.contains(*word))
            .map(|word| format!("Absolute claim detected: '{word}' - may need verification"))
            .collect();
        flags.truncate(3);
        flags
    }

    fn bias_indicators(content: &str) -> Vec<String> {
        let lower = content.to_lowercase();
        let mut indicators: Vec<String> = lexicon::EMOTIONAL_WORDS
            .iter()
            .filter(|word| lower.contains(*word))
            .map(|word| format!("Emotional language detected: '{word}'"))
            .collect();
        indicators.truncate(2);
        indicators
    }

    fn recommendations(content: &str) -> Vec<String> {
        let mut recommendations = Vec::new();
        if content.len() < 100 {
            recommendations.push("Content may benefit from more detailed information".to_string());
        }
        if !Self::contains_any(content, SOURCE_INDICATORS) {
            recommendations
                .push("Consider adding sources or references to support claims".to_string());
        }
        let lower = content.to_lowercase();
        let vague = VAGUE_WORDS.iter().filter(|w| lower.contains(*w)).count();
        let specific = SPECIFIC_WORDS.iter().filter(|w| lower.contains(*w)).count();
        if specific < vague {
            recommendations.push("Add more specific details to improve accuracy".to_string());
        }
        recommendations.truncate(3);
        recommendations
    }
}

impl Default for ValidationTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ValidationTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn tool_type(&self) -> ToolType {
        ToolType::Validation
    }

    fn can_handle(&self, request: &ToolRequest) -> f64 {
        if request.tool_type != ToolType::Validation {
            return 0.0;
        }
        let content = request
            .input_data
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if content.is_empty() { 0.1 } else { 0.9 }
    }

    async fn execute(&self, input: &Value) -> ToolResult {
        let start = Instant::now();
        let content = input
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let validation_type = input
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("comprehensive");

        let findings = Self::validate(content, validation_type);
        tracing::debug!(
            validation_type,
            content_length = content.len(),
            "validation completed"
        );

        ToolResult::success(
            Self::NAME,
            ToolType::Validation,
            findings,
            start.elapsed().as_secs_f64(),
            0.85,
        )
        .with_metadata(json!({
            "validation_type": validation_type,
            "content_length": content.len(),
        }))
    }
}

//! Lexicon-driven text analysis tool.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Instant;

use crate::lexicon::{self, LexiconSentiment, SentimentEstimator};
use crate::tool::Tool;
use crate::types::{ToolRequest, ToolResult, ToolType};

const TECHNICAL_TERMS: &[&str] = &[
    "algorithm",
    "database",
    "api",
    "framework",
    "optimization",
    "implementation",
    "architecture",
    "methodology",
    "paradigm",
    "protocol",
    "interface",
    "configuration",
    "deployment",
];

/// Analyzes text content: sentiment, complexity, topics, and structure.
///
/// With `"type": "detailed"` in the input it additionally reports word
/// count, reading level, and technical terminology.
pub struct AnalysisTool {
    sentiment: LexiconSentiment,
}

impl AnalysisTool {
    pub const NAME: &'static str = "text_analysis";

    pub fn new() -> Self {
        Self {
            sentiment: LexiconSentiment,
        }
    }

    fn analyze(&self, content: &str, analysis_type: &str) -> Value {
        let mut findings = serde_json::Map::new();
        findings.insert(
            "sentiment".into(),
            json!(self.sentiment.sentiment(content).as_str()),
        );
        findings.insert("complexity".into(), json!(lexicon::complexity_label(content)));
        findings.insert("key_topics".into(), json!(lexicon::key_topics(content)));
        findings.insert("structure".into(), Self::structure(content));

        if analysis_type == "detailed" {
            findings.insert(
                "word_count".into(),
                json!(content.split_whitespace().count()),
            );
            findings.insert("reading_level".into(), json!(Self::reading_level(content)));
            findings.insert(
                "technical_terms".into(),
                json!(Self::technical_terms(content)),
            );
        }

        Value::Object(findings)
    }

    fn structure(content: &str) -> Value {
        let lines: Vec<&str> = content.split('\n').collect();
        let paragraphs: Vec<&str> = lines
            .iter()
            .copied()
            .filter(|line| !line.trim().is_empty())
            .collect();
        let average_paragraph_length = if paragraphs.is_empty() {
            0.0
        } else {
            paragraphs
                .iter()
                .map(|p| p.split_whitespace().count())
                .sum::<usize>() as f64
                / paragraphs.len() as f64
        };
        let has_lists = lines.iter().any(|line| {
            let trimmed = line.trim_start();
            trimmed.starts_with('-') || trimmed.starts_with('*')
        });

        json!({
            "paragraphs": paragraphs.len(),
            "average_paragraph_length": average_paragraph_length,
            "has_questions": content.contains('?'),
            "has_lists": has_lists,
        })
    }

    fn reading_level(content: &str) -> &'static str {
        let words = content.split_whitespace().count();
        let sentences = content.split('.').count();
        if words == 0 || sentences == 0 {
            return "unknown";
        }
        let avg_words_per_sentence = words as f64 / sentences as f64;
        if avg_words_per_sentence > 20.0 {
            "advanced"
        } else if avg_words_per_sentence > 15.0 {
            "intermediate"
        } else {
            "basic"
        }
    }

    fn technical_terms(content: &str) -> Vec<&'static str> {
        let lower = content.to_lowercase();
        TECHNICAL_TERMS
            .iter()
            .filter(|term| lower.contains(*term))
            .copied()
            .collect()
    }
}

impl Default for AnalysisTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for AnalysisTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn tool_type(&self) -> ToolType {
        ToolType::Analysis
    }

    fn can_handle(&self, request: &ToolRequest) -> f64 {
        if request.tool_type != ToolType::Analysis {
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
        let analysis_type = input
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("general");

        let findings = self.analyze(content, analysis_type);
        tracing::debug!(analysis_type, content_length = content.len(), "analysis completed");

        ToolResult::success(
            Self::NAME,
            ToolType::Analysis,
            findings,
            start.elapsed().as_secs_f64(),
            0.85,
        )
        .with_metadata(json!({
            "analysis_type": analysis_type,
            "content_length": content.len(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_handle_scores() {
        let tool = AnalysisTool::new();

        let wrong = ToolRequest::new(ToolType::Search, json!({"content": "text"}));
        assert_eq!(tool.can_handle(&wrong), 0.0);

        let empty = ToolRequest::new(ToolType::Analysis, json!({"content": ""}));
        assert!((tool.can_handle(&empty) - 0.1).abs() < 1e-9);

        let full = ToolRequest::new(ToolType::Analysis, json!({"content": "some text"}));
        assert!((tool.can_handle(&full) - 0.9).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_general_analysis_findings() {
        let tool = AnalysisTool::new();
        let result = tool
            .execute(&json!({"content": "This database framework is great and helpful?"}))
            .await;

        assert!(result.success);
        assert!((result.confidence - 0.85).abs() < 1e-9);
        assert_eq!(result.payload["sentiment"], "positive");
        assert_eq!(result.payload["structure"]["has_questions"], true);
        assert!(result.payload.get("word_count").is_none());
    }

    #[tokio::test]
    async fn test_detailed_analysis_adds_extras() {
        let tool = AnalysisTool::new();
        let content = "The algorithm uses a database protocol. The architecture is layered.";
        let result = tool
            .execute(&json!({"content": content, "type": "detailed"}))
            .await;

        assert_eq!(result.payload["word_count"], 10);
        assert_eq!(result.payload["reading_level"], "basic");
        let terms = result.payload["technical_terms"].as_array().unwrap();
        assert!(terms.iter().any(|t| t == "algorithm"));
        assert!(terms.iter().any(|t| t == "database"));
    }

    #[tokio::test]
    async fn test_structure_detects_lists_and_paragraphs() {
        let tool = AnalysisTool::new();
        let content = "Intro line\n- first item\n- second item";
        let result = tool.execute(&json!({"content": content})).await;

        assert_eq!(result.payload["structure"]["has_lists"], true);
        assert_eq!(result.payload["structure"]["paragraphs"], 3);
    }

    #[tokio::test]
    async fn test_empty_content_still_succeeds() {
        let tool = AnalysisTool::new();
        let result = tool.execute(&json!({})).await;
        assert!(result.success);
        assert_eq!(result.payload["sentiment"], "neutral");
        assert_eq!(result.payload["complexity"], "low");
    }
}

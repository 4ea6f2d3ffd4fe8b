//! Multi-source synthesis tool.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::time::Instant;

use crate::lexicon;
use crate::tool::Tool;
use crate::types::{ToolRequest, ToolResult, ToolType};

const QUESTION_WORDS: &[&str] = &["what", "how", "why", "when", "where", "who"];

/// Integrates multiple information sources: combination, insight and
/// conflict extraction, reliability and relevance scoring.
pub struct SynthesisTool;

impl SynthesisTool {
    pub const NAME: &'static str = "synthesis";

    pub fn new() -> Self {
        Self
    }

    fn synthesize(sources: &[Value], context: &str, synthesis_type: &str) -> Value {
        let mut findings = Map::new();
        findings.insert(
            "combined_information".into(),
            json!(Self::combine_sources(sources)),
        );
        findings.insert("key_insights".into(), json!(Self::extract_insights(sources)));
        findings.insert(
            "conflicting_information".into(),
            json!(Self::identify_conflicts(sources)),
        );
        findings.insert(
            "reliability_assessment".into(),
            Self::assess_reliability(sources),
        );
        findings.insert(
            "contextual_relevance".into(),
            Self::assess_relevance(sources, context),
        );

        if synthesis_type == "comprehensive" {
            findings.insert("source_comparison".into(), Self::compare_sources(sources));
            findings.insert(
                "information_gaps".into(),
                json!(Self::identify_gaps(sources, context)),
            );
            findings.insert(
                "recommendations".into(),
                json!(Self::recommendations(sources)),
            );
        }

        Value::Object(findings)
    }

    fn source_content(source: &Value) -> &str {
        source.get("content").and_then(Value::as_str).unwrap_or("")
    }

    fn source_type(source: &Value) -> &str {
        source.get("type").and_then(Value::as_str).unwrap_or("unknown")
    }

    fn combine_sources(sources: &[Value]) -> String {
        let mut combined = Vec::new();
        for (i, source) in sources.iter().enumerate() {
            let content = Self::source_content(source);
            if content.is_empty() {
                continue;
            }
            let snippet: String = content.chars().take(200).collect();
            combined.push(format!(
                "Source {} ({}): {}...",
                i + 1,
                Self::source_type(source),
                snippet
            ));
        }
        combined.join("\n\n")
    }

    fn extract_insights(sources: &[Value]) -> Vec<String> {
        let all_content = sources
            .iter()
            .map(Self::source_content)
            .collect::<Vec<_>>()
            .join(" ");
        lexicon::repeated_themes(&all_content, 5)
            .into_iter()
            .map(|(word, count)| {
                format!("Common theme: '{word}' appears {count} times across sources")
            })
            .collect()
    }

    fn identify_conflicts(sources: &[Value]) -> Vec<String> {
        let mut conflicts = Vec::new();
        for (i, a) in sources.iter().enumerate() {
            for (j, b) in sources.iter().enumerate() {
                if i == j {
                    continue;
                }
                let joined = format!("{} {}", Self::source_content(a), Self::source_content(b));
                for (word1, word2) in lexicon::contradiction_pairs(&joined) {
                    let lower_a = Self::source_content(a).to_lowercase();
                    let lower_b = Self::source_content(b).to_lowercase();
                    if lower_a.contains(word1) && lower_b.contains(word2) {
                        let msg = format!(
                            "Potential conflict: one source mentions '{word1}' while another mentions '{word2}'"
                        );
                        if !conflicts.contains(&msg) {
                            conflicts.push(msg);
                        }
                    }
                }
            }
        }
        conflicts.truncate(3);
        conflicts
    }

    fn assess_reliability(sources: &[Value]) -> Value {
        let mut reliability = Map::new();
        for (i, source) in sources.iter().enumerate() {
            let score =
                lexicon::source_reliability(Self::source_content(source), Self::source_type(source));
            reliability.insert(format!("source_{}", i + 1), json!(score));
        }
        Value::Object(reliability)
    }

    fn assess_relevance(sources: &[Value], context: &str) -> Value {
        let mut relevance = Map::new();
        for (i, source) in sources.iter().enumerate() {
            let score = lexicon::word_overlap_relevance(context, Self::source_content(source));
            relevance.insert(format!("source_{}", i + 1), json!(score));
        }
        Value::Object(relevance)
    }

    fn compare_sources(sources: &[Value]) -> Value {
        let mut source_types: Map<String, Value> = Map::new();
        for source in sources {
            let kind = Self::source_type(source).to_string();
            let count = source_types.get(&kind).and_then(Value::as_u64).unwrap_or(0);
            source_types.insert(kind, json!(count + 1));
        }
        let content_lengths: Vec<usize> = sources
            .iter()
            .map(|s| Self::source_content(s).len())
            .collect();

        json!({
            "total_sources": sources.len(),
            "source_types": source_types,
            "content_lengths": content_lengths,
        })
    }

    fn identify_gaps(sources: &[Value], context: &str) -> Vec<String> {
        let all_content = sources
            .iter()
            .map(Self::source_content)
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        let context_lower = context.to_lowercase();

        QUESTION_WORDS
            .iter()
            .filter(|qword| context_lower.contains(*qword) && !all_content.contains(*qword))
            .map(|qword| format!("Potential gap: '{qword}' questions may not be fully addressed"))
            .collect()
    }

    fn recommendations(sources: &[Value]) -> Vec<String> {
        let mut recommendations = Vec::new();
        if sources.len() < 3 {
            recommendations
                .push("Consider gathering additional sources for more comprehensive analysis".to_string());
        }
        let all_content = sources
            .iter()
            .map(Self::source_content)
            .collect::<Vec<_>>()
            .join(" ");
        if all_content.len() < 500 {
            recommendations.push("Sources may benefit from more detailed information".to_string());
        }
        if !sources
            .iter()
            .any(|s| Self::source_content(s).to_lowercase().contains("recent"))
        {
            recommendations.push("Consider including more recent information sources".to_string());
        }
        recommendations
    }
}

impl Default for SynthesisTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for SynthesisTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn tool_type(&self) -> ToolType {
        ToolType::Synthesis
    }

    fn can_handle(&self, request: &ToolRequest) -> f64 {
        if request.tool_type != ToolType::Synthesis {
            return 0.0;
        }
        let sources = request
            .input_data
            .get("sources")
            .and_then(Value::as_array)
            .map(Vec::len)
            .unwrap_or(0);
        if sources < 2 { 0.3 } else { 0.9 }
    }

    async fn execute(&self, input: &Value) -> ToolResult {
        let start = Instant::now();
        let empty = Vec::new();
        let sources = input
            .get("sources")
            .and_then(Value::as_array)
            .unwrap_or(&empty);
        let context = input
            .get("context")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let synthesis_type = input
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("comprehensive");

        let findings = Self::synthesize(sources, context, synthesis_type);
        // Thin material caps how much the synthesis can claim.
        let confidence = if sources.len() < 2 { 0.4 } else { 0.88 };
        tracing::debug!(
            sources = sources.len(),
            synthesis_type,
            confidence,
            "synthesis completed"
        );

        ToolResult::success(
            Self::NAME,
            ToolType::Synthesis,
            findings,
            start.elapsed().as_secs_f64(),
            confidence,
        )
        .with_metadata(json!({
            "sources_count": sources.len(),
            "synthesis_type": synthesis_type,
        }))
    }
}

//! Built-in tools: web search, text analysis, synthesis, validation.

mod analysis;
mod search;
mod synthesis;
mod validation;

pub use analysis::AnalysisTool;
pub use search::SearchTool;
pub use synthesis::SynthesisTool;
pub use validation::ValidationTool;

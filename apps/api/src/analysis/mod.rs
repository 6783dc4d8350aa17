// Resume vs job description analysis.
// All completion calls go through llm_client; every outcome is a well-formed AnalysisResult.

pub mod analyzer;
pub mod extract;
pub mod fallback;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod prompts;

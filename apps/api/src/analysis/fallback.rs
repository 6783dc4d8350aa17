use std::fmt;

use crate::analysis::models::{AnalysisResult, Weights};

pub const FALLBACK_MARKER: &str = "Automatic fallback used.";
pub const FALLBACK_TIP: &str =
    "Retry shortly or provide more detail in the resume and job description.";

/// Why the analyzer could not produce a model-backed result.
/// Logged for operators; only its human-readable text reaches the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    CredentialsMissing,
    CallFailed,
    InvalidJson,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FallbackReason::CredentialsMissing => "OpenAI credentials are not configured.",
            FallbackReason::CallFailed => "Unable to complete analysis right now.",
            FallbackReason::InvalidJson => "Model returned invalid JSON.",
        };
        f.write_str(text)
    }
}

/// Builds the safe zero-score result. An empty reason is omitted from `cons`.
pub fn build_fallback(reason: &str) -> AnalysisResult {
    let mut cons = vec![FALLBACK_MARKER.to_string()];
    if !reason.is_empty() {
        cons.push(reason.to_string());
    }

    AnalysisResult {
        score: 0,
        pros: Vec::new(),
        cons,
        tips: vec![FALLBACK_TIP.to_string()],
        weights: Weights::default(),
    }
}

impl From<FallbackReason> for AnalysisResult {
    fn from(reason: FallbackReason) -> Self {
        build_fallback(&reason.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_shape() {
        let result = build_fallback("x");
        assert_eq!(result.score, 0);
        assert!(result.pros.is_empty());
        assert_eq!(result.cons, vec![FALLBACK_MARKER, "x"]);
        assert_eq!(result.tips, vec![FALLBACK_TIP]);
        assert_eq!(result.weights, Weights::default());
    }

    #[test]
    fn test_fallback_omits_empty_reason() {
        assert_eq!(build_fallback("").cons, vec![FALLBACK_MARKER]);
    }

    #[test]
    fn test_every_reason_has_text() {
        for reason in [
            FallbackReason::CredentialsMissing,
            FallbackReason::CallFailed,
            FallbackReason::InvalidJson,
        ] {
            let result = AnalysisResult::from(reason);
            assert_eq!(result.cons.len(), 2);
            assert_eq!(result.cons[1], reason.to_string());
        }
    }
}

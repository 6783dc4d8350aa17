//! Analyzer — composes prompt building, the completion call, normalization and fallback.
//!
//! Every path ends in an `AnalysisResult`. Missing credentials, a failed call and
//! unusable model output are logged with their `FallbackReason` and answered with
//! the fallback result; none of them is an error for the caller.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::analysis::extract::extract_text;
use crate::analysis::fallback::FallbackReason;
use crate::analysis::models::{AnalysisResult, UploadedResume, MAX_TEXT_CHARS};
use crate::analysis::normalize::{normalize, preview};
use crate::analysis::prompts::build_prompt;
use crate::llm_client::prompts::RECRUITER_SYSTEM;
use crate::llm_client::{strip_json_fences, CompletionClient};

#[derive(Clone)]
pub struct Analyzer {
    llm: Option<Arc<dyn CompletionClient>>,
}

impl Analyzer {
    /// `None` means no completion capability is configured; every analysis falls back.
    pub fn new(llm: Option<Arc<dyn CompletionClient>>) -> Self {
        if llm.is_none() {
            warn!("No completion client configured. Analyses will use the fallback response.");
        }
        Self { llm }
    }

    pub fn is_configured(&self) -> bool {
        self.llm.is_some()
    }

    /// Analyzes resume text against a job description.
    pub async fn analyze(&self, resume_text: &str, job_text: &str) -> AnalysisResult {
        let resume_text = resume_text.trim();
        let job_text = job_text.trim();
        debug!(
            "Analyzing resume ({} chars) against job ({} chars)",
            resume_text.chars().count(),
            job_text.chars().count()
        );

        match self.run(resume_text, job_text).await {
            Ok(result) => {
                info!(
                    "Analysis complete: score={}, pros={}, cons={}, tips={}",
                    result.score,
                    result.pros.len(),
                    result.cons.len(),
                    result.tips.len()
                );
                result
            }
            Err(reason) => {
                warn!(?reason, "Using fallback analysis: {reason}");
                AnalysisResult::from(reason)
            }
        }
    }

    /// Extracts the uploaded resume, truncates both texts to the length cap, then analyzes.
    /// Over-long input is cut here, not rejected.
    pub async fn analyze_upload(&self, upload: &UploadedResume, job_text: &str) -> AnalysisResult {
        let resume_text = extract_text(upload).await;

        let resume_text = clip_to_limit(&resume_text, MAX_TEXT_CHARS);
        let job_text = clip_to_limit(job_text, MAX_TEXT_CHARS);
        debug!(
            "After clipping: resume={} chars, job={} chars",
            resume_text.chars().count(),
            job_text.chars().count()
        );

        self.analyze(resume_text, job_text).await
    }

    async fn run(&self, resume_text: &str, job_text: &str) -> Result<AnalysisResult, FallbackReason> {
        let llm = self
            .llm
            .as_ref()
            .ok_or(FallbackReason::CredentialsMissing)?;

        let prompt = build_prompt(resume_text, job_text);
        debug!("Prompt length: {} chars", prompt.len());

        let content = llm
            .complete(RECRUITER_SYSTEM, &prompt)
            .await
            .map_err(|e| {
                warn!("Completion call failed: {e}");
                FallbackReason::CallFailed
            })?;

        match content.as_deref() {
            Some(text) => debug!("Model content preview: {}", preview(text, 300)),
            None => warn!("Model returned empty content"),
        }

        // Some OpenAI-compatible gateways ignore JSON mode and wrap the object in ```json fences.
        let content = content.as_deref().map(strip_json_fences);
        normalize(content).ok_or(FallbackReason::InvalidJson)
    }
}

/// Trims surrounding whitespace and cuts to at most `max_chars` characters.
pub fn clip_to_limit(text: &str, max_chars: usize) -> &str {
    preview(text.trim(), max_chars)
}

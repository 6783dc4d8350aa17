// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// System message sent with every analysis call.
pub const RECRUITER_SYSTEM: &str = "You are an expert technical recruiter.";

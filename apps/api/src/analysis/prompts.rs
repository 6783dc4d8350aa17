// Prompt template for resume vs job description analysis.
// The model is asked for JSON only; whatever comes back still goes through the normalizer.

/// Builds the analysis prompt. The resume and job text are embedded verbatim after the rules.
pub fn build_prompt(resume_text: &str, job_text: &str) -> String {
    [
        "You are an expert technical recruiter.",
        "Compare the resume and job description below.",
        "",
        "Return ONLY valid JSON in this exact format:",
        "{",
        "  \"score\": number,",
        "  \"pros\": string[],",
        "  \"cons\": string[],",
        "  \"tips\": string[],",
        "  \"weights\": {",
        "    \"skills\": number,",
        "    \"experience\": number,",
        "    \"education\": number",
        "  }",
        "}",
        "",
        "Rules:",
        "- score: 0-100 match.",
        "- pros/cons: concise bullet strings.",
        "- tips: actionable next steps.",
        "- weights: percentage contributions (0-100) for skills, experience, education; they should sum near 100.",
        "",
        "Resume:",
        resume_text,
        "",
        "Job Description:",
        job_text,
    ]
    .join("\n")
}

use serde::{Deserialize, Serialize};

/// Maximum accepted length of resume or job text, in characters.
pub const MAX_TEXT_CHARS: usize = 20_000;

/// Maximum accepted size of an uploaded resume file.
pub const MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

/// JSON body of `POST /api/analyze`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AnalysisRequest {
    pub resume_text: String,
    pub job_text: String,
}

/// A resume file received through the upload endpoint. Lives for one request only.
#[derive(Debug, Clone)]
pub struct UploadedResume {
    pub bytes: bytes::Bytes,
    pub media_type: String,
    pub original_name: String,
}

impl UploadedResume {
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// Percentage attribution of the score. Each value is 0 – 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weights {
    pub skills: u8,
    pub experience: u8,
    pub education: u8,
}

/// The verdict returned to the client, always fully populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score: u8, // 0 – 100
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub tips: Vec<String>,
    pub weights: Weights,
}

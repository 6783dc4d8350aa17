//! Axum route handlers for the Analysis API.

use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use bytes::BytesMut;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::analysis::extract::is_supported_media_type;
use crate::analysis::models::{
    AnalysisRequest, AnalysisResult, UploadedResume, MAX_TEXT_CHARS, MAX_UPLOAD_BYTES,
};
use crate::errors::AppError;
use crate::state::AppState;

const FILE_FIELD: &str = "file";
const JOB_TEXT_FIELD: &str = "jobText";

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/analyze
///
/// Analyzes raw resume text against a job description.
/// Over-long text is rejected here; upstream failures still answer 200 with a fallback.
pub async fn handle_analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    validate_text("resumeText", &request.resume_text)?;
    validate_text(JOB_TEXT_FIELD, &request.job_text)?;

    let request_id = Uuid::new_v4();
    let result = async {
        info!(
            "Request received: resumeText={} chars, jobText={} chars",
            request.resume_text.chars().count(),
            request.job_text.chars().count()
        );
        let result = state
            .analyzer
            .analyze(&request.resume_text, &request.job_text)
            .await;
        log_response(&result);
        result
    }
    .instrument(info_span!("analyze", %request_id))
    .await;

    Ok(Json(result))
}

/// POST /api/analyze/upload
///
/// Multipart form with a `file` (PDF or plain text, at most 2 MiB) and a `jobText` field.
/// The extracted resume text and the job text are truncated to the length cap, not rejected.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let multipart = multipart.map_err(|e| AppError::Validation(e.body_text()))?;
    let (upload, job_text) = read_upload_form(multipart).await?;

    let request_id = Uuid::new_v4();
    let result = async {
        info!(
            "Request received: file={}, size={} bytes, type={}, jobText={} chars",
            upload.original_name,
            upload.size_bytes(),
            upload.media_type,
            job_text.chars().count()
        );
        let result = state.analyzer.analyze_upload(&upload, &job_text).await;
        log_response(&result);
        result
    }
    .instrument(info_span!("analyze_upload", %request_id))
    .await;

    Ok(Json(result))
}

fn log_response(result: &AnalysisResult) {
    info!(
        "Response: score={}, pros={}, cons={}, tips={}",
        result.score,
        result.pros.len(),
        result.cons.len(),
        result.tips.len()
    );
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

/// Required, non-blank, at most `MAX_TEXT_CHARS` characters.
pub fn validate_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} should not be empty")));
    }
    if value.chars().count() > MAX_TEXT_CHARS {
        return Err(AppError::Validation(format!(
            "{field} is too long for analysis."
        )));
    }
    Ok(())
}

/// Reads the upload form. The file's media type is checked from its part headers
/// before any of its bytes are read, and reading stops as soon as the size cap is passed.
async fn read_upload_form(mut multipart: Multipart) -> Result<(UploadedResume, String), AppError> {
    let mut upload: Option<UploadedResume> = None;
    let mut job_text: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            FILE_FIELD => upload = Some(read_file_field(field).await?),
            JOB_TEXT_FIELD => job_text = Some(field.text().await.map_err(multipart_error)?),
            other => {
                return Err(AppError::Validation(format!(
                    "property {other} should not exist"
                )))
            }
        }
    }

    let upload =
        upload.ok_or_else(|| AppError::Validation("A resume file is required.".to_string()))?;
    let job_text = job_text.unwrap_or_default();
    validate_text(JOB_TEXT_FIELD, &job_text)?;

    Ok((upload, job_text))
}

async fn read_file_field(mut field: Field<'_>) -> Result<UploadedResume, AppError> {
    let media_type = field.content_type().unwrap_or_default().to_string();
    if !is_supported_media_type(&media_type) {
        return Err(AppError::UnsupportedMediaType(
            "Unsupported file type. Please upload PDF or plain text.".to_string(),
        ));
    }
    let original_name = field.file_name().unwrap_or("resume").to_string();

    let mut buf = BytesMut::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if buf.len() + chunk.len() > MAX_UPLOAD_BYTES {
            return Err(file_too_large());
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(UploadedResume {
        bytes: buf.freeze(),
        media_type,
        original_name,
    })
}

fn file_too_large() -> AppError {
    AppError::PayloadTooLarge("File too large. Max 2MB.".to_string())
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        file_too_large()
    } else {
        AppError::Validation(e.body_text())
    }
}

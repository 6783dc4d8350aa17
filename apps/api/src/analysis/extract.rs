//! Text extractor for uploaded resumes.
//!
//! PDF failures degrade to an empty string rather than an error: a resume that
//! cannot be read is analysed as "no resume text".

use tracing::{debug, info, warn};

use crate::analysis::models::UploadedResume;

/// PDF or any `text/*` type. Checked at the boundary before extraction runs.
pub fn is_supported_media_type(media_type: &str) -> bool {
    let media_type = media_type.to_ascii_lowercase();
    media_type.contains("pdf") || media_type.contains("text")
}

fn is_pdf(media_type: &str) -> bool {
    media_type.to_ascii_lowercase().contains("pdf")
}

/// Extracts plain text from an uploaded resume.
pub async fn extract_text(upload: &UploadedResume) -> String {
    info!(
        "Extracting text from {} ({} bytes, {})",
        upload.original_name,
        upload.size_bytes(),
        upload.media_type
    );

    let text = if is_pdf(&upload.media_type) {
        extract_pdf_text(upload.bytes.clone()).await
    } else {
        decode_utf8(&upload.bytes)
    };

    info!("Extracted {} chars", text.chars().count());
    text
}

/// Runs `pdf-extract` on the blocking pool. The library owns nothing past this
/// call; a parse error or a panic inside it both yield `""`.
async fn extract_pdf_text(bytes: bytes::Bytes) -> String {
    let result = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| e.to_string())
    })
    .await;

    match result {
        Ok(Ok(text)) => {
            debug!("PDF parsed: {} chars", text.len());
            text
        }
        Ok(Err(e)) => {
            warn!("Failed to parse PDF; falling back to empty text: {e}");
            String::new()
        }
        Err(e) => {
            warn!("PDF extraction task aborted; falling back to empty text: {e}");
            String::new()
        }
    }
}

/// Lossy UTF-8 decode with a leading byte-order mark dropped.
fn decode_utf8(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

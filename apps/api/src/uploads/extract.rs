//! Plain-text extraction from uploaded profile and CV documents.
//!
//! PDF parsing is CPU-bound and runs inside `tokio::task::spawn_blocking`.

use thiserror::Error;
use tracing::{info, warn};

use super::UploadedFile;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to extract text from PDF: {0}")]
    Pdf(String),

    #[error("PDF extraction worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Text of `file`: PDFs are parsed, anything else is read as UTF-8.
pub async fn extract_text(file: &UploadedFile) -> Result<String, ExtractError> {
    if !file.is_pdf() {
        return Ok(file.text_lossy());
    }

    let bytes = file.bytes.clone();
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await?
        .map_err(|e| ExtractError::Pdf(e.to_string()))?;

    info!(file = %file.file_name, chars = text.len(), "Extracted PDF text");
    Ok(text.trim().to_string())
}

/// Like `extract_text`, but a failed extraction becomes an inline note naming
/// the file so the rest of the request can still go ahead.
pub async fn extract_text_or_placeholder(file: &UploadedFile) -> String {
    match extract_text(file).await {
        Ok(text) => text,
        Err(e) => {
            warn!(file = %file.file_name, "Text extraction failed: {e}");
            extraction_placeholder(file, &e)
        }
    }
}

fn extraction_placeholder(file: &UploadedFile, error: &ExtractError) -> String {
    format!(
        "[Error extracting text from PDF: {error}. Falling back to file metadata.]\n\
         File name: {}\nFile type: {}\nFile size: {} KB",
        file.file_name,
        file.content_type.as_deref().unwrap_or("unknown"),
        file.size_kb()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn upload(name: &str, content_type: &str, body: &'static [u8]) -> UploadedFile {
        UploadedFile {
            field: "linkedinFiles".into(),
            file_name: name.into(),
            content_type: Some(content_type.into()),
            bytes: Bytes::from_static(body),
        }
    }

    #[tokio::test]
    async fn test_plain_text_passes_through() {
        let file = upload("profile.txt", "text/plain", b"Rust engineer in Oslo");
        assert_eq!(extract_text(&file).await.unwrap(), "Rust engineer in Oslo");
    }

    #[tokio::test]
    async fn test_broken_pdf_is_error() {
        let file = upload("profile.pdf", "application/pdf", b"definitely not a pdf");
        assert!(extract_text(&file).await.is_err());
    }

    #[tokio::test]
    async fn test_broken_pdf_placeholder_names_file() {
        let file = upload("profile.pdf", "application/pdf", b"definitely not a pdf");
        let text = extract_text_or_placeholder(&file).await;
        assert!(text.starts_with("[Error extracting text from PDF"));
        assert!(text.contains("File name: profile.pdf"));
        assert!(text.contains("File type: application/pdf"));
    }
}

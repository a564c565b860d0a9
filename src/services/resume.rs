use anyhow::{anyhow, Result};

/// Extracts plain text from an uploaded PDF resume.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| anyhow!("could not read resume PDF: {e}"))?;
    Ok(text.trim().to_string())
}

/// Runs the extraction on the blocking pool; PDF parsing is CPU bound.
pub async fn extract_pdf_text_async(bytes: Vec<u8>) -> Result<String> {
    tokio::task::spawn_blocking(move || extract_pdf_text(&bytes)).await?
}

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use super::PdfError;

/// Source of a PDF's embedded text. `AppState` holds the parser with an
/// `Arc<dyn TextExtractor>` so tests can feed fixed text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, pdf: Bytes) -> Result<String, PdfError>;
}

/// Default extractor backed by pdf-extract.
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract_text(&self, pdf: Bytes) -> Result<String, PdfError> {
        extract_text(pdf).await
    }
}

/// Extracts the embedded text layer of a PDF. Runs on the blocking pool: pdf-extract
/// parses the whole document synchronously.
pub async fn extract_text(pdf: Bytes) -> Result<String, PdfError> {
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf))
        .await
        .map_err(|e| PdfError::TextLayer(format!("extraction task failed: {e}")))?
        .map_err(|e| PdfError::TextLayer(format!("{e:?}")))?;

    let text = normalize_whitespace(&text);
    if text.is_empty() {
        return Err(PdfError::EmptyTextLayer);
    }
    debug!("Extracted {} characters from PDF text layer", text.len());
    Ok(text)
}

/// Trims each line and collapses runs of blank lines to one.
fn normalize_whitespace(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() && out.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        out.push(line);
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

// Resume parsing: PDF -> page images (or text layer) -> structured Resume via the LLM.
// All LLM calls go through llm_client; rasterization goes through the PageRasterizer seam.

pub mod encode;
pub mod handlers;
pub mod parser;
pub mod rasterize;
pub mod text_layer;

use thiserror::Error;

pub use parser::ResumeParser;
pub use rasterize::{PageImage, PageRasterizer, PdftoppmRasterizer};
pub use text_layer::{PdfTextExtractor, TextExtractor};

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Uploaded file is empty")]
    Empty,

    #[error("Uploaded file is not a PDF")]
    NotAPdf,

    #[error("PDF contains no renderable pages")]
    NoPages,

    #[error("PDF has no extractable text layer")]
    EmptyTextLayer,

    #[error("PDF rendering failed: {0}")]
    Render(String),

    #[error("PDF text extraction failed: {0}")]
    TextLayer(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PdfError {
    /// Errors caused by the uploaded document rather than by the service.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PdfError::Empty | PdfError::NotAPdf | PdfError::NoPages | PdfError::EmptyTextLayer
        )
    }
}

/// The PDF header may be preceded by a little junk; readers accept it within the first KiB.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Rejects empty input and input without a `%PDF-` header.
pub fn ensure_pdf(bytes: &[u8]) -> Result<(), PdfError> {
    if bytes.is_empty() {
        return Err(PdfError::Empty);
    }
    let window = &bytes[..bytes.len().min(HEADER_SEARCH_WINDOW)];
    if window.windows(5).any(|w| w == b"%PDF-") {
        Ok(())
    } else {
        Err(PdfError::NotAPdf)
    }
}

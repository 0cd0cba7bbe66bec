//! Resume Parser: turns an uploaded PDF into a validated `Resume`.
//!
//! Vision flow: ensure_pdf → rasterize → data URLs → one structured completion
//! (system prompt + user text followed by every page image, in page order).
//! Text flow: ensure_pdf → text layer → one structured completion over plain text.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::llm_client::prompts::SCHEMA_INSTRUCTION;
use crate::llm_client::{
    structured_chat_completion, ChatMessage, ChatProvider, CompletionRequest, ContentPart,
};
use crate::models::Resume;
use crate::parsing::encode::to_data_url;
use crate::parsing::{ensure_pdf, PageImage, PageRasterizer, PdfError, TextExtractor};
use crate::prompts::{PromptError, PromptLoader};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

pub struct ResumeParser {
    provider: Arc<dyn ChatProvider>,
    prompts: Arc<PromptLoader>,
    rasterizer: Arc<dyn PageRasterizer>,
    text_extractor: Arc<dyn TextExtractor>,
    model: String,
}

impl ResumeParser {
    /// `prompts` must be the `extraction` group.
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        prompts: Arc<PromptLoader>,
        rasterizer: Arc<dyn PageRasterizer>,
        text_extractor: Arc<dyn TextExtractor>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            prompts,
            rasterizer,
            text_extractor,
            model: model.into(),
        }
    }

    /// Parses a resume by sending rendered page images to a vision model.
    pub async fn parse_resume(&self, pdf: &[u8]) -> Result<Resume, AppError> {
        ensure_pdf(pdf)?;

        let pages = self.rasterizer.rasterize(pdf).await?;
        if pages.is_empty() {
            return Err(PdfError::NoPages.into());
        }
        info!("Parsing resume from {} page images", pages.len());

        let messages = self.vision_messages(&pages)?;
        self.complete(messages).await
    }

    /// Parses a resume from the PDF's embedded text layer. Cheaper, and works with
    /// text-only models, but loses layout cues.
    pub async fn parse_resume_text(&self, pdf: Bytes) -> Result<Resume, AppError> {
        ensure_pdf(&pdf)?;

        let text = self.text_extractor.extract_text(pdf).await?;
        info!("Parsing resume from {} characters of text", text.len());

        let messages = vec![
            self.system_message()?,
            ChatMessage::user(
                self.prompts
                    .render("user_text", &[("resume_text", Some(text.as_str()))])?,
            ),
        ];
        self.complete(messages).await
    }

    fn system_message(&self) -> Result<ChatMessage, PromptError> {
        Ok(ChatMessage::system(self.prompts.render(
            "system",
            &[("schema_instruction", Some(SCHEMA_INSTRUCTION))],
        )?))
    }

    fn vision_messages(&self, pages: &[PageImage]) -> Result<Vec<ChatMessage>, PromptError> {
        let mut parts = Vec::with_capacity(pages.len() + 1);
        parts.push(ContentPart::text(self.prompts.render("user", &[])?));
        for page in pages {
            debug!("Attaching page {} ({} bytes)", page.page_number, page.bytes.len());
            parts.push(ContentPart::image(to_data_url(page)));
        }

        Ok(vec![self.system_message()?, ChatMessage::user_parts(parts)])
    }

    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<Resume, AppError> {
        let request = CompletionRequest::new(&self.model, messages);
        let response = structured_chat_completion::<Resume>(self.provider.as_ref(), request)
            .await
            .map_err(|e| AppError::Llm(format!("Resume extraction failed: {e}")))?;

        info!(
            "Extracted resume for {} with {} experience entries and {} achievements",
            response.parsed.personal_info.name,
            response.parsed.experience.len(),
            response.parsed.achievement_count()
        );
        Ok(response.parsed)
    }
}

/// Pretty JSON for a parsed resume, optionally written to `save_path`.
pub async fn resume_to_json(resume: &Resume, save_path: Option<&Path>) -> Result<String, AppError> {
    let json = serde_json::to_string_pretty(resume)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize Resume: {e}")))?;
    if let Some(path) = save_path {
        tokio::fs::write(path, &json)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to write {}: {e}", path.display())))?;
    }
    Ok(json)
}

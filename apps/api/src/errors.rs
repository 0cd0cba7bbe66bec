use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::optimization::optimizer::OptimizerError;
use crate::parsing::PdfError;
use crate::prompts::PromptError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    #[error("Optimization error: {0}")]
    Optimizer(#[from] OptimizerError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn status_code_message(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Pdf(e) if e.is_input_error() => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_PDF",
                e.to_string(),
            ),
            AppError::Pdf(e) => {
                tracing::error!("PDF error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PDF_ERROR",
                    "The PDF could not be processed".to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Optimizer(e @ OptimizerError::EmptyJobDescription) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
            }
            AppError::Optimizer(OptimizerError::Llm { stage, source }) => {
                tracing::error!("LLM error in {stage}: {source}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    format!("An AI processing error occurred during {stage}"),
                )
            }
            AppError::Optimizer(e) => {
                tracing::error!("Optimizer error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "OPTIMIZER_ERROR",
                    "The optimization pipeline failed".to_string(),
                )
            }
            AppError::Prompt(e) => {
                tracing::error!("Prompt error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PROMPT_ERROR",
                    "A prompt template could not be loaded".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.status_code_message();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::optimization::Stage;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let (status, code, message) =
            AppError::Validation("job_description cannot be empty".to_string())
                .status_code_message();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "VALIDATION_ERROR");
        assert_eq!(message, "job_description cannot be empty");
    }

    #[test]
    fn test_bad_pdf_is_reported_to_client() {
        let (status, code, _) = AppError::Pdf(PdfError::NotAPdf).status_code_message();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "INVALID_PDF");
    }

    #[test]
    fn test_render_failure_is_internal() {
        let (status, code, message) =
            AppError::Pdf(PdfError::Render("pdftoppm crashed".to_string())).status_code_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "PDF_ERROR");
        assert!(!message.contains("pdftoppm"), "internal details stay in the log");
    }

    #[test]
    fn test_stage_llm_failure_names_the_stage() {
        let err = AppError::Optimizer(OptimizerError::Llm {
            stage: Stage::GapAnalysis,
            source: LlmError::EmptyContent,
        });
        let (status, code, message) = err.status_code_message();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(code, "LLM_ERROR");
        assert!(message.contains("gap analysis"));
    }

    #[test]
    fn test_empty_job_description_is_a_client_error() {
        let (status, code, message) =
            AppError::Optimizer(OptimizerError::EmptyJobDescription).status_code_message();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "VALIDATION_ERROR");
        assert_eq!(message, "Job description cannot be empty");
    }
}

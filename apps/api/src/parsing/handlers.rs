use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Resume;
use crate::parsing::parser::resume_to_json;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Page images to a vision model.
    #[default]
    Vision,
    /// Embedded text layer to a text model.
    Text,
}

#[derive(Debug, Default, Deserialize)]
pub struct ParseQuery {
    #[serde(default)]
    pub mode: ParseMode,
}

/// POST /api/v1/resumes/parse
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    Query(query): Query<ParseQuery>,
    multipart: Multipart,
) -> Result<Json<Resume>, AppError> {
    let (file_name, pdf) = read_file_field(multipart).await?;
    info!(
        "Parsing uploaded resume '{}' ({} bytes, mode {:?})",
        file_name,
        pdf.len(),
        query.mode
    );

    let resume = match query.mode {
        ParseMode::Vision => state.parser.parse_resume(&pdf).await?,
        ParseMode::Text => state.parser.parse_resume_text(pdf).await?,
    };

    if let Some(dir) = &state.config.resume_output_dir {
        let path = dir.join(format!("{}.json", Uuid::new_v4()));
        resume_to_json(&resume, Some(&path)).await?;
        info!("Saved parsed resume to {}", path.display());
    }
    Ok(Json(resume))
}

/// Pulls the `file` field out of the upload. Other fields are ignored.
async fn read_file_field(mut multipart: Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read uploaded file: {e}")))?;
        return Ok((file_name, data));
    }
    Err(AppError::Validation(
        "Multipart field 'file' is required".to_string(),
    ))
}

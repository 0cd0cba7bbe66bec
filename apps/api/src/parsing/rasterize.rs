//! Page rasterization: renders each PDF page to an image for the vision model.
//!
//! Default: `PdftoppmRasterizer` (poppler's `pdftoppm`, invoked as a subprocess).
//! `AppState` holds an `Arc<dyn PageRasterizer>` so tests and alternative backends can
//! be swapped in without touching the parser.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::process::Command;
use tracing::{debug, info};

use super::PdfError;

pub const DEFAULT_DPI: u32 = 300;

/// One rendered page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageImage {
    /// 1-based page number.
    pub page_number: usize,
    pub mime: &'static str,
    pub bytes: Bytes,
}

#[async_trait]
pub trait PageRasterizer: Send + Sync {
    /// Renders every page of `pdf`, in page order.
    async fn rasterize(&self, pdf: &[u8]) -> Result<Vec<PageImage>, PdfError>;
}

pub struct PdftoppmRasterizer {
    binary: PathBuf,
    dpi: u32,
}

impl PdftoppmRasterizer {
    pub fn new(binary: impl Into<PathBuf>, dpi: u32) -> Self {
        Self {
            binary: binary.into(),
            dpi,
        }
    }
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self::new("pdftoppm", DEFAULT_DPI)
    }
}

#[async_trait]
impl PageRasterizer for PdftoppmRasterizer {
    async fn rasterize(&self, pdf: &[u8]) -> Result<Vec<PageImage>, PdfError> {
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join("input.pdf");
        tokio::fs::write(&input, pdf).await?;

        let output_prefix = workdir.path().join("page");
        let output = Command::new(&self.binary)
            .arg("-jpeg")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(&input)
            .arg(&output_prefix)
            .output()
            .await
            .map_err(|e| {
                PdfError::Render(format!("failed to run {}: {e}", self.binary.display()))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PdfError::Render(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                stderr.trim()
            )));
        }

        let pages = collect_pages(workdir.path()).await?;
        if pages.is_empty() {
            return Err(PdfError::NoPages);
        }

        let mut images = Vec::with_capacity(pages.len());
        for (page_number, path) in pages {
            let bytes = tokio::fs::read(&path).await?;
            debug!("Rendered page {page_number}: {} bytes", bytes.len());
            images.push(PageImage {
                page_number,
                mime: "image/jpeg",
                bytes: Bytes::from(bytes),
            });
        }

        info!("Rasterized {} pages at {} DPI", images.len(), self.dpi);
        Ok(images)
    }
}

/// Lists `page-N.jpg` outputs sorted by page number. pdftoppm zero-pads N to the width of
/// the page count, so lexical order is not reliable across runs.
async fn collect_pages(dir: &Path) -> Result<Vec<(usize, PathBuf)>, PdfError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut pages = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if let Some(page_number) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(page_number_of)
        {
            pages.push((page_number, path));
        }
    }
    pages.sort_by_key(|(n, _)| *n);
    Ok(pages)
}

fn page_number_of(file_name: &str) -> Option<usize> {
    file_name
        .strip_prefix("page-")?
        .strip_suffix(".jpg")?
        .parse()
        .ok()
}

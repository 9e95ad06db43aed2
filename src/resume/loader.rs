//! Resume loading, routed by file extension

use crate::error::{Result, ScoutError};
use crate::resume::extractor::{MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use crate::resume::format::ResumeFormat;
use log::info;
use std::path::Path;

/// Read the resume at `path` as plain text
pub async fn load_resume(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(ScoutError::InvalidInput(format!(
            "Resume file does not exist: {}",
            path.display()
        )));
    }

    let format = ResumeFormat::from_path(path).ok_or_else(|| {
        ScoutError::UnsupportedFormat(format!(
            "{} (supported: pdf, txt, md)",
            path.display()
        ))
    })?;

    let text = match format {
        ResumeFormat::Pdf => PdfExtractor.extract(path).await?,
        ResumeFormat::Text => PlainTextExtractor.extract(path).await?,
        ResumeFormat::Markdown => MarkdownExtractor.extract(path).await?,
    };

    if text.trim().is_empty() {
        return Err(ScoutError::InvalidInput(format!(
            "Resume file has no text: {}",
            path.display()
        )));
    }

    info!("Loaded resume {} ({} characters)", path.display(), text.len());
    Ok(text)
}

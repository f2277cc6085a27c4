//! Document I/O operations for imposition

use super::{ImposeReport, impose};
use crate::backend::ProcessingDocument;
use crate::options::ProcessingParameters;
use crate::render::LopdfDocument;
use crate::types::*;
use std::path::Path;

/// Load a PDF document into the lopdf backend
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<LopdfDocument> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path).await?;
    let doc = tokio::task::spawn_blocking(move || LopdfDocument::load_mem(&bytes)).await??;
    Ok(doc)
}

/// Save the imposed document
pub async fn save_pdf(mut doc: LopdfDocument, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::task::spawn_blocking(move || {
        let mut writer = Vec::new();
        doc.emit(&mut writer)?;
        Ok::<_, ImposeError>(writer)
    })
    .await??;
    tokio::fs::write(&path, bytes).await?;
    Ok(())
}

/// Load `input`, impose it and write the result to `output`.
pub async fn impose_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    params: &ProcessingParameters,
) -> Result<ImposeReport> {
    params.validate()?;

    let mut doc = load_pdf(input).await?;
    let params = params.clone();
    let (doc, report) = tokio::task::spawn_blocking(move || {
        let report = impose(&mut doc, &params)?;
        Ok::<_, ImposeError>((doc, report))
    })
    .await??;

    save_pdf(doc, output).await?;
    Ok(report)
}

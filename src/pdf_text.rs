// src/pdf_text.rs

use std::path::Path;

use lopdf::Document;
use thiserror::Error;
use tracing::{debug, info};

/// The PDF reader could not produce usable text for a file.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to read PDF: {0}")]
    Unreadable(String),
    #[error("document appears to be scanned (no text layer)")]
    Scanned,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Minimum number of non-whitespace characters expected from a report
/// with a real text layer. Below this the document is treated as scanned.
const MIN_TEXT_CHARS: usize = 30;

/// Share of image-only pages above which the whole document counts as
/// scanned.
const SCANNED_PAGE_RATIO: f64 = 0.8;

/// Extract the full text layer of a PDF file.
pub fn extract_text(path: &Path) -> Result<String, ExtractionError> {
    let bytes = std::fs::read(path)?;
    extract_text_from_bytes(&bytes)
}

pub fn extract_text_from_bytes(bytes: &[u8]) -> Result<String, ExtractionError> {
    let doc =
        Document::load_mem(bytes).map_err(|e| ExtractionError::Unreadable(e.to_string()))?;

    if looks_like_scanned(&doc) {
        info!("structural check: image-only pages, no text layer");
        return Err(ExtractionError::Scanned);
    }

    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractionError::Unreadable(e.to_string()))?;

    let meaningful = text.chars().filter(|c| !c.is_whitespace()).count();
    if meaningful < MIN_TEXT_CHARS {
        info!(chars = meaningful, "extracted text too short, treating as scanned");
        return Err(ExtractionError::Scanned);
    }

    debug!(chars = meaningful, "text layer extracted");
    Ok(text)
}

/// Whether a page's `Resources` dictionary carries a non-empty entry
/// of the given kind (`Font`, `XObject`, ...).
fn has_resource(doc: &Document, page: &lopdf::Dictionary, kind: &[u8]) -> bool {
    page.get(b"Resources")
        .ok()
        .and_then(|r| doc.dereference(r).ok())
        .and_then(|(_, resolved)| resolved.as_dict().ok())
        .and_then(|resources| resources.get(kind).ok())
        .and_then(|entry| doc.dereference(entry).ok())
        .and_then(|(_, resolved)| resolved.as_dict().ok())
        .is_some_and(|entries| !entries.is_empty())
}

/// Inspect the object tree for pages that are a single image with no
/// font resources. Mostly-image documents are scanned reports, which
/// have no text layer worth parsing.
fn looks_like_scanned(doc: &Document) -> bool {
    let pages = doc.get_pages();
    if pages.is_empty() {
        // Cannot tell, let text extraction try.
        return false;
    }

    let mut image_only = 0usize;
    for object_id in pages.values() {
        let Ok(page) = doc.get_object(*object_id).and_then(lopdf::Object::as_dict) else {
            continue;
        };
        if has_resource(doc, page, b"XObject") && !has_resource(doc, page, b"Font") {
            image_only += 1;
        }
    }

    let ratio = image_only as f64 / pages.len() as f64;
    debug!(
        total_pages = pages.len(),
        image_only, "scanned-page analysis"
    );
    ratio >= SCANNED_PAGE_RATIO
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_unreadable() {
        let result = extract_text_from_bytes(b"this is not a pdf");
        assert!(matches!(result, Err(ExtractionError::Unreadable(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = extract_text(Path::new("/nonexistent/report.pdf"));
        assert!(matches!(result, Err(ExtractionError::Io(_))));
    }
}

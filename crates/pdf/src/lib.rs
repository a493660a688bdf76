//! Word extraction from text-based PDFs.
//!
//! Produces the positioned words the transcript parser consumes. Scanned
//! (image-only) PDFs yield pages without words; OCR is out of scope.

use thiserror::Error;

use parser::backend::LopdfBackend;

pub mod parser;
pub mod types;

pub use types::*;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("Document is encrypted")]
    Encrypted,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse PDF bytes and return the words of every page, in page order.
pub fn extract_words(bytes: &[u8]) -> Result<Vec<PageWords>, PdfError> {
    let backend = LopdfBackend::load_bytes(bytes)?;
    log::info!("loaded PDF with {} page(s)", backend.page_count());
    Ok(parser::words::extract_all_pages(&backend))
}

/// Read a PDF from disk and return the words of every page.
pub fn extract_words_from_path(path: &std::path::Path) -> Result<Vec<PageWords>, PdfError> {
    let bytes = std::fs::read(path)?;
    extract_words(&bytes)
}

/// Whether `bytes` start like a PDF file.
pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_words_rejects_empty_input() {
        assert!(matches!(extract_words(&[]), Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = extract_words_from_path(std::path::Path::new("/nonexistent/transcript.pdf"));
        assert!(matches!(err, Err(PdfError::Io(_))));
    }

    #[test]
    fn test_looks_like_pdf() {
        assert!(looks_like_pdf(b"%PDF-1.7\n..."));
        assert!(!looks_like_pdf(b"{\"pages\": []}"));
        assert!(!looks_like_pdf(b""));
    }
}

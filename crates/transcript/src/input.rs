use std::path::{Path, PathBuf};

use transcript_core::{Document, Page, Token};

use crate::prelude::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat {
    /// Detect from the file header or extension
    #[default]
    Auto,
    /// Text-based PDF
    Pdf,
    /// JSON token dump (`{"pages": [{"width": .., "tokens": [..]}]}`)
    Tokens,
}

#[derive(Debug, Clone, clap::Args)]
pub struct InputArgs {
    /// Path to a transcript PDF or a JSON token dump
    pub path: PathBuf,

    /// Input format
    #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
    pub format: InputFormat,
}

/// Guess the format of `bytes` read from `path`.
///
/// A `%PDF` header wins; otherwise the extension decides, and a leading `{`
/// marks a token dump.
pub fn detect(path: &Path, bytes: &[u8]) -> Option<InputFormat> {
    if pdf::looks_like_pdf(bytes) {
        return Some(InputFormat::Pdf);
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("json") => Some(InputFormat::Tokens),
        Some("pdf") => Some(InputFormat::Pdf),
        _ if bytes.trim_ascii_start().starts_with(b"{") => Some(InputFormat::Tokens),
        _ => None,
    }
}

/// Word tokens from the PDF extractor, as the parser's input document.
pub fn to_document(pages: Vec<pdf::PageWords>) -> Document {
    let pages = pages
        .into_iter()
        .map(|page| {
            let tokens = page
                .words
                .into_iter()
                .map(|word| Token::new(word.text, word.x, word.top))
                .collect();
            Page::new(page.width, tokens)
        })
        .collect();
    Document { pages }
}

/// Read the input file and turn it into a [`Document`].
pub fn load_document(input: &InputArgs) -> Result<Document, Error> {
    let bytes = std::fs::read(&input.path).map_err(|source| Error::Read {
        path: input.path.clone(),
        source,
    })?;

    let format = match input.format {
        InputFormat::Auto => detect(&input.path, &bytes)
            .ok_or_else(|| Error::UnknownFormat(input.path.clone()))?,
        format => format,
    };
    log::debug!("reading {:?} as {:?}", input.path, format);

    match format {
        InputFormat::Pdf => Ok(to_document(pdf::extract_words(&bytes)?)),
        InputFormat::Tokens | InputFormat::Auto => {
            Ok(Document::from_json(&String::from_utf8_lossy(&bytes))?)
        }
    }
}

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Cannot tell whether {0:?} is a PDF or a token dump; pass --format")]
    UnknownFormat(PathBuf),

    #[error("Cannot read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Core(#[from] transcript_core::CoreError),

    #[error(transparent)]
    Pdf(#[from] pdf::PdfError),
}

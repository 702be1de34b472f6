//! Error types for the word-of-the-day pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to build a component before the pipeline ran
    #[error("Initialization failed: {0}")]
    Init(String),

    /// Network/connection failure while retrieving the source page
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// The source page no longer has the markup the extractor expects
    #[error("Unexpected page structure: {0}")]
    Structure(String),

    /// Failed to produce or persist the rendered page
    #[error("Rendering failed: {0}")]
    Render(String),

    /// The headless screenshot backend failed
    #[error("Rasterization failed: {0}")]
    Rasterize(String),

    /// The panel driver failed
    #[error("Display failed: {0}")]
    Display(String),
}

impl Error {
    /// True for the one recoverable failure class: the caller exits quietly
    /// on a fetch failure instead of treating it as a bug.
    pub fn is_fetch(&self) -> bool {
        matches!(self, Error::Fetch(_))
    }
}

// headless_chrome surfaces anyhow errors
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Rasterize(err.to_string())
    }
}

//! Word-of-the-day panel pipeline
//!
//! Fetches the dictionary.com word of the day, extracts the structured entry
//! fields from its markup, renders them into a small 400x300 page, rasterizes
//! the page with headless Chrome, and pushes the bitmap to a black/white/red
//! e-paper panel when one is attached.
//!
//! The pipeline is a strictly sequential, single-pass batch:
//! fetch -> extract -> render -> rasterize -> display. Nothing persists
//! across runs beyond the two overwritten artifacts (`wotd.html`,
//! `wotd.png`), nothing is retried, and the only failure handled specially is
//! a connection failure, which ends the run quietly.
//!
//! # Example
//!
//! ```no_run
//! use wotd_panel::{Extractor, Fetcher, PipelineConfig};
//!
//! # fn main() -> wotd_panel::Result<()> {
//! let config = PipelineConfig::default();
//! let html = Fetcher::new()?.fetch(&config.source_url)?;
//! let entries = Extractor::new().extract(&html)?;
//! let page = wotd_panel::render::render_page(&entries);
//! # let _ = page;
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use log::warn;

pub mod error;
pub use error::{Error, Result};

pub mod display;
pub mod extract;
pub mod fetch;
pub mod render;
pub mod raster;

pub use display::{DisplaySink, DisplayTarget, NullSink};
pub use extract::{Entry, EntryCollection, Extractor};
pub use fetch::Fetcher;

/// Panel dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelSize {
    pub width: u32,
    pub height: u32,
}

impl Default for PanelSize {
    fn default() -> Self {
        Self {
            width: 400,
            height: 300,
        }
    }
}

/// Configuration for one pipeline run
///
/// Everything the run depends on is resolved into this struct once at
/// process start and passed down; no component reads platform state or
/// globals on its own. The defaults reproduce the production behavior:
/// the fixed source URL, artifacts in the invoking directory, the 400x300
/// panel, and no hardware output.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Source page to scrape
    pub source_url: String,
    /// Where the rendered HTML document is persisted
    pub page_path: PathBuf,
    /// Where the rasterized PNG is persisted
    pub image_path: PathBuf,
    /// Viewport and output bitmap size
    pub panel: PanelSize,
    /// Which sink receives the finished bitmap
    pub display: DisplayTarget,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_url: fetch::SOURCE_URL.to_string(),
            page_path: PathBuf::from("wotd.html"),
            image_path: PathBuf::from("wotd.png"),
            panel: PanelSize::default(),
            display: DisplayTarget::Null,
        }
    }
}

/// Build the display sink for the requested target.
///
/// Selected once at startup and injected into the pipeline. Asking for the
/// e-paper sink in a build without panel support falls back to the null sink
/// with a warning, which keeps development runs harmless.
pub fn new_sink(target: DisplayTarget) -> Result<Box<dyn DisplaySink>> {
    match target {
        DisplayTarget::Null => Ok(Box::new(NullSink::new())),

        #[cfg(all(feature = "epaper", any(target_arch = "arm", target_arch = "aarch64")))]
        DisplayTarget::EPaper => Ok(Box::new(display::epd::EPaperSink::new()?)),

        #[cfg(not(all(feature = "epaper", any(target_arch = "arm", target_arch = "aarch64"))))]
        DisplayTarget::EPaper => {
            warn!("e-paper support not compiled in, falling back to the null sink");
            Ok(Box::new(NullSink::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.panel.width, 400);
        assert_eq!(config.panel.height, 300);
        assert_eq!(config.display, DisplayTarget::Null);
        assert!(config.source_url.contains("word-of-the-day"));
        assert_eq!(config.page_path, PathBuf::from("wotd.html"));
        assert_eq!(config.image_path, PathBuf::from("wotd.png"));
    }

    #[test]
    fn null_target_always_yields_a_sink() {
        assert!(new_sink(DisplayTarget::Null).is_ok());
    }
}

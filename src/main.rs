//! Pipeline binary: one run per invocation.
//!
//! Fetch, extract, render, rasterize, display, strictly in that order. A
//! connection failure ends the run with a single diagnostic line and no
//! artifacts; every other failure is a bug or an environment problem and is
//! reported with its error chain.

use std::process::ExitCode;

use log::debug;

use wotd_panel::{render, raster, DisplayTarget, Extractor, Fetcher, PipelineConfig, Result};

fn run(config: &PipelineConfig) -> Result<()> {
    let fetcher = Fetcher::new()?;
    let html = fetcher.fetch(&config.source_url)?;

    let entries = Extractor::new().extract(&html)?;
    debug!(
        "extracted entries: {}",
        serde_json::to_string_pretty(&entries).unwrap_or_default()
    );

    let page = render::render_page(&entries);
    render::write_page(&config.page_path, &page)?;

    let image = raster::rasterize(&config.page_path, &config.image_path, config.panel)?;

    let mut sink = wotd_panel::new_sink(config.display)?;
    sink.push(&image)?;

    Ok(())
}

fn main() -> ExitCode {
    // Resolved once, up front; nothing downstream probes the platform again.
    let config = PipelineConfig {
        display: DisplayTarget::detect(),
        ..PipelineConfig::default()
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_fetch() => {
            // The one expected failure mode: the network was unavailable.
            // Exit quietly, retry on the next scheduled run.
            eprintln!("You've got problems with connection.");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("wotd-panel: {}", e);
            ExitCode::FAILURE
        }
    }
}

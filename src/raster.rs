//! Rasterizes the rendered page to the fixed panel bitmap.
//!
//! Launches headless Chrome at the panel's viewport size with GPU
//! acceleration disabled, screenshots the persisted page artifact, writes the
//! PNG next to it, then reopens the PNG and re-asserts the 400x300 size. The
//! screenshot should already be the right size; the resize is a normalization
//! step so downstream code can rely on the dimensions unconditionally.
//! Content that overflows the viewport is clipped, not corrected.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions};
use image::imageops::FilterType;
use image::RgbImage;
use log::debug;
use url::Url;

use crate::{Error, PanelSize, Result};

/// Screenshot the page artifact at `page_path` and produce the panel bitmap,
/// persisting the PNG to `image_path` along the way.
pub fn rasterize(page_path: &Path, image_path: &Path, panel: PanelSize) -> Result<RgbImage> {
    let launch_options = LaunchOptions::default_builder()
        .headless(true)
        .window_size(Some((panel.width, panel.height)))
        .args(vec![OsStr::new("--disable-gpu")])
        .build()
        .map_err(|e| Error::Init(format!("Failed to build launch options: {}", e)))?;

    let browser = Browser::new(launch_options)
        .map_err(|e| Error::Rasterize(format!("Failed to launch browser: {}", e)))?;

    let tab = browser
        .new_tab()
        .map_err(|e| Error::Rasterize(format!("Failed to create tab: {}", e)))?;

    let abs = page_path
        .canonicalize()
        .map_err(|e| Error::Rasterize(format!("Cannot resolve {}: {}", page_path.display(), e)))?;
    let url = Url::from_file_path(&abs)
        .map_err(|_| Error::Rasterize(format!("Not an absolute path: {}", abs.display())))?;

    debug!("screenshotting {} at {}x{}", url, panel.width, panel.height);

    tab.navigate_to(url.as_str())?;
    tab.wait_until_navigated()?;

    let png = tab.capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, None, true)?;

    fs::write(image_path, &png)
        .map_err(|e| Error::Rasterize(format!("Failed to write {}: {}", image_path.display(), e)))?;

    normalize(image_path, panel)
}

/// Reopen the persisted screenshot and force it to exactly the panel size.
pub(crate) fn normalize(image_path: &Path, panel: PanelSize) -> Result<RgbImage> {
    let img = image::open(image_path)
        .map_err(|e| Error::Rasterize(format!("Failed to reopen {}: {}", image_path.display(), e)))?;

    Ok(img
        .resize_exact(panel.width, panel.height, FilterType::Triangle)
        .to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_png(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("wotd-raster-{}-{}.png", std::process::id(), name))
    }

    #[test]
    fn normalize_forces_panel_dimensions() {
        let path = temp_png("small");
        let src = RgbImage::from_pixel(200, 100, image::Rgb([10, 20, 30]));
        src.save(&path).unwrap();

        let out = normalize(&path, PanelSize::default()).unwrap();
        assert_eq!(out.dimensions(), (400, 300));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn normalize_is_identity_sized_for_exact_input() {
        let path = temp_png("exact");
        let src = RgbImage::from_pixel(400, 300, image::Rgb([255, 255, 255]));
        src.save(&path).unwrap();

        let out = normalize(&path, PanelSize::default()).unwrap();
        assert_eq!(out.dimensions(), (400, 300));
        assert_eq!(out.get_pixel(0, 0).0, [255, 255, 255]);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn normalize_fails_for_missing_artifact() {
        let err = normalize(Path::new("/nonexistent/wotd.png"), PanelSize::default())
            .expect_err("should fail");
        assert!(matches!(err, Error::Rasterize(_)), "got {:?}", err);
    }

    #[test]
    #[ignore] // Requires Chrome to be installed
    fn rasterize_produces_panel_sized_bitmap() {
        let page_path = std::env::temp_dir().join(format!("wotd-raster-{}.html", std::process::id()));
        let image_path = temp_png("full");
        std::fs::write(&page_path, "<html><body><h1>hello</h1></body></html>").unwrap();

        let img = rasterize(&page_path, &image_path, PanelSize::default()).unwrap();
        assert_eq!(img.dimensions(), (400, 300));
        assert!(image_path.exists());

        let _ = std::fs::remove_file(&page_path);
        let _ = std::fs::remove_file(&image_path);
    }
}

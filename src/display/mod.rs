//! Display sinks: push the panel bitmap to hardware, or do nothing.
//!
//! The sink is chosen once at startup from an explicit [`DisplayTarget`]
//! value and injected into the pipeline; nothing in here branches on the
//! platform at call time. Frame preparation (palette quantization and the
//! 180 degree rotation) is plain image math and lives here so it stays
//! testable on development machines without the panel.

use image::RgbImage;
use log::debug;

use crate::Result;

#[cfg(all(feature = "epaper", any(target_arch = "arm", target_arch = "aarch64")))]
pub mod epd;

/// Where the rasterized page should end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayTarget {
    /// No hardware I/O; the run stops at the PNG artifact.
    Null,
    /// The 400x300 black/white/red e-paper panel.
    EPaper,
}

impl DisplayTarget {
    /// Probe the host once at startup: the panel only ever hangs off an ARM
    /// board, everything else is a development machine.
    pub fn detect() -> Self {
        match std::env::consts::ARCH {
            "arm" | "aarch64" => DisplayTarget::EPaper,
            _ => DisplayTarget::Null,
        }
    }
}

/// A sink the pipeline can push the finished bitmap into.
pub trait DisplaySink {
    /// Consume the bitmap and (for real hardware) block until the panel has
    /// accepted the refresh.
    fn push(&mut self, image: &RgbImage) -> Result<()>;
}

/// Default sink for development machines: no hardware calls at all.
pub struct NullSink;

impl NullSink {
    pub fn new() -> Self {
        NullSink
    }
}

impl Default for NullSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink for NullSink {
    fn push(&mut self, image: &RgbImage) -> Result<()> {
        debug!(
            "no display attached, dropping {}x{} frame",
            image.width(),
            image.height()
        );
        Ok(())
    }
}

/// The three colors the panel can show. Slot order matches the panel
/// palette: white, black, red; all remaining palette slots are black, so any
/// ambiguous pixel resolves toward black.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteColor {
    White,
    Black,
    Red,
}

impl PaletteColor {
    const fn rgb(self) -> [u8; 3] {
        match self {
            PaletteColor::White => [255, 255, 255],
            PaletteColor::Black => [0, 0, 0],
            PaletteColor::Red => [255, 0, 0],
        }
    }
}

/// The bitmap in panel form: quantized to the three-slot palette and rotated
/// 180 degrees (the connector forces the panel to mount upside down).
/// Consumed exactly once by a sink.
pub struct DisplayFrame {
    width: u32,
    height: u32,
    pixels: Vec<PaletteColor>,
}

impl DisplayFrame {
    /// Rotate 180 degrees, then map every pixel to its nearest palette color.
    pub fn from_image(image: &RgbImage) -> Self {
        let rotated = image::imageops::rotate180(image);
        let pixels = rotated.pixels().map(|p| nearest(p.0)).collect();
        Self {
            width: rotated.width(),
            height: rotated.height(),
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> PaletteColor {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Split into the two 1-bit planes the panel driver takes: a black plane
    /// and a chromatic (red) plane. Bits are packed MSB-first per row byte; a
    /// cleared bit marks an active pixel on that plane.
    pub fn planes(&self) -> (Vec<u8>, Vec<u8>) {
        let len = (self.width * self.height).div_ceil(8) as usize;
        let mut black = vec![0xffu8; len];
        let mut red = vec![0xffu8; len];
        for (i, px) in self.pixels.iter().enumerate() {
            let byte = i / 8;
            let bit = 7 - (i % 8);
            match px {
                PaletteColor::Black => black[byte] &= !(1 << bit),
                PaletteColor::Red => red[byte] &= !(1 << bit),
                PaletteColor::White => {}
            }
        }
        (black, red)
    }
}

/// Nearest palette color by squared distance in RGB space.
fn nearest(rgb: [u8; 3]) -> PaletteColor {
    let mut best = PaletteColor::White;
    let mut best_dist = u32::MAX;
    for candidate in [PaletteColor::White, PaletteColor::Black, PaletteColor::Red] {
        let c = candidate.rgb();
        let dist: u32 = (0..3)
            .map(|i| {
                let d = rgb[i] as i32 - c[i] as i32;
                (d * d) as u32
            })
            .sum();
        if dist < best_dist {
            best_dist = dist;
            best = candidate;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn null_sink_accepts_any_frame() {
        let img = RgbImage::from_pixel(400, 300, Rgb([128, 128, 128]));
        NullSink::new().push(&img).expect("null sink failed");
    }

    #[test]
    fn quantization_snaps_to_the_three_slots() {
        assert_eq!(nearest([250, 250, 250]), PaletteColor::White);
        assert_eq!(nearest([10, 10, 10]), PaletteColor::Black);
        assert_eq!(nearest([230, 30, 30]), PaletteColor::Red);
        // Mid grays fall toward black before they reach white.
        assert_eq!(nearest([100, 100, 100]), PaletteColor::Black);
    }

    #[test]
    fn frame_is_rotated_180_degrees() {
        // Single red pixel in the top-left corner.
        let mut img = RgbImage::from_pixel(4, 2, Rgb([255, 255, 255]));
        img.put_pixel(0, 0, Rgb([255, 0, 0]));

        let frame = DisplayFrame::from_image(&img);
        assert_eq!(frame.width(), 4);
        assert_eq!(frame.height(), 2);
        // After rotation it sits in the bottom-right corner.
        assert_eq!(frame.get(3, 1), PaletteColor::Red);
        assert_eq!(frame.get(0, 0), PaletteColor::White);
    }

    #[test]
    fn planes_mark_active_pixels_with_cleared_bits() {
        // 8x1 frame: black, red, then six white pixels. Rotation reverses
        // the row, so the active pixels land at the end of the byte.
        let mut img = RgbImage::from_pixel(8, 1, Rgb([255, 255, 255]));
        img.put_pixel(0, 0, Rgb([0, 0, 0]));
        img.put_pixel(1, 0, Rgb([255, 0, 0]));

        let frame = DisplayFrame::from_image(&img);
        let (black, red) = frame.planes();
        assert_eq!(black.len(), 1);
        assert_eq!(red.len(), 1);
        assert_eq!(black[0], 0b1111_1110);
        assert_eq!(red[0], 0b1111_1101);
    }

    #[test]
    fn detect_only_selects_epaper_on_arm() {
        let target = DisplayTarget::detect();
        match std::env::consts::ARCH {
            "arm" | "aarch64" => assert_eq!(target, DisplayTarget::EPaper),
            _ => assert_eq!(target, DisplayTarget::Null),
        }
    }
}

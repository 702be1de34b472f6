//! E-paper sink for the 400x300 black/white/red panel on the Raspberry Pi.
//!
//! A thin wrapper over the `epd-waveshare` vendor driver: convert the frame
//! to the driver's two 1-bit planes, hand them over, trigger the refresh.
//! The wire protocol stays inside the vendor crate. Only compiled on ARM
//! targets with the `epaper` feature; everything host-testable about frame
//! preparation lives in the parent module.

use epd_waveshare::epd4in2b_v2::Epd4in2b;
use epd_waveshare::prelude::*;
use image::RgbImage;
use log::info;
use rppal::gpio::{Gpio, InputPin, OutputPin};
use rppal::hal::Delay;
use rppal::spi::{Bus, Mode, SimpleHalSpiDevice, SlaveSelect, Spi};

use crate::display::{DisplayFrame, DisplaySink};
use crate::{Error, Result};

// Standard e-paper HAT wiring.
const PIN_RST: u8 = 17;
const PIN_DC: u8 = 25;
const PIN_BUSY: u8 = 24;

type Panel = Epd4in2b<SimpleHalSpiDevice, InputPin, OutputPin, OutputPin, Delay>;

/// Sink that drives the physical panel over SPI.
pub struct EPaperSink {
    spi: SimpleHalSpiDevice,
    delay: Delay,
    epd: Panel,
}

impl EPaperSink {
    /// Acquire the SPI bus and GPIO pins and wake the panel. Called once per
    /// run; the handle is never held across runs.
    pub fn new() -> Result<Self> {
        let spi = Spi::new(Bus::Spi0, SlaveSelect::Ss0, 4_000_000, Mode::Mode0)
            .map_err(|e| Error::Init(format!("Failed to open SPI bus: {}", e)))?;
        let mut spi = SimpleHalSpiDevice::new(spi);

        let gpio = Gpio::new().map_err(|e| Error::Init(format!("Failed to open GPIO: {}", e)))?;
        let busy = gpio
            .get(PIN_BUSY)
            .map_err(|e| Error::Init(format!("Failed to claim busy pin: {}", e)))?
            .into_input();
        let dc = gpio
            .get(PIN_DC)
            .map_err(|e| Error::Init(format!("Failed to claim dc pin: {}", e)))?
            .into_output();
        let rst = gpio
            .get(PIN_RST)
            .map_err(|e| Error::Init(format!("Failed to claim reset pin: {}", e)))?
            .into_output();

        let mut delay = Delay::new();
        let mut epd = Epd4in2b::new(&mut spi, busy, dc, rst, &mut delay, None)
            .map_err(|e| Error::Init(format!("Failed to initialize panel: {:?}", e)))?;

        // The border refreshes along with the background; keep both black.
        epd.set_background_color(TriColor::Black);

        Ok(Self { spi, delay, epd })
    }
}

impl DisplaySink for EPaperSink {
    fn push(&mut self, image: &RgbImage) -> Result<()> {
        let frame = DisplayFrame::from_image(image);
        let (black, red) = frame.planes();

        self.epd
            .update_color_frame(&mut self.spi, &mut self.delay, &black, &red)
            .map_err(|e| Error::Display(format!("Failed to set image buffer: {:?}", e)))?;

        // Blocks until the panel has accepted the refresh.
        self.epd
            .display_frame(&mut self.spi, &mut self.delay)
            .map_err(|e| Error::Display(format!("Failed to refresh panel: {:?}", e)))?;

        info!("panel refreshed");
        Ok(())
    }
}

//! # Barcode Encoding
//!
//! Encodes the location string as a linear barcode and rasterizes the
//! modules into a coverage buffer.
//!
//! Uses the barcoders crate for Code 39 and Code 128 encoding. Code 39
//! carries no checksum and knows no lowercase, so its payload is forced to
//! uppercase before encoding; the location text drawn on the label keeps
//! its original casing. Code 128 takes the payload as-is.

use crate::config::Symbology;
use crate::error::LabelError;
use barcoders::sym::code128::Code128;
use barcoders::sym::code39::Code39;
use image::{GrayImage, Luma};

/// Raw raster geometry for the bars.
#[derive(Debug, Clone, Copy)]
pub struct BarcodeOptions {
    /// Pixels per module.
    pub module_width: u32,
    /// Bar height in pixels.
    pub module_height: u32,
    /// Blank modules on each side of the bars.
    pub quiet_zone: u32,
}

/// Normalize the location for the chosen symbology.
pub fn payload(symbology: Symbology, location: &str) -> String {
    match symbology {
        Symbology::Code39 => location.to_uppercase(),
        Symbology::Code128 => location.to_string(),
    }
}

/// Encode the payload into modules (1 = bar, 0 = space).
///
/// A payload the symbology cannot represent is a hard failure; no partial
/// label is produced from it.
pub fn encode(symbology: Symbology, payload: &str) -> Result<Vec<u8>, LabelError> {
    match symbology {
        Symbology::Code39 => Code39::new(payload)
            .map(|b| b.encode())
            .map_err(|e| LabelError::Encoding(format!("Code 39 rejected '{payload}': {e}"))),
        Symbology::Code128 => {
            // Code128 requires a character set prefix; Set B (Ɓ) covers the
            // widest range of printable characters, lowercase included.
            let prefixed = format!("\u{0181}{payload}");
            Code128::new(&prefixed)
                .map(|b| b.encode())
                .map_err(|e| LabelError::Encoding(format!("Code 128 rejected '{payload}': {e}")))
        }
    }
}

/// Rasterize modules into a coverage buffer (255 = bar ink).
///
/// The quiet zone is part of the raster so it survives any later resize.
pub fn rasterize(modules: &[u8], opts: &BarcodeOptions) -> GrayImage {
    let module_width = opts.module_width.max(1);
    let width = (2 * opts.quiet_zone + modules.len() as u32) * module_width;
    let height = opts.module_height.max(1);
    let mut img = GrayImage::new(width.max(1), height);

    for (i, &module) in modules.iter().enumerate() {
        if module != 1 {
            continue;
        }
        let x0 = (opts.quiet_zone + i as u32) * module_width;
        for x in x0..x0 + module_width {
            for y in 0..height {
                img.put_pixel(x, y, Luma([255]));
            }
        }
    }

    img
}

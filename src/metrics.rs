//! # Metrics Resolver
//!
//! First pipeline stage: measure every element of the label without drawing
//! anything. Text runs are measured from glyph outlines alone; the barcode
//! is encoded and rasterized once at its natural module size, and the
//! aspect-preserving display size is derived from the safe width.

use crate::barcode::{self, BarcodeOptions};
use crate::config::{LabelConfig, LabelSpec};
use crate::error::LabelError;
use crate::fonts::{self, LabelFont, TextMetrics};
use image::GrayImage;

/// A text run with its resolved font and measured ink box.
#[derive(Debug, Clone)]
pub struct TextElement {
    pub text: String,
    pub font: LabelFont,
    pub size_px: f32,
    pub metrics: TextMetrics,
}

impl TextElement {
    fn measure(text: &str, font: LabelFont, size_px: f32) -> Self {
        let metrics = fonts::measure(&font, text, size_px);
        Self {
            text: text.to_string(),
            font,
            size_px,
            metrics,
        }
    }

    pub fn width(&self) -> u32 {
        self.metrics.width
    }

    pub fn height(&self) -> u32 {
        self.metrics.height
    }
}

/// The encoded barcode: raw raster plus its display size.
///
/// `raw` keeps the natural module geometry; `scaled_width`/`scaled_height`
/// is the aspect-preserving size the planner uses. The fill policy ignores
/// the scaled height and stretches the raw raster to its own span.
#[derive(Debug, Clone)]
pub struct BarcodeElement {
    /// Case-normalized string actually encoded in the bars.
    pub payload: String,
    pub raw: GrayImage,
    pub scaled_width: u32,
    pub scaled_height: u32,
}

/// All measured elements of one label, ready for planning.
#[derive(Debug, Clone)]
pub struct MeasuredLabel {
    pub code: TextElement,
    pub location: TextElement,
    pub barcode: BarcodeElement,
    pub warnings: Vec<String>,
}

/// Measure both text runs and the barcode for one render.
pub fn resolve(
    product_code: &str,
    location: &str,
    config: &LabelConfig,
    spec: &LabelSpec,
) -> Result<MeasuredLabel, LabelError> {
    let mut warnings = Vec::new();
    let font_large = fonts::load(config.font_large_path.as_deref(), &mut warnings);
    let font_small = fonts::load(config.font_small_path.as_deref(), &mut warnings);

    let code = TextElement::measure(product_code, font_large, config.font_large_size);
    let location_text = TextElement::measure(location, font_small.clone(), config.font_small_size);

    let payload = barcode::payload(config.symbology, location);
    let modules = barcode::encode(config.symbology, &payload)?;
    let opts = BarcodeOptions {
        module_width: config.barcode_module_width,
        module_height: config.barcode_module_height,
        quiet_zone: config.barcode_quiet_zone,
    };
    let mut raw = barcode::rasterize(&modules, &opts);
    if config.barcode_text {
        raw = append_text_band(raw, &payload, &font_small, config.font_small_size * 0.5);
    }

    let (scaled_width, scaled_height) = scaled_size(&raw, spec, config.barcode_width_frac);

    Ok(MeasuredLabel {
        code,
        location: location_text,
        barcode: BarcodeElement {
            payload,
            raw,
            scaled_width,
            scaled_height,
        },
        warnings,
    })
}

/// Derive the display size: a fraction of the safe width, height following
/// from the uniform scale ratio. The fraction is clamped so the bars can
/// never leave the safe area.
fn scaled_size(raw: &GrayImage, spec: &LabelSpec, width_frac: f32) -> (u32, u32) {
    let frac = width_frac.clamp(0.05, 1.0);
    let desired_w = ((spec.safe_width() as f32 * frac) as u32).max(1);
    let ratio = desired_w as f32 / raw.width() as f32;
    let scaled_h = ((raw.height() as f32 * ratio) as u32).max(1);
    (desired_w, scaled_h)
}

/// Stack a human-readable payload line under the bars, the way barcode
/// writers print it. The combined raster scales as one unit afterwards.
fn append_text_band(bars: GrayImage, payload: &str, font: &LabelFont, size_px: f32) -> GrayImage {
    let text = fonts::rasterize(font, payload, size_px);
    let pad = 4u32;
    let width = bars.width().max(text.width());
    let mut img = GrayImage::new(width, bars.height() + pad + text.height());

    let bars_x = (width - bars.width()) / 2;
    for (x, y, p) in bars.enumerate_pixels() {
        if p.0[0] > 0 {
            img.put_pixel(bars_x + x, y, *p);
        }
    }
    let text_x = (width - text.width()) / 2;
    let text_y = bars.height() + pad;
    for (x, y, p) in text.enumerate_pixels() {
        if p.0[0] > 0 {
            img.put_pixel(text_x + x, text_y + y, *p);
        }
    }

    img
}

//! # Compositor
//!
//! Final pipeline stage: draw the planned elements onto a blank canvas,
//! apply the optional quarter-turn, and serialize to PNG in memory. No
//! disk I/O happens here; the caller owns the returned buffer.

use crate::config::{LabelSpec, Rotation};
use crate::error::LabelError;
use crate::fonts;
use crate::layout::{ElementKind, LayoutPlan};
use crate::metrics::MeasuredLabel;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use std::io::Cursor;

/// The finished label: PNG bytes plus the dimensions the caller can expect
/// after decoding (swapped when rotated) and any non-fatal warnings
/// collected along the way.
#[derive(Debug, Clone)]
pub struct RenderedLabel {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
    pub warnings: Vec<String>,
}

/// Draw the plan onto a fresh canvas and encode it.
pub fn compose(
    measured: &MeasuredLabel,
    plan: &LayoutPlan,
    spec: &LabelSpec,
    rotation: Rotation,
) -> Result<RenderedLabel, LabelError> {
    let mut canvas = RgbImage::from_pixel(spec.width_px, spec.height_px, spec.background);

    for item in &plan.items {
        match item.kind {
            ElementKind::Code => {
                let coverage = fonts::rasterize(
                    &measured.code.font,
                    &measured.code.text,
                    measured.code.size_px,
                );
                stamp(&mut canvas, &coverage, item.x, item.y, spec.foreground);
            }
            ElementKind::Location => {
                let coverage = fonts::rasterize(
                    &measured.location.font,
                    &measured.location.text,
                    measured.location.size_px,
                );
                stamp(&mut canvas, &coverage, item.x, item.y, spec.foreground);
            }
            ElementKind::Barcode => {
                // Nearest-neighbor keeps module edges crisp. Under the fill
                // policy the target height is independent of the aspect
                // ratio, so this is where the bars distort.
                let (w, h) = plan.barcode_size;
                let resized = imageops::resize(&measured.barcode.raw, w, h, FilterType::Nearest);
                stamp(&mut canvas, &resized, item.x, item.y, spec.foreground);
            }
        }
    }

    // Lossless quarter-turn: dimensions swap, nothing is cropped.
    let canvas = match rotation {
        Rotation::None => canvas,
        Rotation::Clockwise => DynamicImage::ImageRgb8(canvas).rotate90().into_rgb8(),
        Rotation::CounterClockwise => DynamicImage::ImageRgb8(canvas).rotate270().into_rgb8(),
    };

    let mut png = Vec::new();
    canvas
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| LabelError::Image(format!("PNG encoding failed: {e}")))?;

    Ok(RenderedLabel {
        width: canvas.width(),
        height: canvas.height(),
        png,
        warnings: measured.warnings.clone(),
    })
}

/// Alpha-blend a coverage buffer onto the canvas in the foreground color.
/// Pixels falling outside the canvas are clipped silently; that is how
/// overflowing layouts end up visibly cut off.
fn stamp(canvas: &mut RgbImage, coverage: &GrayImage, x: i32, y: i32, fg: Rgb<u8>) {
    let (canvas_w, canvas_h) = (canvas.width() as i32, canvas.height() as i32);
    for (cx, cy, p) in coverage.enumerate_pixels() {
        let c = p.0[0];
        if c == 0 {
            continue;
        }
        let tx = x + cx as i32;
        let ty = y + cy as i32;
        if tx < 0 || ty < 0 || tx >= canvas_w || ty >= canvas_h {
            continue;
        }
        let alpha = c as f32 / 255.0;
        let dst = canvas.get_pixel_mut(tx as u32, ty as u32);
        for i in 0..3 {
            dst.0[i] = (dst.0[i] as f32 * (1.0 - alpha) + fg.0[i] as f32 * alpha).round() as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LabelConfig;
    use crate::{layout, metrics};

    fn rendered(config: &LabelConfig) -> RenderedLabel {
        let spec = config.spec();
        let measured = metrics::resolve("69", "P06-C2-A2-G11", config, &spec).unwrap();
        let plan = layout::plan(&measured, &spec, &config.layout);
        compose(&measured, &plan, &spec, config.rotation()).unwrap()
    }

    #[test]
    fn test_compose_canvas_dimensions() {
        let label = rendered(&LabelConfig::preset("compact-8x4").unwrap());
        assert_eq!((label.width, label.height), (945, 472));
        let img = image::load_from_memory(&label.png).unwrap();
        assert_eq!((img.width(), img.height()), (945, 472));
    }

    #[test]
    fn test_compose_rotation_swaps_dimensions() {
        let mut config = LabelConfig::preset("compact-8x4").unwrap();
        config.rotate_90 = true;
        let label = rendered(&config);
        assert_eq!((label.width, label.height), (472, 945));
    }

    #[test]
    fn test_compose_background_and_ink() {
        let label = rendered(&LabelConfig::preset("compact-8x4").unwrap());
        let img = image::load_from_memory(&label.png).unwrap().into_rgb8();
        // Corners sit in the margin and stay background white.
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255]);
        // Something got drawn.
        assert!(img.pixels().any(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn test_stamp_clips_out_of_bounds() {
        let mut canvas = RgbImage::from_pixel(10, 10, Rgb([255, 255, 255]));
        let coverage = GrayImage::from_pixel(20, 20, image::Luma([255]));
        stamp(&mut canvas, &coverage, -5, -5, Rgb([0, 0, 0]));
        // No panic, and in-bounds pixels were inked.
        assert_eq!(canvas.get_pixel(0, 0).0, [0, 0, 0]);
    }
}

//! # Label Rendering Tests
//!
//! End-to-end properties of the render pipeline, verified by decoding the
//! produced PNG: canvas dimensions, determinism, safe-area containment,
//! band separation, rotation, and the font-fallback path.
//!
//! All tests use the built-in bitmap font (no font paths configured), so
//! pixel positions are fully deterministic across platforms.

use etiqueta::config::LabelConfig;
use etiqueta::render::{render_label, validate_inputs};
use etiqueta::LabelError;
use image::RgbImage;
use pretty_assertions::assert_eq;

const CODE: &str = "69";
const LOCATION: &str = "P06-C2-A2-G11";

fn decode(png: &[u8]) -> RgbImage {
    image::load_from_memory(png)
        .expect("output must decode as an image")
        .into_rgb8()
}

fn is_dark(pixel: &image::Rgb<u8>) -> bool {
    pixel.0[0] < 128
}

/// Rows that contain any ink, as (start, end_exclusive) runs.
fn ink_row_runs(img: &RgbImage) -> Vec<(u32, u32)> {
    let mut runs = Vec::new();
    let mut current: Option<u32> = None;
    for y in 0..img.height() {
        let has_ink = (0..img.width()).any(|x| is_dark(img.get_pixel(x, y)));
        match (has_ink, current) {
            (true, None) => current = Some(y),
            (false, Some(start)) => {
                runs.push((start, y));
                current = None;
            }
            _ => {}
        }
    }
    if let Some(start) = current {
        runs.push((start, img.height()));
    }
    runs
}

#[test]
fn test_render_matches_configured_dimensions() {
    let config = LabelConfig::preset("compact-8x4").unwrap();
    let label = render_label(CODE, LOCATION, &config).unwrap();

    assert_eq!((label.width, label.height), (945, 472));
    let img = decode(&label.png);
    assert_eq!((img.width(), img.height()), (945, 472));
}

#[test]
fn test_rotation_swaps_dimensions() {
    let mut config = LabelConfig::preset("compact-8x4").unwrap();
    config.rotate_90 = true;
    let label = render_label(CODE, LOCATION, &config).unwrap();

    assert_eq!((label.width, label.height), (472, 945));
    let img = decode(&label.png);
    assert_eq!((img.width(), img.height()), (472, 945));
}

#[test]
fn test_render_is_deterministic() {
    let config = LabelConfig::preset("wide-8x6").unwrap();
    let first = render_label(CODE, LOCATION, &config).unwrap();
    let second = render_label(CODE, LOCATION, &config).unwrap();
    assert_eq!(first.png, second.png);
}

#[test]
fn test_every_preset_renders() {
    for name in LabelConfig::presets() {
        let config = LabelConfig::preset(name).unwrap();
        let label = render_label(CODE, LOCATION, &config)
            .unwrap_or_else(|e| panic!("preset {name} failed: {e}"));
        assert!(!label.png.is_empty(), "preset {name} produced no bytes");
        let img = decode(&label.png);
        assert_eq!((img.width(), img.height()), (label.width, label.height));
    }
}

#[test]
fn test_three_separated_content_bands() {
    let config = LabelConfig::preset("compact-8x4").unwrap();
    let label = render_label(CODE, LOCATION, &config).unwrap();
    let img = decode(&label.png);

    // Top to bottom: code text, barcode, location text, each separated by
    // a blank gap.
    let runs = ink_row_runs(&img);
    assert_eq!(runs.len(), 3, "expected 3 bands, got {runs:?}");
    for pair in runs.windows(2) {
        assert!(pair[0].1 < pair[1].0, "bands overlap: {runs:?}");
    }
}

#[test]
fn test_content_stays_inside_safe_area() {
    let config = LabelConfig::preset("compact-8x4").unwrap();
    let spec = config.spec();
    let label = render_label(CODE, LOCATION, &config).unwrap();
    let img = decode(&label.png);

    let margin = spec.margin_px;
    for (x, y, pixel) in img.enumerate_pixels() {
        if is_dark(pixel) {
            assert!(
                x >= margin && x < img.width() - margin,
                "ink at x={x} outside safe width"
            );
            assert!(
                y >= margin && y < img.height() - margin,
                "ink at y={y} outside safe height"
            );
        }
    }
}

#[test]
fn test_fill_mode_barcode_fills_span_between_anchors() {
    let config = LabelConfig::preset("compact-8x4-fill").unwrap();
    let label = render_label(CODE, LOCATION, &config).unwrap();
    let img = decode(&label.png);

    // Barcode rows are the ones whose ink spans most of the width; the text
    // bands are far narrower (location text ~350 px, code ~90 px).
    let wide_rows: Vec<u32> = (0..img.height())
        .filter(|&y| {
            let dark: Vec<u32> = (0..img.width())
                .filter(|&x| is_dark(img.get_pixel(x, y)))
                .collect();
            match (dark.first(), dark.last()) {
                (Some(first), Some(last)) => last - first > 450,
                _ => false,
            }
        })
        .collect();

    // margin 30 + top_offset 10 + code height 90 + pad 25 = 155;
    // location top = 472 - 30 - 55 = 387, minus pad 25 = 362.
    let top = *wide_rows.first().expect("no barcode rows found");
    let bottom = *wide_rows.last().unwrap() + 1;
    assert_eq!((top, bottom), (155, 362));
    assert_eq!(wide_rows.len() as u32, bottom - top);
}

#[test]
fn test_missing_font_falls_back_and_warns() {
    let mut config = LabelConfig::preset("compact-8x4").unwrap();
    config.font_large_path = Some("/no/such/DejaVuSans-Bold.ttf".into());
    let label = render_label(CODE, LOCATION, &config).unwrap();

    assert_eq!(label.warnings.len(), 1);
    assert!(label.warnings[0].contains("DejaVuSans-Bold.ttf"));
    let img = decode(&label.png);
    assert_eq!((img.width(), img.height()), (945, 472));
}

#[test]
fn test_lowercase_location_renders_with_code39() {
    // The payload is uppercased for the symbology; the render must not
    // reject the original casing.
    let config = LabelConfig::preset("compact-8x4").unwrap();
    let label = render_label(CODE, "p06-c2-a2-g11", &config).unwrap();
    assert!(!label.png.is_empty());
}

#[test]
fn test_code128_preset_accepts_mixed_case() {
    let config = LabelConfig::preset("compact-8x4-128").unwrap();
    let label = render_label(CODE, "Rack-7b", &config).unwrap();
    assert!(!label.png.is_empty());
}

#[test]
fn test_unencodable_location_is_a_hard_failure() {
    let config = LabelConfig::preset("compact-8x4").unwrap();
    let err = render_label(CODE, "P06_!", &config).unwrap_err();
    assert!(matches!(err, LabelError::Encoding(_)));
}

#[test]
fn test_empty_inputs_rejected_before_rendering() {
    assert!(matches!(
        validate_inputs("", LOCATION),
        Err(LabelError::InvalidInput(_))
    ));
    assert!(matches!(
        validate_inputs(CODE, ""),
        Err(LabelError::InvalidInput(_))
    ));
    assert!(validate_inputs(CODE, LOCATION).is_ok());
}

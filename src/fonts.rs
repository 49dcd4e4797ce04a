//! # Font Loading and Text Rasterization
//!
//! Text is measured and rendered through one of two backends:
//!
//! - **TTF** via `ab_glyph`, for fonts configured by path. Produces
//!   anti-aliased coverage.
//! - **Built-in** Spleen 12×24 bitmap font, scaled with nearest-neighbor to
//!   the requested pixel size. Used when no path is configured, or as the
//!   fallback when a configured path cannot be loaded.
//!
//! Loaded TTF fonts live in a process-wide cache: font files never change
//! within a process lifetime, so each path is read and parsed at most once.
//!
//! Both backends rasterize into a grayscale coverage buffer (0 = blank,
//! 255 = full ink) sized exactly to the measured ink box, so the layout
//! planner can place visible ink without caring about bearings.

use ab_glyph::{Font, FontArc, ScaleFont};
use image::{GrayImage, Luma};
use spleen_font::{FONT_12X24, PSF2Font};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

static TTF_CACHE: OnceLock<Mutex<HashMap<PathBuf, FontArc>>> = OnceLock::new();

/// A font usable for label text.
#[derive(Clone)]
pub enum LabelFont {
    /// A TrueType/OpenType font loaded from disk.
    Ttf(FontArc),
    /// The embedded Spleen bitmap font.
    Builtin,
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LabelFont::Ttf(_) => f.write_str("LabelFont::Ttf"),
            LabelFont::Builtin => f.write_str("LabelFont::Builtin"),
        }
    }
}

/// Measured ink box of a text run.
///
/// `x_bearing`/`y_bearing` are the offsets from the nominal line origin
/// (caret at x=0, top of line at y=0) to the ink box. [`rasterize`] bakes
/// them in, so callers position the returned buffer directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextMetrics {
    pub width: u32,
    pub height: u32,
    pub x_bearing: i32,
    pub y_bearing: i32,
}

/// Resolve a font slot: `None` selects the built-in font, a path is loaded
/// through the cache. Load failures degrade to the built-in font and push a
/// warning instead of failing the render.
pub fn load(path: Option<&Path>, warnings: &mut Vec<String>) -> LabelFont {
    let Some(path) = path else {
        return LabelFont::Builtin;
    };

    let cache = TTF_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    if let Some(font) = cache.lock().unwrap().get(path) {
        return LabelFont::Ttf(font.clone());
    }

    let parsed = std::fs::read(path)
        .ok()
        .and_then(|bytes| FontArc::try_from_vec(bytes).ok());
    match parsed {
        Some(font) => {
            cache
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), font.clone());
            LabelFont::Ttf(font)
        }
        None => {
            warnings.push(format!(
                "font '{}' could not be loaded, using the built-in bitmap font",
                path.display()
            ));
            LabelFont::Builtin
        }
    }
}

/// Measure the ink box of `text` at `size_px` without drawing anything.
pub fn measure(font: &LabelFont, text: &str, size_px: f32) -> TextMetrics {
    match font {
        LabelFont::Ttf(ttf) => ttf_layout(ttf, text, size_px).metrics(),
        LabelFont::Builtin => {
            let (cell_w, cell_h) = builtin_cell(size_px);
            let chars = text.chars().count().max(1) as u32;
            TextMetrics {
                width: chars * cell_w,
                height: cell_h,
                x_bearing: 0,
                y_bearing: 0,
            }
        }
    }
}

/// Rasterize `text` into a coverage buffer of exactly the measured size.
pub fn rasterize(font: &LabelFont, text: &str, size_px: f32) -> GrayImage {
    match font {
        LabelFont::Ttf(ttf) => rasterize_ttf(ttf, text, size_px),
        LabelFont::Builtin => rasterize_builtin(text, size_px),
    }
}

// ---------------------------------------------------------------------------
// TTF backend
// ---------------------------------------------------------------------------

struct TtfLayout {
    glyphs: Vec<ab_glyph::Glyph>,
    /// Ink bounds (x0, y0, x1, y1) in line-box coordinates, if any glyph
    /// produced an outline. Whitespace-only runs have none.
    ink: Option<(i32, i32, i32, i32)>,
    advance: f32,
    line_height: f32,
}

impl TtfLayout {
    fn metrics(&self) -> TextMetrics {
        match self.ink {
            Some((x0, y0, x1, y1)) => TextMetrics {
                width: (x1 - x0).max(1) as u32,
                height: (y1 - y0).max(1) as u32,
                x_bearing: x0,
                y_bearing: y0,
            },
            None => TextMetrics {
                width: (self.advance.ceil() as u32).max(1),
                height: (self.line_height.ceil() as u32).max(1),
                x_bearing: 0,
                y_bearing: 0,
            },
        }
    }
}

fn ttf_layout(font: &FontArc, text: &str, size_px: f32) -> TtfLayout {
    let scaled = font.as_scaled(size_px);
    let baseline = scaled.ascent();
    let line_height = scaled.ascent() - scaled.descent();

    let mut glyphs = Vec::new();
    let mut caret = 0.0f32;
    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);
        glyphs.push(glyph_id.with_scale_and_position(size_px, ab_glyph::point(caret, baseline)));
        caret += scaled.h_advance(glyph_id);
    }

    // px_bounds() is already pixel-aligned, so i32 truncation is exact.
    let mut ink: Option<(i32, i32, i32, i32)> = None;
    for glyph in &glyphs {
        if let Some(outlined) = font.outline_glyph(glyph.clone()) {
            let b = outlined.px_bounds();
            let (x0, y0, x1, y1) = (
                b.min.x as i32,
                b.min.y as i32,
                b.max.x as i32,
                b.max.y as i32,
            );
            ink = Some(match ink {
                None => (x0, y0, x1, y1),
                Some((ax0, ay0, ax1, ay1)) => {
                    (ax0.min(x0), ay0.min(y0), ax1.max(x1), ay1.max(y1))
                }
            });
        }
    }

    TtfLayout {
        glyphs,
        ink,
        advance: caret,
        line_height,
    }
}

fn rasterize_ttf(font: &FontArc, text: &str, size_px: f32) -> GrayImage {
    let layout = ttf_layout(font, text, size_px);
    let m = layout.metrics();
    let mut img = GrayImage::new(m.width, m.height);

    for glyph in layout.glyphs {
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                let x = px as i32 + bounds.min.x as i32 - m.x_bearing;
                let y = py as i32 + bounds.min.y as i32 - m.y_bearing;
                if x >= 0 && x < m.width as i32 && y >= 0 && y < m.height as i32 {
                    // Accumulate coverage where glyph boxes overlap (clamped).
                    let pixel = img.get_pixel_mut(x as u32, y as u32);
                    let v = pixel.0[0] as f32 + coverage * 255.0;
                    pixel.0[0] = v.min(255.0) as u8;
                }
            });
        }
    }

    img
}

// ---------------------------------------------------------------------------
// Built-in bitmap backend
// ---------------------------------------------------------------------------

const SPLEEN_W: usize = 12;
const SPLEEN_H: usize = 24;

/// Character cell at the requested size, keeping the 1:2 Spleen aspect.
fn builtin_cell(size_px: f32) -> (u32, u32) {
    let h = (size_px.round().max(8.0)) as u32;
    ((h / 2).max(4), h)
}

fn rasterize_builtin(text: &str, size_px: f32) -> GrayImage {
    let (cell_w, cell_h) = builtin_cell(size_px);
    let chars: Vec<char> = text.chars().collect();
    let mut img = GrayImage::new(cell_w * chars.len().max(1) as u32, cell_h);

    let mut spleen = PSF2Font::new(FONT_12X24).unwrap();
    for (i, ch) in chars.iter().enumerate() {
        let mut src = [0u8; SPLEEN_W * SPLEEN_H];
        let utf8 = ch.to_string();
        if let Some(glyph) = spleen.glyph_for_utf8(utf8.as_bytes()) {
            for (y, row) in glyph.enumerate() {
                for (x, on) in row.enumerate() {
                    if on && y < SPLEEN_H && x < SPLEEN_W {
                        src[y * SPLEEN_W + x] = 255;
                    }
                }
            }
        } else {
            // Unknown char: box outline, same as the glyph-missing case in
            // bitmap terminals.
            draw_box(&mut src);
        }

        // Nearest-neighbor scale into the cell.
        let x_off = i as u32 * cell_w;
        for dy in 0..cell_h {
            for dx in 0..cell_w {
                let sx = (dx as usize * SPLEEN_W) / cell_w as usize;
                let sy = (dy as usize * SPLEEN_H) / cell_h as usize;
                let v = src[sy * SPLEEN_W + sx];
                if v > 0 {
                    img.put_pixel(x_off + dx, dy, Luma([v]));
                }
            }
        }
    }

    img
}

fn draw_box(glyph: &mut [u8; SPLEEN_W * SPLEEN_H]) {
    for x in 0..SPLEEN_W {
        glyph[x] = 255;
        glyph[(SPLEEN_H - 1) * SPLEEN_W + x] = 255;
    }
    for y in 0..SPLEEN_H {
        glyph[y * SPLEEN_W] = 255;
        glyph[y * SPLEEN_W + SPLEEN_W - 1] = 255;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_none_is_builtin_without_warning() {
        let mut warnings = Vec::new();
        let font = load(None, &mut warnings);
        assert!(matches!(font, LabelFont::Builtin));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_load_missing_path_warns_and_falls_back() {
        let mut warnings = Vec::new();
        let font = load(Some(Path::new("/no/such/font.ttf")), &mut warnings);
        assert!(matches!(font, LabelFont::Builtin));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("/no/such/font.ttf"));
    }

    #[test]
    fn test_builtin_measure() {
        let m = measure(&LabelFont::Builtin, "P06", 65.0);
        assert_eq!(m.height, 65);
        assert_eq!(m.width, 3 * 32);
        assert_eq!((m.x_bearing, m.y_bearing), (0, 0));
    }

    #[test]
    fn test_builtin_measure_scales_with_size() {
        let small = measure(&LabelFont::Builtin, "69", 60.0);
        let large = measure(&LabelFont::Builtin, "69", 120.0);
        assert_eq!(large.height, 2 * small.height);
        assert_eq!(large.width, 2 * small.width);
    }

    #[test]
    fn test_builtin_rasterize_has_ink() {
        let img = rasterize(&LabelFont::Builtin, "A", 48.0);
        let m = measure(&LabelFont::Builtin, "A", 48.0);
        assert_eq!((img.width(), img.height()), (m.width, m.height));
        assert!(img.pixels().any(|p| p.0[0] > 0));
    }

    #[test]
    fn test_builtin_unknown_char_draws_box() {
        let img = rasterize(&LabelFont::Builtin, "\u{1F980}", 24.0);
        // Box outline: corners inked, center blank.
        assert!(img.get_pixel(0, 0).0[0] > 0);
        assert_eq!(img.get_pixel(img.width() / 2, img.height() / 2).0[0], 0);
    }
}

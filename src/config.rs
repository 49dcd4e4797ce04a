//! # Label Configuration
//!
//! Physical label geometry, fonts, barcode options, and layout policy.
//!
//! The original warehouse tool shipped six near-identical rendering
//! functions that differed only in canvas size, font sizes, and how the
//! content block was placed. Those variants survive here as named presets
//! over a single [`LabelConfig`] surface.
//!
//! ## Usage
//!
//! ```
//! use etiqueta::config::LabelConfig;
//!
//! let config = LabelConfig::preset("compact-8x4").unwrap();
//! let spec = config.spec();
//! assert_eq!(spec.width_px, 945); // 8 cm at 300 DPI
//! ```

use image::Rgb;
use std::path::PathBuf;

/// Supported linear barcode symbologies.
///
/// Code 39 is encoded without a checksum and forces the payload to
/// uppercase (its character set has no lowercase letters). Code 128 keeps
/// the payload as-is and packs denser bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Symbology {
    #[default]
    Code39,
    Code128,
}

/// Vertical gap between stacked elements under the centered-block policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gap {
    /// The same fixed pixel gap between every pair of elements.
    Fixed(i32),
    /// Leftover safe-area height split evenly across all gaps.
    Distribute,
}

/// Placement policy for the code / barcode / location stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutPolicy {
    /// Stack the elements and center the whole block vertically.
    CenteredBlock { gap: Gap },
    /// Pin the code near the top and the location at the bottom, then
    /// stretch the barcode to exactly fill the span between them. The
    /// stretch is non-uniform: bar widths distort, which scanners tolerate
    /// up to a point but which gets lossy for dense payloads.
    TopBottomFill { top_offset: i32, barcode_pad: i32 },
    /// Stack from the top margin downward with fixed gaps. The block may
    /// run past the bottom edge; nothing guards against that.
    TopAnchored { gap: i32 },
}

/// Direction of the optional quarter-turn applied to the finished label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotateDirection {
    Clockwise,
    /// Matches the original tool, which rotated by a positive (counter-
    /// clockwise) angle for roll printers.
    #[default]
    CounterClockwise,
}

/// Resolved rotation passed to the compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    None,
    Clockwise,
    CounterClockwise,
}

/// Full configuration for one label render.
///
/// Physical dimensions are given in centimeters and converted to pixels
/// through [`LabelConfig::spec`]. Font paths are optional: `None` selects
/// the built-in bitmap font directly, while a path that fails to load falls
/// back to it with a warning.
#[derive(Debug, Clone)]
pub struct LabelConfig {
    pub canvas_width_cm: f32,
    pub canvas_height_cm: f32,
    pub dpi: u32,
    /// Safe-area inset on all four sides.
    pub margin_cm: f32,

    /// Font for the product code.
    pub font_large_path: Option<PathBuf>,
    pub font_large_size: f32,
    /// Font for the location line.
    pub font_small_path: Option<PathBuf>,
    pub font_small_size: f32,

    pub symbology: Symbology,
    /// Width of one barcode module in pixels of the raw raster.
    pub barcode_module_width: u32,
    /// Bar height in pixels of the raw raster.
    pub barcode_module_height: u32,
    /// Blank modules on each side of the bars.
    pub barcode_quiet_zone: u32,
    /// Fraction of the safe width the scaled barcode should occupy.
    /// Clamped to (0, 1] so the bars never leave the safe area.
    pub barcode_width_frac: f32,
    /// Draw the payload under the bars inside the barcode raster. Off by
    /// default since the label already draws the location line itself.
    pub barcode_text: bool,

    pub layout: LayoutPolicy,
    pub rotate_90: bool,
    pub rotate_dir: RotateDirection,

    pub background: Rgb<u8>,
    pub foreground: Rgb<u8>,
}

impl Default for LabelConfig {
    /// The 8×6 cm roll-printer label, rotated for the printer feed.
    fn default() -> Self {
        Self {
            canvas_width_cm: 8.0,
            canvas_height_cm: 6.0,
            dpi: 300,
            margin_cm: 0.25,
            font_large_path: None,
            font_large_size: 120.0,
            font_small_path: None,
            font_small_size: 65.0,
            symbology: Symbology::Code39,
            barcode_module_width: 2,
            barcode_module_height: 94,
            barcode_quiet_zone: 10,
            barcode_width_frac: 0.75,
            barcode_text: false,
            layout: LayoutPolicy::CenteredBlock { gap: Gap::Fixed(30) },
            rotate_90: true,
            rotate_dir: RotateDirection::CounterClockwise,
            background: Rgb([255, 255, 255]),
            foreground: Rgb([0, 0, 0]),
        }
    }
}

impl LabelConfig {
    /// Names of the built-in presets, one per variant of the original tool.
    pub fn presets() -> &'static [&'static str] {
        &[
            "wide-8x6",
            "wide-8x6-flat",
            "wide-8x6-stacked",
            "compact-8x4",
            "compact-8x4-fill",
            "compact-8x4-128",
        ]
    }

    /// Look up a preset by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "wide-8x6" => Some(Self::default()),
            "wide-8x6-flat" => Some(Self {
                rotate_90: false,
                ..Self::default()
            }),
            "wide-8x6-stacked" => Some(Self {
                layout: LayoutPolicy::TopAnchored { gap: 40 },
                rotate_90: false,
                ..Self::default()
            }),
            "compact-8x4" => Some(Self::compact()),
            "compact-8x4-fill" => Some(Self {
                layout: LayoutPolicy::TopBottomFill {
                    top_offset: 10,
                    barcode_pad: 25,
                },
                ..Self::compact()
            }),
            "compact-8x4-128" => Some(Self {
                symbology: Symbology::Code128,
                barcode_quiet_zone: 12,
                barcode_width_frac: 0.9,
                layout: LayoutPolicy::CenteredBlock { gap: Gap::Fixed(24) },
                ..Self::compact()
            }),
            _ => None,
        }
    }

    /// Shared base for the 8×4 cm presets.
    fn compact() -> Self {
        Self {
            canvas_height_cm: 4.0,
            font_large_size: 90.0,
            font_small_size: 55.0,
            rotate_90: false,
            ..Self::default()
        }
    }

    /// Derive the pixel-space canvas from the physical dimensions.
    pub fn spec(&self) -> LabelSpec {
        LabelSpec {
            width_px: cm_to_px(self.canvas_width_cm, self.dpi),
            height_px: cm_to_px(self.canvas_height_cm, self.dpi),
            margin_px: cm_to_px(self.margin_cm, self.dpi),
            dpi: self.dpi,
            background: self.background,
            foreground: self.foreground,
        }
    }

    /// Resolve the rotation the compositor should apply.
    pub fn rotation(&self) -> Rotation {
        if !self.rotate_90 {
            Rotation::None
        } else {
            match self.rotate_dir {
                RotateDirection::Clockwise => Rotation::Clockwise,
                RotateDirection::CounterClockwise => Rotation::CounterClockwise,
            }
        }
    }
}

/// Pixel-space canvas description, derived once per render.
#[derive(Debug, Clone, Copy)]
pub struct LabelSpec {
    pub width_px: u32,
    pub height_px: u32,
    pub margin_px: u32,
    pub dpi: u32,
    pub background: Rgb<u8>,
    pub foreground: Rgb<u8>,
}

impl LabelSpec {
    /// Canvas width minus both margins.
    pub fn safe_width(&self) -> u32 {
        self.width_px.saturating_sub(2 * self.margin_px)
    }

    /// Canvas height minus both margins.
    pub fn safe_height(&self) -> u32 {
        self.height_px.saturating_sub(2 * self.margin_px)
    }
}

/// Convert centimeters to pixels at the given resolution.
fn cm_to_px(cm: f32, dpi: u32) -> u32 {
    (cm / 2.54 * dpi as f32).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cm_to_px() {
        assert_eq!(cm_to_px(8.0, 300), 945);
        assert_eq!(cm_to_px(4.0, 300), 472);
        assert_eq!(cm_to_px(6.0, 300), 709);
        assert_eq!(cm_to_px(0.25, 300), 30);
    }

    #[test]
    fn test_spec_dimensions() {
        let spec = LabelConfig::preset("compact-8x4").unwrap().spec();
        assert_eq!((spec.width_px, spec.height_px), (945, 472));
        assert_eq!(spec.margin_px, 30);
        assert_eq!(spec.safe_width(), 885);
        assert_eq!(spec.safe_height(), 412);
    }

    #[test]
    fn test_all_presets_resolve() {
        for name in LabelConfig::presets() {
            assert!(LabelConfig::preset(name).is_some(), "missing preset {name}");
        }
        assert!(LabelConfig::preset("no-such-label").is_none());
    }

    #[test]
    fn test_rotation_resolution() {
        let mut config = LabelConfig::default();
        assert_eq!(config.rotation(), Rotation::CounterClockwise);
        config.rotate_dir = RotateDirection::Clockwise;
        assert_eq!(config.rotation(), Rotation::Clockwise);
        config.rotate_90 = false;
        assert_eq!(config.rotation(), Rotation::None);
    }

    #[test]
    fn test_fill_preset_uses_fill_policy() {
        let config = LabelConfig::preset("compact-8x4-fill").unwrap();
        assert!(matches!(config.layout, LayoutPolicy::TopBottomFill { .. }));
    }
}

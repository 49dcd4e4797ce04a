//! # Layout Planner
//!
//! Second pipeline stage: turn measured element sizes into absolute
//! positions on the canvas. Pure arithmetic, no drawing.
//!
//! The planner never validates that the block fits. A block taller than the
//! canvas renders clipped or overlapping; that is the accepted behavior,
//! not an error. Horizontal centering truncates toward zero, so an odd
//! leftover leaves the extra pixel on the right.

use crate::config::{Gap, LabelSpec, LayoutPolicy};
use crate::metrics::MeasuredLabel;

/// Which measured element a planned position refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Code,
    Barcode,
    Location,
}

/// One element with its top-left ink position.
#[derive(Debug, Clone, Copy)]
pub struct PlannedItem {
    pub kind: ElementKind,
    pub x: i32,
    pub y: i32,
}

/// Placement of all elements plus the barcode's final raster size.
#[derive(Debug, Clone)]
pub struct LayoutPlan {
    /// Draw order: code, barcode, location.
    pub items: Vec<PlannedItem>,
    /// Final barcode size. Aspect-preserving except under the fill policy,
    /// which sets the height independently.
    pub barcode_size: (u32, u32),
    pub block_height: i32,
}

/// Compute the placement for the measured elements under one policy.
pub fn plan(measured: &MeasuredLabel, spec: &LabelSpec, policy: &LayoutPolicy) -> LayoutPlan {
    let canvas_w = spec.width_px as i32;
    let canvas_h = spec.height_px as i32;
    let margin = spec.margin_px as i32;

    let code_w = measured.code.width();
    let code_h = measured.code.height() as i32;
    let loc_w = measured.location.width();
    let loc_h = measured.location.height() as i32;
    let bar_w = measured.barcode.scaled_width;
    let bar_h = measured.barcode.scaled_height as i32;

    match *policy {
        LayoutPolicy::CenteredBlock { gap } => {
            let content = code_h + bar_h + loc_h;
            let gap_px = match gap {
                Gap::Fixed(g) => g,
                // Spread the leftover safe height across both gaps. A block
                // taller than the safe area yields a negative gap and the
                // elements overlap, consistent with the no-fit-check rule.
                Gap::Distribute => (spec.safe_height() as i32 - content) / 2,
            };
            let block_height = content + 2 * gap_px;
            let mut y = (canvas_h - block_height) / 2;

            let mut items = Vec::with_capacity(3);
            items.push(PlannedItem {
                kind: ElementKind::Code,
                x: center_x(canvas_w, code_w),
                y,
            });
            y += code_h + gap_px;
            items.push(PlannedItem {
                kind: ElementKind::Barcode,
                x: center_x(canvas_w, bar_w),
                y,
            });
            y += bar_h + gap_px;
            items.push(PlannedItem {
                kind: ElementKind::Location,
                x: center_x(canvas_w, loc_w),
                y,
            });

            LayoutPlan {
                items,
                barcode_size: (bar_w, bar_h.max(1) as u32),
                block_height,
            }
        }

        LayoutPolicy::TopBottomFill {
            top_offset,
            barcode_pad,
        } => {
            let code_y = margin + top_offset;
            let loc_y = canvas_h - margin - loc_h;
            let span_top = code_y + code_h + barcode_pad;
            let span_bottom = loc_y - barcode_pad;
            let fill_h = (span_bottom - span_top).max(1);

            let items = vec![
                PlannedItem {
                    kind: ElementKind::Code,
                    x: center_x(canvas_w, code_w),
                    y: code_y,
                },
                PlannedItem {
                    kind: ElementKind::Barcode,
                    x: center_x(canvas_w, bar_w),
                    y: span_top,
                },
                PlannedItem {
                    kind: ElementKind::Location,
                    x: center_x(canvas_w, loc_w),
                    y: loc_y,
                },
            ];

            LayoutPlan {
                items,
                barcode_size: (bar_w, fill_h as u32),
                block_height: (loc_y + loc_h) - code_y,
            }
        }

        LayoutPolicy::TopAnchored { gap } => {
            let mut y = margin;
            let mut items = Vec::with_capacity(3);
            items.push(PlannedItem {
                kind: ElementKind::Code,
                x: center_x(canvas_w, code_w),
                y,
            });
            y += code_h + gap;
            items.push(PlannedItem {
                kind: ElementKind::Barcode,
                x: center_x(canvas_w, bar_w),
                y,
            });
            y += bar_h + gap;
            items.push(PlannedItem {
                kind: ElementKind::Location,
                x: center_x(canvas_w, loc_w),
                y,
            });

            LayoutPlan {
                items,
                barcode_size: (bar_w, bar_h.max(1) as u32),
                block_height: code_h + gap + bar_h + gap + loc_h,
            }
        }
    }
}

/// Integer-truncating horizontal centering.
fn center_x(canvas_w: i32, element_w: u32) -> i32 {
    (canvas_w - element_w as i32) / 2
}

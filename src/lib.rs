//! # Etiqueta - Warehouse Label Generator
//!
//! Etiqueta renders printable shelf labels for warehouse inventory: a
//! product code in large type, a scannable barcode for the storage
//! location, and the location text, composed onto a fixed-size canvas and
//! serialized as PNG.
//!
//! ## Quick Start
//!
//! ```no_run
//! use etiqueta::{LabelConfig, render_label, suggested_filename};
//!
//! let config = LabelConfig::preset("compact-8x4").unwrap();
//! let label = render_label("11522", "P06-C2-A2-G11", &config)?;
//!
//! for warning in &label.warnings {
//!     eprintln!("warning: {warning}");
//! }
//! std::fs::write(suggested_filename("11522", "P06-C2-A2-G11"), &label.png)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Label geometry, fonts, barcode options, presets |
//! | [`fonts`] | Font loading and text rasterization |
//! | [`barcode`] | Code 39 / Code 128 encoding |
//! | [`metrics`] | Element measurement (stage 1) |
//! | [`layout`] | Placement planning (stage 2) |
//! | [`compose`] | Canvas compositing and PNG encoding (stage 3) |
//! | [`render`] | The `render_label` pipeline |
//! | [`server`] | Web form UI |
//! | [`error`] | Error types |
//!
//! ## Rendering pipeline
//!
//! Each render runs three pure stages in sequence: the metrics resolver
//! measures text ink boxes and the raw barcode, the layout planner computes
//! absolute positions under the configured policy, and the compositor
//! draws, rotates, and encodes. Nothing is shared between calls beyond the
//! process-wide read-only font cache, so renders are freely concurrent.

pub mod barcode;
pub mod compose;
pub mod config;
pub mod error;
pub mod fonts;
pub mod layout;
pub mod metrics;
pub mod render;
pub mod server;

// Re-exports for convenience
pub use compose::RenderedLabel;
pub use config::LabelConfig;
pub use error::LabelError;
pub use render::{render_label, suggested_filename};

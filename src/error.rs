//! # Error Types
//!
//! This module defines error types used throughout the etiqueta library.
//!
//! Font problems are deliberately absent here: a missing font file degrades
//! to the built-in bitmap font and is reported as a warning string on the
//! rendered result, never as an error.

use thiserror::Error;

/// Main error type for etiqueta operations
#[derive(Debug, Error)]
pub enum LabelError {
    /// Barcode symbology rejected the payload
    #[error("Barcode encoding error: {0}")]
    Encoding(String),

    /// Image processing or PNG serialization error
    #[error("Image error: {0}")]
    Image(String),

    /// Input rejected before rendering (empty field, unknown preset)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

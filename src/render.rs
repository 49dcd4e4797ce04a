//! # Label Rendering Pipeline
//!
//! Wires the three stages together behind a single stateless operation:
//! measure, plan, composite. Every call allocates its own buffers, so
//! concurrent renders need no locking.
//!
//! Input validation is the caller's job: the web form and the CLI reject
//! empty fields through [`validate_inputs`] before invoking the pipeline,
//! which assumes non-empty strings.

use crate::compose::{self, RenderedLabel};
use crate::config::LabelConfig;
use crate::error::LabelError;
use crate::{layout, metrics};

/// Render a label PNG for a product code and storage location.
///
/// ## Example
///
/// ```no_run
/// use etiqueta::{LabelConfig, render_label};
///
/// let config = LabelConfig::preset("compact-8x4").unwrap();
/// let label = render_label("11522", "P06-C2-A2-G11", &config)?;
/// std::fs::write("label.png", &label.png)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn render_label(
    product_code: &str,
    location: &str,
    config: &LabelConfig,
) -> Result<RenderedLabel, LabelError> {
    let spec = config.spec();
    let measured = metrics::resolve(product_code, location, config, &spec)?;
    let plan = layout::plan(&measured, &spec, &config.layout);
    compose::compose(&measured, &plan, &spec, config.rotation())
}

/// Boundary check used by the web form and the CLI: both fields must carry
/// visible text before the pipeline runs.
pub fn validate_inputs(product_code: &str, location: &str) -> Result<(), LabelError> {
    if product_code.trim().is_empty() {
        return Err(LabelError::InvalidInput(
            "product code must not be empty".to_string(),
        ));
    }
    if location.trim().is_empty() {
        return Err(LabelError::InvalidInput(
            "location must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Download filename for a rendered label. Path separators in either field
/// are replaced so the name stays a plain filename.
pub fn suggested_filename(product_code: &str, location: &str) -> String {
    format!(
        "etiqueta_{}_{}.png",
        sanitize(product_code),
        sanitize(location)
    )
}

fn sanitize(field: &str) -> String {
    field.replace(['/', '\\'], "-")
}

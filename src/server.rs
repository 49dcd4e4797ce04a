//! # HTTP Server for Label Generation
//!
//! Provides the web form for generating warehouse labels.
//!
//! ## Usage
//!
//! ```bash
//! etiqueta serve --listen 0.0.0.0:8080
//! ```
//!
//! Then open http://localhost:8080 in a browser. The form posts to
//! `/label`, which responds with the PNG as a download; `/label.png`
//! renders the same label inline for the preview image.
//!
//! Rendering is CPU-bound, so handlers push it onto the blocking pool.
//! The server holds no state between requests: the browser keeps the last
//! rendered image, the core keeps nothing.

use axum::{
    Form, Json, Router,
    extract::Query,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;

use crate::config::LabelConfig;
use crate::error::LabelError;
use crate::render::{render_label, suggested_filename, validate_inputs};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
}

/// Label request from the form or the preview query string.
#[derive(Debug, Deserialize)]
pub struct LabelRequest {
    /// Product code (required)
    pub code: String,
    /// Storage location (required)
    pub location: String,
    /// Preset name; empty or missing selects the default label
    #[serde(default)]
    pub preset: Option<String>,
    /// Checkbox value overriding the preset's rotation
    #[serde(default)]
    pub rotate: Option<String>,
}

/// Start the HTTP server.
pub async fn serve(config: ServerConfig) -> Result<(), LabelError> {
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/label.png", get(preview_handler))
        .route("/label", post(download_handler))
        .route("/api/presets", get(presets_handler));

    println!("[server] Listening on {}", config.listen_addr);
    println!(
        "[server] Open http://{}/ in your browser to generate labels",
        config.listen_addr
    );

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Handle GET / - return the HTML form.
async fn index_handler() -> Html<&'static str> {
    Html(HTML_FORM)
}

/// Handle GET /label.png - inline render for the preview image.
async fn preview_handler(
    Query(request): Query<LabelRequest>,
) -> Result<Response, (StatusCode, String)> {
    render_response(request, false).await
}

/// Handle POST /label - render and return as a download.
async fn download_handler(
    Form(request): Form<LabelRequest>,
) -> Result<Response, (StatusCode, Json<serde_json::Value>)> {
    render_response(request, true).await.map_err(|(status, error)| {
        (
            status,
            Json(serde_json::json!({"success": false, "error": error})),
        )
    })
}

/// GET /api/presets - List the preset names.
async fn presets_handler() -> Json<Vec<&'static str>> {
    Json(LabelConfig::presets().to_vec())
}

/// Shared render path for both endpoints.
async fn render_response(
    request: LabelRequest,
    attachment: bool,
) -> Result<Response, (StatusCode, String)> {
    validate_inputs(&request.code, &request.location)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let config = build_config(&request)?;

    let code = request.code.clone();
    let location = request.location.clone();
    let label = tokio::task::spawn_blocking(move || render_label(&code, &location, &config))
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Task error: {e}"),
            )
        })?
        .map_err(|e| (error_status(&e), e.to_string()))?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));
    if !label.warnings.is_empty() {
        if let Ok(value) = HeaderValue::from_str(&label.warnings.join("; ")) {
            headers.insert("x-label-warnings", value);
        }
    }
    if attachment {
        let filename = suggested_filename(&request.code, &request.location);
        if let Ok(value) = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\"")) {
            headers.insert(header::CONTENT_DISPOSITION, value);
        }
    }

    Ok((headers, label.png).into_response())
}

/// Resolve the request's preset and rotation override.
fn build_config(request: &LabelRequest) -> Result<LabelConfig, (StatusCode, String)> {
    let mut config = match request.preset.as_deref() {
        None | Some("") => LabelConfig::default(),
        Some(name) => LabelConfig::preset(name).ok_or((
            StatusCode::BAD_REQUEST,
            format!("Unknown preset '{name}'"),
        ))?,
    };
    if let Some(value) = &request.rotate {
        config.rotate_90 = matches!(value.as_str(), "on" | "true" | "1");
    }
    Ok(config)
}

/// Input-shaped failures are the client's fault; the rest are ours.
fn error_status(error: &LabelError) -> StatusCode {
    match error {
        LabelError::Encoding(_) | LabelError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// HTML form for generating labels.
const HTML_FORM: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Etiqueta - Warehouse Labels</title>
    <style>
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body {
        font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Arial, sans-serif;
        background: #2d3748;
        min-height: 100vh;
        display: flex;
        align-items: center;
        justify-content: center;
        padding: 20px;
    }
    .container {
        background: white;
        border-radius: 12px;
        max-width: 560px;
        width: 100%;
        padding: 32px;
    }
    h1 { color: #2d3748; font-size: 28px; margin-bottom: 4px; }
    .subtitle { color: #718096; font-size: 15px; margin-bottom: 24px; }
    .form-group { margin-bottom: 18px; }
    label {
        display: block;
        color: #4a5568;
        font-weight: 600;
        margin-bottom: 6px;
        font-size: 13px;
        text-transform: uppercase;
    }
    input[type="text"], select {
        width: 100%;
        padding: 10px 14px;
        border: 2px solid #e2e8f0;
        border-radius: 6px;
        font-size: 16px;
    }
    input[type="text"]:focus, select:focus { outline: none; border-color: #4a5568; }
    .hint { color: #a0aec0; font-size: 12px; margin-top: 4px; }
    .checkbox-row { display: flex; align-items: center; gap: 8px; color: #4a5568; }
    button {
        background: #2d3748;
        color: white;
        border: none;
        padding: 12px 28px;
        font-size: 16px;
        font-weight: 600;
        border-radius: 6px;
        cursor: pointer;
        width: 100%;
    }
    button:hover { background: #4a5568; }
    .preview { margin-top: 20px; text-align: center; }
    .preview img {
        max-width: 100%;
        border: 1px solid #e2e8f0;
        border-radius: 6px;
    }
    </style>
</head>
<body>
    <div class="container">
        <h1>Etiqueta</h1>
        <p class="subtitle">Warehouse shelf labels with location barcodes</p>

        <form id="label-form" method="POST" action="/label">
            <div class="form-group">
                <label for="code">Product code *</label>
                <input type="text" id="code" name="code" required placeholder="e.g. 11522">
            </div>

            <div class="form-group">
                <label for="location">Location *</label>
                <input type="text" id="location" name="location" required placeholder="e.g. P06-C2-A2-G11">
                <p class="hint">Encoded in the barcode. Code 39 labels uppercase it automatically.</p>
            </div>

            <div class="form-group">
                <label for="preset">Label preset</label>
                <select id="preset" name="preset">
                    <option value="wide-8x6">wide-8x6 (8&times;6 cm, rotated)</option>
                    <option value="wide-8x6-flat">wide-8x6-flat</option>
                    <option value="wide-8x6-stacked">wide-8x6-stacked</option>
                    <option value="compact-8x4">compact-8x4 (8&times;4 cm)</option>
                    <option value="compact-8x4-fill">compact-8x4-fill</option>
                    <option value="compact-8x4-128">compact-8x4-128 (Code 128)</option>
                </select>
            </div>

            <div class="form-group checkbox-row">
                <input type="checkbox" id="rotate" name="rotate">
                <label for="rotate" style="margin: 0">Rotate 90&deg; for roll printers</label>
            </div>

            <button type="submit">Download label</button>
        </form>

        <div class="preview">
            <img id="preview-img" alt="" hidden>
        </div>
    </div>

    <script>
    // Live preview: mirror the form into /label.png whenever it changes.
    const form = document.getElementById('label-form');
    const img = document.getElementById('preview-img');
    form.addEventListener('input', () => {
        const data = new FormData(form);
        if (!data.get('code') || !data.get('location')) return;
        img.src = '/label.png?' + new URLSearchParams(data).toString();
        img.hidden = false;
    });
    </script>
</body>
</html>"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn request(preset: Option<&str>, rotate: Option<&str>) -> LabelRequest {
        LabelRequest {
            code: "69".to_string(),
            location: "P06".to_string(),
            preset: preset.map(String::from),
            rotate: rotate.map(String::from),
        }
    }

    #[test]
    fn test_build_config_default_preset() {
        let config = build_config(&request(None, None)).unwrap();
        assert!(config.rotate_90);
    }

    #[test]
    fn test_build_config_unknown_preset() {
        let err = build_config(&request(Some("nope"), None)).unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_build_config_rotate_override() {
        let config = build_config(&request(Some("compact-8x4"), Some("on"))).unwrap();
        assert!(config.rotate_90);
        let config = build_config(&request(None, Some("off"))).unwrap();
        assert!(!config.rotate_90);
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            error_status(&LabelError::Encoding("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&LabelError::Image("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

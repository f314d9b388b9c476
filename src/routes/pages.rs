use crate::app::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

const INDEX_PAGE: &str = "index.html";
const MESSAGE_PAGE: &str = "message.html";
const ERROR_PAGE: &str = "error.html";

pub async fn index(State(state): State<AppState>) -> Response {
    send_html(&state.cfg.base_dir, INDEX_PAGE, StatusCode::OK).await
}

pub async fn message(State(state): State<AppState>) -> Response {
    send_html(&state.cfg.base_dir, MESSAGE_PAGE, StatusCode::OK).await
}

pub async fn static_file(State(state): State<AppState>, uri: Uri) -> Response {
    let base_dir = &state.cfg.base_dir;

    let Some(path) = resolve(base_dir, uri.path()) else {
        debug!(path = uri.path(), "Rejected static path");
        return send_html(base_dir, ERROR_PAGE, StatusCode::NOT_FOUND).await;
    };

    let is_file = fs::metadata(&path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);
    if !is_file {
        return send_html(base_dir, ERROR_PAGE, StatusCode::NOT_FOUND).await;
    }

    let content_type = mime_guess::from_path(&path)
        .first_raw()
        .unwrap_or("text/plain");

    match fs::read(&path).await {
        Ok(bytes) => (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], bytes).into_response(),
        Err(e) => internal_err(e).into_response(),
    }
}

async fn send_html(base_dir: &Path, page: &str, status: StatusCode) -> Response {
    match fs::read(base_dir.join(page)).await {
        Ok(bytes) => (status, [(header::CONTENT_TYPE, "text/html")], bytes).into_response(),
        Err(e) => internal_err(e).into_response(),
    }
}

// Hidden files (.env, temp writes) are never served.
fn resolve(base_dir: &Path, request_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(request_path).decode_utf8().ok()?;
    let relative = Path::new(decoded.trim_start_matches('/'));

    let mut path = base_dir.to_path_buf();
    let mut depth = 0;
    for component in relative.components() {
        match component {
            Component::Normal(part) if part.to_string_lossy().starts_with('.') => return None,
            Component::Normal(part) => {
                path.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            _ => return None,
        }
    }
    (depth > 0).then_some(path)
}

fn internal_err<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    warn!(error = %e, "Internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal Server Error".to_string(),
    )
}

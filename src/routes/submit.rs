use crate::app::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{error, info, warn};

pub async fn submit(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let declared = match content_length(&headers) {
        Ok(len) => len,
        Err(rejection) => return rejection.into_response(),
    };
    if declared != body.len() {
        warn!(declared, received = body.len(), "Content-Length does not match body");
        return (StatusCode::BAD_REQUEST, "Content-Length does not match body").into_response();
    }

    match state.relay.send(&body).await {
        Ok(()) => {
            info!(bytes = body.len(), relay = state.relay.target(), "Submission relayed");
            (StatusCode::FOUND, [(header::LOCATION, "/message")]).into_response()
        }
        Err(e) => {
            error!(error = %e, "Error sending data to relay");
            (StatusCode::NOT_FOUND, [(header::LOCATION, "/error")]).into_response()
        }
    }
}

fn content_length(headers: &HeaderMap) -> Result<usize, (StatusCode, &'static str)> {
    let Some(value) = headers.get(header::CONTENT_LENGTH) else {
        warn!("POST without Content-Length");
        return Err((StatusCode::LENGTH_REQUIRED, "Content-Length required"));
    };

    value
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .ok_or_else(|| {
            warn!(?value, "Malformed Content-Length");
            (StatusCode::BAD_REQUEST, "Invalid Content-Length")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn content_length_parses_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("24"));
        assert_eq!(content_length(&headers), Ok(24));
    }

    #[test]
    fn content_length_missing_or_malformed() {
        let headers = HeaderMap::new();
        assert_eq!(content_length(&headers).unwrap_err().0, StatusCode::LENGTH_REQUIRED);

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("lots"));
        assert_eq!(content_length(&headers).unwrap_err().0, StatusCode::BAD_REQUEST);
    }
}

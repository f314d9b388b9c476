use crate::config::Config;
use crate::relay::RelayClient;
use crate::routes::{pages, submit};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub relay: RelayClient,
}

pub fn build_router(cfg: Config, relay: RelayClient) -> Router {
    let state = AppState { cfg, relay };

    Router::new()
        .route("/", get(pages::index).post(submit::submit))
        .route("/message", get(pages::message).post(submit::submit))
        .fallback(fallback)
        // oversized bodies fail at the relay, not here
        .layer(DefaultBodyLimit::disable())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

async fn fallback(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match method {
        Method::GET => pages::static_file(State(state), uri).await,
        Method::POST => submit::submit(State(state), headers, body).await,
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

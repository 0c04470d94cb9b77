pub mod detect;
pub mod index;

use axum::http::header::{self, InvalidHeaderValue};
use axum::http::HeaderValue;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::request_id;
use crate::response::panic_response;
use crate::state::AppState;

/// Full application router. CORS sits inside the request-id, trace and nosniff
/// layers so preflight responses carry the same headers as everything else.
pub fn build_router(state: AppState) -> Result<Router, InvalidHeaderValue> {
    let cors = build_cors_layer(&state.config().cors_origin)?;

    Ok(Router::new()
        .merge(index::router())
        .merge(detect::router())
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .with_state(state))
}

pub fn build_cors_layer(origin: &str) -> Result<CorsLayer, InvalidHeaderValue> {
    if origin.trim() == "*" {
        // 通配符与 credentials 互斥
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_credentials(false)
            .allow_headers(Any)
            .allow_methods(Any));
    }

    let origin = origin.trim().parse::<HeaderValue>()?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_methods(Any))
}

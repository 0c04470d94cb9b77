use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use crate::constants::SERVICE_MESSAGE;
use crate::response::message;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

pub async fn index() -> impl IntoResponse {
    message(SERVICE_MESSAGE)
}

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};

use crate::constants::NO_FACE_MESSAGE;
use crate::response::{AppError, ErrorBody};
use crate::state::AppState;
use crate::vision::frame::Frame;
use crate::vision::{analyze, DetectionResult};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/detect", post(detect))
        // 上传图片不限制大小
        .layer(DefaultBodyLimit::disable())
}

/// Body is the raw encoded image; Content-Type is not checked.
async fn detect(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let frame = Arc::new(Frame::decode(&body)?);
    tracing::debug!(
        bytes = body.len(),
        width = frame.width(),
        height = frame.height(),
        "Image decoded"
    );

    let faces = state.landmarks().detect(frame.clone()).await?;

    match analyze(&frame, &faces, state.topology())? {
        DetectionResult::NoFace => {
            tracing::info!("No face detected");
            Ok((StatusCode::OK, Json(ErrorBody::new(NO_FACE_MESSAGE))).into_response())
        }
        DetectionResult::Verdict(verdict) => {
            tracing::info!(
                drowsy = verdict.drowsy,
                confidence = verdict.confidence,
                "Drowsiness verdict"
            );
            Ok((StatusCode::OK, Json(verdict)).into_response())
        }
    }
}

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::constants::INVALID_IMAGE_MESSAGE;
use crate::pool::PoolError;
use crate::vision::ear::EarError;
use crate::vision::frame::FrameError;

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: &str) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    /// Extra context for the server log only.
    pub detail: Option<String>,
    pub is_operational: bool,
}

impl AppError {
    pub fn bad_request(message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.to_string(),
            detail: None,
            is_operational: true,
        }
    }

    pub fn internal(message: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.to_string(),
            detail: None,
            is_operational: false,
        }
    }

    pub fn with_detail(mut self, detail: String) -> Self {
        self.detail = Some(detail);
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let detail = self.detail.as_deref().unwrap_or("");
        if self.is_operational {
            tracing::warn!(status = %self.status, error = %self.message, detail, "API error");
        } else {
            tracing::error!(status = %self.status, error = %self.message, detail, "Internal API error");
        }

        // 内部错误的原始信息同样返回给调用方，便于客户端排查
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

// 解码失败是客户端输入问题，统一返回固定文案；具体原因只写日志
impl From<FrameError> for AppError {
    fn from(value: FrameError) -> Self {
        AppError::bad_request(INVALID_IMAGE_MESSAGE).with_detail(value.to_string())
    }
}

impl From<PoolError> for AppError {
    fn from(value: PoolError) -> Self {
        AppError::internal(&value.to_string()).with_detail(format!("{value:?}"))
    }
}

impl From<EarError> for AppError {
    fn from(value: EarError) -> Self {
        AppError::internal(&value.to_string()).with_detail(format!("{value:?}"))
    }
}

pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

/// Renders a handler panic caught by `CatchPanicLayer` as a JSON 500.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    AppError::internal(&panic_message(payload.as_ref())).into_response()
}

pub fn message(text: &str) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(MessageBody {
            message: text.to_string(),
        }),
    )
}

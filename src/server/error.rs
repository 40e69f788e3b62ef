//! HTTP 层的错误响应。

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::RadarError;

/// 不暴露上游错误信息时使用的通用提示。
const GENERIC_ERROR_MESSAGE: &str = "Internal server error";

/// 一个已经决定了状态码和对外信息的错误响应。
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

/// API 错误响应体
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl ApiError {
    /// 400 响应。
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// 把库错误映射为 HTTP 响应。
    ///
    /// # 参数
    /// * `err` - 库错误。
    /// * `expose_upstream` - 为 `false` 时，500 响应只返回通用提示，原始信息只写入日志。
    pub fn from_radar(err: RadarError, expose_upstream: bool) -> Self {
        match err {
            RadarError::Validation(msg) => Self::bad_request(msg),
            RadarError::NotFound(msg) => Self {
                status: StatusCode::NOT_FOUND,
                message: msg,
            },
            other => {
                tracing::error!("请求处理失败 (上游: {}): {}", other.is_upstream(), other);
                let message = if expose_upstream {
                    other.to_string()
                } else {
                    GENERIC_ERROR_MESSAGE.to_string()
                };
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message,
                }
            }
        }
    }

    /// 响应状态码。
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

/// API 处理函数的结果类型
pub type ApiResult<T> = std::result::Result<T, ApiError>;

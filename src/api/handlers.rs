use super::auth::authorize;
use super::AppState;
use crate::error::ReportError;
use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

/// 错误响应体
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Value,
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            ReportError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "unauthorized".to_string(), Value::String(msg))
            }
            ReportError::MissingApiKey => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "MONDAY_API_KEY missing".to_string(),
                Value::String("set MONDAY_API_KEY for this deployment".to_string()),
            ),
            ReportError::Config(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "configuration error".to_string(),
                Value::String(msg),
            ),
            ReportError::Upstream { message, details } => {
                let details = if details.is_null() {
                    Value::String(message)
                } else {
                    details
                };
                (StatusCode::INTERNAL_SERVER_ERROR, "Monday API error".to_string(), details)
            }
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Monday API error".to_string(),
                Value::String(other.to_string()),
            ),
        };

        (status, Json(ErrorResponse { error, details })).into_response()
    }
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 看板报表接口 (GET / POST)
pub async fn board_report(State(state): State<AppState>, headers: HeaderMap) -> Response {
    // 配置错误优先于鉴权，均在调用上游之前返回
    let Some(service) = state.service.as_ref() else {
        tracing::error!("MONDAY_API_KEY is not configured");
        return ReportError::MissingApiKey.into_response();
    };

    if let Err(e) = authorize(&headers, state.client_secret.as_deref()) {
        tracing::warn!("Rejected report request: {}", e);
        return e.into_response();
    }

    match service.build_report().await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => {
            tracing::error!("Report failed: {}", e);
            e.into_response()
        }
    }
}

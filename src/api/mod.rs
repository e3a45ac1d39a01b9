pub mod auth;
pub mod handlers;

pub use handlers::{board_report, health_check, ErrorResponse};

use crate::service::ReportService;
use axum::http::{header, HeaderName, Method};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

/// 共享状态
#[derive(Clone)]
pub struct AppState {
    /// 未配置 MONDAY_API_KEY 时为空，请求直接返回 500
    pub service: Option<Arc<ReportService>>,
    pub client_secret: Option<Arc<str>>,
}

/// 任意来源，GET/POST/OPTIONS；OPTIONS 预检由 CorsLayer 直接返回 200
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(auth::API_KEY_HEADER),
        ])
}

/// 构建路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/monday", get(board_report).post(board_report))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(cors_layer()))
}

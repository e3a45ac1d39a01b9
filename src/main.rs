use monday_board_report::api::{self, AppState};
use monday_board_report::{AppConfig, MondayClient, ReportError, ReportService};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 本地时间格式，RUST_LOG 可覆盖级别
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::from_env()?;
    info!("Starting server with config: {:?}", config);

    // 创建报表服务 (缺少 API key 时照常启动，请求返回 500)
    let service = match MondayClient::from_config(&config.monday) {
        Ok(client) => Some(Arc::new(ReportService::new(client, config.board.clone()))),
        Err(ReportError::MissingApiKey) => {
            warn!("MONDAY_API_KEY is not set, report requests will fail");
            None
        }
        Err(e) => return Err(e.into()),
    };

    if config.monday.client_secret.is_none() {
        warn!("MONDAY_CLIENT_SECRET is not set, the report endpoint is open");
    }

    let state = AppState {
        service,
        client_secret: config.monday.client_secret.as_deref().map(Arc::from),
    };
    let app = api::router(state);

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET|POST /api/monday - board report (B2C / B2B / Other)");
    info!("  GET      /health");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

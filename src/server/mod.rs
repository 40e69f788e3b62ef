//! HTTP 服务
//!
//! 基于 axum 的只读 JSON 接口，外加一个简单的股票代码表。

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowMethods, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::{PodcastRadar, config::RadarConfig, error::Result, stocks::StockRepository};

pub mod error;
mod handlers;
pub mod state;

pub use state::AppState;

/// 构建包含全部路由的 `Router`。
///
/// # 参数
/// * `state` - 共享状态。
/// * `cors_origins` - 允许跨域的来源，`None` 表示允许任意来源。
pub fn create_router(state: AppState, cors_origins: Option<&[String]>) -> Router {
    Router::new()
        .route("/", get(handlers::welcome))
        .route("/search-podcast", get(handlers::search_podcast))
        .route("/podcast-episodes", get(handlers::podcast_episodes))
        .route(
            "/podcast-episodes-by-title",
            get(handlers::podcast_episodes_by_title),
        )
        .route("/podcast-sentiment", get(handlers::podcast_sentiment))
        .route("/youtube-buzz", get(handlers::youtube_buzz))
        .route("/stocks", get(handlers::list_stocks))
        .route("/add-stock", post(handlers::add_stock))
        .with_state(state)
        .layer(build_cors(cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn build_cors(origins: Option<&[String]>) -> CorsLayer {
    if let Some(origins) = origins {
        let list = origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s.trim()).ok())
            .collect::<Vec<_>>();
        if !list.is_empty() {
            return CorsLayer::new()
                .allow_origin(list)
                .allow_methods(AllowMethods::any())
                .allow_headers(Any);
        }
        warn!("RADAR_CORS_ORIGINS 中没有合法的来源，回退为允许任意来源。");
    }
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(AllowMethods::any())
        .allow_headers(Any)
}

/// 按配置启动 HTTP 服务，直到收到 Ctrl-C。
pub async fn run_server(config: RadarConfig) -> Result<()> {
    let radar = PodcastRadar::from_config(&config)?;
    let stocks = StockRepository::connect(&config.database_url).await?;
    let state = AppState::new(radar, stocks, config.expose_upstream_errors);

    let app = create_router(state, config.cors_origins.as_deref());

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("[Main] Podcast Radar 正在监听 http://{}/", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("[Main] 服务已停止。");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("无法监听 Ctrl-C 信号: {}", e);
        std::future::pending::<()>().await;
    }
    info!("[Main] 收到关闭信号，正在停止...");
}

use anyhow::Context;
use podcast_radar::{config::RadarConfig, server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,podcast_radar=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RadarConfig::from_env().context("加载配置失败")?;
    server::run_server(config).await.context("服务异常退出")?;
    Ok(())
}

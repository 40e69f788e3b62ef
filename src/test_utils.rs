//! 测试共用的辅助函数。

use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// 安装输出到测试捕获器的日志订阅者，重复调用无副作用。
pub(crate) fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,podcast_radar=debug"));
    let _ = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

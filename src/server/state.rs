use std::sync::Arc;

use crate::{PodcastRadar, stocks::StockRepository};

/// 所有处理函数共享的状态。
#[derive(Clone)]
pub struct AppState {
    /// 上游聚合客户端。
    pub radar: Arc<PodcastRadar>,
    /// 股票代码仓库。
    pub stocks: StockRepository,
    /// 500 响应中是否包含原始错误信息。
    pub expose_upstream_errors: bool,
}

impl AppState {
    /// 创建共享状态。
    pub fn new(radar: PodcastRadar, stocks: StockRepository, expose_upstream_errors: bool) -> Self {
        Self {
            radar: Arc::new(radar),
            stocks,
            expose_upstream_errors,
        }
    }
}

//! 搜索模块
//!
//! 节目搜索的聚合流水线：按语言过滤 → 按单集数降序排序 → 截断 → 投影。

use std::cmp::Reverse;

use tracing::{debug, info};

use crate::{error::Result, model::show::Show, providers::CatalogProvider};

pub mod matcher;
pub mod mentions;

/// 流水线最终返回的节目数量上限。
pub const MAX_RESULTS: usize = 25;

/// 默认保留的语言标签。
pub const DEFAULT_TARGET_LANGUAGES: [&str; 2] = ["en", "en-US"];

/// 对候选节目执行过滤、排序和截断。
///
/// # 参数
/// * `candidates` - 上游顺序的原始候选列表。
/// * `target_languages` - 目标语言集合，节目的语言标签与其有交集才会保留。
///
/// # 返回
/// 最多 `MAX_RESULTS` 个节目，按 `episode_total` 降序排列；
/// 单集数相同的节目保持上游的相对顺序。没有节目通过过滤时返回空列表。
pub fn rank_shows(candidates: Vec<Show>, target_languages: &[String]) -> Vec<Show> {
    let total = candidates.len();

    let mut shows: Vec<Show> = candidates
        .into_iter()
        .filter(|show| show.speaks_any(target_languages))
        .collect();
    let matched = shows.len();

    // `sort_by_key` 是稳定排序
    shows.sort_by_key(|show| Reverse(show.episode_total));
    shows.truncate(MAX_RESULTS);

    debug!(
        "候选 {} 个，语言匹配 {} 个，保留 {} 个。",
        total,
        matched,
        shows.len()
    );
    shows
}

/// 在目录中搜索节目并执行聚合流水线。
///
/// # 参数
/// * `provider` - 目录提供商。
/// * `query` - 搜索关键词。
/// * `raw_limit` - 向上游请求的原始候选数量。
/// * `target_languages` - 目标语言集合。
pub async fn search_shows(
    provider: &dyn CatalogProvider,
    query: &str,
    raw_limit: u32,
    target_languages: &[String],
) -> Result<Vec<Show>> {
    info!(
        "开始搜索节目 '{}' (提供商: {}, 原始候选上限: {})",
        query,
        provider.name(),
        raw_limit
    );

    let candidates = provider.search_shows(query, raw_limit).await?;
    let shows = rank_shows(candidates, target_languages);

    info!("节目 '{}' 搜索完毕，返回 {} 个结果。", query, shows.len());
    Ok(shows)
}

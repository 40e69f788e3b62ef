#![warn(missing_docs)]

//! # Podcast Radar
//!
//! 一个播客发现聚合后端：从播客目录、讨论平台和视频平台拉取数据，
//! 整理成精简的结构后通过 HTTP 接口提供。
//!
//! ## 主要功能
//!
//! - **节目搜索**: 在 Spotify 中搜索节目，按语言过滤并按单集数排序。
//! - **单集列表**: 按节目 ID 或节目标题列出单集。
//! - **讨论提及**: 在 Reddit 上收集节目名称的近期提及。
//! - **视频热度**: 汇总 YouTube 频道最近视频的评论数。
//!
//! ## 使用示例
//!
//! ```rust,no_run
//! use podcast_radar::{PodcastRadar, config::RadarConfig};
//!
//! async {
//!     let config = RadarConfig::from_env().unwrap();
//!     let radar = PodcastRadar::from_config(&config).unwrap();
//!
//!     match radar.search_podcasts("radio").await {
//!         Ok(shows) => println!("找到 {} 个节目。", shows.len()),
//!         Err(e) => eprintln!("搜索失败: {}", e),
//!     }
//! };
//! ```
pub mod buzz;
pub mod config;
pub mod error;
pub mod model;
pub mod providers;
pub mod search;
pub mod server;
pub mod stocks;

#[cfg(test)]
mod test_utils;

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

pub use crate::error::{RadarError, Result};

use crate::{
    config::RadarConfig,
    model::{
        mention::SentimentReport,
        show::{Episode, Show, ShowEpisode},
        video::BuzzReport,
    },
    providers::{
        CatalogProvider, DiscussionProvider, VideoProvider, reddit::RedditClient,
        spotify::SpotifyClient, youtube::YoutubeClient,
    },
};

/// 向目录请求的原始候选节目数量。
pub const SEARCH_RAW_LIMIT: u32 = 50;
/// 单集列表的数量上限。
pub const EPISODE_LIMIT: u32 = 50;
/// 讨论平台每个来源扫描的条目数量。
pub const MENTION_SCAN_LIMIT: u32 = 100;
/// 提及搜索的默认回溯天数。
pub const DEFAULT_DAYS_BACK: u32 = 30;
/// 热度报告默认统计的视频数量。
pub const DEFAULT_BUZZ_LIMIT: u32 = 5;

const HTTP_USER_AGENT: &str = concat!("podcast-radar/", env!("CARGO_PKG_VERSION"));

// ==========================================================
//  顶层 API
// ==========================================================

/// 顶层聚合客户端，封装了三个上游平台，为 HTTP 层提供统一的接口。
///
/// 所有上游客户端共享同一个 `reqwest::Client`，因此共享连接池和超时设置。
pub struct PodcastRadar {
    catalog: Arc<dyn CatalogProvider>,
    discussion: Arc<dyn DiscussionProvider>,
    videos: Arc<dyn VideoProvider>,
    target_languages: Vec<String>,
}

impl PodcastRadar {
    /// 根据配置创建真实的上游客户端。
    ///
    /// # 返回
    /// HTTP 客户端无法构建时返回 `RadarError::Reqwest`。
    pub fn from_config(config: &RadarConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .user_agent(HTTP_USER_AGENT)
            .build()?;

        let catalog = SpotifyClient::new(http_client.clone(), &config.spotify, config.token_policy);
        let discussion =
            RedditClient::new(http_client.clone(), &config.reddit, config.token_policy);
        let videos = YoutubeClient::new(http_client, &config.youtube);

        info!(
            "[Main] 上游客户端初始化完成 (令牌策略: {:?}, 超时: {:?})",
            config.token_policy, config.upstream_timeout
        );

        Ok(Self::with_providers(
            Arc::new(catalog),
            Arc::new(discussion),
            Arc::new(videos),
            config.target_languages.clone(),
        ))
    }

    /// 使用给定的提供商实例创建聚合客户端。
    pub fn with_providers(
        catalog: Arc<dyn CatalogProvider>,
        discussion: Arc<dyn DiscussionProvider>,
        videos: Arc<dyn VideoProvider>,
        target_languages: Vec<String>,
    ) -> Self {
        Self {
            catalog,
            discussion,
            videos,
            target_languages,
        }
    }

    /// 搜索节目，返回按单集数降序排列的英语节目。
    pub async fn search_podcasts(&self, query: &str) -> Result<Vec<Show>> {
        search::search_shows(
            self.catalog.as_ref(),
            query,
            SEARCH_RAW_LIMIT,
            &self.target_languages,
        )
        .await
    }

    /// 按节目 ID 列出单集。未知的 ID 返回空列表。
    pub async fn episodes_by_show_id(&self, show_id: &str) -> Result<Vec<Episode>> {
        self.catalog.list_episodes(show_id, EPISODE_LIMIT).await
    }

    /// 按节目标题列出单集，每个单集都带上解析出的节目名称。
    ///
    /// # 返回
    /// 标题无法解析为任何节目时返回 `RadarError::NotFound`。
    pub async fn episodes_by_title(&self, title: &str) -> Result<Vec<ShowEpisode>> {
        let Some(show) = self.catalog.find_show_by_title(title).await? else {
            return Err(RadarError::not_found(format!(
                "No podcast found with title '{title}'"
            )));
        };

        info!("[Main] 标题 '{}' 解析为节目 {} ({})", title, show.name, show.id);

        let episodes = self.catalog.list_episodes(&show.id, EPISODE_LIMIT).await?;
        Ok(episodes
            .into_iter()
            .map(|episode| ShowEpisode {
                show_name: show.name.clone(),
                episode,
            })
            .collect())
    }

    /// 收集节目名称在讨论平台上的近期提及。
    pub async fn podcast_sentiment(&self, podcast: &str, days_back: u32) -> Result<SentimentReport> {
        let mentions = search::mentions::find_mentions(
            self.discussion.as_ref(),
            podcast,
            days_back,
            MENTION_SCAN_LIMIT,
            Utc::now(),
        )
        .await?;

        Ok(SentimentReport {
            podcast: podcast.to_string(),
            days_lookback: days_back,
            mention_count: mentions.len(),
            mentions,
        })
    }

    /// 汇总视频频道最近视频的评论热度。
    pub async fn youtube_buzz(&self, channel_query: &str, max_results: u32) -> Result<BuzzReport> {
        buzz::get_buzz(self.videos.as_ref(), channel_query, max_results).await
    }
}

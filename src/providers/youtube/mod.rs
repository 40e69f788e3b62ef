//! 此模块实现了与 YouTube Data API v3 进行交互的 `VideoProvider`。

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::{
    config::YoutubeConfig,
    error::{RadarError, Result},
    model::video::VideoStat,
    providers::{VideoProvider, join_url, read_json},
};

pub mod models;

/// Data API v3 根地址。
pub const API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

const SERVICE: &str = "YouTube";
/// 上游单页允许的最大条目数。
const MAX_PAGE_SIZE: u32 = 50;

/// YouTube 客户端，使用 API key 鉴权。
pub struct YoutubeClient {
    http_client: Client,
    api_base_url: String,
    api_key: String,
}

impl YoutubeClient {
    /// 创建一个新的 `YoutubeClient` 实例。
    pub fn new(http_client: Client, config: &YoutubeConfig) -> Self {
        Self {
            http_client,
            api_base_url: config.api_base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<reqwest::Response> {
        let response = self
            .http_client
            .get(join_url(&self.api_base_url, path))
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;
        Ok(response)
    }
}

/// 把上游的视频对象转换为 `VideoStat`。
fn to_video_stat(video: models::Video) -> Result<VideoStat> {
    let comment_count = match video.statistics.and_then(|s| s.comment_count) {
        Some(raw) => raw.parse::<u64>().map_err(|e| {
            RadarError::upstream(format!(
                "YouTube 返回的视频 {} 评论数 '{raw}' 无法解析: {e}",
                video.id
            ))
        })?,
        None => 0,
    };

    Ok(VideoStat {
        title: video.snippet.title,
        video_id: video.id,
        published_at: video.snippet.published_at,
        comment_count,
    })
}

/// 按请求的 ID 顺序重新排列统计结果，丢弃上游未返回的视频。
fn order_by_ids(video_ids: &[String], stats: Vec<VideoStat>) -> Vec<VideoStat> {
    let mut by_id: HashMap<String, VideoStat> = stats
        .into_iter()
        .map(|stat| (stat.video_id.clone(), stat))
        .collect();
    video_ids.iter().filter_map(|id| by_id.remove(id)).collect()
}

#[async_trait]
impl VideoProvider for YoutubeClient {
    fn name(&self) -> &'static str {
        "youtube"
    }

    async fn find_channel_id(&self, query: &str) -> Result<Option<String>> {
        info!("[YouTube] 搜索频道: '{}'", query);

        let params = [
            ("part", "snippet".to_string()),
            ("q", query.to_string()),
            ("type", "channel".to_string()),
            ("maxResults", "1".to_string()),
        ];
        let response = self.get("search", &params).await?;
        let resp: models::SearchListResponse = read_json(response, SERVICE).await?;

        let channel_id = resp
            .items
            .first()
            .and_then(|item| item.channel_id())
            .map(String::from);
        debug!("[YouTube] 频道 '{}' 解析为 {:?}", query, channel_id);
        Ok(channel_id)
    }

    async fn latest_video_ids(&self, channel_id: &str, max_results: u32) -> Result<Vec<String>> {
        info!(
            "[YouTube] 获取频道 {} 最新的 {} 个视频",
            channel_id, max_results
        );

        let params = [
            ("part", "snippet".to_string()),
            ("channelId", channel_id.to_string()),
            ("order", "date".to_string()),
            ("maxResults", max_results.clamp(1, MAX_PAGE_SIZE).to_string()),
            ("type", "video".to_string()),
        ];
        let response = self.get("search", &params).await?;
        let resp: models::SearchListResponse = read_json(response, SERVICE).await?;

        let ids: Vec<String> = resp
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect();
        Ok(ids)
    }

    async fn video_stats(&self, video_ids: &[String]) -> Result<Vec<VideoStat>> {
        if video_ids.is_empty() {
            return Ok(vec![]);
        }

        info!("[YouTube] 批量获取 {} 个视频的统计信息", video_ids.len());

        let params = [
            ("part", "statistics,snippet".to_string()),
            ("id", video_ids.join(",")),
        ];
        let response = self.get("videos", &params).await?;
        let resp: models::VideoListResponse = read_json(response, SERVICE).await?;

        let stats = resp
            .items
            .into_iter()
            .map(to_video_stat)
            .collect::<Result<Vec<_>>>()?;

        let ordered = order_by_ids(video_ids, stats);
        if ordered.len() < video_ids.len() {
            warn!(
                "[YouTube] 请求了 {} 个视频，只返回了 {} 个的统计信息。",
                video_ids.len(),
                ordered.len()
            );
        }
        Ok(ordered)
    }
}

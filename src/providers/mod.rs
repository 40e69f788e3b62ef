//! 提供商模块
//!
//! 该模块定义了与各个上游平台进行交互的核心抽象。
//! 每个平台一个 trait，流水线只依赖这些 trait，测试时可以注入模拟实现。

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::{
    error::{RadarError, Result},
    model::{
        mention::{Comment, Submission},
        show::{Episode, Show},
        video::VideoStat,
    },
};

pub mod reddit;
pub mod spotify;
pub mod token;
pub mod youtube;

/// 错误信息中保留的上游响应体最大字符数。
const ERROR_BODY_PREVIEW_CHARS: usize = 200;

/// 播客目录服务需要实现的接口。
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// 返回提供商的唯一名称。
    fn name(&self) -> &'static str;

    ///
    /// 按关键词搜索节目。
    ///
    /// # 参数
    /// * `query` - 搜索关键词。
    /// * `limit` - 向上游请求的原始结果数量上限，并不等于最终返回给调用方的数量。
    ///
    /// # 返回
    /// 上游顺序的节目列表。非 2xx 或数据缺少必要字段时返回 `RadarError::Upstream`。
    ///
    async fn search_shows(&self, query: &str, limit: u32) -> Result<Vec<Show>>;

    ///
    /// 列出某档节目的单集。
    ///
    /// # 参数
    /// * `show_id` - 非空的节目 ID。未知的 ID 返回空列表而不是错误。
    /// * `limit` - 单集数量上限。
    ///
    async fn list_episodes(&self, show_id: &str, limit: u32) -> Result<Vec<Episode>>;

    ///
    /// 按标题查找节目，以 `limit=1` 搜索并取第一条结果。
    ///
    /// # 返回
    /// * `Ok(Some(show))` - 找到节目。
    /// * `Ok(None)` - 搜索结果为空。
    /// * `Err(_)` - 查询本身失败。
    ///
    async fn find_show_by_title(&self, title: &str) -> Result<Option<Show>> {
        Ok(self.search_shows(title, 1).await?.into_iter().next())
    }
}

/// 讨论平台需要实现的接口。
#[async_trait]
pub trait DiscussionProvider: Send + Sync {
    /// 返回提供商的唯一名称。
    fn name(&self) -> &'static str;

    ///
    /// 在全站索引中按关键词搜索最近一个月内的帖子，按时间从新到旧排列。
    ///
    /// # 参数
    /// * `phrase` - 搜索关键词。
    /// * `limit` - 帖子数量上限。
    ///
    async fn search_submissions(&self, phrase: &str, limit: u32) -> Result<Vec<Submission>>;

    ///
    /// 获取全站最新的评论流，不按话题过滤。
    ///
    /// # 参数
    /// * `limit` - 评论数量上限。
    ///
    async fn recent_comments(&self, limit: u32) -> Result<Vec<Comment>>;
}

/// 视频平台需要实现的接口。
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// 返回提供商的唯一名称。
    fn name(&self) -> &'static str;

    ///
    /// 按名称搜索频道，返回第一个匹配项的频道 ID。
    ///
    async fn find_channel_id(&self, query: &str) -> Result<Option<String>>;

    ///
    /// 列出频道最新发布的视频 ID，按发布时间从新到旧排列。
    ///
    async fn latest_video_ids(&self, channel_id: &str, max_results: u32) -> Result<Vec<String>>;

    ///
    /// 一次性批量获取给定视频的统计信息。
    ///
    /// 缺少评论数统计的视频按 0 计。
    ///
    async fn video_stats(&self, video_ids: &[String]) -> Result<Vec<VideoStat>>;
}

/// 检查上游响应的状态码并把响应体解析为 `T`。
///
/// 非 2xx 响应和无法解析的响应体都会被转换为 `RadarError::Upstream`。
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    service: &str,
) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(RadarError::upstream(format!(
            "{service} 返回 HTTP {status}: {}",
            preview(&body)
        )));
    }

    serde_json::from_str(&body)
        .map_err(|e| RadarError::upstream(format!("{service} 返回的数据格式异常: {e}")))
}

/// 截取响应体开头的一部分，用于错误信息。
pub(crate) fn preview(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() > ERROR_BODY_PREVIEW_CHARS {
        let head: String = trimmed.chars().take(ERROR_BODY_PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        trimmed.to_string()
    }
}

/// 拼接 API 根地址与路径，容忍根地址末尾多余的 `/`。
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

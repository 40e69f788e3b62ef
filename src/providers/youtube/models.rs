//! 此模块定义了所有用于反序列化 YouTube Data API v3 响应的数据结构。

use serde::Deserialize;

// =================================================================
// 搜索接口 (`/search`) 的模型
// =================================================================

/// 搜索 API 的顶层响应。
#[derive(Debug, Deserialize)]
pub struct SearchListResponse {
    /// 搜索结果，没有结果时上游可能省略该字段。
    #[serde(default)]
    pub items: Vec<SearchResult>,
}

/// 单条搜索结果。
#[derive(Debug, Deserialize)]
pub struct SearchResult {
    /// 资源标识。
    pub id: ResourceId,
    /// 摘要信息。
    #[serde(default)]
    pub snippet: Option<SearchSnippet>,
}

/// 搜索结果指向的资源。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    /// 视频结果的 ID。
    pub video_id: Option<String>,
    /// 频道结果的 ID。
    pub channel_id: Option<String>,
}

/// 搜索结果的摘要。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnippet {
    /// 发布者频道 ID。
    pub channel_id: Option<String>,
}

impl SearchResult {
    /// 取出频道 ID，优先使用摘要中的值。
    pub fn channel_id(&self) -> Option<&str> {
        self.snippet
            .as_ref()
            .and_then(|s| s.channel_id.as_deref())
            .or(self.id.channel_id.as_deref())
    }
}

// =================================================================
// 视频接口 (`/videos`) 的模型
// =================================================================

/// 视频 API 的顶层响应。
#[derive(Debug, Deserialize)]
pub struct VideoListResponse {
    /// 视频列表。
    #[serde(default)]
    pub items: Vec<Video>,
}

/// 单个视频。
#[derive(Debug, Deserialize)]
pub struct Video {
    /// 视频 ID。
    pub id: String,
    /// 摘要信息。
    #[serde(default)]
    pub snippet: VideoSnippet,
    /// 统计信息，部分视频关闭了统计。
    #[serde(default)]
    pub statistics: Option<VideoStatistics>,
}

/// 视频摘要。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    /// 标题。
    #[serde(default)]
    pub title: String,
    /// 发布时间。
    #[serde(default)]
    pub published_at: String,
}

/// 视频统计。YouTube 以字符串形式返回计数。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    /// 评论数，关闭评论的视频没有该字段。
    pub comment_count: Option<String>,
}

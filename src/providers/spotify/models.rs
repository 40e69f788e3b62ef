//! 此模块定义了所有用于反序列化 Spotify Web API 响应的 `struct` 数据结构。

use serde::Deserialize;

use crate::model::show::{Episode, Show};

// =================================================================
// 搜索接口 (`/v1/search?type=show`) 的模型
// =================================================================

/// 搜索 API 的顶层响应结构。
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    /// 节目搜索结果的分页容器。
    pub shows: Paging<SimplifiedShow>,
}

/// Spotify 通用的分页容器。
///
/// 上游偶尔会在 `items` 中返回 `null`，因此每一项都是 `Option`。
#[derive(Debug, Deserialize)]
pub struct Paging<T> {
    /// 当前页的条目。
    pub items: Vec<Option<T>>,
}

/// 图片对象，只关心 URL。
#[derive(Debug, Deserialize)]
pub struct Image {
    /// 图片链接。
    pub url: String,
}

/// 外部链接对象。
#[derive(Debug, Default, Deserialize)]
pub struct ExternalUrls {
    /// Spotify 网页端链接。
    pub spotify: Option<String>,
}

/// 搜索结果中的节目对象。
#[derive(Debug, Deserialize)]
pub struct SimplifiedShow {
    /// 节目 ID。
    pub id: String,
    /// 节目名称。
    pub name: String,
    /// 发行方。
    #[serde(default)]
    pub publisher: String,
    /// 简介。
    #[serde(default)]
    pub description: String,
    /// 封面图片，从大到小排列。
    #[serde(default)]
    pub images: Vec<Image>,
    /// 外部链接。
    #[serde(default)]
    pub external_urls: ExternalUrls,
    /// 单集总数。
    #[serde(default)]
    pub total_episodes: u32,
    /// 语言标签。
    #[serde(default)]
    pub languages: Vec<String>,
}

impl From<SimplifiedShow> for Show {
    fn from(show: SimplifiedShow) -> Self {
        Self {
            id: show.id,
            name: show.name,
            publisher: show.publisher,
            description: show.description,
            image: show.images.into_iter().next().map(|i| i.url),
            external_url: show.external_urls.spotify.unwrap_or_default(),
            episode_total: show.total_episodes,
            languages: show.languages,
        }
    }
}

// =================================================================
// 单集接口 (`/v1/shows/{id}/episodes`) 的模型
// =================================================================

/// 节目单集列表中的单集对象。
#[derive(Debug, Deserialize)]
pub struct SimplifiedEpisode {
    /// 单集标题。
    pub name: String,
    /// 简介。
    #[serde(default)]
    pub description: String,
    /// 发布日期。
    #[serde(default)]
    pub release_date: String,
    /// 时长（毫秒）。
    #[serde(default)]
    pub duration_ms: u64,
    /// 外部链接。
    #[serde(default)]
    pub external_urls: ExternalUrls,
    /// 试听音频链接。
    pub audio_preview_url: Option<String>,
    /// 封面图片。
    #[serde(default)]
    pub images: Vec<Image>,
}

impl From<SimplifiedEpisode> for Episode {
    fn from(episode: SimplifiedEpisode) -> Self {
        Self {
            name: episode.name,
            description: episode.description,
            release_date: episode.release_date,
            duration_ms: episode.duration_ms,
            external_url: episode.external_urls.spotify.unwrap_or_default(),
            audio_preview_url: episode.audio_preview_url,
            image: episode.images.into_iter().next().map(|i| i.url),
        }
    }
}

// =================================================================
// 错误响应的模型
// =================================================================

/// 非 2xx 响应的错误体，例如 `{"error": {"status": 400, "message": "invalid id"}}`。
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    /// 错误对象。
    pub error: ErrorObject,
}

/// 错误对象。
#[derive(Debug, Deserialize)]
pub struct ErrorObject {
    /// 上游给出的错误描述。
    #[serde(default)]
    pub message: String,
}

impl ErrorResponse {
    /// 错误是否表示 ID 格式非法（如 "invalid id"、"Invalid base62 id"）。
    pub fn is_invalid_id(&self) -> bool {
        let message = self.error.message.to_ascii_lowercase();
        message.contains("invalid") && message.contains("id")
    }
}

//! 定义了播客节目与单集的投影结构。

use serde::{Deserialize, Serialize};

/// 代表目录服务中的一档播客节目。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    /// 目录分配的唯一 ID。
    pub id: String,
    /// 节目名称。
    pub name: String,
    /// 发行方。
    pub publisher: String,
    /// 节目简介。
    pub description: String,
    /// 封面图片列表中的第一张。
    pub image: Option<String>,
    /// 节目在目录网页端的链接。
    pub external_url: String,
    /// 节目的单集总数。
    pub episode_total: u32,
    /// 节目声明的语言标签，可能为空。
    pub languages: Vec<String>,
}

impl Show {
    /// 节目的语言标签是否与目标集合有交集。
    pub fn speaks_any(&self, target_languages: &[String]) -> bool {
        self.languages
            .iter()
            .any(|language| target_languages.contains(language))
    }
}

/// 代表某档节目下的一个单集。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// 单集标题。
    pub name: String,
    /// 单集简介。
    pub description: String,
    /// 发布日期，保留上游的日期字符串。
    pub release_date: String,
    /// 时长（毫秒）。
    pub duration_ms: u64,
    /// 单集在目录网页端的链接。
    pub external_url: String,
    /// 试听音频链接。
    pub audio_preview_url: Option<String>,
    /// 封面图片。
    pub image: Option<String>,
}

/// 通过节目标题查询单集时返回的条目，额外携带解析出的节目名称。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowEpisode {
    /// 解析出的节目名称。
    pub show_name: String,
    /// 单集本身的字段。
    #[serde(flatten)]
    pub episode: Episode,
}

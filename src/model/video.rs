//! 定义了视频平台热度报告的结构。

use serde::{Deserialize, Serialize};

/// 单个视频的统计信息。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoStat {
    /// 视频标题。
    pub title: String,
    /// 视频 ID。
    pub video_id: String,
    /// 发布时间，保留上游的 ISO 8601 字符串。
    pub published_at: String,
    /// 评论数，上游未提供时为 0。
    pub comment_count: u64,
}

/// 某个频道最近视频的评论热度汇总。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuzzReport {
    /// 调用方传入的频道名称。
    pub channel_name: String,
    /// 解析出的频道 ID。
    pub channel_id: String,
    /// 视频数量。
    pub video_count: usize,
    /// 所有视频评论数之和。
    pub total_comment_count: u64,
    /// 按发布时间从新到旧排列的视频。
    pub videos: Vec<VideoStat>,
}

impl BuzzReport {
    /// 由视频列表汇总出报告。
    pub fn new(channel_name: String, channel_id: String, videos: Vec<VideoStat>) -> Self {
        Self {
            channel_name,
            channel_id,
            video_count: videos.len(),
            total_comment_count: videos.iter().map(|v| v.comment_count).sum(),
            videos,
        }
    }
}

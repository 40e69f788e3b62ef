//! 视频平台上的评论热度汇总。

use tracing::{info, warn};

use crate::{
    error::{RadarError, Result},
    model::video::BuzzReport,
    providers::VideoProvider,
};

/// 汇总某个频道最近视频的评论数。
///
/// 流程为三步：按名称解析频道 ID，列出最新的视频 ID，再批量获取统计信息。
///
/// # 参数
/// * `provider` - 视频平台。
/// * `channel_query` - 频道名称。
/// * `max_results` - 最多统计的视频数量。
///
/// # 返回
/// 找不到频道时返回 `RadarError::NotFound`，且不会发起后续请求。
/// 频道存在但没有视频时返回空报告。
pub async fn get_buzz(
    provider: &dyn VideoProvider,
    channel_query: &str,
    max_results: u32,
) -> Result<BuzzReport> {
    if channel_query.trim().is_empty() {
        return Err(RadarError::validation("频道名称不能为空"));
    }

    let Some(channel_id) = provider.find_channel_id(channel_query).await? else {
        warn!("未找到频道 '{}'", channel_query);
        return Err(RadarError::not_found(format!(
            "No channel found for '{channel_query}'"
        )));
    };

    let video_ids = provider.latest_video_ids(&channel_id, max_results).await?;
    let videos = provider.video_stats(&video_ids).await?;

    let report = BuzzReport::new(channel_query.to_string(), channel_id, videos);
    info!(
        "频道 '{}' ({}) 最近 {} 个视频共有 {} 条评论。",
        report.channel_name, report.channel_id, report.video_count, report.total_comment_count
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::{model::video::VideoStat, test_utils::init_tracing};

    #[derive(Default)]
    struct MockVideos {
        channel_id: Option<String>,
        stats: Vec<VideoStat>,
        list_calls: AtomicUsize,
        stats_calls: AtomicUsize,
    }

    #[async_trait]
    impl VideoProvider for MockVideos {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn find_channel_id(&self, _query: &str) -> Result<Option<String>> {
            Ok(self.channel_id.clone())
        }

        async fn latest_video_ids(&self, _channel_id: &str, max_results: u32) -> Result<Vec<String>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .stats
                .iter()
                .take(max_results as usize)
                .map(|s| s.video_id.clone())
                .collect())
        }

        async fn video_stats(&self, video_ids: &[String]) -> Result<Vec<VideoStat>> {
            self.stats_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .stats
                .iter()
                .filter(|s| video_ids.contains(&s.video_id))
                .cloned()
                .collect())
        }
    }

    fn stat(id: &str, comment_count: u64) -> VideoStat {
        VideoStat {
            title: format!("Video {id}"),
            video_id: id.to_string(),
            published_at: "2024-05-01T10:00:00Z".to_string(),
            comment_count,
        }
    }

    #[tokio::test]
    async fn test_report_sums_comments() {
        init_tracing();
        let provider = MockVideos {
            channel_id: Some("UC123".to_string()),
            stats: vec![
                stat("v1", 10),
                stat("v2", 0),
                stat("v3", 5),
                stat("v4", 7),
                stat("v5", 3),
                stat("v6", 100),
            ],
            ..Default::default()
        };

        let report = get_buzz(&provider, "Serial", 5).await.unwrap();

        assert_eq!(report.channel_name, "Serial");
        assert_eq!(report.channel_id, "UC123");
        assert_eq!(report.video_count, 5);
        assert_eq!(report.total_comment_count, 25);
        assert_eq!(report.videos[0].video_id, "v1");
    }

    #[tokio::test]
    async fn test_unknown_channel_is_not_found() {
        init_tracing();
        let provider = MockVideos::default();

        let err = get_buzz(&provider, "nonexistent channel", 5).await.unwrap_err();

        assert!(matches!(err, RadarError::NotFound(_)));
        assert_eq!(err.to_string(), "No channel found for 'nonexistent channel'");
        assert_eq!(provider.list_calls.load(Ordering::SeqCst), 0);
        assert_eq!(provider.stats_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_channel_without_videos_is_empty_report() {
        init_tracing();
        let provider = MockVideos {
            channel_id: Some("UCempty".to_string()),
            ..Default::default()
        };

        let report = get_buzz(&provider, "Quiet", 5).await.unwrap();

        assert_eq!(report.video_count, 0);
        assert_eq!(report.total_comment_count, 0);
        assert!(report.videos.is_empty());
    }
}

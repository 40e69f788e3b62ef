//! 在讨论平台上收集某个短语的近期提及。

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info};

use crate::{
    error::{RadarError, Result},
    model::mention::Mention,
    providers::DiscussionProvider,
    search::matcher::PhraseMatcher,
};

/// 收集 `phrase` 在最近 `days_back` 天内的提及。
///
/// 帖子来自全站搜索，同时匹配标题和正文；评论来自全站最新评论流，只匹配正文。
/// 创建时间早于 `now - days_back` 的条目会被丢弃，恰好等于截止时间的条目保留。
///
/// # 参数
/// * `provider` - 讨论平台。
/// * `phrase` - 目标短语，不能为空白。
/// * `days_back` - 回溯天数。
/// * `limit` - 每个来源向上游请求的条目数量。
/// * `now` - 当前时间，由调用方传入以便测试。
///
/// # 返回
/// 先帖子后评论，每组内部保持上游顺序。
pub async fn find_mentions(
    provider: &dyn DiscussionProvider,
    phrase: &str,
    days_back: u32,
    limit: u32,
    now: DateTime<Utc>,
) -> Result<Vec<Mention>> {
    if phrase.trim().is_empty() {
        return Err(RadarError::validation("搜索短语不能为空"));
    }

    let matcher = PhraseMatcher::new(phrase);
    let cutoff = cutoff_timestamp(now, days_back);

    info!(
        "开始收集 '{}' 的提及 (提供商: {}, 回溯 {} 天)",
        phrase,
        provider.name(),
        days_back
    );

    let submissions = provider.search_submissions(phrase, limit).await?;
    let comments = provider.recent_comments(limit).await?;
    let scanned = submissions.len() + comments.len();

    let mut mentions: Vec<Mention> = submissions
        .into_iter()
        .filter(|s| s.created_at >= cutoff)
        .filter(|s| matcher.matches_any(&[s.title.as_str(), s.body.as_str()]))
        .map(Mention::from)
        .collect();
    let submission_hits = mentions.len();

    mentions.extend(
        comments
            .into_iter()
            .filter(|c| c.created_at >= cutoff)
            .filter(|c| matcher.matches(&c.body))
            .map(Mention::from),
    );

    debug!(
        "扫描 {} 条，命中帖子 {} 条，命中评论 {} 条。",
        scanned,
        submission_hits,
        mentions.len() - submission_hits
    );
    Ok(mentions)
}

/// 计算 `now - days_back` 的 Unix 时间戳。
///
/// 回溯天数超出 chrono 可表示的时间范围时不设下限。
fn cutoff_timestamp(now: DateTime<Utc>, days_back: u32) -> i64 {
    TimeDelta::try_days(i64::from(days_back))
        .and_then(|delta| now.checked_sub_signed(delta))
        .map_or(i64::MIN, |cutoff| cutoff.timestamp())
}

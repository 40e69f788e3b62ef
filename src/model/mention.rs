//! 定义了讨论平台上的候选内容与提及结果。

use serde::{Deserialize, Serialize};

/// 作者账号已删除或不可见时使用的占位名。
pub const DELETED_AUTHOR: &str = "[deleted]";

/// 讨论平台全站搜索返回的一条帖子。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    /// 所在社区。
    pub community: String,
    /// 帖子标题。
    pub title: String,
    /// 帖子正文，链接帖为空字符串。
    pub body: String,
    /// 作者。
    pub author: String,
    /// 创建时间（Unix 时间戳，秒）。
    pub created_at: i64,
    /// 帖子的完整链接。
    pub permalink: Option<String>,
}

/// 讨论平台全站最新评论流中的一条评论。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    /// 所在社区。
    pub community: String,
    /// 评论正文。
    pub body: String,
    /// 作者。
    pub author: String,
    /// 创建时间（Unix 时间戳，秒）。
    pub created_at: i64,
    /// 评论的完整链接，上游未提供时为 `None`。
    pub permalink: Option<String>,
}

/// 提及的来源类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionKind {
    /// 帖子。
    Submission,
    /// 评论。
    Comment,
}

/// 一条命中目标短语的提及。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    /// 来源类型。
    pub kind: MentionKind,
    /// 所在社区。
    pub source_community: String,
    /// 帖子标题或评论正文。
    pub text: String,
    /// 作者。
    pub author: String,
    /// 创建时间（Unix 时间戳，秒）。
    pub created_at: i64,
    /// 完整链接。
    pub permalink: Option<String>,
}

impl From<Submission> for Mention {
    fn from(submission: Submission) -> Self {
        Self {
            kind: MentionKind::Submission,
            source_community: submission.community,
            text: submission.title,
            author: submission.author,
            created_at: submission.created_at,
            permalink: submission.permalink,
        }
    }
}

impl From<Comment> for Mention {
    fn from(comment: Comment) -> Self {
        Self {
            kind: MentionKind::Comment,
            source_community: comment.community,
            text: comment.body,
            author: comment.author,
            created_at: comment.created_at,
            permalink: comment.permalink,
        }
    }
}

/// `/podcast-sentiment` 的响应。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentimentReport {
    /// 查询的节目名称。
    pub podcast: String,
    /// 回溯天数。
    pub days_lookback: u32,
    /// 提及总数。
    pub mention_count: usize,
    /// 先帖子后评论的提及列表。
    pub mentions: Vec<Mention>,
}

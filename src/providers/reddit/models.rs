//! 此模块定义了所有用于反序列化 Reddit API Listing 响应的数据结构。

use serde::Deserialize;

use crate::model::mention::{Comment, DELETED_AUTHOR, Submission};

/// 相对 permalink 的站点前缀。
pub const PERMALINK_BASE: &str = "https://reddit.com";

/// Reddit 的 Listing 顶层结构。
#[derive(Debug, Deserialize)]
pub struct Listing<T> {
    /// Listing 的数据部分。
    pub data: ListingData<T>,
}

/// Listing 的数据部分。
#[derive(Debug, Deserialize)]
pub struct ListingData<T> {
    /// 条目列表。
    pub children: Vec<Thing<T>>,
}

/// 包装单个条目的 "thing" 对象。
#[derive(Debug, Deserialize)]
pub struct Thing<T> {
    /// 条目的类型前缀，例如 `t1`（评论）、`t3`（帖子）。
    #[serde(default)]
    pub kind: String,
    /// 条目数据。
    pub data: T,
}

impl<T> Listing<T> {
    /// 取出所有条目的数据。
    pub fn into_items(self) -> Vec<T> {
        self.data.children.into_iter().map(|thing| thing.data).collect()
    }
}

/// 帖子 (`t3`) 的数据。
#[derive(Debug, Deserialize)]
pub struct RedditSubmission {
    /// 标题。
    pub title: String,
    /// 正文，链接帖为空。
    #[serde(default)]
    pub selftext: Option<String>,
    /// 所在社区名。
    pub subreddit: String,
    /// 作者，账号删除后可能缺失。
    #[serde(default)]
    pub author: Option<String>,
    /// 创建时间（Unix 时间戳，秒，浮点）。
    pub created_utc: f64,
    /// 站内相对链接。
    #[serde(default)]
    pub permalink: Option<String>,
}

/// 评论 (`t1`) 的数据。
#[derive(Debug, Deserialize)]
pub struct RedditComment {
    /// 评论正文。
    pub body: String,
    /// 所在社区名。
    pub subreddit: String,
    /// 作者，账号删除后可能缺失。
    #[serde(default)]
    pub author: Option<String>,
    /// 创建时间（Unix 时间戳，秒，浮点）。
    pub created_utc: f64,
    /// 站内相对链接。
    #[serde(default)]
    pub permalink: Option<String>,
}

fn absolute_permalink(permalink: Option<String>) -> Option<String> {
    permalink
        .filter(|p| !p.is_empty())
        .map(|p| format!("{PERMALINK_BASE}{p}"))
}

fn author_or_deleted(author: Option<String>) -> String {
    author
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| DELETED_AUTHOR.to_string())
}

impl From<RedditSubmission> for Submission {
    fn from(post: RedditSubmission) -> Self {
        Self {
            community: post.subreddit,
            title: post.title,
            body: post.selftext.unwrap_or_default(),
            author: author_or_deleted(post.author),
            created_at: post.created_utc as i64,
            permalink: absolute_permalink(post.permalink),
        }
    }
}

impl From<RedditComment> for Comment {
    fn from(comment: RedditComment) -> Self {
        Self {
            community: comment.subreddit,
            body: comment.body,
            author: author_or_deleted(comment.author),
            created_at: comment.created_utc as i64,
            permalink: absolute_permalink(comment.permalink),
        }
    }
}

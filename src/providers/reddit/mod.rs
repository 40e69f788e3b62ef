//! 此模块实现了与 Reddit 进行交互的 `DiscussionProvider`。
//!
//! 使用应用级 (application-only) OAuth 授权，只读访问 `r/all`。

use async_trait::async_trait;
use reqwest::{
    Client, StatusCode,
    header::{AUTHORIZATION, USER_AGENT},
};
use tracing::{debug, info, warn};

use crate::{
    config::RedditConfig,
    error::Result,
    model::mention::{Comment, Submission},
    providers::{
        DiscussionProvider, join_url, read_json,
        token::{ClientCredentials, TokenPolicy, TokenProvider},
    },
};

pub mod models;

/// 应用级授权端点。
pub const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
/// OAuth API 根地址。
pub const API_BASE_URL: &str = "https://oauth.reddit.com";

const SERVICE: &str = "Reddit";
/// 上游单页允许的最大条目数。
const MAX_PAGE_SIZE: u32 = 100;
/// 全站搜索的上游时间窗口。
const SEARCH_TIME_FILTER: &str = "month";

/// Reddit 客户端。
pub struct RedditClient {
    http_client: Client,
    api_base_url: String,
    user_agent: String,
    token: TokenProvider,
}

impl RedditClient {
    /// 创建一个新的 `RedditClient` 实例。
    pub fn new(http_client: Client, config: &RedditConfig, policy: TokenPolicy) -> Self {
        let token = TokenProvider::new(
            SERVICE,
            http_client.clone(),
            config.token_url.clone(),
            ClientCredentials::new(config.client_id.clone(), config.client_secret.clone()),
            policy,
        )
        .with_user_agent(config.user_agent.clone());

        Self {
            http_client,
            api_base_url: config.api_base_url.clone(),
            user_agent: config.user_agent.clone(),
            token,
        }
    }

    async fn authorized_get(&self, path: &str, query: &[(&str, String)]) -> Result<reqwest::Response> {
        let token = self.token.get_token().await?;
        let response = self
            .http_client
            .get(join_url(&self.api_base_url, path))
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(USER_AGENT, &self.user_agent)
            .query(query)
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            warn!("[Reddit] 访问令牌被拒绝，丢弃缓存的令牌。");
            self.token.invalidate().await;
        }
        Ok(response)
    }
}

fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(1, MAX_PAGE_SIZE)
}

#[async_trait]
impl DiscussionProvider for RedditClient {
    fn name(&self) -> &'static str {
        "reddit"
    }

    async fn search_submissions(&self, phrase: &str, limit: u32) -> Result<Vec<Submission>> {
        info!("[Reddit] 在 r/all 中搜索帖子: '{}' (limit: {})", phrase, limit);

        let params = [
            ("q", phrase.to_string()),
            ("sort", "new".to_string()),
            ("t", SEARCH_TIME_FILTER.to_string()),
            ("limit", clamp_limit(limit).to_string()),
            ("raw_json", "1".to_string()),
        ];
        let response = self.authorized_get("r/all/search", &params).await?;
        let listing: models::Listing<models::RedditSubmission> = read_json(response, SERVICE).await?;

        let submissions: Vec<Submission> = listing
            .into_items()
            .into_iter()
            .map(Submission::from)
            .collect();
        debug!("[Reddit] 搜索返回 {} 个帖子。", submissions.len());
        Ok(submissions)
    }

    async fn recent_comments(&self, limit: u32) -> Result<Vec<Comment>> {
        info!("[Reddit] 获取 r/all 最新的 {} 条评论", limit);

        let params = [
            ("limit", clamp_limit(limit).to_string()),
            ("raw_json", "1".to_string()),
        ];
        let response = self.authorized_get("r/all/comments", &params).await?;
        let listing: models::Listing<models::RedditComment> = read_json(response, SERVICE).await?;

        let comments: Vec<Comment> = listing.into_items().into_iter().map(Comment::from).collect();
        debug!("[Reddit] 评论流返回 {} 条评论。", comments.len());
        Ok(comments)
    }
}

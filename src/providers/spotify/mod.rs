//! 此模块实现了与 Spotify Web API 进行交互的 `CatalogProvider`。
//!
//! 只使用应用级的 client-credentials 授权，访问公开的节目与单集元数据。

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::AUTHORIZATION};
use tracing::{debug, info, warn};

use crate::{
    config::SpotifyConfig,
    error::{RadarError, Result},
    model::show::{Episode, Show},
    providers::{
        CatalogProvider, join_url, preview, read_json,
        token::{ClientCredentials, TokenPolicy, TokenProvider},
    },
};

pub mod models;

/// client-credentials 授权端点。
pub const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
/// Web API 根地址。
pub const API_BASE_URL: &str = "https://api.spotify.com/v1";

const SERVICE: &str = "Spotify";
/// 上游单页允许的最大条目数。
const MAX_PAGE_SIZE: u32 = 50;

/// Spotify 目录客户端。
pub struct SpotifyClient {
    http_client: Client,
    api_base_url: String,
    market: String,
    token: TokenProvider,
}

impl SpotifyClient {
    /// 创建一个新的 `SpotifyClient` 实例。
    ///
    /// # 参数
    /// * `http_client` - 共享的 HTTP 客户端。
    /// * `config` - 凭据与端点。
    /// * `policy` - 访问令牌的缓存策略。
    pub fn new(http_client: Client, config: &SpotifyConfig, policy: TokenPolicy) -> Self {
        let token = TokenProvider::new(
            SERVICE,
            http_client.clone(),
            config.token_url.clone(),
            ClientCredentials::new(config.client_id.clone(), config.client_secret.clone()),
            policy,
        );
        Self {
            http_client,
            api_base_url: config.api_base_url.clone(),
            market: config.market.clone(),
            token,
        }
    }

    /// 带上 bearer 令牌发送 GET 请求。
    async fn authorized_get(&self, path: &str, query: &[(&str, String)]) -> Result<reqwest::Response> {
        let token = self.token.get_token().await?;
        let response = self
            .http_client
            .get(join_url(&self.api_base_url, path))
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .query(query)
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            warn!("[Spotify] 访问令牌被拒绝，丢弃缓存的令牌。");
            self.token.invalidate().await;
        }
        Ok(response)
    }
}

fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(1, MAX_PAGE_SIZE)
}

#[async_trait]
impl CatalogProvider for SpotifyClient {
    fn name(&self) -> &'static str {
        "spotify"
    }

    async fn search_shows(&self, query: &str, limit: u32) -> Result<Vec<Show>> {
        info!("[Spotify] 搜索节目: '{}' (limit: {})", query, limit);

        let params = [
            ("q", query.to_string()),
            ("type", "show".to_string()),
            ("limit", clamp_limit(limit).to_string()),
            ("market", self.market.clone()),
        ];
        let response = self.authorized_get("search", &params).await?;
        let resp: models::SearchResponse = read_json(response, SERVICE).await?;

        let total = resp.shows.items.len();
        let shows: Vec<Show> = resp.shows.items.into_iter().flatten().map(Show::from).collect();
        if shows.len() < total {
            warn!("[Spotify] 搜索结果中有 {} 个空条目，已忽略。", total - shows.len());
        }

        debug!("[Spotify] 搜索 '{}' 返回 {} 个节目。", query, shows.len());
        Ok(shows)
    }

    async fn list_episodes(&self, show_id: &str, limit: u32) -> Result<Vec<Episode>> {
        let show_id = show_id.trim();
        if show_id.is_empty() {
            return Err(RadarError::validation("节目 ID 不能为空"));
        }

        info!("[Spotify] 获取节目 {} 的单集 (limit: {})", show_id, limit);

        let path = format!("shows/{}/episodes", urlencoding::encode(show_id));
        let params = [
            ("limit", clamp_limit(limit).to_string()),
            ("market", self.market.clone()),
        ];
        let response = self.authorized_get(&path, &params).await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!("[Spotify] 节目 {} 不存在，返回空列表。", show_id);
                return Ok(vec![]);
            }
            // 格式非法的 ID 返回 400 而不是 404，同样视为未知节目
            StatusCode::BAD_REQUEST => {
                let body = response.text().await?;
                let invalid_id = serde_json::from_str::<models::ErrorResponse>(&body)
                    .is_ok_and(|e| e.is_invalid_id());
                if invalid_id {
                    debug!("[Spotify] 节目 ID {} 格式非法，返回空列表。", show_id);
                    return Ok(vec![]);
                }
                return Err(RadarError::upstream(format!(
                    "{SERVICE} 返回 HTTP 400 Bad Request: {}",
                    preview(&body)
                )));
            }
            _ => {}
        }

        let page: models::Paging<models::SimplifiedEpisode> = read_json(response, SERVICE).await?;
        let episodes: Vec<Episode> = page.items.into_iter().flatten().map(Episode::from).collect();

        debug!("[Spotify] 节目 {} 返回 {} 个单集。", show_id, episodes.len());
        Ok(episodes)
    }
}

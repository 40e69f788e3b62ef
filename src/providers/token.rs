//! OAuth client-credentials 访问令牌的获取与缓存。
//!
//! Spotify 与 Reddit 的应用级授权流程相同：用 `client_id:client_secret`
//! 构造 Basic 认证头，换取一个短期有效的 bearer 令牌。

use std::time::{Duration, Instant};

use base64::Engine;
use reqwest::{
    Client,
    header::{AUTHORIZATION, USER_AGENT},
};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::{
    error::{RadarError, Result},
    providers::preview,
};

/// 在令牌声明的过期时间之前提前刷新的余量。
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// 上游未声明有效期时采用的默认值（秒）。
const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

/// 访问令牌的获取策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenPolicy {
    /// 每次逻辑操作都重新换取令牌。
    PerRequest,
    /// 缓存令牌直到接近过期；并发的刷新会被合并为一次请求。
    #[default]
    Cached,
}

/// 一对客户端凭据。
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    /// 客户端 ID。
    pub client_id: String,
    /// 客户端密钥。
    pub client_secret: String,
}

impl ClientCredentials {
    /// 创建凭据。
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// 构造 `Authorization` 请求头的值。
    pub fn basic_auth_header(&self) -> String {
        let raw = format!("{}:{}", self.client_id, self.client_secret);
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(raw)
        )
    }
}

/// 授权端点的响应。
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    DEFAULT_EXPIRES_IN_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    refresh_after: Instant,
}

impl CachedToken {
    fn new(access_token: String, expires_in: Duration, fetched_at: Instant) -> Self {
        Self {
            access_token,
            refresh_after: fetched_at + expires_in.saturating_sub(EXPIRY_MARGIN),
        }
    }

    fn is_fresh_at(&self, now: Instant) -> bool {
        now < self.refresh_after
    }
}

/// 绑定到一个授权端点和一对凭据的令牌提供者。
pub struct TokenProvider {
    service: &'static str,
    http_client: Client,
    token_url: String,
    credentials: ClientCredentials,
    user_agent: Option<String>,
    policy: TokenPolicy,
    cache: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    /// 创建一个新的 `TokenProvider`。
    ///
    /// # 参数
    /// * `service` - 用于日志和错误信息的服务名。
    /// * `http_client` - 共享的 HTTP 客户端（已配置超时）。
    /// * `token_url` - client-credentials 授权端点。
    /// * `credentials` - 客户端凭据。
    /// * `policy` - 缓存策略。
    pub fn new(
        service: &'static str,
        http_client: Client,
        token_url: impl Into<String>,
        credentials: ClientCredentials,
        policy: TokenPolicy,
    ) -> Self {
        Self {
            service,
            http_client,
            token_url: token_url.into(),
            credentials,
            user_agent: None,
            policy,
            cache: Mutex::new(None),
        }
    }

    /// 为授权请求附加 User-Agent。
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// 获取一个可用的访问令牌。
    ///
    /// 在 `Cached` 策略下，刷新期间持有缓存锁，
    /// 因此同时到达的调用者会等待同一次交换的结果，而不会各自请求授权端点。
    ///
    /// # 返回
    /// 凭据被拒绝或网络失败时返回 `RadarError::UpstreamAuth`。
    pub async fn get_token(&self) -> Result<String> {
        match self.policy {
            TokenPolicy::PerRequest => Ok(self.exchange().await?.access_token),
            TokenPolicy::Cached => {
                let mut cache = self.cache.lock().await;
                if let Some(token) = cache.as_ref().filter(|t| t.is_fresh_at(Instant::now())) {
                    return Ok(token.access_token.clone());
                }

                let fetched_at = Instant::now();
                let response = self.exchange().await?;
                let token = CachedToken::new(
                    response.access_token,
                    Duration::from_secs(response.expires_in),
                    fetched_at,
                );
                debug!(
                    "[{}] 令牌已缓存，有效期 {} 秒。",
                    self.service, response.expires_in
                );
                let access_token = token.access_token.clone();
                *cache = Some(token);
                Ok(access_token)
            }
        }
    }

    /// 丢弃缓存的令牌，下一次调用会重新换取。
    ///
    /// 上游以 401 拒绝缓存的令牌（例如令牌被提前吊销）时调用。
    pub async fn invalidate(&self) {
        self.cache.lock().await.take();
    }

    #[instrument(skip(self), fields(service = self.service))]
    async fn exchange(&self) -> Result<TokenResponse> {
        info!("[{}] 正在换取访问令牌...", self.service);

        let mut request = self
            .http_client
            .post(&self.token_url)
            .header(AUTHORIZATION, self.credentials.basic_auth_header())
            .form(&[("grant_type", "client_credentials")]);
        if let Some(user_agent) = &self.user_agent {
            request = request.header(USER_AGENT, user_agent);
        }

        let response = request.send().await.map_err(|e| {
            RadarError::UpstreamAuth(format!("{} 授权端点请求失败: {e}", self.service))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            RadarError::UpstreamAuth(format!("{} 授权响应读取失败: {e}", self.service))
        })?;

        if !status.is_success() {
            return Err(RadarError::UpstreamAuth(format!(
                "{} 拒绝了凭据 (HTTP {status}): {}",
                self.service,
                preview(&body)
            )));
        }

        serde_json::from_str::<TokenResponse>(&body).map_err(|e| {
            RadarError::UpstreamAuth(format!("{} 授权响应格式异常: {e}", self.service))
        })
    }
}

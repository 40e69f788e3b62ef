//! 负责加载服务运行所需的配置。
//!
//! 所有凭据都通过显式的配置结构体注入到各个客户端中，客户端自身从不读取环境变量。

use std::{net::SocketAddr, str::FromStr, time::Duration};

use tracing::debug;

use crate::{
    error::{RadarError, Result},
    providers::{reddit, spotify, token::TokenPolicy, youtube},
    search::DEFAULT_TARGET_LANGUAGES,
};

const DEFAULT_REDDIT_USER_AGENT: &str = "podcast-discovery-app";
const DEFAULT_SPOTIFY_MARKET: &str = "US";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
const DEFAULT_DATABASE_URL: &str = "sqlite:stocks.db?mode=rwc";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Spotify 的凭据与端点。
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    /// OAuth 客户端 ID。
    pub client_id: String,
    /// OAuth 客户端密钥。
    pub client_secret: String,
    /// 查询节目和单集时附带的市场代码。
    pub market: String,
    /// client-credentials 授权端点。
    pub token_url: String,
    /// Web API 根地址。
    pub api_base_url: String,
}

impl SpotifyConfig {
    /// 使用生产环境端点创建配置。
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            market: DEFAULT_SPOTIFY_MARKET.to_string(),
            token_url: spotify::TOKEN_URL.to_string(),
            api_base_url: spotify::API_BASE_URL.to_string(),
        }
    }
}

/// Reddit 的凭据与端点。
#[derive(Debug, Clone)]
pub struct RedditConfig {
    /// OAuth 客户端 ID。
    pub client_id: String,
    /// OAuth 客户端密钥。
    pub client_secret: String,
    /// Reddit 要求每个请求都带上可识别的 User-Agent。
    pub user_agent: String,
    /// 应用级授权端点。
    pub token_url: String,
    /// OAuth API 根地址。
    pub api_base_url: String,
}

impl RedditConfig {
    /// 使用生产环境端点创建配置。
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            user_agent: DEFAULT_REDDIT_USER_AGENT.to_string(),
            token_url: reddit::TOKEN_URL.to_string(),
            api_base_url: reddit::API_BASE_URL.to_string(),
        }
    }
}

/// YouTube Data API 的密钥与端点。
#[derive(Debug, Clone)]
pub struct YoutubeConfig {
    /// API key。
    pub api_key: String,
    /// Data API v3 根地址。
    pub api_base_url: String,
}

impl YoutubeConfig {
    /// 使用生产环境端点创建配置。
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base_url: youtube::API_BASE_URL.to_string(),
        }
    }
}

/// 整个服务的配置。
#[derive(Debug, Clone)]
pub struct RadarConfig {
    /// Spotify 配置。
    pub spotify: SpotifyConfig,
    /// Reddit 配置。
    pub reddit: RedditConfig,
    /// YouTube 配置。
    pub youtube: YoutubeConfig,
    /// 搜索节目时保留的语言标签集合。
    pub target_languages: Vec<String>,
    /// 访问令牌的获取策略。
    pub token_policy: TokenPolicy,
    /// 每个上游请求的超时时间。
    pub upstream_timeout: Duration,
    /// HTTP 服务监听地址。
    pub bind_addr: SocketAddr,
    /// 股票代码表所在的数据库。
    pub database_url: String,
    /// 允许跨域的来源列表，`None` 表示允许任意来源。
    pub cors_origins: Option<Vec<String>>,
    /// 500 响应中是否包含上游的原始错误信息。
    pub expose_upstream_errors: bool,
}

impl RadarConfig {
    /// 从进程环境变量中加载配置。
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 通过任意的查找函数加载配置。
    ///
    /// # 参数
    /// * `lookup` - 根据变量名返回变量值的函数。
    ///
    /// # 返回
    /// 缺少必填项或某个值无法解析时返回 `RadarError::Config`。
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| RadarError::Config(format!("缺少环境变量 {key}")))
        };

        let mut spotify = SpotifyConfig::new(
            required("SPOTIFY_CLIENT_ID")?,
            required("SPOTIFY_CLIENT_SECRET")?,
        );
        if let Some(market) = get("SPOTIFY_MARKET") {
            spotify.market = market.trim().to_string();
        }

        let mut reddit = RedditConfig::new(
            required("REDDIT_CLIENT_ID")?,
            required("REDDIT_CLIENT_SECRET")?,
        );
        if let Some(user_agent) = get("REDDIT_USER_AGENT") {
            reddit.user_agent = user_agent;
        }

        let youtube = YoutubeConfig::new(required("YOUTUBE_API_KEY")?);

        let target_languages = match get("RADAR_LANGUAGES") {
            Some(raw) => {
                let languages = split_list(&raw);
                if languages.is_empty() {
                    return Err(RadarError::Config(
                        "RADAR_LANGUAGES 至少需要一个语言标签".to_string(),
                    ));
                }
                languages
            }
            None => DEFAULT_TARGET_LANGUAGES
                .iter()
                .map(|l| l.to_string())
                .collect(),
        };

        let token_policy = match get("RADAR_TOKEN_CACHE") {
            Some(raw) if parse_bool("RADAR_TOKEN_CACHE", &raw)? => TokenPolicy::Cached,
            Some(_) => TokenPolicy::PerRequest,
            None => TokenPolicy::default(),
        };

        let timeout_secs = match get("RADAR_UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => parse_value::<u64>("RADAR_UPSTREAM_TIMEOUT_SECS", &raw)?,
            None => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(RadarError::Config(
                "RADAR_UPSTREAM_TIMEOUT_SECS 必须大于 0".to_string(),
            ));
        }

        let bind_addr = parse_value::<SocketAddr>(
            "RADAR_BIND_ADDR",
            &get("RADAR_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        )?;

        let expose_upstream_errors = match get("RADAR_EXPOSE_UPSTREAM_ERRORS") {
            Some(raw) => parse_bool("RADAR_EXPOSE_UPSTREAM_ERRORS", &raw)?,
            None => true,
        };

        let config = Self {
            spotify,
            reddit,
            youtube,
            target_languages,
            token_policy,
            upstream_timeout: Duration::from_secs(timeout_secs),
            bind_addr,
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            cors_origins: get("RADAR_CORS_ORIGINS").map(|raw| split_list(&raw)),
            expose_upstream_errors,
        };

        debug!(
            "配置加载完成: 语言 {:?}, 令牌策略 {:?}, 超时 {}s, 监听 {}",
            config.target_languages, config.token_policy, timeout_secs, config.bind_addr
        );
        Ok(config)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(RadarError::Config(format!(
            "{key} 的值 '{other}' 不是有效的布尔值"
        ))),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| RadarError::Config(format!("{key} 的值 '{raw}' 无法解析: {e}")))
}

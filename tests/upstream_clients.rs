//! 针对本地假上游的客户端集成测试。

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use podcast_radar::{
    RadarError,
    config::{RedditConfig, SpotifyConfig, YoutubeConfig},
    providers::{
        CatalogProvider, DiscussionProvider, VideoProvider,
        reddit::RedditClient,
        spotify::SpotifyClient,
        token::{ClientCredentials, TokenPolicy, TokenProvider},
        youtube::YoutubeClient,
    },
    server::error::ApiError,
};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,podcast_radar=debug"));
    let _ = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

#[derive(Clone, Default)]
struct Upstream {
    token_calls: Arc<AtomicUsize>,
    api_calls: Arc<AtomicUsize>,
    video_calls: Arc<AtomicUsize>,
    reject_credentials: bool,
    auth_headers: Arc<Mutex<Vec<String>>>,
    user_agents: Arc<Mutex<Vec<String>>>,
    api_queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

async fn token(State(up): State<Upstream>, headers: HeaderMap) -> impl IntoResponse {
    up.token_calls.fetch_add(1, Ordering::SeqCst);
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    up.auth_headers.lock().await.push(header("authorization"));
    up.user_agents.lock().await.push(header("user-agent"));

    // 放大并发窗口
    tokio::time::sleep(Duration::from_millis(50)).await;

    if up.reject_credentials {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "invalid_client"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({"access_token": "fake-token", "token_type": "Bearer", "expires_in": 3600})),
    )
}

async fn spotify_search(
    State(up): State<Upstream>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    up.api_calls.fetch_add(1, Ordering::SeqCst);
    up.api_queries.lock().await.push(query);
    Json(json!({
        "shows": {
            "items": [
                {
                    "id": "show-1",
                    "name": "Radio Hour",
                    "publisher": "Public Radio",
                    "description": "Weekly radio",
                    "images": [{"url": "https://img/1"}],
                    "external_urls": {"spotify": "https://open.spotify.com/show/show-1"},
                    "total_episodes": 120,
                    "languages": ["en"]
                }
            ]
        }
    }))
}

async fn spotify_episodes(Path(id): Path<String>) -> impl IntoResponse {
    match id.as_str() {
        "malformed" => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"status": 400, "message": "Invalid base62 id"}})),
        ),
        "bad-market" => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"status": 400, "message": "Illegal market"}})),
        ),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": {"status": 404, "message": "Non existing id"}})),
        ),
    }
}

async fn revoked_token(State(up): State<Upstream>) -> impl IntoResponse {
    up.api_calls.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": {"status": 401, "message": "The access token expired"}})),
    )
}

async fn slow_search() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(2)).await;
    Json(json!({"items": []}))
}

async fn reddit_search(
    State(up): State<Upstream>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    up.api_calls.fetch_add(1, Ordering::SeqCst);
    up.api_queries.lock().await.push(query);
    Json(json!({
        "kind": "Listing",
        "data": {
            "children": [
                {"kind": "t3", "data": {
                    "title": "Serial is back",
                    "selftext": "",
                    "subreddit": "podcasts",
                    "author": "listener",
                    "created_utc": 1718000000.0,
                    "permalink": "/r/podcasts/comments/abc/serial_is_back/"
                }}
            ]
        }
    }))
}

async fn reddit_comments(State(up): State<Upstream>) -> Json<Value> {
    up.api_calls.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "kind": "Listing",
        "data": {
            "children": [
                {"kind": "t1", "data": {
                    "body": "unrelated",
                    "subreddit": "AskReddit",
                    "author": null,
                    "created_utc": 1718000100
                }}
            ]
        }
    }))
}

async fn youtube_search(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    if query.get("type").map(String::as_str) == Some("channel") {
        if query.get("q").map(String::as_str) == Some("Serial") {
            return Json(json!({"items": [
                {"id": {"kind": "youtube#channel", "channelId": "UC-serial"},
                 "snippet": {"channelId": "UC-serial"}}
            ]}));
        }
        return Json(json!({"items": []}));
    }
    Json(json!({"items": [
        {"id": {"kind": "youtube#video", "videoId": "v2"}},
        {"id": {"kind": "youtube#video", "videoId": "v1"}}
    ]}))
}

async fn youtube_videos(State(up): State<Upstream>) -> Json<Value> {
    up.video_calls.fetch_add(1, Ordering::SeqCst);
    Json(json!({"items": [
        {"id": "v1", "snippet": {"title": "One", "publishedAt": "2024-01-01T00:00:00Z"},
         "statistics": {"commentCount": "4"}},
        {"id": "v2", "snippet": {"title": "Two", "publishedAt": "2024-02-01T00:00:00Z"},
         "statistics": {}}
    ]}))
}

async fn spawn_upstream(up: Upstream) -> String {
    let app = Router::new()
        .route("/token", post(token))
        .route("/spotify/search", get(spotify_search))
        .route("/spotify/shows/{id}/episodes", get(spotify_episodes))
        .route("/reddit/r/all/search", get(reddit_search))
        .route("/reddit/r/all/comments", get(reddit_comments))
        .route("/youtube/search", get(youtube_search))
        .route("/youtube/videos", get(youtube_videos))
        .route("/revoked/search", get(revoked_token))
        .route("/slow/search", get(slow_search))
        .with_state(up);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

fn spotify_config(base: &str) -> SpotifyConfig {
    let mut config = SpotifyConfig::new("spotify-id", "spotify-secret");
    config.token_url = format!("{base}/token");
    config.api_base_url = format!("{base}/spotify");
    config
}

#[tokio::test]
async fn spotify_search_uses_basic_auth_and_market() {
    init_tracing();
    let up = Upstream::default();
    let base = spawn_upstream(up.clone()).await;
    let client = SpotifyClient::new(http_client(), &spotify_config(&base), TokenPolicy::Cached);

    let shows = client.search_shows("radio", 50).await.unwrap();

    assert_eq!(shows.len(), 1);
    assert_eq!(shows[0].episode_total, 120);
    assert_eq!(
        *up.auth_headers.lock().await,
        vec!["Basic c3BvdGlmeS1pZDpzcG90aWZ5LXNlY3JldA==".to_string()]
    );

    let queries = up.api_queries.lock().await;
    assert_eq!(queries[0]["q"], "radio");
    assert_eq!(queries[0]["type"], "show");
    assert_eq!(queries[0]["limit"], "50");
    assert_eq!(queries[0]["market"], "US");
}

#[tokio::test]
async fn unknown_show_yields_empty_episode_list() {
    init_tracing();
    let up = Upstream::default();
    let base = spawn_upstream(up.clone()).await;
    let client = SpotifyClient::new(http_client(), &spotify_config(&base), TokenPolicy::Cached);

    let episodes = client.list_episodes("does-not-exist", 50).await.unwrap();
    assert!(episodes.is_empty());

    let err = client.list_episodes("  ", 50).await.unwrap_err();
    assert!(matches!(err, RadarError::Validation(_)));
}

#[tokio::test]
async fn malformed_show_id_yields_empty_episode_list() {
    init_tracing();
    let up = Upstream::default();
    let base = spawn_upstream(up.clone()).await;
    let client = SpotifyClient::new(http_client(), &spotify_config(&base), TokenPolicy::Cached);

    let episodes = client.list_episodes("malformed", 50).await.unwrap();
    assert!(episodes.is_empty());

    let err = client.list_episodes("bad-market", 50).await.unwrap_err();
    assert!(matches!(err, RadarError::Upstream(msg) if msg.contains("Illegal market")));
}

#[tokio::test]
async fn rejected_bearer_token_is_dropped_from_cache() {
    init_tracing();
    let up = Upstream::default();
    let base = spawn_upstream(up.clone()).await;
    let mut config = spotify_config(&base);
    config.api_base_url = format!("{base}/revoked");
    let client = SpotifyClient::new(http_client(), &config, TokenPolicy::Cached);

    let err = client.search_shows("radio", 10).await.unwrap_err();
    assert!(matches!(err, RadarError::Upstream(_)));
    assert_eq!(up.token_calls.load(Ordering::SeqCst), 1);

    client.search_shows("radio", 10).await.unwrap_err();
    assert_eq!(up.token_calls.load(Ordering::SeqCst), 2, "被拒绝的令牌不应再被复用");
    assert_eq!(up.api_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn slow_upstream_times_out_as_upstream_error() {
    init_tracing();
    let up = Upstream::default();
    let base = spawn_upstream(up.clone()).await;
    let mut config = YoutubeConfig::new("yt-key");
    config.api_base_url = format!("{base}/slow");
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let client = YoutubeClient::new(http_client, &config);

    let err = client.find_channel_id("Serial").await.unwrap_err();

    assert!(matches!(&err, RadarError::Reqwest(e) if e.is_timeout()));
    assert!(err.is_upstream());
    assert_eq!(
        ApiError::from_radar(err, true).status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn cached_tokens_are_single_flight() {
    init_tracing();
    let up = Upstream::default();
    let base = spawn_upstream(up.clone()).await;
    let provider = TokenProvider::new(
        "Test",
        http_client(),
        format!("{base}/token"),
        ClientCredentials::new("id", "secret"),
        TokenPolicy::Cached,
    );

    let (a, b, c) = tokio::join!(provider.get_token(), provider.get_token(), provider.get_token());
    assert_eq!(a.unwrap(), "fake-token");
    assert_eq!(b.unwrap(), "fake-token");
    assert_eq!(c.unwrap(), "fake-token");

    provider.get_token().await.unwrap();
    assert_eq!(up.token_calls.load(Ordering::SeqCst), 1);

    provider.invalidate().await;
    provider.get_token().await.unwrap();
    assert_eq!(up.token_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn per_request_policy_exchanges_every_time() {
    init_tracing();
    let up = Upstream::default();
    let base = spawn_upstream(up.clone()).await;
    let client = SpotifyClient::new(http_client(), &spotify_config(&base), TokenPolicy::PerRequest);

    for _ in 0..3 {
        client.search_shows("radio", 10).await.unwrap();
    }
    assert_eq!(up.token_calls.load(Ordering::SeqCst), 3);
    assert_eq!(up.api_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn rejected_credentials_are_upstream_auth_errors() {
    init_tracing();
    let up = Upstream {
        reject_credentials: true,
        ..Default::default()
    };
    let base = spawn_upstream(up.clone()).await;
    let client = SpotifyClient::new(http_client(), &spotify_config(&base), TokenPolicy::Cached);

    let err = client.search_shows("radio", 10).await.unwrap_err();

    assert!(matches!(err, RadarError::UpstreamAuth(_)));
    assert!(err.is_upstream());
    assert_eq!(up.api_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn reddit_flow_sends_user_agent() {
    init_tracing();
    let up = Upstream::default();
    let base = spawn_upstream(up.clone()).await;
    let mut config = RedditConfig::new("reddit-id", "reddit-secret");
    config.token_url = format!("{base}/token");
    config.api_base_url = format!("{base}/reddit");
    config.user_agent = "radar-test/1.0".to_string();
    let client = RedditClient::new(http_client(), &config, TokenPolicy::Cached);

    let submissions = client.search_submissions("Serial", 100).await.unwrap();
    let comments = client.recent_comments(100).await.unwrap();

    assert_eq!(submissions.len(), 1);
    assert_eq!(
        submissions[0].permalink.as_deref(),
        Some("https://reddit.com/r/podcasts/comments/abc/serial_is_back/")
    );
    assert_eq!(comments[0].author, "[deleted]");
    assert_eq!(up.token_calls.load(Ordering::SeqCst), 1);
    assert_eq!(up.user_agents.lock().await[0], "radar-test/1.0");

    let queries = up.api_queries.lock().await;
    assert_eq!(queries[0]["sort"], "new");
    assert_eq!(queries[0]["t"], "month");
}

#[tokio::test]
async fn youtube_buzz_flow() {
    init_tracing();
    let up = Upstream::default();
    let base = spawn_upstream(up.clone()).await;
    let mut config = YoutubeConfig::new("yt-key");
    config.api_base_url = format!("{base}/youtube");
    let client = YoutubeClient::new(http_client(), &config);

    let report = podcast_radar::buzz::get_buzz(&client, "Serial", 5).await.unwrap();

    assert_eq!(report.channel_id, "UC-serial");
    assert_eq!(report.video_count, 2);
    assert_eq!(report.total_comment_count, 4);
    assert_eq!(report.videos[0].video_id, "v2", "应保持最新优先的顺序");
    assert_eq!(up.video_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unknown_channel_makes_no_video_calls() {
    init_tracing();
    let up = Upstream::default();
    let base = spawn_upstream(up.clone()).await;
    let mut config = YoutubeConfig::new("yt-key");
    config.api_base_url = format!("{base}/youtube");
    let client = YoutubeClient::new(http_client(), &config);

    let err = podcast_radar::buzz::get_buzz(&client, "nonexistent channel", 5)
        .await
        .unwrap_err();

    assert!(matches!(err, RadarError::NotFound(_)));
    assert_eq!(up.video_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn upstream_error_status_is_reported() {
    init_tracing();
    // 没有路由的路径返回 404，用于模拟上游的非 2xx 响应
    let up = Upstream::default();
    let base = spawn_upstream(up.clone()).await;
    let mut config = YoutubeConfig::new("yt-key");
    config.api_base_url = format!("{base}/missing");
    let client = YoutubeClient::new(http_client(), &config);

    let err = client.find_channel_id("Serial").await.unwrap_err();
    assert!(matches!(err, RadarError::Upstream(_)));
}

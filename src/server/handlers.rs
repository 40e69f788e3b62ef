//! 路由处理函数。
//!
//! 查询参数全部声明为可选，缺失与空白统一在这里报告为 400，
//! 而不是交给 axum 返回纯文本的拒绝信息。

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::{
    DEFAULT_BUZZ_LIMIT, DEFAULT_DAYS_BACK,
    model::{
        mention::SentimentReport,
        show::{Episode, Show, ShowEpisode},
        stock::{NewStock, Stock},
        video::BuzzReport,
    },
    server::{
        error::{ApiError, ApiResult},
        state::AppState,
    },
};

/// `/youtube-buzz` 允许的最大 `limit`。
const MAX_BUZZ_LIMIT: i64 = 50;

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EpisodesQuery {
    show_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EpisodesByTitleQuery {
    show_title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SentimentQuery {
    q: Option<String>,
    days: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct BuzzQuery {
    q: Option<String>,
    limit: Option<i64>,
}

/// 取出必填参数，空白值视为缺失。
fn required(value: Option<String>, name: &str) -> ApiResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::bad_request(format!("Missing required query parameter '{name}'")))
}

fn days_back(days: Option<i64>) -> ApiResult<u32> {
    match days {
        None => Ok(DEFAULT_DAYS_BACK),
        Some(d) => u32::try_from(d)
            .map_err(|_| ApiError::bad_request("'days' must be a non-negative integer")),
    }
}

fn buzz_limit(limit: Option<i64>) -> ApiResult<u32> {
    match limit {
        None => Ok(DEFAULT_BUZZ_LIMIT),
        Some(l) if (1..=MAX_BUZZ_LIMIT).contains(&l) => Ok(l as u32),
        Some(_) => Err(ApiError::bad_request(format!(
            "'limit' must be between 1 and {MAX_BUZZ_LIMIT}"
        ))),
    }
}

pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the Podcast Radar API!",
    })
}

pub async fn search_podcast(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Show>>> {
    let Query(params) = query?;
    let q = required(params.q, "q")?;

    let shows = state
        .radar
        .search_podcasts(&q)
        .await
        .map_err(|e| ApiError::from_radar(e, state.expose_upstream_errors))?;
    Ok(Json(shows))
}

pub async fn podcast_episodes(
    State(state): State<AppState>,
    query: Result<Query<EpisodesQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Episode>>> {
    let Query(params) = query?;
    let show_id = required(params.show_id, "show_id")?;

    let episodes = state
        .radar
        .episodes_by_show_id(&show_id)
        .await
        .map_err(|e| ApiError::from_radar(e, state.expose_upstream_errors))?;
    Ok(Json(episodes))
}

pub async fn podcast_episodes_by_title(
    State(state): State<AppState>,
    query: Result<Query<EpisodesByTitleQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ShowEpisode>>> {
    let Query(params) = query?;
    let show_title = required(params.show_title, "show_title")?;

    let episodes = state
        .radar
        .episodes_by_title(&show_title)
        .await
        .map_err(|e| ApiError::from_radar(e, state.expose_upstream_errors))?;
    Ok(Json(episodes))
}

pub async fn podcast_sentiment(
    State(state): State<AppState>,
    query: Result<Query<SentimentQuery>, QueryRejection>,
) -> ApiResult<Json<SentimentReport>> {
    let Query(params) = query?;
    let q = required(params.q, "q")?;
    let days = days_back(params.days)?;

    let report = state
        .radar
        .podcast_sentiment(&q, days)
        .await
        .map_err(|e| ApiError::from_radar(e, state.expose_upstream_errors))?;
    Ok(Json(report))
}

pub async fn youtube_buzz(
    State(state): State<AppState>,
    query: Result<Query<BuzzQuery>, QueryRejection>,
) -> ApiResult<Json<BuzzReport>> {
    let Query(params) = query?;
    let q = required(params.q, "q")?;
    let limit = buzz_limit(params.limit)?;

    let report = state
        .radar
        .youtube_buzz(&q, limit)
        .await
        .map_err(|e| ApiError::from_radar(e, state.expose_upstream_errors))?;
    Ok(Json(report))
}

pub async fn list_stocks(State(state): State<AppState>) -> ApiResult<Json<Vec<Stock>>> {
    let stocks = state
        .stocks
        .list()
        .await
        .map_err(|e| ApiError::from_radar(e, state.expose_upstream_errors))?;
    Ok(Json(stocks))
}

pub async fn add_stock(
    State(state): State<AppState>,
    body: Result<Json<NewStock>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Stock>)> {
    let Json(new_stock) = body?;

    let stock = state
        .stocks
        .add(new_stock)
        .await
        .map_err(|e| ApiError::from_radar(e, state.expose_upstream_errors))?;
    tracing::info!("新增股票代码 {}", stock.symbol);
    Ok((StatusCode::CREATED, Json(stock)))
}

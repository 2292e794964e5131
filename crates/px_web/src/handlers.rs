use axum::{
    extract::{Path, Query, State},
    Json,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use px_core::{Article, SaveReport, SearchResponse};
use crate::{ApiError, AppState};

pub const DEFAULT_MAX_RESULTS: usize = 50;
pub const DEFAULT_DISPLAY_RESULTS: usize = 10;

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_display_results() -> usize {
    DEFAULT_DISPLAY_RESULTS
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_display_results")]
    pub display_results: usize,
    #[serde(default)]
    pub profile: Option<String>,
}

/// Query-string form of a search; the fields mirror `SearchParams`.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_display_results")]
    pub display_results: usize,
    #[serde(default)]
    pub profile: Option<String>,
}

impl SearchQuery {
    fn into_parts(self) -> (String, SearchParams) {
        let params = SearchParams {
            max_results: self.max_results,
            display_results: self.display_results,
            profile: self.profile,
        };
        (self.query, params)
    }
}

async fn run_search(
    state: &AppState,
    query: &str,
    params: SearchParams,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = query.trim();
    info!(
        "🔎 Searching {} for '{}' (max {}, showing {})",
        state.source.name(),
        query,
        params.max_results,
        params.display_results
    );

    let articles = state.source.search(query, params.max_results).await?;
    let response = state
        .reranker
        .rerank(&articles, params.profile.as_deref(), params.display_results)
        .await;
    Ok(Json(response))
}

/// `GET /search/:query`
pub async fn search_by_path(
    State(state): State<Arc<AppState>>,
    Path(query): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    run_search(&state, &query, params).await
}

/// `GET /search?query=...`
pub async fn search_by_query(
    State(state): State<Arc<AppState>>,
    Query(search): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let (query, params) = search.into_parts();
    run_search(&state, &query, params).await
}

pub async fn save_articles(
    State(state): State<Arc<AppState>>,
    Json(articles): Json<Vec<Article>>,
) -> Result<Json<SaveReport>, ApiError> {
    info!("💾 Saving {} articles", articles.len());
    let report = state.archive.save(&articles).await?;
    Ok(Json(report))
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

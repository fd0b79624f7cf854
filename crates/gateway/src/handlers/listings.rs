//! Public listing and search handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{GroupNamesResponse, PageQuery};
use crate::AppState;
use namehub_common::{
    db::{models::Category, CollectionSummary, GroupNameFilter, GroupNameListItem, Page, PageRequest},
    errors::Result,
};

const HOME_LIST_SIZE: u64 = 12;
const HOME_FEATURED_SIZE: u64 = 6;
const DEFAULT_PAGE_SIZE: u64 = 20;
const DEFAULT_SEARCH_LIMIT: u64 = 20;

/// Everything the landing page shows
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeResponse {
    pub latest: Vec<GroupNameListItem>,
    pub popular: Vec<GroupNameListItem>,
    pub featured_collections: Vec<CollectionSummary>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub limit: Option<u64>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<GroupNameListItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupNamesQuery {
    pub category_id: Option<i32>,
    pub collection_id: Option<i32>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// Landing page aggregate
pub async fn home(State(state): State<AppState>) -> Result<Json<HomeResponse>> {
    let repo = state.repo();

    let (latest, popular, featured_collections, categories) = tokio::try_join!(
        repo.latest(HOME_LIST_SIZE),
        repo.popular(HOME_LIST_SIZE),
        repo.featured_collections(HOME_FEATURED_SIZE),
        repo.list_categories(),
    )?;

    Ok(Json(HomeResponse {
        latest,
        popular,
        featured_collections,
        categories,
    }))
}

/// Newest approved group names
pub async fn latest(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<GroupNameListItem>>> {
    let page = PageRequest::new(query.page, query.size(), DEFAULT_PAGE_SIZE);
    Ok(Json(state.repo().latest_paginated(page).await?))
}

/// Most viewed approved group names
pub async fn popular(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<GroupNameListItem>>> {
    let page = PageRequest::new(query.page, query.size(), DEFAULT_PAGE_SIZE);
    Ok(Json(state.repo().popular_paginated(page).await?))
}

/// Substring search over approved names. A blank query returns nothing.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>> {
    let q = query.q.unwrap_or_default().trim().to_string();
    if q.is_empty() {
        return Ok(Json(SearchResponse { query: q, results: Vec::new() }));
    }

    let limit = query
        .limit
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .min(namehub_common::db::MAX_PAGE_SIZE);
    let results = state.repo().search(&q, limit).await?;

    tracing::debug!(query = %q, results = results.len(), "Search completed");

    Ok(Json(SearchResponse { query: q, results }))
}

/// Filtered browse over approved group names
pub async fn list_group_names(
    State(state): State<AppState>,
    Query(query): Query<GroupNamesQuery>,
) -> Result<Json<GroupNamesResponse>> {
    let page = PageRequest::new(query.page, query.limit, DEFAULT_PAGE_SIZE);
    let filter = GroupNameFilter {
        status: None,
        category_id: query.category_id,
        collection_id: query.collection_id,
        search: query.search.map(|s| s.trim().to_string()),
    };

    let result = state.repo().list_public(&filter, page).await?;
    Ok(Json(result.into()))
}

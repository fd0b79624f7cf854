//! Collection handlers: public browse and admin management

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::{optional_text, required_text, PageQuery, SuccessResponse};
use crate::AppState;
use namehub_common::{
    auth::AdminSession,
    db::{
        models::Collection, CollectionInput, CollectionPatch, CollectionSummary,
        GroupNameListItem, Page, PageRequest,
    },
    errors::{AppError, Result},
};

const DEFAULT_PAGE_SIZE: u64 = 20;
const DEFAULT_FEATURED_LIMIT: u64 = 6;

/// Create or update body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub is_featured: Option<bool>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct FeaturedQuery {
    pub limit: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDetailResponse {
    pub collection: Collection,
    pub group_names: Page<GroupNameListItem>,
}

/// All collections with approved group name counts
pub async fn list_collections(State(state): State<AppState>) -> Result<Json<Vec<CollectionSummary>>> {
    Ok(Json(state.repo().list_collections().await?))
}

pub async fn featured_collections(
    State(state): State<AppState>,
    Query(query): Query<FeaturedQuery>,
) -> Result<Json<Vec<CollectionSummary>>> {
    let limit = query
        .limit
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_FEATURED_LIMIT)
        .min(namehub_common::db::MAX_PAGE_SIZE);

    Ok(Json(state.repo().featured_collections(limit).await?))
}

/// One collection and a page of its approved group names
pub async fn get_collection(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> Result<Json<CollectionDetailResponse>> {
    let repo = state.repo();
    let collection = repo
        .find_collection(id)
        .await?
        .ok_or(AppError::CollectionNotFound { id })?;

    let page = PageRequest::new(query.page, query.size(), DEFAULT_PAGE_SIZE);
    let group_names = repo.by_collection(id, page).await?;

    Ok(Json(CollectionDetailResponse { collection, group_names }))
}

pub async fn admin_list_collections(
    _session: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<CollectionSummary>>> {
    Ok(Json(state.repo().list_collections().await?))
}

pub async fn create_collection(
    _session: AdminSession,
    State(state): State<AppState>,
    Json(request): Json<CollectionRequest>,
) -> Result<(StatusCode, Json<Collection>)> {
    let input = CollectionInput {
        name: required_text(request.name, "name", "Collection name is required")?,
        description: optional_text(request.description),
        cover_image: optional_text(request.cover_image),
        is_featured: request.is_featured.unwrap_or(false),
        sort_order: request.sort_order,
    };

    let collection = state.repo().create_collection(input).await?;

    tracing::info!(
        collection_id = collection.id,
        name = %collection.name,
        featured = collection.is_featured,
        "Collection created"
    );

    Ok((StatusCode::CREATED, Json(collection)))
}

pub async fn update_collection(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<CollectionRequest>,
) -> Result<Json<Collection>> {
    let patch = CollectionPatch {
        name: required_text(request.name, "name", "Collection name is required")?,
        description: optional_text(request.description),
        cover_image: optional_text(request.cover_image),
        is_featured: request.is_featured,
        sort_order: request.sort_order,
    };

    let collection = state
        .repo()
        .update_collection(id, patch)
        .await?
        .ok_or(AppError::CollectionNotFound { id })?;

    tracing::info!(collection_id = id, "Collection updated");

    Ok(Json(collection))
}

/// Delete a collection; its group names stay, outside any collection
pub async fn delete_collection(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SuccessResponse>> {
    if !state.repo().delete_collection(id).await? {
        return Err(AppError::CollectionNotFound { id });
    }

    tracing::info!(collection_id = id, "Collection deleted");

    Ok(Json(SuccessResponse::ok()))
}

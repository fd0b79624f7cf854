//! Category handlers: public browse and admin management

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
    db::{models::Category, CategoryInput, GroupNameListItem, Page, PageRequest},
    errors::{AppError, Result},
};

const DEFAULT_PAGE_SIZE: u64 = 20;

/// Create or update body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub sort_order: Option<i32>,
}

impl CategoryRequest {
    fn into_input(self) -> Result<CategoryInput> {
        Ok(CategoryInput {
            name: required_text(self.name, "name", "Category name is required")?,
            description: optional_text(self.description),
            icon: optional_text(self.icon),
            sort_order: self.sort_order,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetailResponse {
    pub category: Category,
    pub group_names: Page<GroupNameListItem>,
}

/// All categories
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.repo().list_categories().await?))
}

/// One category and a page of its approved group names
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> Result<Json<CategoryDetailResponse>> {
    let repo = state.repo();
    let category = repo
        .find_category(id)
        .await?
        .ok_or(AppError::CategoryNotFound { id })?;

    let page = PageRequest::new(query.page, query.size(), DEFAULT_PAGE_SIZE);
    let group_names = repo.by_category(id, page).await?;

    Ok(Json(CategoryDetailResponse { category, group_names }))
}

pub async fn admin_list_categories(
    _session: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.repo().list_categories().await?))
}

pub async fn create_category(
    _session: AdminSession,
    State(state): State<AppState>,
    Json(request): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<Category>)> {
    let category = state.repo().create_category(request.into_input()?).await?;

    tracing::info!(category_id = category.id, name = %category.name, "Category created");

    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<CategoryRequest>,
) -> Result<Json<Category>> {
    let category = state
        .repo()
        .update_category(id, request.into_input()?)
        .await?
        .ok_or(AppError::CategoryNotFound { id })?;

    tracing::info!(category_id = id, "Category updated");

    Ok(Json(category))
}

/// Delete a category; its group names stay, uncategorized
pub async fn delete_category(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SuccessResponse>> {
    if !state.repo().delete_category(id).await? {
        return Err(AppError::CategoryNotFound { id });
    }

    tracing::info!(category_id = id, "Category deleted");

    Ok(Json(SuccessResponse::ok()))
}

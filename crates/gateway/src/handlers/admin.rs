//! Admin session and moderation handlers
//!
//! Everything except login and logout requires an [`AdminSession`].

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use super::{
    ensure_references, parse_status, present, required_text, GroupNamesResponse, PageQuery,
    SuccessResponse,
};
use crate::AppState;
use namehub_common::{
    auth::AdminSession,
    db::{
        models::{GroupName, ModerationStatus},
        DashboardStats, GroupNameFilter, GroupNameListItem, GroupNamePatch, NewGroupName, Page,
        PageRequest,
    },
    errors::{AppError, Result},
    metrics,
};

const DEFAULT_PENDING_PAGE_SIZE: u64 = 10;
const DEFAULT_PAGE_SIZE: u64 = 20;

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthStatus {
    pub authenticated: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminGroupNamesQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub status: Option<String>,
    pub category_id: Option<i32>,
    pub collection_id: Option<i32>,
    pub search: Option<String>,
}

/// Add / edit body. On edit, an absent or null category or collection
/// clears it; an absent status keeps the current one.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupNameRequest {
    pub name: Option<String>,
    pub category_id: Option<i32>,
    pub collection_id: Option<i32>,
    pub status: Option<String>,
}

/// Category / collection reassignment. An absent field keeps the current
/// value, `null` clears it.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReassignRequest {
    #[serde(default, deserialize_with = "present")]
    pub category_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub collection_id: Option<Option<i32>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReviewRequest {
    pub status: Option<String>,
}

/// Exchange the admin token for a session cookie
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let cookie = state.auth.login(request.token.as_deref().unwrap_or_default())?;

    tracing::info!("Admin login");

    Ok(([(header::SET_COOKIE, cookie)], Json(SuccessResponse::ok())))
}

pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, state.auth.logout_cookie())],
        Json(SuccessResponse::ok()),
    )
}

pub async fn check_auth(_session: AdminSession) -> Json<AuthStatus> {
    Json(AuthStatus { authenticated: true })
}

/// Moderation dashboard counters
pub async fn stats(
    _session: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>> {
    Ok(Json(state.repo().dashboard_stats().await?))
}

/// Submissions awaiting review, newest first
pub async fn pending_group_names(
    _session: AdminSession,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<GroupNameListItem>>> {
    let page = PageRequest::new(query.page, query.size(), DEFAULT_PENDING_PAGE_SIZE);
    Ok(Json(state.repo().pending_paginated(page).await?))
}

/// Group names of any status. `status=all` or an empty status matches
/// everything.
pub async fn list_group_names(
    _session: AdminSession,
    State(state): State<AppState>,
    Query(query): Query<AdminGroupNamesQuery>,
) -> Result<Json<GroupNamesResponse>> {
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(parse_status(raw)?),
    };

    let filter = GroupNameFilter {
        status,
        category_id: query.category_id,
        collection_id: query.collection_id,
        search: query.search.map(|s| s.trim().to_string()),
    };
    let page = PageRequest::new(query.page, query.limit, DEFAULT_PAGE_SIZE);

    let result = state.repo().admin_list_group_names(&filter, page).await?;
    Ok(Json(result.into()))
}

/// Add a group name directly. It is approved unless a status is given.
pub async fn create_group_name(
    session: AdminSession,
    State(state): State<AppState>,
    Json(request): Json<GroupNameRequest>,
) -> Result<(StatusCode, Json<GroupName>)> {
    let name = required_text(request.name, "name", "Group name is required")?;
    let status = match request.status.as_deref() {
        Some(raw) => parse_status(raw)?,
        None => ModerationStatus::Approved,
    };

    let repo = state.repo();
    ensure_references(&repo, request.category_id, request.collection_id).await?;

    let group_name = repo
        .create_group_name(NewGroupName {
            name,
            category_id: request.category_id,
            collection_id: request.collection_id,
            user_id: None,
            status,
        })
        .await?;

    tracing::info!(
        group_name_id = group_name.id,
        status = %group_name.status,
        session = %session.session_id,
        "Group name added by admin"
    );

    Ok((StatusCode::CREATED, Json(group_name)))
}

pub async fn update_group_name(
    session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<GroupNameRequest>,
) -> Result<Json<GroupName>> {
    let name = required_text(request.name, "name", "Group name is required")?;
    let status = request.status.as_deref().map(parse_status).transpose()?;

    let repo = state.repo();
    ensure_references(&repo, request.category_id, request.collection_id).await?;

    let patch = GroupNamePatch {
        name: Some(name),
        category_id: Some(request.category_id),
        collection_id: Some(request.collection_id),
        status,
    };

    let group_name = repo
        .update_group_name(id, patch)
        .await?
        .ok_or(AppError::GroupNameNotFound { id })?;

    tracing::info!(
        group_name_id = id,
        status = %group_name.status,
        session = %session.session_id,
        "Group name updated"
    );

    Ok(Json(group_name))
}

/// Move a group name between categories and collections without touching
/// its name or status
pub async fn reassign_group_name(
    session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<ReassignRequest>,
) -> Result<Json<GroupName>> {
    let repo = state.repo();
    ensure_references(&repo, request.category_id.flatten(), request.collection_id.flatten()).await?;

    let patch = GroupNamePatch {
        category_id: request.category_id,
        collection_id: request.collection_id,
        ..GroupNamePatch::default()
    };

    let group_name = repo
        .update_group_name(id, patch)
        .await?
        .ok_or(AppError::GroupNameNotFound { id })?;

    tracing::info!(
        group_name_id = id,
        category_id = ?group_name.category_id,
        collection_id = ?group_name.collection_id,
        session = %session.session_id,
        "Group name reassigned"
    );

    Ok(Json(group_name))
}

pub async fn delete_group_name(
    session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SuccessResponse>> {
    if !state.repo().delete_group_name(id).await? {
        return Err(AppError::GroupNameNotFound { id });
    }

    tracing::info!(group_name_id = id, session = %session.session_id, "Group name deleted");

    Ok(Json(SuccessResponse::ok()))
}

/// Approve or reject a group name
pub async fn review_group_name(
    session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<GroupName>> {
    let status = request
        .status
        .as_deref()
        .and_then(|raw| raw.parse::<ModerationStatus>().ok())
        .filter(ModerationStatus::is_decision)
        .ok_or_else(|| AppError::validation("status", "Status must be approved or rejected"))?;

    let group_name = state
        .repo()
        .review(id, status)
        .await?
        .ok_or(AppError::GroupNameNotFound { id })?;

    metrics::record_review(status.as_str());
    tracing::info!(
        group_name_id = id,
        status = %status,
        session = %session.session_id,
        "Group name reviewed"
    );

    Ok(Json(group_name))
}

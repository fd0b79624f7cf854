//! Public submission and engagement handlers

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::SuccessResponse;
use crate::AppState;
use namehub_common::{
    db::{models::ModerationStatus, NewGroupName},
    errors::{AppError, Result},
    metrics,
};

/// Public submission body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub name: Option<String>,
    pub category_id: Option<i32>,
}

/// Trimmed submission, checked before anything is written
#[derive(Debug, Validate)]
struct Submission {
    #[validate(length(max = 50, message = "Group name must be at most 50 characters"))]
    name: String,

    #[validate(required(message = "Category is required"))]
    category_id: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    pub id: i32,
}

/// Like / copy body
#[derive(Debug, Default, Deserialize)]
pub struct EngagementRequest {
    pub id: Option<i32>,
}

/// First address in `X-Forwarded-For`, else `X-Real-IP`
fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .or_else(|| headers.get("x-real-ip").and_then(|v| v.to_str().ok()))
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
}

/// Submit a group name for moderation
pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<SubmitResponse>)> {
    let name = request.name.unwrap_or_default().trim().to_string();
    if name.is_empty() {
        return Err(AppError::validation("name", "Group name is required"));
    }

    let submission = Submission {
        name,
        category_id: request.category_id,
    };
    submission.validate()?;

    let repo = state.repo();
    let category_id = submission.category_id;
    if let Some(id) = category_id {
        if repo.find_category(id).await?.is_none() {
            return Err(AppError::validation("categoryId", format!("Unknown category: {}", id)));
        }
    }

    let ip = client_ip(&headers);
    let user = repo.find_or_create_user(ip.as_deref()).await?;

    let group_name = repo
        .create_group_name(NewGroupName {
            name: submission.name,
            category_id,
            collection_id: None,
            user_id: Some(user.id),
            status: ModerationStatus::Pending,
        })
        .await?;

    metrics::record_submission();
    tracing::info!(
        group_name_id = group_name.id,
        category_id = ?group_name.category_id,
        "Group name submitted for review"
    );

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            success: true,
            message: "Submitted, awaiting review".to_string(),
            id: group_name.id,
        }),
    ))
}

/// Count a like. Store failures are reported as `success: false` with a
/// 200 so the page never breaks on a counter.
pub async fn like(
    State(state): State<AppState>,
    Json(request): Json<EngagementRequest>,
) -> Result<Json<SuccessResponse>> {
    let id = request.id.ok_or_else(|| AppError::MissingField { field: "id".to_string() })?;

    match state.repo().increment_like(id).await {
        Ok(_) => {
            metrics::record_engagement("like", true);
            Ok(Json(SuccessResponse::ok()))
        }
        Err(e) => {
            metrics::record_engagement("like", false);
            tracing::error!(group_name_id = id, error = %e, "Failed to record like");
            Ok(Json(SuccessResponse::failed()))
        }
    }
}

/// Count a copy, which also counts as a view. Failures are swallowed like
/// [`like`].
pub async fn copy(
    State(state): State<AppState>,
    Json(request): Json<EngagementRequest>,
) -> Result<Json<SuccessResponse>> {
    let id = request.id.ok_or_else(|| AppError::MissingField { field: "id".to_string() })?;

    match state.repo().increment_copy(id).await {
        Ok(_) => {
            metrics::record_engagement("copy", true);
            Ok(Json(SuccessResponse::ok()))
        }
        Err(e) => {
            metrics::record_engagement("copy", false);
            tracing::error!(group_name_id = id, error = %e, "Failed to record copy");
            Ok(Json(SuccessResponse::failed()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_client_ip_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(client_ip(&headers).as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn test_client_ip_fallbacks() {
        let mut headers = HeaderMap::new();
        assert_eq!(client_ip(&headers), None);

        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(client_ip(&headers).as_deref(), Some("10.0.0.2"));
    }

    #[test]
    fn test_submission_validation() {
        let ok = Submission { name: "测试群名".into(), category_id: Some(3) };
        assert!(ok.validate().is_ok());

        let long = Submission { name: "群".repeat(51), category_id: Some(3) };
        assert!(long.validate().is_err());

        let exactly_fifty = Submission { name: "群".repeat(50), category_id: Some(3) };
        assert!(exactly_fifty.validate().is_ok());

        let no_category = Submission { name: "群".into(), category_id: None };
        assert!(no_category.validate().is_err());
    }
}

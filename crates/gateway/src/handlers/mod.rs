//! API handlers module

pub mod admin;
pub mod categories;
pub mod collections;
pub mod health;
pub mod listings;
pub mod submissions;

use namehub_common::{
    db::{models::ModerationStatus, GroupNameListItem, Page},
    errors::{AppError, Result},
    Repository,
};
use serde::{Deserialize, Deserializer, Serialize};

/// `page` plus a page size given as `pageSize` or `limit`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub limit: Option<u64>,
}

impl PageQuery {
    pub fn size(&self) -> Option<u64> {
        self.page_size.or(self.limit)
    }
}

/// Acknowledgement body for mutations without a payload
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true, message: None }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self { success: true, message: Some(message.into()) }
    }

    pub fn failed() -> Self {
        Self { success: false, message: None }
    }
}

/// Group name page in the `{groupNames, total, page, limit, totalPages}`
/// shape used by the browse and admin tables
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupNamesResponse {
    pub group_names: Vec<GroupNameListItem>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl From<Page<GroupNameListItem>> for GroupNamesResponse {
    fn from(page: Page<GroupNameListItem>) -> Self {
        let total_pages = page.total_pages();
        Self {
            group_names: page.data,
            total: page.total,
            page: page.page,
            limit: page.page_size,
            total_pages,
        }
    }
}

/// Keeps a present `null` apart from an absent field. Use with
/// `#[serde(default)]` so absence stays `None`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Trim a required text field, rejecting empty values
pub(crate) fn required_text(value: Option<String>, field: &str, message: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::validation(field, message))
}

/// Empty strings count as absent
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub(crate) fn parse_status(raw: &str) -> Result<ModerationStatus> {
    raw.parse::<ModerationStatus>()
        .map_err(|_| AppError::validation("status", format!("Invalid status: {}", raw)))
}

/// Reject references to categories or collections that do not exist
pub(crate) async fn ensure_references(
    repo: &Repository,
    category_id: Option<i32>,
    collection_id: Option<i32>,
) -> Result<()> {
    if let Some(id) = category_id {
        if repo.find_category(id).await?.is_none() {
            return Err(AppError::validation("categoryId", format!("Unknown category: {}", id)));
        }
    }
    if let Some(id) = collection_id {
        if repo.find_collection(id).await?.is_none() {
            return Err(AppError::validation("collectionId", format!("Unknown collection: {}", id)));
        }
    }
    Ok(())
}

//! Repository: the query layer
//!
//! Every public operation is a single statement or a small fixed sequence
//! (page + count). Public read paths always filter on
//! `status = approved`; admin paths take the status as an explicit filter.

use crate::db::models::{collection, *};
use crate::db::DbPool;
use crate::errors::{AppError, Result};
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use sea_orm::{
    sea_query::{Expr, IntoCondition}, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    FromQueryResult, IntoActiveModel, Iterable, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Largest page a caller may request
pub const MAX_PAGE_SIZE: u64 = 100;

/// Highest page number accepted. Keeps every offset within `i64`.
pub const MAX_PAGE: u64 = i64::MAX as u64 / MAX_PAGE_SIZE;

// ============================================================================
// Query and result types
// ============================================================================

/// 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    /// Build a request from optional query parameters. Missing or zero
    /// values fall back to page 1 and `default_size`; pages past
    /// [`MAX_PAGE`] are clamped to it.
    pub fn new(page: Option<u64>, page_size: Option<u64>, default_size: u64) -> Self {
        Self {
            page: page.filter(|p| *p > 0).unwrap_or(1).min(MAX_PAGE),
            page_size: page_size
                .filter(|s| *s > 0)
                .unwrap_or(default_size)
                .min(MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

/// One page of results plus the total over the whole filter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.page_size.max(1))
    }
}

/// Id and display name of a related category or collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: i32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// A group name joined with its category and collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupNameListItem {
    pub id: i32,
    pub name: String,
    pub category_id: Option<i32>,
    pub collection_id: Option<i32>,
    pub views: i32,
    pub likes: i32,
    pub copies: i32,
    pub status: ModerationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub category: Option<EntityRef>,
    pub collection: Option<EntityRef>,
}

#[derive(Debug, FromQueryResult)]
struct GroupNameRow {
    id: i32,
    name: String,
    category_id: Option<i32>,
    collection_id: Option<i32>,
    views: i32,
    likes: i32,
    copies: i32,
    status: ModerationStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    category_name: Option<String>,
    category_icon: Option<String>,
    collection_name: Option<String>,
}

impl From<GroupNameRow> for GroupNameListItem {
    fn from(row: GroupNameRow) -> Self {
        let category = row.category_id.zip(row.category_name).map(|(id, name)| EntityRef {
            id,
            name,
            icon: row.category_icon,
        });
        let collection = row.collection_id.zip(row.collection_name).map(|(id, name)| EntityRef {
            id,
            name,
            icon: None,
        });

        Self {
            id: row.id,
            name: row.name,
            category_id: row.category_id,
            collection_id: row.collection_id,
            views: row.views,
            likes: row.likes,
            copies: row.copies,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
            category,
            collection,
        }
    }
}

/// A collection with the number of approved group names in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub is_featured: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub group_names_count: i64,
}

/// Moderation dashboard counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_names: u64,
    pub pending_names: u64,
    pub approved_names: u64,
    pub today_names: u64,
}

/// Conjunctive filter over group names. Unset fields do not constrain.
#[derive(Debug, Clone, Default)]
pub struct GroupNameFilter {
    pub status: Option<ModerationStatus>,
    pub category_id: Option<i32>,
    pub collection_id: Option<i32>,
    pub search: Option<String>,
}

impl GroupNameFilter {
    fn condition(&self) -> Condition {
        let mut condition = Condition::all();
        if let Some(status) = self.status {
            condition = condition.add(GroupNameColumn::Status.eq(status));
        }
        if let Some(category_id) = self.category_id {
            condition = condition.add(GroupNameColumn::CategoryId.eq(category_id));
        }
        if let Some(collection_id) = self.collection_id {
            condition = condition.add(GroupNameColumn::CollectionId.eq(collection_id));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            condition = condition.add(GroupNameColumn::Name.contains(search));
        }
        condition
    }
}

/// Fields of a new group name
#[derive(Debug, Clone)]
pub struct NewGroupName {
    pub name: String,
    pub category_id: Option<i32>,
    pub collection_id: Option<i32>,
    pub user_id: Option<String>,
    pub status: ModerationStatus,
}

/// Partial update of a group name.
///
/// For the foreign keys `None` keeps the current value, `Some(None)` clears
/// it and `Some(Some(id))` sets it.
#[derive(Debug, Clone, Default)]
pub struct GroupNamePatch {
    pub name: Option<String>,
    pub category_id: Option<Option<i32>>,
    pub collection_id: Option<Option<i32>>,
    pub status: Option<ModerationStatus>,
}

/// Category fields written by create and update
#[derive(Debug, Clone, Default)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub sort_order: Option<i32>,
}

/// Collection fields written by create
#[derive(Debug, Clone, Default)]
pub struct CollectionInput {
    pub name: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub is_featured: bool,
    pub sort_order: Option<i32>,
}

/// Collection fields written by update. `None` keeps the stored value for
/// the flag and the sort order.
#[derive(Debug, Clone, Default)]
pub struct CollectionPatch {
    pub name: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub is_featured: Option<bool>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Copy)]
enum ListOrder {
    Latest,
    Popular,
}

/// Start and end of the UTC calendar day containing `now`
pub fn utc_day_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc.from_utc_datetime(&now.date_naive().and_time(NaiveTime::default()));
    (start, start + Duration::days(1))
}

/// Statuses visible on public read paths
fn approved() -> Condition {
    let visible: Vec<ModerationStatus> = ModerationStatus::iter()
        .filter(ModerationStatus::is_public)
        .collect();
    Condition::all().add(GroupNameColumn::Status.is_in(visible))
}

/// Group names joined with category and collection names
fn listing(condition: Condition, order: ListOrder) -> Select<GroupNameEntity> {
    let select = GroupNameEntity::find()
        .select_only()
        .columns(GroupNameColumn::iter())
        .column_as(CategoryColumn::Name, "category_name")
        .column_as(CategoryColumn::Icon, "category_icon")
        .column_as(CollectionColumn::Name, "collection_name")
        .join(JoinType::LeftJoin, GroupNameRelation::Category.def())
        .join(JoinType::LeftJoin, GroupNameRelation::Collection.def())
        .filter(condition);

    let select = match order {
        ListOrder::Latest => select.order_by_desc(GroupNameColumn::CreatedAt),
        ListOrder::Popular => select.order_by_desc(GroupNameColumn::Views),
    };
    select.order_by_desc(GroupNameColumn::Id)
}

/// Collections with their approved group name count
fn collection_summaries() -> Select<CollectionEntity> {
    CollectionEntity::find()
        .column_as(GroupNameColumn::Id.count(), "group_names_count")
        .join(
            JoinType::LeftJoin,
            collection::Relation::GroupNames.def().on_condition(|_left, right| {
                Expr::col((right, GroupNameColumn::Status))
                    .eq(ModerationStatus::Approved.as_str())
                    .into_condition()
            }),
        )
        .group_by(CollectionColumn::Id)
        .order_by_asc(CollectionColumn::SortOrder)
        .order_by_asc(CollectionColumn::Id)
}

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> &DatabaseConnection {
        self.pool.connection()
    }

    async fn fetch_rows(&self, select: Select<GroupNameEntity>, limit: u64) -> Result<Vec<GroupNameListItem>> {
        let rows = select
            .limit(limit)
            .into_model::<GroupNameRow>()
            .all(self.conn())
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn fetch_page(
        &self,
        select: Select<GroupNameEntity>,
        page: PageRequest,
    ) -> Result<Page<GroupNameListItem>> {
        let paginator = select
            .into_model::<GroupNameRow>()
            .paginate(self.conn(), page.page_size);

        let total = paginator.num_items().await?;
        // Past the last row there is nothing to fetch
        let rows = if page.offset() >= total {
            Vec::new()
        } else {
            paginator.fetch_page(page.page - 1).await?
        };

        Ok(Page {
            data: rows.into_iter().map(Into::into).collect(),
            total,
            page: page.page,
            page_size: page.page_size,
        })
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    // ========================================================================
    // Public listings
    // ========================================================================

    /// Most recent approved group names
    pub async fn latest(&self, limit: u64) -> Result<Vec<GroupNameListItem>> {
        self.fetch_rows(listing(approved(), ListOrder::Latest), limit).await
    }

    pub async fn latest_paginated(&self, page: PageRequest) -> Result<Page<GroupNameListItem>> {
        self.fetch_page(listing(approved(), ListOrder::Latest), page).await
    }

    /// Most viewed approved group names
    pub async fn popular(&self, limit: u64) -> Result<Vec<GroupNameListItem>> {
        self.fetch_rows(listing(approved(), ListOrder::Popular), limit).await
    }

    pub async fn popular_paginated(&self, page: PageRequest) -> Result<Page<GroupNameListItem>> {
        self.fetch_page(listing(approved(), ListOrder::Popular), page).await
    }

    pub async fn by_category(&self, category_id: i32, page: PageRequest) -> Result<Page<GroupNameListItem>> {
        let condition = approved().add(GroupNameColumn::CategoryId.eq(category_id));
        self.fetch_page(listing(condition, ListOrder::Latest), page).await
    }

    pub async fn by_collection(&self, collection_id: i32, page: PageRequest) -> Result<Page<GroupNameListItem>> {
        let condition = approved().add(GroupNameColumn::CollectionId.eq(collection_id));
        self.fetch_page(listing(condition, ListOrder::Latest), page).await
    }

    /// Approved group names whose name contains `query`, most viewed first
    pub async fn search(&self, query: &str, limit: u64) -> Result<Vec<GroupNameListItem>> {
        let condition = approved().add(GroupNameColumn::Name.contains(query));
        self.fetch_rows(listing(condition, ListOrder::Popular), limit).await
    }

    /// Approved group names matching the optional filters. A status in the
    /// filter is ignored.
    pub async fn list_public(
        &self,
        filter: &GroupNameFilter,
        page: PageRequest,
    ) -> Result<Page<GroupNameListItem>> {
        let filter = GroupNameFilter {
            status: Some(ModerationStatus::Approved),
            ..filter.clone()
        };
        self.fetch_page(listing(filter.condition(), ListOrder::Latest), page).await
    }

    // ========================================================================
    // Categories
    // ========================================================================

    /// All categories by sort order, then name
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        CategoryEntity::find()
            .order_by_asc(CategoryColumn::SortOrder)
            .order_by_asc(CategoryColumn::Name)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    pub async fn find_category(&self, id: i32) -> Result<Option<Category>> {
        CategoryEntity::find_by_id(id)
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    pub async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        CategoryEntity::find()
            .filter(CategoryColumn::Name.eq(name))
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    pub async fn create_category(&self, input: CategoryInput) -> Result<Category> {
        let name = input.name.clone();
        let category = CategoryActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            icon: Set(input.icon),
            sort_order: Set(input.sort_order.unwrap_or(0)),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        category
            .insert(self.conn())
            .await
            .map_err(|e| AppError::from_unique(e, format!("Category '{}' already exists", name)))
    }

    /// Overwrite a category's fields. The sort order is kept when not given.
    pub async fn update_category(&self, id: i32, input: CategoryInput) -> Result<Option<Category>> {
        let Some(existing) = self.find_category(id).await? else {
            return Ok(None);
        };

        let name = input.name.clone();
        let mut category = existing.into_active_model();
        category.name = Set(input.name);
        category.description = Set(input.description);
        category.icon = Set(input.icon);
        if let Some(sort_order) = input.sort_order {
            category.sort_order = Set(sort_order);
        }

        category
            .update(self.conn())
            .await
            .map(Some)
            .map_err(|e| AppError::from_unique(e, format!("Category '{}' already exists", name)))
    }

    /// Delete a category. Group names that referenced it keep existing with
    /// no category.
    pub async fn delete_category(&self, id: i32) -> Result<bool> {
        let txn = self.conn().begin().await?;

        GroupNameEntity::update_many()
            .col_expr(GroupNameColumn::CategoryId, Expr::value(Option::<i32>::None))
            .filter(GroupNameColumn::CategoryId.eq(id))
            .exec(&txn)
            .await?;

        let result = CategoryEntity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(result.rows_affected > 0)
    }

    // ========================================================================
    // Collections
    // ========================================================================

    /// All collections with their approved group name counts
    pub async fn list_collections(&self) -> Result<Vec<CollectionSummary>> {
        collection_summaries()
            .into_model::<CollectionSummary>()
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Featured collections with their approved group name counts
    pub async fn featured_collections(&self, limit: u64) -> Result<Vec<CollectionSummary>> {
        collection_summaries()
            .filter(CollectionColumn::IsFeatured.eq(true))
            .limit(limit)
            .into_model::<CollectionSummary>()
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    pub async fn find_collection(&self, id: i32) -> Result<Option<Collection>> {
        CollectionEntity::find_by_id(id)
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    pub async fn find_collection_by_name(&self, name: &str) -> Result<Option<Collection>> {
        CollectionEntity::find()
            .filter(CollectionColumn::Name.eq(name))
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    pub async fn create_collection(&self, input: CollectionInput) -> Result<Collection> {
        let now = Utc::now();
        let collection = CollectionActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            cover_image: Set(input.cover_image),
            is_featured: Set(input.is_featured),
            sort_order: Set(input.sort_order.unwrap_or(0)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        collection.insert(self.conn()).await.map_err(Into::into)
    }

    pub async fn update_collection(&self, id: i32, patch: CollectionPatch) -> Result<Option<Collection>> {
        let Some(existing) = self.find_collection(id).await? else {
            return Ok(None);
        };

        let mut collection = existing.into_active_model();
        collection.name = Set(patch.name);
        collection.description = Set(patch.description);
        collection.cover_image = Set(patch.cover_image);
        if let Some(is_featured) = patch.is_featured {
            collection.is_featured = Set(is_featured);
        }
        if let Some(sort_order) = patch.sort_order {
            collection.sort_order = Set(sort_order);
        }
        collection.updated_at = Set(Utc::now());

        collection.update(self.conn()).await.map(Some).map_err(Into::into)
    }

    /// Delete a collection. Group names that referenced it keep existing
    /// outside any collection.
    pub async fn delete_collection(&self, id: i32) -> Result<bool> {
        let txn = self.conn().begin().await?;

        GroupNameEntity::update_many()
            .col_expr(GroupNameColumn::CollectionId, Expr::value(Option::<i32>::None))
            .filter(GroupNameColumn::CollectionId.eq(id))
            .exec(&txn)
            .await?;

        let result = CollectionEntity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(result.rows_affected > 0)
    }

    // ========================================================================
    // Submitters
    // ========================================================================

    /// Reuse the submitter row recorded for `ip_address`, or create one.
    /// Without an address a fresh row is created every time.
    pub async fn find_or_create_user(&self, ip_address: Option<&str>) -> Result<User> {
        if let Some(ip) = ip_address {
            let existing = UserEntity::find()
                .filter(UserColumn::IpAddress.eq(ip))
                .one(self.conn())
                .await?;
            if let Some(user) = existing {
                return Ok(user);
            }
        }

        let now = Utc::now();
        let user = UserActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            ip_address: Set(ip_address.map(String::from)),
            created_at: Set(now),
            last_active: Set(now),
        };

        user.insert(self.conn()).await.map_err(Into::into)
    }

    // ========================================================================
    // Group names
    // ========================================================================

    pub async fn find_group_name(&self, id: i32) -> Result<Option<GroupName>> {
        GroupNameEntity::find_by_id(id)
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Insert a group name with zeroed counters. Duplicate names are allowed.
    pub async fn create_group_name(&self, new: NewGroupName) -> Result<GroupName> {
        let now = Utc::now();
        let group_name = GroupNameActiveModel {
            name: Set(new.name),
            category_id: Set(new.category_id),
            user_id: Set(new.user_id),
            collection_id: Set(new.collection_id),
            views: Set(0),
            likes: Set(0),
            copies: Set(0),
            status: Set(new.status),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        group_name.insert(self.conn()).await.map_err(Into::into)
    }

    /// Count a copy, which also counts as a view. Unknown ids are a no-op.
    pub async fn increment_copy(&self, id: i32) -> Result<u64> {
        let result = GroupNameEntity::update_many()
            .col_expr(GroupNameColumn::Copies, Expr::col(GroupNameColumn::Copies).add(1))
            .col_expr(GroupNameColumn::Views, Expr::col(GroupNameColumn::Views).add(1))
            .filter(GroupNameColumn::Id.eq(id))
            .exec(self.conn())
            .await?;

        Ok(result.rows_affected)
    }

    /// Count a like. Unknown ids are a no-op.
    pub async fn increment_like(&self, id: i32) -> Result<u64> {
        let result = GroupNameEntity::update_many()
            .col_expr(GroupNameColumn::Likes, Expr::col(GroupNameColumn::Likes).add(1))
            .filter(GroupNameColumn::Id.eq(id))
            .exec(self.conn())
            .await?;

        Ok(result.rows_affected)
    }

    // ========================================================================
    // Moderation
    // ========================================================================

    /// Submissions awaiting review, newest first
    pub async fn pending_paginated(&self, page: PageRequest) -> Result<Page<GroupNameListItem>> {
        let condition = Condition::all().add(GroupNameColumn::Status.eq(ModerationStatus::Pending));
        self.fetch_page(listing(condition, ListOrder::Latest), page).await
    }

    /// Set the moderation status. Already reviewed rows may be reviewed
    /// again.
    pub async fn review(&self, id: i32, status: ModerationStatus) -> Result<Option<GroupName>> {
        let Some(existing) = self.find_group_name(id).await? else {
            return Ok(None);
        };

        let mut group_name = existing.into_active_model();
        group_name.status = Set(status);
        group_name.updated_at = Set(Utc::now());

        group_name.update(self.conn()).await.map(Some).map_err(Into::into)
    }

    /// Four independent counts; "today" is the current UTC day.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        let (day_start, day_end) = utc_day_bounds(Utc::now());

        let (total_names, pending_names, approved_names, today_names) = tokio::try_join!(
            GroupNameEntity::find().count(self.conn()),
            GroupNameEntity::find()
                .filter(GroupNameColumn::Status.eq(ModerationStatus::Pending))
                .count(self.conn()),
            GroupNameEntity::find()
                .filter(GroupNameColumn::Status.eq(ModerationStatus::Approved))
                .count(self.conn()),
            GroupNameEntity::find()
                .filter(GroupNameColumn::CreatedAt.gte(day_start))
                .filter(GroupNameColumn::CreatedAt.lt(day_end))
                .count(self.conn()),
        )?;

        Ok(DashboardStats {
            total_names,
            pending_names,
            approved_names,
            today_names,
        })
    }

    /// Group names of any status matching the filter, newest first
    pub async fn admin_list_group_names(
        &self,
        filter: &GroupNameFilter,
        page: PageRequest,
    ) -> Result<Page<GroupNameListItem>> {
        self.fetch_page(listing(filter.condition(), ListOrder::Latest), page).await
    }

    pub async fn update_group_name(&self, id: i32, patch: GroupNamePatch) -> Result<Option<GroupName>> {
        let Some(existing) = self.find_group_name(id).await? else {
            return Ok(None);
        };

        let mut group_name = existing.into_active_model();
        if let Some(name) = patch.name {
            group_name.name = Set(name);
        }
        if let Some(category_id) = patch.category_id {
            group_name.category_id = Set(category_id);
        }
        if let Some(collection_id) = patch.collection_id {
            group_name.collection_id = Set(collection_id);
        }
        if let Some(status) = patch.status {
            group_name.status = Set(status);
        }
        group_name.updated_at = Set(Utc::now());

        group_name.update(self.conn()).await.map(Some).map_err(Into::into)
    }

    /// Hard delete
    pub async fn delete_group_name(&self, id: i32) -> Result<bool> {
        let result = GroupNameEntity::delete_by_id(id).exec(self.conn()).await?;
        Ok(result.rows_affected > 0)
    }

    /// Group names with neither a category nor a collection, oldest first
    pub async fn untagged_group_names(&self, limit: u64) -> Result<Vec<GroupName>> {
        GroupNameEntity::find()
            .filter(GroupNameColumn::CategoryId.is_null())
            .filter(GroupNameColumn::CollectionId.is_null())
            .order_by_asc(GroupNameColumn::Id)
            .limit(limit)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }
}

//! Curated collection entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "collections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Cover image URL
    #[sea_orm(nullable)]
    pub cover_image: Option<String>,

    #[sea_orm(default_value = false)]
    pub is_featured: bool,

    #[sea_orm(default_value = 0)]
    pub sort_order: i32,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::group_name::Entity")]
    GroupNames,
}

impl Related<super::group_name::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GroupNames.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

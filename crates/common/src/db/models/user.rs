//! Anonymous submitter entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Client address recorded at first submission
    #[sea_orm(nullable)]
    pub ip_address: Option<String>,

    pub created_at: DateTimeUtc,

    /// Never advanced after creation
    pub last_active: DateTimeUtc,
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

//! SeaORM entity models
//!
//! Database entities for NameHub

pub(crate) mod category;
pub(crate) mod collection;
pub(crate) mod group_name;
pub(crate) mod user;

pub use category::{
    Entity as CategoryEntity,
    Model as Category,
    ActiveModel as CategoryActiveModel,
    Column as CategoryColumn,
};

pub use collection::{
    Entity as CollectionEntity,
    Model as Collection,
    ActiveModel as CollectionActiveModel,
    Column as CollectionColumn,
};

pub use group_name::{
    Entity as GroupNameEntity,
    Model as GroupName,
    ActiveModel as GroupNameActiveModel,
    Column as GroupNameColumn,
    ModerationStatus,
    Relation as GroupNameRelation,
};

pub use user::{
    Entity as UserEntity,
    Model as User,
    ActiveModel as UserActiveModel,
    Column as UserColumn,
};

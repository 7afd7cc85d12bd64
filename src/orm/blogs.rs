//! SeaORM Entity for blogs table

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "blogs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub url: String,
    pub feed: String,
    pub subtitle: Option<String>,
    pub author: Option<String>,
    pub is_approved: bool,
    /// Blogs kept for internal use and excluded from public listings.
    pub for_special_purpose: bool,
    /// Result of the most recent automated feed check. None until checked.
    pub last_status: Option<bool>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::approval_logs::Entity")]
    ApprovalLogs,
    #[sea_orm(has_many = "super::posts::Entity")]
    Posts,
}

impl Related<super::approval_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ApprovalLogs.def()
    }
}

impl Related<super::posts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Posts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! SeaORM Entity for approval_logs table
//!
//! `status` is stored as a raw integer so new outcome codes never require a
//! migration of this table. Use [`Model::status`] for the typed view.

use crate::approval::{ApprovalError, ApprovalStatus};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "approval_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub blog_id: i32,
    pub status: i32,
    pub moderator_id: Option<i32>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl Model {
    pub fn status(&self) -> Result<ApprovalStatus, ApprovalError> {
        ApprovalStatus::from_code(self.status)
    }

    pub fn is_pending(&self) -> bool {
        self.status == ApprovalStatus::PENDING_CODE
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::blogs::Entity",
        from = "Column::BlogId",
        to = "super::blogs::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Blog,
}

impl Related<super::blogs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Blog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

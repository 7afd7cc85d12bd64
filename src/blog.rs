//! Blog lookups and automated check results

use crate::approval::ApprovalError;
use crate::orm::blogs;
use chrono::NaiveDateTime;
use sea_orm::{entity::*, query::*, sea_query::Expr, ConnectionTrait};

/// Fetch a blog or fail with `NotFound`.
pub async fn find_blog<C>(db: &C, blog_id: i32) -> Result<blogs::Model, ApprovalError>
where
    C: ConnectionTrait,
{
    blogs::Entity::find_by_id(blog_id)
        .one(db)
        .await?
        .ok_or_else(|| ApprovalError::blog_not_found(blog_id))
}

/// Record the result of an automated check of a blog's feed.
///
/// Only `last_status` and `updated_at` change; moderation state is untouched.
pub async fn record_check<C>(
    db: &C,
    blog_id: i32,
    ok: bool,
    now: NaiveDateTime,
) -> Result<(), ApprovalError>
where
    C: ConnectionTrait,
{
    let result = blogs::Entity::update_many()
        .col_expr(blogs::Column::LastStatus, Expr::value(Some(ok)))
        .col_expr(blogs::Column::UpdatedAt, Expr::value(now))
        .filter(blogs::Column::Id.eq(blog_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(ApprovalError::blog_not_found(blog_id));
    }

    if !ok {
        log::warn!("Automated check failed for blog {}", blog_id);
    }

    Ok(())
}

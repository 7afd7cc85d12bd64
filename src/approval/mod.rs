//! Moderation pipeline for submitted blogs.
//!
//! Every submitted blog gets an `approval_logs` entry in the pending state
//! (status `-1`). A moderator resolves the entry exactly once; the resolution
//! is guarded by a conditional update on the status column so concurrent
//! decisions on the same entry cannot both succeed.

mod error;
mod status;

pub use error::ApprovalError;
pub use status::{ApprovalStatus, Outcome};

use crate::orm::{approval_logs, blogs};
use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    entity::*, query::*, sea_query::Expr, ActiveValue::Set, ConnectionTrait, PaginatorTrait,
    TransactionTrait,
};

/// Identity of the moderator taking a decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Moderator {
    pub id: i32,
}

impl Moderator {
    pub fn new(id: i32) -> Self {
        Self { id }
    }
}

/// Fields supplied when a blog is submitted for review.
#[derive(Clone, Debug, Default)]
pub struct NewBlog {
    pub title: String,
    pub url: String,
    pub feed: String,
    pub subtitle: Option<String>,
    pub author: Option<String>,
    pub for_special_purpose: bool,
}

/// An approval log entry together with the blog it refers to.
#[derive(Clone, Debug)]
pub struct ApprovalLogView {
    pub log: approval_logs::Model,
    pub blog: Option<blogs::Model>,
}

impl From<(approval_logs::Model, Option<blogs::Model>)> for ApprovalLogView {
    fn from((log, blog): (approval_logs::Model, Option<blogs::Model>)) -> Self {
        Self { log, blog }
    }
}

/// One page of resolved entries.
#[derive(Clone, Debug)]
pub struct ResolvedPage {
    pub entries: Vec<ApprovalLogView>,
    /// 1-indexed page number that was requested
    pub page: u64,
    pub page_size: u64,
    /// Number of resolved entries across all pages
    pub total: u64,
    pub page_count: u64,
}

impl ResolvedPage {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }
}

/// Number of pages needed for `total` items. Zero when `page_size` is zero.
pub(crate) fn page_count(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        0
    } else {
        total.div_ceil(page_size)
    }
}

async fn insert_pending<C>(
    db: &C,
    blog_id: i32,
    now: NaiveDateTime,
) -> Result<approval_logs::Model, ApprovalError>
where
    C: ConnectionTrait,
{
    let entry = approval_logs::ActiveModel {
        blog_id: Set(blog_id),
        status: Set(ApprovalStatus::PENDING_CODE),
        moderator_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    Ok(entry.insert(db).await?)
}

/// Store a new blog and admit it to the review queue in one transaction.
pub async fn submit_blog<C>(
    db: &C,
    new_blog: NewBlog,
    now: NaiveDateTime,
) -> Result<(blogs::Model, approval_logs::Model), ApprovalError>
where
    C: TransactionTrait,
{
    let txn = db.begin().await?;

    let blog = blogs::ActiveModel {
        title: Set(new_blog.title),
        url: Set(new_blog.url),
        feed: Set(new_blog.feed),
        subtitle: Set(new_blog.subtitle),
        author: Set(new_blog.author),
        is_approved: Set(false),
        for_special_purpose: Set(new_blog.for_special_purpose),
        last_status: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let entry = insert_pending(&txn, blog.id, now).await?;

    txn.commit().await?;

    log::info!(
        "Blog {} ({}) submitted for review as approval log {}",
        blog.id,
        blog.url,
        entry.id
    );

    Ok((blog, entry))
}

/// Put an existing blog back in the review queue with a fresh pending entry.
///
/// A blog has at most one pending entry; enqueueing it again while one is
/// waiting fails with [`ApprovalError::InvalidStateTransition`].
pub async fn enqueue<C>(
    db: &C,
    blog_id: i32,
    now: NaiveDateTime,
) -> Result<approval_logs::Model, ApprovalError>
where
    C: TransactionTrait,
{
    let txn = db.begin().await?;

    if blogs::Entity::find_by_id(blog_id).one(&txn).await?.is_none() {
        txn.rollback().await?;
        return Err(ApprovalError::blog_not_found(blog_id));
    }

    let waiting = approval_logs::Entity::find()
        .filter(approval_logs::Column::BlogId.eq(blog_id))
        .filter(approval_logs::Column::Status.eq(ApprovalStatus::PENDING_CODE))
        .one(&txn)
        .await?;

    if let Some(waiting) = waiting {
        txn.rollback().await?;
        return Err(ApprovalError::InvalidStateTransition(format!(
            "blog #{} is already waiting for review (approval log #{})",
            blog_id, waiting.id
        )));
    }

    let entry = insert_pending(&txn, blog_id, now).await?;
    txn.commit().await?;

    log::info!("Blog {} queued for review as approval log {}", blog_id, entry.id);

    Ok(entry)
}

/// Resolve a pending entry at the current time.
pub async fn resolve<C>(
    db: &C,
    moderator: Moderator,
    log_id: i32,
    outcome: Outcome,
) -> Result<approval_logs::Model, ApprovalError>
where
    C: TransactionTrait,
{
    resolve_at(db, moderator, log_id, outcome, Utc::now().naive_utc()).await
}

/// Resolve a pending entry, stamping it with `now`.
///
/// Fails with [`ApprovalError::InvalidStateTransition`] if the entry is no
/// longer pending, including when another moderator resolved it first.
/// The blog's `is_approved` flag follows the outcome only when this is the
/// blog's most recent entry.
pub async fn resolve_at<C>(
    db: &C,
    moderator: Moderator,
    log_id: i32,
    outcome: Outcome,
    now: NaiveDateTime,
) -> Result<approval_logs::Model, ApprovalError>
where
    C: TransactionTrait,
{
    let txn = db.begin().await?;

    let result = approval_logs::Entity::update_many()
        .col_expr(approval_logs::Column::Status, Expr::value(outcome.code()))
        .col_expr(
            approval_logs::Column::ModeratorId,
            Expr::value(Some(moderator.id)),
        )
        .col_expr(approval_logs::Column::UpdatedAt, Expr::value(now))
        .filter(approval_logs::Column::Id.eq(log_id))
        .filter(approval_logs::Column::Status.eq(ApprovalStatus::PENDING_CODE))
        .exec(&txn)
        .await?;

    if result.rows_affected == 0 {
        let current = approval_logs::Entity::find_by_id(log_id).one(&txn).await?;
        txn.rollback().await?;

        return Err(match current {
            None => ApprovalError::log_not_found(log_id),
            Some(entry) => {
                log::warn!(
                    "Moderator {} tried to mark approval log {} as {}, but it is already resolved (status {})",
                    moderator.id,
                    log_id,
                    outcome,
                    entry.status
                );
                ApprovalError::InvalidStateTransition(format!(
                    "approval log #{} is not pending (status {})",
                    log_id, entry.status
                ))
            }
        });
    }

    let entry = approval_logs::Entity::find_by_id(log_id)
        .one(&txn)
        .await?
        .ok_or_else(|| ApprovalError::log_not_found(log_id))?;

    // Only the blog's most recent entry decides whether it is listed
    let newer = approval_logs::Entity::find()
        .filter(approval_logs::Column::BlogId.eq(entry.blog_id))
        .filter(approval_logs::Column::Id.gt(entry.id))
        .count(&txn)
        .await?;

    if newer > 0 {
        txn.commit().await?;
        log::warn!(
            "Moderator {} marked approval log {} as {}, but blog {} has a newer entry; blog left unchanged",
            moderator.id,
            entry.id,
            outcome,
            entry.blog_id
        );
        return Ok(entry);
    }

    let blog_update = blogs::Entity::update_many()
        .col_expr(
            blogs::Column::IsApproved,
            Expr::value(outcome.approves_blog()),
        )
        .col_expr(blogs::Column::UpdatedAt, Expr::value(now))
        .filter(blogs::Column::Id.eq(entry.blog_id))
        .exec(&txn)
        .await?;

    if blog_update.rows_affected == 0 {
        txn.rollback().await?;
        return Err(ApprovalError::blog_not_found(entry.blog_id));
    }

    txn.commit().await?;

    log::info!(
        "Moderator {} marked blog {} as {} (approval log {})",
        moderator.id,
        entry.blog_id,
        outcome,
        entry.id
    );

    Ok(entry)
}

/// All pending entries, most recently updated first.
pub async fn list_pending<C>(db: &C) -> Result<Vec<ApprovalLogView>, ApprovalError>
where
    C: ConnectionTrait,
{
    let rows = approval_logs::Entity::find()
        .filter(approval_logs::Column::Status.eq(ApprovalStatus::PENDING_CODE))
        .order_by_desc(approval_logs::Column::UpdatedAt)
        .order_by_desc(approval_logs::Column::Id)
        .find_also_related(blogs::Entity)
        .all(db)
        .await?;

    Ok(rows.into_iter().map(ApprovalLogView::from).collect())
}

/// A 1-indexed page of resolved entries ordered by status, then recency.
///
/// Pages outside `1..=page_count` come back empty rather than failing.
pub async fn list_resolved<C>(
    db: &C,
    page: u64,
    page_size: u64,
) -> Result<ResolvedPage, ApprovalError>
where
    C: ConnectionTrait,
{
    let resolved = approval_logs::Entity::find()
        .filter(approval_logs::Column::Status.ne(ApprovalStatus::PENDING_CODE));

    let total = resolved.clone().count(db).await? as u64;
    let page_count = page_count(total, page_size);

    let entries = if page == 0 || page > page_count {
        Vec::new()
    } else {
        resolved
            .order_by_desc(approval_logs::Column::Status)
            .order_by_desc(approval_logs::Column::UpdatedAt)
            .order_by_desc(approval_logs::Column::Id)
            .find_also_related(blogs::Entity)
            .limit(page_size)
            .offset((page - 1) * page_size)
            .all(db)
            .await?
            .into_iter()
            .map(ApprovalLogView::from)
            .collect()
    };

    Ok(ResolvedPage {
        entries,
        page,
        page_size,
        total,
        page_count,
    })
}

/// Size of the review queue.
pub async fn count_pending<C>(db: &C) -> Result<u64, ApprovalError>
where
    C: ConnectionTrait,
{
    let count = approval_logs::Entity::find()
        .filter(approval_logs::Column::Status.eq(ApprovalStatus::PENDING_CODE))
        .count(db)
        .await?;

    Ok(count as u64)
}

//! Blog submission and moderation endpoints

use crate::app_config;
use crate::approval::{self, ApprovalError, ApprovalLogView, Moderator, NewBlog, Outcome};
use crate::orm::blogs;
use actix_web::{get, post, web, HttpResponse};
use chrono::{NaiveDateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(approve_results)
        .service(approve_results_page)
        .service(submit_blog)
        .service(resolve_approval)
        .service(pending_count);
}

#[derive(Serialize)]
pub(super) struct BlogView {
    id: i32,
    title: String,
    url: String,
    feed: String,
    subtitle: Option<String>,
    author: Option<String>,
    is_approved: bool,
    last_status: Option<bool>,
    created_at: NaiveDateTime,
}

impl From<blogs::Model> for BlogView {
    fn from(blog: blogs::Model) -> Self {
        Self {
            id: blog.id,
            title: blog.title,
            url: blog.url,
            feed: blog.feed,
            subtitle: blog.subtitle,
            author: blog.author,
            is_approved: blog.is_approved,
            last_status: blog.last_status,
            created_at: blog.created_at,
        }
    }
}

#[derive(Serialize)]
struct ApprovalLogResponse {
    id: i32,
    blog_id: i32,
    status: i32,
    status_label: &'static str,
    moderator_id: Option<i32>,
    updated_at: NaiveDateTime,
    blog: Option<BlogView>,
}

impl From<ApprovalLogView> for ApprovalLogResponse {
    fn from(view: ApprovalLogView) -> Self {
        let status_label = view.log.status().map(|s| s.as_str()).unwrap_or("unknown");
        Self {
            id: view.log.id,
            blog_id: view.log.blog_id,
            status: view.log.status,
            status_label,
            moderator_id: view.log.moderator_id,
            updated_at: view.log.updated_at,
            blog: view.blog.map(BlogView::from),
        }
    }
}

#[derive(Serialize)]
struct ApprovalResultsResponse {
    pending: Vec<ApprovalLogResponse>,
    resolved: Vec<ApprovalLogResponse>,
    page: u64,
    page_size: u64,
    total_resolved: u64,
    page_count: u64,
    has_prev: bool,
    has_next: bool,
}

/// Pending queue and first page of resolved decisions
#[get("/approve_results")]
async fn approve_results(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, ApprovalError> {
    render_approve_results(db.get_ref(), 1).await
}

/// Pending queue and a later page of resolved decisions
#[get("/approve_results/page/{page}")]
async fn approve_results_page(
    db: web::Data<DatabaseConnection>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApprovalError> {
    render_approve_results(db.get_ref(), path.into_inner()).await
}

async fn render_approve_results(
    db: &DatabaseConnection,
    page: u64,
) -> Result<HttpResponse, ApprovalError> {
    let page_size = app_config::approvals().page_size;

    let pending = approval::list_pending(db).await?;
    let resolved = approval::list_resolved(db, page, page_size).await?;

    let has_prev = resolved.has_prev();
    let has_next = resolved.has_next();

    Ok(HttpResponse::Ok().json(ApprovalResultsResponse {
        pending: pending.into_iter().map(ApprovalLogResponse::from).collect(),
        page: resolved.page,
        page_size: resolved.page_size,
        total_resolved: resolved.total,
        page_count: resolved.page_count,
        has_prev,
        has_next,
        resolved: resolved
            .entries
            .into_iter()
            .map(ApprovalLogResponse::from)
            .collect(),
    }))
}

#[derive(Deserialize)]
struct SubmitBlogForm {
    title: String,
    url: String,
    feed: String,
    subtitle: Option<String>,
    author: Option<String>,
}

#[derive(Serialize)]
struct SubmitBlogResponse {
    success: bool,
    message: String,
    blog_id: Option<i32>,
    approval_log_id: Option<i32>,
}

/// Submit a blog for review
#[post("/blogs")]
async fn submit_blog(
    db: web::Data<DatabaseConnection>,
    form: web::Json<SubmitBlogForm>,
) -> Result<HttpResponse, ApprovalError> {
    let form = form.into_inner();

    if form.title.trim().is_empty() || form.url.trim().is_empty() || form.feed.trim().is_empty()
    {
        return Ok(HttpResponse::BadRequest().json(SubmitBlogResponse {
            success: false,
            message: "Title, URL and feed are required".to_string(),
            blog_id: None,
            approval_log_id: None,
        }));
    }

    let new_blog = NewBlog {
        title: form.title.trim().to_string(),
        url: form.url.trim().to_string(),
        feed: form.feed.trim().to_string(),
        subtitle: form.subtitle.filter(|s| !s.trim().is_empty()),
        author: form.author.filter(|s| !s.trim().is_empty()),
        for_special_purpose: false,
    };

    let (blog, entry) =
        approval::submit_blog(db.get_ref(), new_blog, Utc::now().naive_utc()).await?;

    Ok(HttpResponse::Created().json(SubmitBlogResponse {
        success: true,
        message: "Blog submitted. It will appear once a moderator approves it.".to_string(),
        blog_id: Some(blog.id),
        approval_log_id: Some(entry.id),
    }))
}

#[derive(Deserialize)]
struct ResolveForm {
    moderator_id: i32,
    outcome: Outcome,
}

/// Approve or reject a pending entry
#[post("/admin/approvals/{id}/resolve")]
async fn resolve_approval(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    form: web::Json<ResolveForm>,
) -> Result<HttpResponse, ApprovalError> {
    let log_id = path.into_inner();
    let moderator = Moderator::new(form.moderator_id);

    let entry = approval::resolve(db.get_ref(), moderator, log_id, form.outcome).await?;

    Ok(HttpResponse::Ok().json(ApprovalLogResponse::from(ApprovalLogView {
        log: entry,
        blog: None,
    })))
}

#[derive(Serialize)]
struct PendingCountResponse {
    pending: u64,
}

/// Size of the review queue, for the moderator badge
#[get("/admin/approvals/pending_count")]
async fn pending_count(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, ApprovalError> {
    let pending = approval::count_pending(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(PendingCountResponse { pending }))
}

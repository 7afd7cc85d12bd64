use super::approvals::BlogView;
use crate::app_config;
use crate::asset;
use crate::site::{self, PostWithBlog};
use actix_web::{error, get, web, Error, HttpResponse};
use chrono::NaiveDateTime;
use sea_orm::DatabaseConnection;
use serde::Serialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_index);
}

#[derive(Serialize)]
struct PostView {
    id: i32,
    title: String,
    url: String,
    published_at: NaiveDateTime,
    recommend: bool,
    blog_id: i32,
    blog_title: Option<String>,
}

impl From<PostWithBlog> for PostView {
    fn from(row: PostWithBlog) -> Self {
        Self {
            id: row.post.id,
            title: row.post.title,
            url: row.post.url,
            published_at: row.post.published_at,
            recommend: row.post.recommend,
            blog_id: row.post.blog_id,
            blog_title: row.blog.map(|b| b.title),
        }
    }
}

#[derive(Serialize)]
struct IndexResponse {
    site_name: String,
    stylesheet: String,
    script: String,
    blogs: Vec<BlogView>,
    blogs_count: u64,
    posts_count: u64,
    latest_posts: Vec<PostView>,
    latest_blogs: Vec<BlogView>,
}

#[get("/")]
async fn view_index(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, Error> {
    let summary = site::home_summary(db.get_ref(), app_config::home().latest_limit)
        .await
        .map_err(|e| {
            log::error!("Failed to build home summary: {}", e);
            error::ErrorInternalServerError("Database error")
        })?;

    Ok(HttpResponse::Ok().json(IndexResponse {
        site_name: app_config::site().name,
        stylesheet: asset::link_tag("css/style.css"),
        script: asset::script_tag("js/blogbar.js"),
        blogs: summary.blogs.into_iter().map(BlogView::from).collect(),
        blogs_count: summary.blogs_count,
        posts_count: summary.posts_count,
        latest_posts: summary.latest_posts.into_iter().map(PostView::from).collect(),
        latest_blogs: summary.latest_blogs.into_iter().map(BlogView::from).collect(),
    }))
}

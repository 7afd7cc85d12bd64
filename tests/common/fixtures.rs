//! Test fixtures for creating test data
#![allow(dead_code)]
#![allow(clippy::needless_update)]

use blogbar::approval::{self, ApprovalError, NewBlog};
use blogbar::orm::{approval_logs, blogs, posts};
use chrono::NaiveDateTime;
use sea_orm::{entity::*, ActiveValue::Set, DatabaseConnection, DbErr};

/// Whole-second timestamp, `secs` after the Unix epoch
pub fn ts(secs: i64) -> NaiveDateTime {
    NaiveDateTime::from_timestamp_opt(secs, 0).expect("Timestamp out of range")
}

/// Submission fields for a blog called `name`
pub fn new_blog(name: &str) -> NewBlog {
    NewBlog {
        title: name.to_string(),
        url: format!("https://{}.example.com", name),
        feed: format!("https://{}.example.com/feed.xml", name),
        subtitle: None,
        author: Some(format!("{} author", name)),
        for_special_purpose: false,
    }
}

/// Create a blog row directly, bypassing the review queue
pub async fn create_test_blog(
    db: &DatabaseConnection,
    name: &str,
    is_approved: bool,
    for_special_purpose: bool,
    created_at: NaiveDateTime,
) -> Result<blogs::Model, DbErr> {
    let blog = blogs::ActiveModel {
        title: Set(name.to_string()),
        url: Set(format!("https://{}.example.com", name)),
        feed: Set(format!("https://{}.example.com/feed.xml", name)),
        subtitle: Set(None),
        author: Set(None),
        is_approved: Set(is_approved),
        for_special_purpose: Set(for_special_purpose),
        last_status: Set(None),
        created_at: Set(created_at),
        updated_at: Set(created_at),
        ..Default::default()
    };

    blog.insert(db).await
}

/// Options for a test post
#[derive(Default)]
pub struct PostOptions {
    pub hide: bool,
    pub is_duplicate: bool,
}

/// Create a post on `blog_id`
pub async fn create_test_post(
    db: &DatabaseConnection,
    blog_id: i32,
    title: &str,
    published_at: NaiveDateTime,
    options: PostOptions,
) -> Result<posts::Model, DbErr> {
    let post = posts::ActiveModel {
        blog_id: Set(blog_id),
        title: Set(title.to_string()),
        url: Set(format!("https://posts.example.com/{}/{}", blog_id, title)),
        content: Set(Some(format!("<p>{}</p>", title))),
        hide: Set(options.hide),
        is_duplicate: Set(options.is_duplicate),
        recommend: Set(false),
        published_at: Set(published_at),
        updated_at: Set(published_at),
        ..Default::default()
    };

    post.insert(db).await
}

/// Submit a blog called `name` at `now` and return its pending entry
pub async fn submit_test_blog(
    db: &DatabaseConnection,
    name: &str,
    now: NaiveDateTime,
) -> Result<(blogs::Model, approval_logs::Model), ApprovalError> {
    approval::submit_blog(db, new_blog(name), now).await
}

/// Reload a blog row
pub async fn reload_blog(db: &DatabaseConnection, blog_id: i32) -> blogs::Model {
    blogs::Entity::find_by_id(blog_id)
        .one(db)
        .await
        .expect("Failed to query blog")
        .expect("Blog should exist")
}

/// Reload an approval log row
pub async fn reload_log(db: &DatabaseConnection, log_id: i32) -> approval_logs::Model {
    approval_logs::Entity::find_by_id(log_id)
        .one(db)
        .await
        .expect("Failed to query approval log")
        .expect("Approval log should exist")
}

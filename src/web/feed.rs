use crate::app_config;
use crate::site::{self, PostWithBlog};
use actix_web::{get, web, HttpResponse, Responder};
use atom_syndication::{
    ContentBuilder, EntryBuilder, FeedBuilder as AtomFeedBuilder, LinkBuilder, PersonBuilder,
    TextBuilder,
};
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use moka::sync::Cache;
use once_cell::sync::Lazy;
use sea_orm::DatabaseConnection;
use std::time::Duration;

const LATEST_KEY: &str = "atom:latest";
const SUMMARY_LENGTH: usize = 500;

/// Rendered feeds, keyed by feed name. TTL comes from the feed config.
static FEED_CACHE: Lazy<Cache<String, String>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(app_config::feed().cache_ttl_secs))
        .max_capacity(64)
        .build()
});

/// Clear all cached feeds
pub fn clear_feed_cache() {
    FEED_CACHE.invalidate_all();
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(latest_posts_atom_feed);
}

/// Atom feed for the latest posts across approved blogs
#[get("/feed.atom")]
pub async fn latest_posts_atom_feed(db: web::Data<DatabaseConnection>) -> impl Responder {
    if let Some(cached) = FEED_CACHE.get(LATEST_KEY) {
        return HttpResponse::Ok()
            .content_type("application/atom+xml; charset=utf-8")
            .body(cached);
    }

    let posts = match site::latest_feed_posts(db.get_ref(), app_config::feed().item_limit).await {
        Ok(p) => p,
        Err(e) => {
            log::error!("Failed to fetch posts for Atom feed: {}", e);
            return HttpResponse::InternalServerError().body("Failed to generate feed");
        }
    };

    let content = build_atom_feed(&app_config::site(), posts);
    FEED_CACHE.insert(LATEST_KEY.to_string(), content.clone());

    HttpResponse::Ok()
        .content_type("application/atom+xml; charset=utf-8")
        .body(content)
}

fn build_atom_feed(site: &app_config::SiteConfig, posts: Vec<PostWithBlog>) -> String {
    let site_url = site.base_url.trim_end_matches('/');

    let mut entries = Vec::new();
    let mut latest_updated: Option<DateTime<FixedOffset>> = None;

    for PostWithBlog { post, blog } in posts {
        let updated = naive_to_fixed_offset(post.updated_at);
        let published = naive_to_fixed_offset(post.published_at);

        if latest_updated.is_none() || Some(updated) > latest_updated {
            latest_updated = Some(updated);
        }

        let body = post.content.unwrap_or_default();
        let mut entry_builder = EntryBuilder::default();
        entry_builder
            .id(post.url.clone())
            .title(TextBuilder::default().value(post.title).build())
            .link(
                LinkBuilder::default()
                    .href(post.url)
                    .rel("alternate".to_string())
                    .build(),
            )
            .summary(Some(
                TextBuilder::default()
                    .value(truncate_content(&body, SUMMARY_LENGTH))
                    .build(),
            ))
            .content(Some(
                ContentBuilder::default()
                    .content_type(Some("html".to_string()))
                    .value(Some(body))
                    .build(),
            ))
            .updated(updated)
            .published(Some(published));

        if let Some(blog) = blog {
            let name = blog.author.unwrap_or(blog.title);
            entry_builder.authors(vec![PersonBuilder::default()
                .name(name)
                .uri(Some(blog.url))
                .build()]);
        }

        entries.push(entry_builder.build());
    }

    let feed = AtomFeedBuilder::default()
        .id(site_url.to_string())
        .title(TextBuilder::default().value(site.name.clone()).build())
        .subtitle(Some(
            TextBuilder::default()
                .value(site.description.clone())
                .build(),
        ))
        .link(
            LinkBuilder::default()
                .href(site_url.to_string())
                .rel("alternate".to_string())
                .build(),
        )
        .link(
            LinkBuilder::default()
                .href(format!("{}/feed.atom", site_url))
                .rel("self".to_string())
                .mime_type(Some("application/atom+xml".to_string()))
                .build(),
        )
        .updated(latest_updated.unwrap_or_else(|| Utc::now().fixed_offset()))
        .entries(entries)
        .build();

    feed.to_string()
}

/// Convert NaiveDateTime to DateTime<FixedOffset> (assuming UTC)
fn naive_to_fixed_offset(dt: NaiveDateTime) -> DateTime<FixedOffset> {
    DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc).fixed_offset()
}

/// Truncate content to a maximum length, adding ellipsis if truncated
fn truncate_content(content: &str, max_len: usize) -> String {
    if content.chars().count() <= max_len {
        content.to_string()
    } else {
        let truncated: String = content.chars().take(max_len).collect();
        format!("{}...", truncated.trim_end())
    }
}

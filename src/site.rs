//! Read-only queries behind the public pages

use crate::orm::{blogs, posts};
use rand::seq::SliceRandom;
use sea_orm::{entity::*, query::*, ConnectionTrait, DbErr, PaginatorTrait};

/// A post with the blog it was published on.
#[derive(Clone, Debug)]
pub struct PostWithBlog {
    pub post: posts::Model,
    pub blog: Option<blogs::Model>,
}

impl From<(posts::Model, Option<blogs::Model>)> for PostWithBlog {
    fn from((post, blog): (posts::Model, Option<blogs::Model>)) -> Self {
        Self { post, blog }
    }
}

/// Everything the home page shows.
#[derive(Clone, Debug)]
pub struct HomeSummary {
    /// Approved blogs, shuffled
    pub blogs: Vec<blogs::Model>,
    pub blogs_count: u64,
    /// Non-duplicate posts outside special purpose blogs
    pub posts_count: u64,
    pub latest_posts: Vec<PostWithBlog>,
    pub latest_blogs: Vec<blogs::Model>,
}

/// Build the home page summary. `latest_limit` caps both "latest" lists.
pub async fn home_summary<C>(db: &C, latest_limit: u64) -> Result<HomeSummary, DbErr>
where
    C: ConnectionTrait,
{
    let mut approved = blogs::Entity::find()
        .filter(blogs::Column::IsApproved.eq(true))
        .all(db)
        .await?;
    approved.shuffle(&mut rand::thread_rng());

    let posts_count = posts::Entity::find()
        .join(JoinType::InnerJoin, posts::Relation::Blog.def())
        .filter(posts::Column::IsDuplicate.eq(false))
        .filter(blogs::Column::ForSpecialPurpose.eq(false))
        .count(db)
        .await?;

    let latest_posts = latest_posts(db, latest_limit, true).await?;

    let latest_blogs = blogs::Entity::find()
        .filter(blogs::Column::IsApproved.eq(true))
        .order_by_desc(blogs::Column::CreatedAt)
        .order_by_desc(blogs::Column::Id)
        .limit(latest_limit)
        .all(db)
        .await?;

    Ok(HomeSummary {
        blogs_count: approved.len() as u64,
        blogs: approved,
        posts_count: posts_count as u64,
        latest_posts,
        latest_blogs,
    })
}

/// Latest posts for the Atom feed. Hidden posts are left out.
pub async fn latest_feed_posts<C>(db: &C, limit: u64) -> Result<Vec<PostWithBlog>, DbErr>
where
    C: ConnectionTrait,
{
    latest_posts(db, limit, false).await
}

async fn latest_posts<C>(
    db: &C,
    limit: u64,
    include_hidden: bool,
) -> Result<Vec<PostWithBlog>, DbErr>
where
    C: ConnectionTrait,
{
    let mut query = posts::Entity::find()
        .filter(posts::Column::IsDuplicate.eq(false))
        .order_by_desc(posts::Column::PublishedAt)
        .order_by_desc(posts::Column::UpdatedAt)
        .order_by_desc(posts::Column::Id);

    if !include_hidden {
        query = query.filter(posts::Column::Hide.eq(false));
    }

    let rows = query
        .find_also_related(blogs::Entity)
        .filter(blogs::Column::ForSpecialPurpose.eq(false))
        .limit(limit)
        .all(db)
        .await?;

    Ok(rows.into_iter().map(PostWithBlog::from).collect())
}

//! Test database setup and management
#![allow(dead_code)]

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, Statement};
use std::env;

/// Get a test database connection
/// Uses TEST_DATABASE_URL environment variable or falls back to in-memory SQLite
pub async fn get_test_db() -> Result<DatabaseConnection, DbErr> {
    let database_url =
        env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());

    blogbar::db::connect(&database_url).await
}

/// Setup test database - connect and create the tables
pub async fn setup_test_database() -> Result<DatabaseConnection, DbErr> {
    let db = get_test_db().await?;
    blogbar::db::create_schema(&db).await?;
    Ok(db)
}

/// Cleanup function to remove test data
///
/// Child tables are emptied before their parents.
pub async fn cleanup_test_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    for table in ["approval_logs", "posts", "blogs"] {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            format!("DELETE FROM {}", table),
        ))
        .await?;
    }

    Ok(())
}

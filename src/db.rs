//! Database connection and schema setup

use crate::orm::{approval_logs, blogs, posts};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};
use std::time::Duration;

/// Open a connection pool for `url`.
///
/// An in-memory SQLite database only lives as long as its connection, so
/// those pools are pinned to a single connection.
pub async fn connect(url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(url.to_owned());
    options
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    if url.starts_with("sqlite") && url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }

    let db = Database::connect(options).await?;
    log::info!("Connected to database ({:?})", db.get_database_backend());
    Ok(db)
}

/// Create the blogbar tables from their entity definitions.
///
/// Parents are created before children so foreign keys resolve.
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut statements = vec![
        schema.create_table_from_entity(blogs::Entity),
        schema.create_table_from_entity(posts::Entity),
        schema.create_table_from_entity(approval_logs::Entity),
    ];

    for statement in statements.iter_mut() {
        statement.if_not_exists();
        db.execute(backend.build(&*statement)).await?;
    }

    log::info!("Database schema ready");
    Ok(())
}

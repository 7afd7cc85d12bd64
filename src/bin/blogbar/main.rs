use actix_web::http::header;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use blogbar::app_config;
use blogbar::middleware::IpBan;
use env_logger::Env;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_lib_mods();
    app_config::init();

    let config = app_config::get_config();
    let database_url = config
        .database_url()
        .context("No database configured. Set DATABASE_URL or BLOGBAR_DATABASE__URL.")?;

    let db = blogbar::db::connect(&database_url)
        .await
        .context("Failed to connect to the database")?;

    if config.database.create_schema {
        blogbar::db::create_schema(&db)
            .await
            .context("Failed to create database schema")?;
    }

    match blogbar::approval::count_pending(&db).await {
        Ok(pending) => log::info!("{} blog(s) waiting for review", pending),
        Err(e) => log::warn!("Unable to count the review queue: {}", e),
    }

    let ban_ips = config.security.ban_ips.clone();
    let behind_proxy = config.security.behind_proxy;
    if !ban_ips.is_empty() {
        log::info!("Refusing requests from {} banned address(es)", ban_ips.len());
    }

    let static_files = config.static_files.clone();
    let bind = config.server.bind.clone();
    log::info!("Listening on {}", bind);

    HttpServer::new(move || {
        // Middleware is listed in REVERSE EXECUTION ORDER.
        App::new()
            .app_data(Data::new(db.clone()))
            .wrap(
                DefaultHeaders::new()
                    .add((header::X_FRAME_OPTIONS, "DENY"))
                    .add((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
                    .add(("Referrer-Policy", "strict-origin-when-cross-origin")),
            )
            .wrap(IpBan::new(ban_ips.clone()).behind_proxy(behind_proxy))
            .wrap(Logger::new("%a %{User-Agent}i"))
            .service(actix_files::Files::new(
                &static_files.url_prefix,
                &static_files.dir,
            ))
            .configure(blogbar::web::configure)
    })
    .bind(&bind)?
    .run()
    .await?;

    Ok(())
}

/// Initialize third party crates we rely on but don't have control over.
fn init_lib_mods() {
    // A missing .env file is fine; real deployments use the environment.
    if let Err(e) = dotenv::dotenv() {
        eprintln!("No .env file loaded: {}", e);
    }
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
}

use actix_files::Files;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::time::Duration;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use yatube::cache::PageCache;
use yatube::config::Config;
use yatube::db::create_pool;
use yatube::views;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().expect("Failed to load configuration");

    log::info!(
        "Starting server on {}:{}",
        config.server.host,
        config.server.port
    );
    let pool = create_pool(&config)
        .await
        .expect("Failed to create database pool");

    log::info!("Database connection established");

    std::fs::create_dir_all(&config.media.root)?;
    let cache = web::Data::new(PageCache::new(Duration::from_secs(
        config.cache.index_seconds,
    )));

    let openapi = views::ApiDoc::openapi();

    let server_host = config.server.host.clone();
    let server_port = config.server.port;
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(pool.clone()))
            .app_data(cache.clone())
            .route(
                "/api/docs",
                web::get().to(|| async {
                    actix_web::HttpResponse::PermanentRedirect()
                        .append_header(("Location", "/api/docs/"))
                        .finish()
                }),
            )
            .service(
                SwaggerUi::new("/api/docs/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
            .service(Files::new("/media", config.media.root.clone()))
            .configure(views::configure)
            .default_service(web::to(views::pages::page_not_found))
    })
    .bind(format!("{}:{}", server_host, server_port))?
    .run()
    .await
}

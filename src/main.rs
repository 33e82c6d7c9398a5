use actix_web::{App, HttpServer, middleware, web};

use pushkind_categories::db::{establish_connection_pool_with_options, run_migrations};
use pushkind_categories::mirror::GrpcBookMirror;
use pushkind_categories::models::config::ServerConfig;
use pushkind_categories::repository::DieselRepository;
use pushkind_categories::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let server_config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool_with_options(
        &server_config.database_url,
        server_config.pool_size,
        server_config.busy_timeout(),
    ) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_migrations(&pool) {
        log::error!("Failed to run migrations: {e}");
        std::process::exit(1);
    }

    let book_service = &server_config.book_service;
    if server_config.busy_timeout_ms <= book_service.timeout_ms {
        log::warn!(
            "busy_timeout_ms ({}) does not exceed the book service timeout ({} ms); queued writers may fail",
            server_config.busy_timeout_ms,
            book_service.timeout_ms
        );
    }
    let mirror = match GrpcBookMirror::connect_lazy(&book_service.url, book_service.timeout()) {
        Ok(mirror) => mirror,
        Err(e) => {
            log::error!("Failed to configure book service client: {e}");
            std::process::exit(1);
        }
    };
    log::info!("Mirroring categories to book service at {}", book_service.url);

    let repo = DieselRepository::new(pool);
    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Starting HTTP server on {}:{}",
        server_config.address,
        server_config.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(mirror.clone()))
            .configure(routes::categories::configure::<GrpcBookMirror>)
    })
    .bind(bind_address)?
    .run()
    .await
}

use actix_cors::Cors;
use actix_web::{http::header, web, App, HttpServer};
use dotenvy::dotenv;
use std::io;
use tracing::{error, info};
use tracing_actix_web::TracingLogger;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use money_tracker_be::config::AppConfig;
use money_tracker_be::{database, openapi, routes};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();

    // Initialize tracing subscriber for structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {e}");
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    let pool = database::connect(&config).await.map_err(|e| {
        error!("Failed to create pool: {e}");
        io::Error::new(io::ErrorKind::ConnectionRefused, e)
    })?;

    database::run_migrations(&pool).await.map_err(|e| {
        error!("Failed to run migrations: {e}");
        io::Error::other(e)
    })?;

    let jwt_secret = config.jwt_secret.clone();
    let allowed_origins = config.allowed_origins.clone();
    let server_pool = pool.clone();

    info!("Starting server at http://{}:{}", config.host, config.port);

    let result = HttpServer::new(move || {
        // Clone allowed_origins for this closure invocation
        let allowed_origins = allowed_origins.clone();

        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _req_head| {
                let origin_str = origin.to_str().unwrap_or("");
                allowed_origins
                    .split(',')
                    .any(|allowed| allowed.trim() == origin_str)
            })
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            // Middleware (order matters: outer to inner)
            .wrap(TracingLogger::default())
            .wrap(cors)
            // Shared state
            .app_data(web::Data::new(server_pool.clone()))
            .app_data(web::Data::new(jwt_secret.clone()))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
            )
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await;

    // The server has stopped (SIGINT/SIGTERM); release connections before exiting
    database::close(pool).await;
    result
}

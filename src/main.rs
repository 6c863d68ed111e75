//! # Pet Schedule Web Application
//!
//! Main entry point of the pet-care scheduling service.
//! Configures logging, the SQLite store, middleware and route handling.

#![recursion_limit = "256"]

pub mod api;
pub mod config;
pub mod consts;
pub mod front;
pub mod logger;
pub mod metric;
pub mod models;
pub mod repo;
pub mod utils;

use logfire::config::MetricsOptions;
use ntex::web;
use ntex_cors::Cors;

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    let app_config = &*config::APP_CONFIG;

    // Logfire when a token is configured, plain stdout otherwise
    let shutdown_handler = match &app_config.logfire_token {
        Some(token) => Some(
            logfire::configure()
                .install_panic_handler()
                .with_metrics(Some(MetricsOptions::default()))
                .send_to_logfire(logfire::config::SendToLogfire::Yes)
                .with_token(token)
                .finish()?,
        ),
        None => {
            logger::setup_simple_logger()?;
            None
        }
    };

    let sqlite_repo = repo::sqlite::SqlxSqliteRepo {
        db_pool: utils::setup_sqlite_db_pool(&app_config.db_host).await?,
    };
    utils::run_migrations(&sqlite_repo.db_pool).await?;

    log::info!(
        "starting pet-schedule env={} on {}:{}",
        app_config.env,
        app_config.web_server_host,
        app_config.web_server_port
    );

    configure_and_run_server(sqlite_repo).await?;

    if let Some(shutdown_handler) = shutdown_handler {
        shutdown_handler.shutdown()?;
    }

    Ok(())
}

fn create_app_state(sqlite_repo: repo::sqlite::SqlxSqliteRepo) -> front::AppState {
    front::AppState {
        repo: Box::new(sqlite_repo),
    }
}

async fn configure_and_run_server(sqlite_repo: repo::sqlite::SqlxSqliteRepo) -> anyhow::Result<()> {
    let app_config = &*config::APP_CONFIG;

    web::server(move || {
        web::App::new()
            .wrap(
                Cors::new()
                    .allowed_methods(vec!["GET", "HEAD", "POST", "OPTIONS", "PUT", "DELETE"])
                    .allowed_origin(&app_config.cors_allowed_origin)
                    .finish(),
            )
            .wrap(web::middleware::Logger::default())
            .wrap(web::middleware::Compress::default())
            .state(create_app_state(sqlite_repo.clone()))
            .configure(front::routes::clients)
            .configure(front::routes::pets)
            .configure(front::routes::services)
            .configure(front::routes::schedules)
            .service(front::server::health)
            .default_service(web::route().to(front::server::serve_not_found))
    })
    .bind(app_config.server_addr())?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}

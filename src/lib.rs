//! Client registry for an auto repair shop: CPF/CNPJ validation, display
//! masks, a paginated list query and the JSON API and client-side plumbing
//! built around them.

#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware, web};

#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::DieselRepository;
#[cfg(feature = "server")]
use crate::services::auth::{AdminAccount, TokenSettings};

pub mod db;
pub mod domain;
pub mod dto;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod query;
pub mod repository;
pub mod schema;
pub mod services;

#[cfg(feature = "server")]
pub mod routes;

#[cfg(feature = "client")]
pub mod debounce;
#[cfg(feature = "client")]
pub mod gateway;
#[cfg(feature = "client")]
pub mod listing;
#[cfg(feature = "client")]
pub mod session;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // Establish Diesel connection pool for the SQLite database.
    let pool = db::establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);
    let account = AdminAccount::from(&server_config);
    let tokens = TokenSettings::from(&server_config);

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!("Listening on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(account.clone()))
            .app_data(web::Data::new(tokens.clone()))
            .configure(routes::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}

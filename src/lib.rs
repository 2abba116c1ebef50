//! Back-office for managing clients, request types and client requests,
//! with a permission-checked admin panel.

#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "data")]
pub mod error_conversions;
#[cfg(feature = "server")]
pub mod extractors;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "server")]
pub mod pagination;
#[cfg(feature = "server")]
pub mod password;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "data")]
pub mod schema;
#[cfg(feature = "server")]
pub mod services;

/// App label of the back-office models.
pub const MAIN_APP_LABEL: &str = "main";
/// App label of accounts, groups and permissions.
pub const AUTH_APP_LABEL: &str = "auth";

#[cfg(feature = "server")]
pub use server::{load_config, run, seed_on_startup};

#[cfg(feature = "server")]
mod server {
    use actix_files::Files;
    use actix_identity::IdentityMiddleware;
    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::{App, HttpServer, middleware, web};
    use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
    use config::{Config, ConfigError, Environment, File};
    use tera::Tera;

    use crate::db::establish_connection_pool;
    use crate::models::config::ServerConfig;
    use crate::repository::DieselRepository;
    use crate::routes;
    use crate::services::permissions::create_limited_users_permission_group;
    use crate::services::seed::{seed_example_clients, seed_example_users};

    /// Reads `config/default.yaml`, then `config/<APP_ENV>.yaml` and finally
    /// `APP_`-prefixed environment variables.
    pub fn load_config() -> Result<ServerConfig, ConfigError> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".into());

        Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()
    }

    /// Bootstraps the permission group and demo data. Group and client
    /// failures are ignored, typically because the tables do not exist yet.
    pub fn seed_on_startup(repo: &DieselRepository, server_config: &ServerConfig) {
        if let Err(err) = create_limited_users_permission_group(repo) {
            log::debug!("Skipping permission group bootstrap: {err}");
        }
        if let Err(err) = seed_example_clients(repo) {
            log::debug!("Skipping client seeding: {err}");
        }

        if server_config.seed_demo_users {
            match seed_example_users(repo) {
                Ok(created) => {
                    if let Some(message) = seeded_users_message(&created) {
                        log::info!("{message}");
                    }
                }
                Err(err) => log::error!("Failed to seed users: {err}"),
            }
        }
    }

    /// Startup line naming the accounts seeding created; nothing on restarts.
    fn seeded_users_message(created: &[String]) -> Option<String> {
        if created.is_empty() {
            return None;
        }
        Some(format!("Seeded users: {}", created.join(", ")))
    }

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        // Establish Diesel connection pool for the SQLite database.
        let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
            std::io::Error::other(format!("Failed to establish database connection: {e}"))
        })?;

        let repo = DieselRepository::new(pool);
        seed_on_startup(&repo, &server_config);

        // Keys and stores for identity, sessions, and flash messages.
        let secret_key = Key::try_from(server_config.secret.as_bytes())
            .map_err(|e| std::io::Error::other(format!("Invalid secret: {e}")))?;

        let message_store = CookieMessageStore::builder(secret_key.clone()).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();

        let tera = Tera::new(&server_config.templates_dir)
            .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

        let bind_address = (server_config.address.clone(), server_config.port);
        log::info!("Listening on {}:{}", bind_address.0, bind_address.1);

        HttpServer::new(move || {
            App::new()
                .wrap(message_framework.clone())
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                        .cookie_secure(false) // set to true in prod
                        .build(),
                )
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .service(Files::new("/assets", "./assets"))
                .configure(routes::configure)
                .app_data(web::Data::new(tera.clone()))
                .app_data(web::Data::new(repo.clone()))
                .app_data(web::Data::new(server_config.clone()))
        })
        .bind(bind_address)?
        .run()
        .await
    }

}

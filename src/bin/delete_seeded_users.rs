//! Removes the demo accounts created by the development seeding.

use dotenvy::dotenv;

use client_desk::db::establish_connection_pool;
use client_desk::load_config;
use client_desk::repository::DieselRepository;
use client_desk::services::seed::delete_seeded_users;

fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let server_config = match load_config() {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Error loading server config: {err}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    match delete_seeded_users(&DieselRepository::new(pool)) {
        Ok(deleted) => println!("Deleted {deleted} user(s)"),
        Err(err) => {
            log::error!("Failed to delete seeded users: {err}");
            std::process::exit(1);
        }
    }
}

//! Configuration model loaded from external sources.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Settings shared across handlers and the command line tools.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    pub templates_dir: String,
    /// Cookie signing key; must be at least 64 bytes long.
    pub secret: String,
    /// Create the demo accounts at startup. Disabled in production.
    #[serde(default)]
    pub seed_demo_users: bool,
}

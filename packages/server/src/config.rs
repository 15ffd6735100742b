use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Allowed origins; an empty list means any origin.
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum multipart upload body size in bytes.
    pub max_body_size: usize,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Shared admin secret. Empty means every admin operation is refused.
    pub admin_password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding uploaded photo blobs.
    pub upload_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ShareConfig {
    /// Public base URL used to build share links handed to clients.
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub share: ShareConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("server.max_body_size", 20 * 1024 * 1024)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.url", "sqlite://data/alienshot.db?mode=rwc")?
            // No default: an unset admin password fails closed.
            .set_default("auth.admin_password", "")?
            .set_default("storage.upload_dir", "data/uploads")?
            .set_default("share.base_url", "http://localhost:5173")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., ALIENSHOT__AUTH__ADMIN_PASSWORD)
            .add_source(Environment::with_prefix("ALIENSHOT").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

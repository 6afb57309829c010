use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Endpoint used to verify Google ID tokens.
    pub google_tokeninfo_url: String,
    /// Timeout for the identity-provider call, in seconds.
    pub google_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Root directory for stored uploads.
    pub root: String,
    /// Public URL prefix under which stored keys are reachable.
    pub public_base_url: String,
    /// Hard cap enforced by the file store itself, in bytes.
    pub max_file_size: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default(
                "auth.google_tokeninfo_url",
                "https://oauth2.googleapis.com/tokeninfo",
            )?
            .set_default("auth.google_timeout_secs", 10)?
            .set_default("storage.root", "./data/uploads")?
            .set_default("storage.public_base_url", "/files")?
            .set_default("storage.max_file_size", 16 * 1024 * 1024)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., CELLAR__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("CELLAR").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

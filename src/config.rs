//! Application configuration.
//!
//! Layered the usual way: built-in defaults, then an optional TOML file,
//! then `JARSTACK_*` environment variables (`JARSTACK_SERVER__PORT=8080`).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "jarstack.toml";

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// SQLite database file.
    pub database_path: PathBuf,
    /// Where exported reports are written.
    pub output_dir: PathBuf,
    /// HTTP server settings.
    pub server: ServerConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AppConfig {
    /// Loads configuration from defaults, `path` (if it exists) and the environment.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let file = path.unwrap_or(DEFAULT_CONFIG_FILE);

        Config::builder()
            .set_default("database_path", "jarstack.db")?
            .set_default("output_dir", "reports")?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .add_source(File::with_name(file).required(false))
            .add_source(Environment::with_prefix("JARSTACK").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = AppConfig::load(Some("/nonexistent/jarstack-test.toml")).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.output_dir, PathBuf::from("reports"));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!("jarstack-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "database_path = \"/tmp/jars.db\"\n[server]\nport = 8088\n",
        )
        .unwrap();

        let config = AppConfig::load(path.to_str()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/jars.db"));
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.server.host, "0.0.0.0");
    }
}

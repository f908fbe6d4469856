// Configuration module entry point
// Loads layered configuration and holds the shared application state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, HealthConfig, HttpConfig};

/// Environment variable prefix, e.g. `POETRY_SERVER__PORT=9000`
const ENV_PREFIX: &str = "POETRY";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::builder()?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Pure defaults, no file or environment
    #[cfg(test)]
    pub fn defaults() -> Self {
        Self::builder()
            .and_then(|builder| builder.build())
            .and_then(|settings| settings.try_deserialize())
            .expect("default configuration is valid")
    }

    /// Builder preloaded with every default
    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError>
    {
        config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8002)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "poetry-mcp/0.1")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 65_536) // 64KB
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(source: &str) -> Config {
        Config::builder()
            .unwrap()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::defaults();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8002);
        assert_eq!(cfg.server.workers, None);
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert_eq!(cfg.logging.access_log_file, None);
        assert_eq!(cfg.performance.max_connections, None);
        assert_eq!(cfg.http.max_body_size, 65_536);
        assert!(!cfg.http.enable_cors);
        assert!(cfg.health.enabled);
        assert_eq!(cfg.health.liveness_path, "/healthz");
        assert_eq!(cfg.health.readiness_path, "/readyz");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let cfg = from_toml(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9100
            workers = 2

            [logging]
            level = "debug"
            access_log_format = "json"

            [performance]
            max_connections = 64

            [health]
            enabled = false
            "#,
        );
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.server.workers, Some(2));
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.logging.access_log_format, "json");
        assert_eq!(cfg.performance.max_connections, Some(64));
        assert!(!cfg.health.enabled);
        assert_eq!(cfg.health.liveness_path, "/healthz");
    }

    #[test]
    fn test_socket_addr() {
        let cfg = from_toml("");
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 8002);

        let bad = from_toml("[server]\nhost = \"not a host\"");
        assert!(bad.get_socket_addr().is_err());
    }

    #[test]
    fn test_missing_file_is_optional() {
        let cfg = Config::load_from("definitely/not/here/config").unwrap();
        assert!(!cfg.server.host.is_empty());
    }
}

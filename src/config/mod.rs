// Configuration module entry point
// Loads the startup configuration and exposes the shared application state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, FilesConfig, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};

impl Config {
    /// Load configuration from the default "config.toml" next to the binary
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional; every key has a default, so the server starts
    /// with no configuration present at all. Environment variables with the
    /// `NOCACHE` prefix override file values.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("NOCACHE"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8002)?
            .set_default("server.root", ".")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "NoCacheServe/0.1")?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .build()?;

        settings.try_deserialize()
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

    #[test]
    fn test_defaults_without_config_file() {
        let cfg = Config::load_from("definitely_missing_config").unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8002);
        assert_eq!(cfg.server.root, ".");
        assert_eq!(cfg.files.index_files, vec!["index.html", "index.htm"]);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert!(cfg.server.workers.is_none());
        assert!(cfg.performance.max_connections.is_none());
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::load_from("definitely_missing_config").unwrap();
        let addr = cfg.get_socket_addr().unwrap();
        assert_eq!(addr.port(), 8002);
        assert!(addr.ip().is_unspecified());
    }
}

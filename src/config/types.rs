// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
///
/// Built once at startup and never mutated afterwards; every connection
/// task sees the same values for the lifetime of the process.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub files: FilesConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory tree exposed to clients
    pub root: String,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Value of the Server response header
    pub server_name: String,
    pub max_body_size: u64,
}

/// Static file configuration
#[derive(Debug, Deserialize, Clone)]
pub struct FilesConfig {
    /// File names probed when a directory is requested
    #[serde(default = "default_index_files")]
    pub index_files: Vec<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_index_files() -> Vec<String> {
    vec!["index.html".to_string(), "index.htm".to_string()]
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            index_files: default_index_files(),
        }
    }
}

// Configuration module
// Layered config: optional config.toml, QUICKSERVE_* environment, coded defaults

use serde::Deserialize;
use std::net::SocketAddr;

use crate::handler::form::FormStore;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub files: FilesConfig,
    pub logging: LoggingConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FilesConfig {
    /// Root directory served to clients
    pub public_dir: String,
    /// File served when the request path is "/"
    pub index_file: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// 0 = errors only, 1 = all
    pub verbosity: u8,
    #[serde(default)]
    pub info_log_file: Option<String>,
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub keep_alive: bool,
    pub max_body_size: u64,
}

impl Config {
    /// Load configuration from `config.toml` (if present), then environment
    /// variables prefixed with `QUICKSERVE`, falling back to defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("QUICKSERVE"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 80)?
            .set_default("files.public_dir", "public")?
            .set_default("files.index_file", "index.html")?
            .set_default("logging.verbosity", 1)?
            .set_default("http.keep_alive", true)?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// Shared per-process state, one instance behind an `Arc` for all connections.
pub struct AppState {
    pub config: Config,
    /// Single-slot store for the most recent POST form, last writer wins
    pub form: FormStore,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            form: FormStore::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                workers: None,
            },
            files: FilesConfig {
                public_dir: "public".to_string(),
                index_file: "index.html".to_string(),
            },
            logging: LoggingConfig {
                verbosity: 1,
                info_log_file: None,
                error_log_file: None,
            },
            http: HttpConfig {
                keep_alive: true,
                max_body_size: 10_485_760,
            },
        }
    }

    #[test]
    fn socket_addr_joins_host_and_port() {
        let cfg = test_config();
        assert_eq!(cfg.socket_addr().unwrap().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn socket_addr_rejects_bad_host() {
        let mut cfg = test_config();
        cfg.server.host = "not a host".to_string();
        assert!(cfg.socket_addr().is_err());
    }
}

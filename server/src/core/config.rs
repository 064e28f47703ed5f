use super::cli::Cli;
use super::constants::{DEFAULT_COLLECTOR_CAPACITY, DEFAULT_HOST, DEFAULT_PORT};

/// Server binding configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Application configuration, assembled from CLI flags and environment
/// variables (clap resolves the env overrides).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub log_json: bool,
    pub collector_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            log_json: false,
            collector_capacity: DEFAULT_COLLECTOR_CAPACITY,
        }
    }
}

impl AppConfig {
    pub fn load(cli: &Cli) -> Self {
        let mut config = Self::default();
        if let Some(host) = &cli.host {
            config.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            config.server.port = port;
        }
        config.log_json = cli.log_json;
        if let Some(capacity) = cli.collector_capacity {
            config.collector_capacity = capacity;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.collector_capacity, DEFAULT_COLLECTOR_CAPACITY);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli {
            host: Some("0.0.0.0".to_string()),
            port: Some(9999),
            log_json: true,
            collector_capacity: Some(5),
        };
        let config = AppConfig::load(&cli);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9999);
        assert!(config.log_json);
        assert_eq!(config.collector_capacity, 5);
    }
}

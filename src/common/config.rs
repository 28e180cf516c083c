// Server configuration loaded from the environment

use std::env;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Bytes of request/response body shown by the debug logging middleware
    pub log_body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            log_body_limit: 4096,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // PORT - listening port
        if let Ok(port) = env::var("PORT") {
            if let Ok(val) = port.parse::<u16>() {
                config.port = val;
            }
        }

        // LOG_BODY_LIMIT - body bytes kept in debug logs
        if let Ok(limit) = env::var("LOG_BODY_LIMIT") {
            if let Ok(val) = limit.parse::<usize>() {
                config.log_body_limit = val;
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_body_limit, 4096);
    }
}

//! Application configuration management.
//!
//! All values are read from environment variables on first access of
//! [`APP_CONFIG`]. Every field has a default except the optional Logfire token,
//! so a local run needs no environment at all.

use envconfig::Envconfig;
use std::sync::LazyLock;

/// Application configuration loaded from the environment.
#[derive(Envconfig, Clone)]
pub struct AppConfig {
    /// Environment name to deploy the app
    /// Values: "local", "dev", "staging", "prod"
    #[envconfig(default = "local")]
    pub env: String,

    /// Database connection string
    /// Example: "sqlite://data/pet_schedule.db"
    #[envconfig(default = "sqlite://pet_schedule.db")]
    pub db_host: String,

    /// Host address for web server binding
    #[envconfig(default = "0.0.0.0")]
    pub web_server_host: String,

    /// Port for web server binding
    #[envconfig(default = "8080")]
    pub web_server_port: u16,

    /// Origin allowed by the CORS middleware
    #[envconfig(default = "http://localhost:8080")]
    pub cors_allowed_origin: String,

    /// 🔒 SENSITIVE: Logfire write token. When absent, logs go to stdout
    /// through simplelog and traces/metrics are not exported.
    pub logfire_token: Option<String>,
}

impl AppConfig {
    /// Checks if running in production environment
    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }

    /// Address the web server binds to
    pub fn server_addr(&self) -> (String, u16) {
        (self.web_server_host.to_string(), self.web_server_port)
    }
}

/// Global application configuration instance
///
/// If the environment holds invalid values (e.g. a non numeric port),
/// the application will panic with a descriptive error message.
pub static APP_CONFIG: LazyLock<AppConfig> = LazyLock::new(|| {
    AppConfig::init_from_env()
        .expect("Failed to load application configuration. Check environment variables.")
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_env_is_empty() {
        let config = AppConfig::init_from_hashmap(&HashMap::new()).unwrap();

        assert_eq!(config.env, "local");
        assert_eq!(config.web_server_port, 8080);
        assert!(config.logfire_token.is_none());
        assert!(!config.is_prod());
    }

    #[test]
    fn test_prod_env_from_hashmap() {
        let env = HashMap::from([
            ("ENV".to_string(), "PROD".to_string()),
            ("WEB_SERVER_PORT".to_string(), "9000".to_string()),
            ("LOGFIRE_TOKEN".to_string(), "token".to_string()),
        ]);
        let config = AppConfig::init_from_hashmap(&env).unwrap();

        assert!(config.is_prod());
        assert_eq!(config.server_addr(), ("0.0.0.0".to_string(), 9000));
        assert_eq!(config.logfire_token.as_deref(), Some("token"));
    }
}

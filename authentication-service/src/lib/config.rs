use std::env;
use std::time::Duration;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub keys: KeysConfig,
    pub token: TokenConfig,
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_database_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    /// Externally visible base URL, used as the token issuer
    pub base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KeysConfig {
    pub private_key_path: String,
    pub public_key_path: String,
    pub key_id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TokenConfig {
    #[serde(default = "default_token_lifetime")]
    pub lifetime_seconds: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
    #[serde(default = "default_max_concurrent_hashes")]
    pub max_concurrent_hashes: usize,
}

fn default_max_connections() -> u32 {
    5
}

fn default_database_timeout() -> u64 {
    5
}

fn default_request_timeout() -> u64 {
    30
}

fn default_token_lifetime() -> i64 {
    auth::DEFAULT_TOKEN_LIFETIME_SECONDS
}

fn default_max_concurrent_hashes() -> usize {
    4
}

/// Flat variables understood by existing deployments, mapped onto config keys.
const LEGACY_VARIABLES: &[(&str, &str)] = &[
    ("DATABASE_URL", "database.url"),
    ("RSA_PRIVATE_KEY_PATH", "keys.private_key_path"),
    ("RSA_PUBLIC_KEY_PATH", "keys.public_key_path"),
    ("PRODUCT_KEY_ID", "keys.key_id"),
    ("BASE_URL", "server.base_url"),
    ("PORT", "server.http_port"),
];

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Legacy flat variables (DATABASE_URL, RSA_PRIVATE_KEY_PATH, PORT, ...)
    /// 2. Environment variables (DATABASE__URL, KEYS__KEY_ID, etc.)
    /// 3. Environment-specific config file (config/{environment}.toml)
    /// 4. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let mut builder = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::default().separator("__"));

        for (variable, key) in LEGACY_VARIABLES {
            builder = builder.set_override_option(*key, env::var(variable).ok())?;
        }

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject settings the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keys.key_id.trim().is_empty() {
            return Err(ConfigError::Message("keys.key_id must not be empty".into()));
        }
        if self.token.lifetime_seconds <= 0 {
            return Err(ConfigError::Message(format!(
                "token.lifetime_seconds must be positive, got {}",
                self.token.lifetime_seconds
            )));
        }
        if self.issuer().is_empty() {
            return Err(ConfigError::Message("server.base_url must not be empty".into()));
        }
        if self.database.timeout_seconds == 0 || self.server.request_timeout_seconds == 0 {
            return Err(ConfigError::Message("timeouts must be positive".into()));
        }
        if self.password.max_concurrent_hashes == 0 {
            return Err(ConfigError::Message(
                "password.max_concurrent_hashes must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Issuer identity: the base URL without a trailing slash.
    pub fn issuer(&self) -> &str {
        self.server.base_url.trim().trim_end_matches('/')
    }

    pub fn database_timeout(&self) -> Duration {
        Duration::from_secs(self.database.timeout_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            database: DatabaseConfig {
                url: "postgres://localhost/auth".to_string(),
                max_connections: 5,
                timeout_seconds: 5,
            },
            server: ServerConfig {
                http_port: 8082,
                base_url: "http://authentication:8082/".to_string(),
                request_timeout_seconds: 30,
            },
            keys: KeysConfig {
                private_key_path: "keys/private_key.pem".to_string(),
                public_key_path: "keys/public_key.pem".to_string(),
                key_id: "product-service-key-1".to_string(),
            },
            token: TokenConfig {
                lifetime_seconds: 3600,
            },
            password: PasswordConfig {
                memory_kib: 19456,
                iterations: 2,
                parallelism: 1,
                max_concurrent_hashes: 4,
            },
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_issuer_strips_trailing_slash() {
        assert_eq!(config().issuer(), "http://authentication:8082");
    }

    #[test]
    fn test_empty_key_id_rejected() {
        let mut config = config();
        config.keys.key_id = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_lifetime_rejected() {
        let mut config = config();
        config.token.lifetime_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let mut config = config();
        config.server.base_url = "/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = config();
        config.database.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }
}

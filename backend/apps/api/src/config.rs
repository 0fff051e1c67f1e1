//! Server configuration
//!
//! Read once at startup from the process environment (after `.env` has been
//! loaded). Unset or empty variables fall back to defaults; set but
//! unparsable values are a [`ConfigError`].

use std::fmt;
use std::str::FromStr;

use kernel::validation::message::Locale;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Configuration value that never prints its contents
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Deployment environment (`APP_ENV`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment `{other}`")),
        }
    }
}

/// Application identity
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub name: String,
    pub version: String,
    pub env: Environment,
    /// Default `EnvFilter` directive when `RUST_LOG` is unset
    pub log_level: String,
}

/// Database connection settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Full connection URL; takes precedence over the discrete parts
    pub url: Option<Secret>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Secret,
    pub name: String,
    pub ssl_mode: PgSslMode,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Connection options, from `url` when set, else from the parts.
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        if let Some(url) = &self.url {
            return PgConnectOptions::from_str(url.expose()).map_err(|e| ConfigError::Invalid {
                key: "DATABASE_URL",
                value: "[REDACTED]".to_string(),
                reason: e.to_string(),
            });
        }

        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.name)
            .ssl_mode(self.ssl_mode);
        if !self.password.expose().is_empty() {
            options = options.password(self.password.expose());
        }
        Ok(options)
    }
}

/// Full server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub api_port: u16,
    pub database: DatabaseConfig,
    /// Language of validation messages
    pub locale: Locale,
    /// Allowed CORS origins
    pub frontend_origins: Vec<String>,
    /// Optional application-wide password pepper
    pub password_pepper: Option<Secret>,
}

impl Config {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        Ok(Self {
            app: AppConfig {
                name: env.string("APP_NAME", "user-service"),
                version: env.string("APP_VERSION", "1.0.0"),
                env: env.parse("APP_ENV", Environment::Development)?,
                log_level: env.string("LOG_LEVEL", "info"),
            },
            api_port: env.parse("API_PORT", 8080)?,
            database: DatabaseConfig {
                url: env.get("DATABASE_URL").map(Secret),
                host: env.string("DB_HOST", "localhost"),
                port: env.parse("DB_PORT", 5432)?,
                user: env.string("DB_USER", "postgres"),
                password: Secret(env.string("DB_PASSWORD", "")),
                name: env.string("DB_NAME", "user_service"),
                ssl_mode: env.parse("DB_SSLMODE", PgSslMode::Disable)?,
                max_connections: env.parse("DB_MAX_CONNECTIONS", 5)?,
            },
            locale: env.parse("VALIDATION_LOCALE", Locale::En)?,
            frontend_origins: env
                .string(
                    "FRONTEND_ORIGINS",
                    "http://localhost:3000,http://127.0.0.1:3000",
                )
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
            password_pepper: env.get("PASSWORD_PEPPER").map(Secret),
        })
    }
}

/// Lookup wrapper treating empty values as unset
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.is_empty())
    }

    fn string(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn parse<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            None => Ok(default),
            Some(value) => match value.trim().parse::<T>() {
                Ok(parsed) => Ok(parsed),
                Err(e) => Err(ConfigError::Invalid {
                    key,
                    reason: e.to_string(),
                    value,
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.app.name, "user-service");
        assert_eq!(config.app.env, Environment::Development);
        assert_eq!(config.api_port, 8080);
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.frontend_origins.len(), 2);
        assert!(config.password_pepper.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("APP_ENV", "prod"),
            ("API_PORT", "9000"),
            ("VALIDATION_LOCALE", "id"),
            ("FRONTEND_ORIGINS", "https://a.example, ,https://b.example"),
        ])
        .unwrap();
        assert!(config.app.env.is_production());
        assert_eq!(config.api_port, 9000);
        assert_eq!(config.locale, Locale::Id);
        assert_eq!(
            config.frontend_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn test_empty_value_uses_default() {
        let config = load(&[("API_PORT", "")]).unwrap();
        assert_eq!(config.api_port, 8080);
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        let err = load(&[("API_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "API_PORT", .. }));

        assert!(load(&[("DB_MAX_CONNECTIONS", "-1")]).is_err());
    }

    #[test]
    fn test_invalid_locale_and_env() {
        assert!(load(&[("VALIDATION_LOCALE", "fr")]).is_err());
        assert!(load(&[("APP_ENV", "qa")]).is_err());
    }

    #[test]
    fn test_secrets_are_redacted() {
        let config = load(&[("DB_PASSWORD", "hunter2"), ("PASSWORD_PEPPER", "s3cr3t")]).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("s3cr3t"));
        assert_eq!(config.database.password.expose(), "hunter2");
    }

    #[test]
    fn test_connect_options_from_parts() {
        let config = load(&[("DB_HOST", "db.internal"), ("DB_NAME", "users")]).unwrap();
        let options = config.database.connect_options().unwrap();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_database(), Some("users"));
    }

    #[test]
    fn test_connect_options_prefers_url() {
        let config = load(&[
            ("DATABASE_URL", "postgres://app@pg.example:6543/main"),
            ("DB_HOST", "ignored"),
        ])
        .unwrap();
        let options = config.database.connect_options().unwrap();
        assert_eq!(options.get_host(), "pg.example");
        assert_eq!(options.get_port(), 6543);
    }
}

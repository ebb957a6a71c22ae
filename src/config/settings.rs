//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_MAIL_FROM,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEV_JWT_SECRET,
    MIN_JWT_SECRET_LENGTH,
};
use crate::errors::{AppError, AppResult};

/// Application configuration.
///
/// Built once at process start and handed to every component constructor.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    pub request_timeout_secs: u64,
    /// Route notifications through the background job queue instead of the log
    pub notification_queue: bool,
    pub mail_from: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("notification_queue", &self.notification_queue)
            .field("mail_from", &self.mail_from)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    /// Fails if JWT_SECRET is missing in a release build or is too short.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                DEV_JWT_SECRET.to_string()
            }
            Err(_) => {
                return Err(AppError::internal(
                    "JWT_SECRET environment variable must be set in production",
                ))
            }
        };

        Self::builder(jwt_secret)
            .database_url(env::var("DATABASE_URL").ok())
            .jwt_expiration_hours(parse_var("JWT_EXPIRATION_HOURS"))
            .server_host(env::var("SERVER_HOST").ok())
            .server_port(parse_var("SERVER_PORT"))
            .request_timeout_secs(parse_var("REQUEST_TIMEOUT_SECS"))
            .notification_queue(
                env::var("NOTIFICATION_QUEUE")
                    .map(|v| v == "true" || v == "1")
                    .unwrap_or(false),
            )
            .mail_from(env::var("MAIL_FROM").ok())
            .build()
    }

    /// Start a configuration with defaults for everything but the JWT secret.
    pub fn builder(jwt_secret: impl Into<String>) -> ConfigBuilder {
        ConfigBuilder {
            config: Self {
                database_url: DEFAULT_DATABASE_URL.to_string(),
                jwt_secret: jwt_secret.into(),
                jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
                server_host: DEFAULT_SERVER_HOST.to_string(),
                server_port: DEFAULT_SERVER_PORT,
                request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
                notification_queue: false,
                mail_from: DEFAULT_MAIL_FROM.to_string(),
            },
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Builder for [`Config`]; `None` values keep the default.
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn database_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.config.database_url = url;
        }
        self
    }

    pub fn jwt_expiration_hours(mut self, hours: Option<i64>) -> Self {
        if let Some(hours) = hours {
            self.config.jwt_expiration_hours = hours;
        }
        self
    }

    pub fn server_host(mut self, host: Option<String>) -> Self {
        if let Some(host) = host {
            self.config.server_host = host;
        }
        self
    }

    pub fn server_port(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.config.server_port = port;
        }
        self
    }

    pub fn request_timeout_secs(mut self, secs: Option<u64>) -> Self {
        if let Some(secs) = secs {
            self.config.request_timeout_secs = secs;
        }
        self
    }

    pub fn notification_queue(mut self, enabled: bool) -> Self {
        self.config.notification_queue = enabled;
        self
    }

    pub fn mail_from(mut self, from: Option<String>) -> Self {
        if let Some(from) = from {
            self.config.mail_from = from;
        }
        self
    }

    /// Validate and finish the configuration.
    pub fn build(self) -> AppResult<Config> {
        if self.config.jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::internal(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            )));
        }
        Ok(self.config)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = Config::builder(DEV_JWT_SECRET).build().unwrap();
        assert_eq!(config.server_port, DEFAULT_SERVER_PORT);
        assert_eq!(config.server_addr(), "0.0.0.0:3000");
        assert!(!config.notification_queue);
    }

    #[test]
    fn test_short_secret_rejected() {
        assert!(Config::builder("too-short").build().is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::builder(DEV_JWT_SECRET).build().unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains(DEV_JWT_SECRET));
        assert!(rendered.contains("[REDACTED]"));
    }
}

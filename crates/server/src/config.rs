//! Server configuration loaded from environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Default port the API listens on.
const DEFAULT_PORT: u16 = 3000;

/// Default session lifetime in hours (one week).
const DEFAULT_SESSION_TTL_HOURS: i64 = 168;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingVariable(&'static str),

    /// An environment variable has an invalid value.
    #[error("invalid value for {name}: {reason}")]
    InvalidVariable {
        name: &'static str,
        reason: String,
    },
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Postgres connection string. Never logged.
    pub database_url: SecretString,
    /// Address the HTTP listener binds to.
    pub host: IpAddr,
    /// Port the HTTP listener binds to.
    pub port: u16,
    /// Session lifetime in hours.
    pub session_ttl_hours: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// `STRIDE_DATABASE_URL` is required (falls back to `DATABASE_URL`).
    /// `STRIDE_HOST`, `STRIDE_PORT` and `STRIDE_SESSION_TTL_HOURS` are
    /// optional with sensible defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("STRIDE_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .map(SecretString::from)
            .map_err(|_| ConfigError::MissingVariable("STRIDE_DATABASE_URL"))?;

        let host = match std::env::var("STRIDE_HOST") {
            Ok(raw) => parse_var::<IpAddr>("STRIDE_HOST", &raw)?,
            Err(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
        };

        let port = match std::env::var("STRIDE_PORT") {
            Ok(raw) => parse_var::<u16>("STRIDE_PORT", &raw)?,
            Err(_) => DEFAULT_PORT,
        };

        let session_ttl_hours = match std::env::var("STRIDE_SESSION_TTL_HOURS") {
            Ok(raw) => {
                let hours = parse_var::<i64>("STRIDE_SESSION_TTL_HOURS", &raw)?;
                if hours <= 0 {
                    return Err(ConfigError::InvalidVariable {
                        name: "STRIDE_SESSION_TTL_HOURS",
                        reason: "must be positive".to_owned(),
                    });
                }
                hours
            }
            Err(_) => DEFAULT_SESSION_TTL_HOURS,
        };

        Ok(Self {
            database_url,
            host,
            port,
            session_ttl_hours,
        })
    }

    /// Socket address to bind the listener to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Session lifetime as a `chrono::Duration`.
    #[must_use]
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::InvalidVariable {
        name,
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr_combines_host_and_port() {
        let config = ServerConfig {
            database_url: SecretString::from("postgres://localhost/stride"),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            session_ttl_hours: 24,
        };
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_parse_var_reports_name() {
        let err = parse_var::<u16>("STRIDE_PORT", "not-a-port").unwrap_err();
        assert!(err.to_string().contains("STRIDE_PORT"));
    }

    #[test]
    fn test_session_ttl() {
        let config = ServerConfig {
            database_url: SecretString::from("postgres://localhost/stride"),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            session_ttl_hours: 2,
        };
        assert_eq!(config.session_ttl(), chrono::Duration::hours(2));
    }
}

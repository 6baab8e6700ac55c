//! Server settings loaded via OrthoConfig.
//!
//! Values come from `CONTACTS_*` environment variables, CLI flags or a config
//! file. `DATABASE_URL` is honoured when `CONTACTS_DATABASE_URL` is unset.

use std::env;
use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use backend::RateLimitConfig;
use backend::middleware::rate_limit::RateLimitConfigError;
use backend::outbound::persistence::PoolConfig;
use backend::outbound::security::JwtConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TOKEN_TTL_SECONDS: i64 = 3600;

/// Raw settings as supplied by the environment.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CONTACTS")]
pub struct AppSettings {
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// HS256 signing secret for access tokens.
    pub jwt_secret: Option<String>,
    /// Access token lifetime.
    pub token_ttl_seconds: Option<i64>,
    /// Requests allowed per client per window on `/api/contacts`.
    pub rate_limit_requests: Option<u32>,
    /// Rate limit window length.
    pub rate_limit_window_seconds: Option<u64>,
    /// Apply embedded migrations at startup.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
}

/// Settings that cannot start a server.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither database URL variable is set.
    #[error("database URL is not configured; set CONTACTS_DATABASE_URL or DATABASE_URL")]
    MissingDatabaseUrl,
    /// No signing secret configured.
    #[error("JWT secret is not configured; set CONTACTS_JWT_SECRET")]
    MissingJwtSecret,
    /// The bind address does not parse as a socket address.
    #[error("invalid bind address {value:?}: {reason}")]
    InvalidBindAddr {
        /// Supplied address.
        value: String,
        /// Parser message.
        reason: String,
    },
    /// `CONTACTS_DB_MAX_CONNECTIONS` was zero.
    #[error("database pool needs at least one connection")]
    EmptyPool,
    /// Token lifetime was zero or negative.
    #[error("token TTL must be positive, got {0}")]
    InvalidTokenTtl(i64),
    /// Rate limit settings were rejected.
    #[error(transparent)]
    RateLimit(#[from] RateLimitConfigError),
}

/// Validated configuration for [`super::create_server`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) pool: PoolConfig,
    pub(crate) jwt: JwtConfig,
    pub(crate) rate_limit: RateLimitConfig,
    pub(crate) run_migrations: bool,
}

impl ServerConfig {
    /// Socket address the server listens on.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// PostgreSQL connection string.
    #[must_use]
    pub fn database_url(&self) -> &str {
        self.pool.database_url.as_str()
    }

    /// Pool settings, including the connection cap.
    #[must_use]
    pub const fn pool(&self) -> &PoolConfig {
        &self.pool
    }

    /// Whether embedded migrations run before serving.
    #[must_use]
    pub const fn run_migrations(&self) -> bool {
        self.run_migrations
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<AppSettings> for ServerConfig {
    type Error = ConfigError;

    fn try_from(settings: AppSettings) -> Result<Self, Self::Error> {
        let database_url = non_blank(settings.database_url)
            .or_else(|| non_blank(env::var("DATABASE_URL").ok()))
            .ok_or(ConfigError::MissingDatabaseUrl)?;
        let max_connections = settings
            .db_max_connections
            .unwrap_or(PoolConfig::DEFAULT_MAX_CONNECTIONS);
        if max_connections == 0 {
            return Err(ConfigError::EmptyPool);
        }
        let pool = PoolConfig::new(database_url).with_max_connections(max_connections);
        let secret = non_blank(settings.jwt_secret).ok_or(ConfigError::MissingJwtSecret)?;

        let raw_addr = settings
            .bind_addr
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr = raw_addr
            .parse()
            .map_err(|err: std::net::AddrParseError| ConfigError::InvalidBindAddr {
                value: raw_addr.clone(),
                reason: err.to_string(),
            })?;

        let ttl_seconds = settings
            .token_ttl_seconds
            .unwrap_or(DEFAULT_TOKEN_TTL_SECONDS);
        if ttl_seconds <= 0 {
            return Err(ConfigError::InvalidTokenTtl(ttl_seconds));
        }

        let rate_limit = RateLimitConfig::new(
            settings
                .rate_limit_requests
                .unwrap_or(RateLimitConfig::DEFAULT_MAX_REQUESTS),
            settings
                .rate_limit_window_seconds
                .unwrap_or(RateLimitConfig::DEFAULT_WINDOW_SECONDS),
        )?;

        Ok(Self {
            bind_addr,
            pool,
            jwt: JwtConfig {
                secret,
                ttl_seconds,
            },
            rate_limit,
            run_migrations: settings.run_migrations,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 9] = [
        "CONTACTS_DATABASE_URL",
        "CONTACTS_DB_MAX_CONNECTIONS",
        "DATABASE_URL",
        "CONTACTS_BIND_ADDR",
        "CONTACTS_JWT_SECRET",
        "CONTACTS_TOKEN_TTL_SECONDS",
        "CONTACTS_RATE_LIMIT_REQUESTS",
        "CONTACTS_RATE_LIMIT_WINDOW_SECONDS",
        "CONTACTS_RUN_MIGRATIONS",
    ];

    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    fn load() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("backend")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_only_required_values_are_set() {
        let _guard = lock_env(env_with(&[
            ("CONTACTS_DATABASE_URL", "postgres://localhost/contacts"),
            ("CONTACTS_JWT_SECRET", "s3cret"),
        ]));

        let config = ServerConfig::try_from(load()).expect("valid config");
        assert_eq!(config.bind_addr().to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.database_url(), "postgres://localhost/contacts");
        assert_eq!(config.pool().max_connections, PoolConfig::DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.jwt.ttl_seconds, 3600);
        assert_eq!(config.rate_limit, RateLimitConfig::default());
        assert!(config.run_migrations());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("DATABASE_URL", "postgres://db/contacts"),
            ("CONTACTS_BIND_ADDR", "127.0.0.1:9000"),
            ("CONTACTS_DB_MAX_CONNECTIONS", "4"),
            ("CONTACTS_JWT_SECRET", "s3cret"),
            ("CONTACTS_TOKEN_TTL_SECONDS", "600"),
            ("CONTACTS_RATE_LIMIT_REQUESTS", "3"),
            ("CONTACTS_RATE_LIMIT_WINDOW_SECONDS", "10"),
            ("CONTACTS_RUN_MIGRATIONS", "false"),
        ]));

        let config = ServerConfig::try_from(load()).expect("valid config");
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:9000");
        assert_eq!(config.database_url(), "postgres://db/contacts");
        assert_eq!(config.pool().max_connections, 4);
        assert_eq!(config.jwt.ttl_seconds, 600);
        assert_eq!(config.rate_limit.max_requests(), 3);
        assert_eq!(config.rate_limit.window().num_seconds(), 10);
        assert!(!config.run_migrations());
    }

    #[rstest]
    #[case(&[("CONTACTS_JWT_SECRET", "s3cret")], "database URL")]
    #[case(&[("CONTACTS_DATABASE_URL", "postgres://db")], "JWT secret")]
    #[case(
        &[
            ("CONTACTS_DATABASE_URL", "postgres://db"),
            ("CONTACTS_JWT_SECRET", "s3cret"),
            ("CONTACTS_BIND_ADDR", "not-an-address"),
        ],
        "invalid bind address"
    )]
    #[case(
        &[
            ("CONTACTS_DATABASE_URL", "postgres://db"),
            ("CONTACTS_JWT_SECRET", "s3cret"),
            ("CONTACTS_RATE_LIMIT_REQUESTS", "0"),
        ],
        "at least one request"
    )]
    #[case(
        &[
            ("CONTACTS_DATABASE_URL", "postgres://db"),
            ("CONTACTS_JWT_SECRET", "s3cret"),
            ("CONTACTS_DB_MAX_CONNECTIONS", "0"),
        ],
        "at least one connection"
    )]
    fn unusable_settings_are_reported(
        #[case] overrides: &[(&str, &str)],
        #[case] expected: &str,
    ) {
        let _guard = lock_env(env_with(overrides));

        let err = ServerConfig::try_from(load()).expect_err("config rejected");
        assert!(
            err.to_string().contains(expected),
            "unexpected error: {err}"
        );
    }
}

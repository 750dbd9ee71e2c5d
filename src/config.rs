use std::env;

use thiserror::Error;

/// Shortest HS256 secret we accept.
pub const MIN_SECRET_LEN: usize = 32;

/// Longest token lifetime we accept, ten years.
pub const MAX_TTL_SECS: i64 = 60 * 60 * 24 * 365 * 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Token signing settings, loaded once at startup.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Absent means the in-memory store is used.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    pub jwt: JwtConfig,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid {
                name: "JWT_SECRET",
                reason: format!("must be at least {} bytes", MIN_SECRET_LEN),
            });
        }

        let access_ttl_secs: i64 = parse_or(&lookup, "JWT_ACCESS_TTL_SECS", 60 * 60 * 24)?;
        let refresh_ttl_secs: i64 = parse_or(&lookup, "JWT_REFRESH_TTL_SECS", 60 * 60 * 24 * 7)?;
        if access_ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                name: "JWT_ACCESS_TTL_SECS",
                reason: "must be positive".into(),
            });
        }
        if refresh_ttl_secs > MAX_TTL_SECS {
            return Err(ConfigError::Invalid {
                name: "JWT_REFRESH_TTL_SECS",
                reason: format!("must not exceed {} seconds", MAX_TTL_SECS),
            });
        }
        if refresh_ttl_secs <= access_ttl_secs {
            return Err(ConfigError::Invalid {
                name: "JWT_REFRESH_TTL_SECS",
                reason: "must be greater than JWT_ACCESS_TTL_SECS".into(),
            });
        }

        let bcrypt_cost: u32 = parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                name: "BCRYPT_COST",
                reason: "must be between 4 and 31".into(),
            });
        }

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            server_port: parse_or(&lookup, "SERVER_PORT", 8080)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            jwt: JwtConfig {
                secret,
                access_ttl_secs,
                refresh_ttl_secs,
            },
            bcrypt_cost,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

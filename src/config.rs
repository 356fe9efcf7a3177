/*
 * Responsibility
 * - 環境変数や設定の読み込み (ports, storage backend, JWT secret, CORS 許可など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::services::policy::UserScope;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

const MIN_PRODUCTION_SECRET_LEN: usize = 32;
// one year
const MAX_ACCESS_TOKEN_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub rpc_addr: SocketAddr,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,
    pub request_timeout_seconds: u64,

    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,
    pub database_max_connections: u32,

    pub jwt_secret: String,
    pub access_token_ttl_seconds: u64,
    pub access_token_leeway_seconds: u64,

    pub user_scope: UserScope,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the signing secret or database credentials
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("rpc_addr", &self.rpc_addr)
            .field("app_env", &self.app_env)
            .field("storage_backend", &self.storage_backend)
            .field("user_scope", &self.user_scope)
            .finish_non_exhaustive()
    }
}

fn var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match var(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
    }
}

fn token_ttl(ttl: u64) -> Result<u64, ConfigError> {
    if ttl == 0 || ttl > MAX_ACCESS_TOKEN_TTL_SECONDS {
        return Err(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"));
    }
    Ok(ttl)
}

fn listen_addr(key: &'static str, default_port: u16) -> Result<SocketAddr, ConfigError> {
    let port: u16 = parse_or(key, default_port)?;
    SocketAddr::from_str(&format!("0.0.0.0:{}", port)).map_err(|_| ConfigError::Invalid(key))
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let addr = listen_addr("PORT", 3000)?;
        let rpc_addr = listen_addr("RPC_PORT", 3001)?;
        if addr.port() == rpc_addr.port() {
            return Err(ConfigError::Invalid("RPC_PORT"));
        }

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let request_timeout_seconds = parse_or("REQUEST_TIMEOUT_SECONDS", 30)?;

        let database_url = var("DATABASE_URL");
        let storage_backend = match var("STORAGE_BACKEND").map(|s| s.to_ascii_lowercase()) {
            Some(s) if s == "postgres" => StorageBackend::Postgres,
            Some(s) if s == "memory" => StorageBackend::Memory,
            Some(_) => return Err(ConfigError::Invalid("STORAGE_BACKEND")),
            None if database_url.is_some() => StorageBackend::Postgres,
            None => StorageBackend::Memory,
        };
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        let database_max_connections = parse_or("DATABASE_MAX_CONNECTIONS", 10)?;

        let jwt_secret = var("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if app_env.is_production() && jwt_secret.len() < MIN_PRODUCTION_SECRET_LEN {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }

        let access_token_ttl_seconds = token_ttl(parse_or("ACCESS_TOKEN_TTL_SECONDS", 86_400)?)?;
        let access_token_leeway_seconds = parse_or("ACCESS_TOKEN_LEEWAY_SECONDS", 60)?;

        let user_scope = parse_or("USER_SCOPE", UserScope::Open)?;

        Ok(Self {
            addr,
            rpc_addr,
            app_env,
            cors_allowed_origins,
            request_timeout_seconds,
            storage_backend,
            database_url,
            database_max_connections,
            jwt_secret,
            access_token_ttl_seconds,
            access_token_leeway_seconds,
            user_scope,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_env_parsing() {
        assert_eq!(AppEnv::parse("PROD"), AppEnv::Production);
        assert_eq!(AppEnv::parse("production"), AppEnv::Production);
        assert_eq!(AppEnv::parse("staging"), AppEnv::Development);
    }

    #[test]
    fn token_ttl_is_bounded() {
        assert_eq!(token_ttl(86_400).unwrap(), 86_400);
        assert!(token_ttl(MAX_ACCESS_TOKEN_TTL_SECONDS).is_ok());
        assert!(token_ttl(0).is_err());
        assert!(token_ttl(MAX_ACCESS_TOKEN_TTL_SECONDS + 1).is_err());
        assert!(token_ttl(u64::MAX).is_err());
    }

    #[test]
    fn config_error_messages() {
        assert_eq!(
            ConfigError::Missing("JWT_SECRET").to_string(),
            "missing configuration: JWT_SECRET"
        );
        assert_eq!(
            ConfigError::Invalid("PORT").to_string(),
            "invalid configuration: PORT"
        );
    }
}

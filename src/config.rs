use crate::error::AppError;
use jsonwebtoken::Algorithm;
use std::env;
use std::str::FromStr;

/// Process-wide settings, read once at startup and handed to the components
/// that need them.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    pub secret_key: String,
    pub algorithm: Algorithm,
    pub access_token_ttl_minutes: i64,
    pub refresh_grace_minutes: i64,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parsed("DATABASE_MAX_CONNECTIONS", 5)?,
            server_port: parsed("SERVER_PORT", 8080)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            secret_key: required("SECRET_KEY")?,
            algorithm: hmac_algorithm(
                &env::var("ALGORITHM").unwrap_or_else(|_| "HS256".to_string()),
            )?,
            access_token_ttl_minutes: parsed("ACCESS_TOKEN_EXPIRE_MINUTES", 20)?,
            refresh_grace_minutes: parsed("REFRESH_GRACE_MINUTES", 30)?,
            bcrypt_cost: parsed("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn required(key: &str) -> Result<String, AppError> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(AppError::InternalServerError(format!("{} must be set", key))),
    }
}

fn parsed<T: FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|_| AppError::InternalServerError(format!("{} must be a number", key))),
        Err(_) => Ok(default),
    }
}

/// Tokens are signed with a shared secret, so only the HMAC family is accepted.
fn hmac_algorithm(name: &str) -> Result<Algorithm, AppError> {
    match Algorithm::from_str(name) {
        Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(alg),
        _ => Err(AppError::InternalServerError(format!(
            "ALGORITHM must be one of HS256, HS384, HS512 (got {})",
            name
        ))),
    }
}

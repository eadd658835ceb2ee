// Process configuration.
//
// Purpose
// - Read everything the composition root needs from the environment, once, at startup.
//
// Responsibilities
// - Load `.env_file` when present, then read process variables.
// - Fail with the name of the first missing or unparsable key.

use axum::http::StatusCode;
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use crate::modules::customer_relationship::CustomerRelationshipConfig;

pub const ENV_FILE: &str = ".env_file";

const DEFAULT_MAX_CONNECTIONS: usize = 10;
const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_FAILURE_STATUS: u16 = 400;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },

    #[error("could not load {path}: {reason}")]
    EnvFile { path: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_dsn: String,
    pub db_max_connections: usize,
    pub http_addr: SocketAddr,
    pub failure_status: StatusCode,
    pub payments_login: String,
    pub payments_password: String,
    pub email_host: String,
    pub email_port: u16,
    pub email_username: String,
    pub email_password: String,
    pub email_from_name: String,
    pub email_from_address: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        load_env_file(ENV_FILE)?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let failure_status = parsed_or(&lookup, "TX_FAILURE_STATUS", DEFAULT_FAILURE_STATUS)?;
        let failure_status =
            StatusCode::from_u16(failure_status).map_err(|_| ConfigError::Invalid {
                key: "TX_FAILURE_STATUS",
                value: failure_status.to_string(),
            })?;

        let db_max_connections =
            parsed_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        if db_max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            db_dsn: required("DB_DSN")?,
            db_max_connections,
            http_addr: match lookup("HTTP_ADDR") {
                Some(raw) => parse("HTTP_ADDR", raw)?,
                None => parse("HTTP_ADDR", DEFAULT_HTTP_ADDR.to_string())?,
            },
            failure_status,
            payments_login: required("PAYMENTS_LOGIN")?,
            payments_password: required("PAYMENTS_PASSWORD")?,
            email_host: required("EMAIL_HOST")?,
            email_port: parse("EMAIL_PORT", required("EMAIL_PORT")?)?,
            email_username: required("EMAIL_USERNAME")?,
            email_password: required("EMAIL_PASSWORD")?,
            email_from_name: required("EMAIL_FROM_NAME")?,
            email_from_address: required("EMAIL_FROM_ADDRESS")?,
        })
    }

    pub fn customer_relationship(&self) -> CustomerRelationshipConfig {
        CustomerRelationshipConfig {
            email_host: self.email_host.clone(),
            email_port: self.email_port,
            email_username: self.email_username.clone(),
            email_password: self.email_password.clone(),
            email_from: (
                self.email_from_name.clone(),
                self.email_from_address.clone(),
            ),
        }
    }
}

/// A missing file is fine, the variables may come from the process environment.
fn load_env_file(path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let path = path.as_ref();
    match dotenvy::from_filename(path) {
        Ok(_) => Ok(()),
        Err(dotenvy::Error::Io(error)) if error.kind() == ErrorKind::NotFound => Ok(()),
        Err(error) => Err(ConfigError::EnvFile {
            path: path.display().to_string(),
            reason: error.to_string(),
        }),
    }
}

fn parse<T: FromStr>(key: &'static str, raw: String) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value: raw })
}

fn parsed_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => parse(key, raw),
        None => Ok(default),
    }
}

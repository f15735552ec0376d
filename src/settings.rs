//! Process configuration for the worker binary.
//!
//! Values are read once at startup from command-line flags, falling back to
//! environment variables and then to built-in defaults.

use std::time::Duration;

use clap::{Parser, ValueEnum};
use reqwest::Url;
use secrecy::SecretString;
use thiserror::Error;

/// Default timeout applied to every outbound HTTP request.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 120;

/// Default bound on establishing a database connection.
pub const DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable single-line records.
    #[default]
    Text,
    /// One JSON object per record.
    Json,
}

/// Failure to turn the configured values into usable settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// The database connection parameters do not form a valid URL.
    #[error("invalid database connection settings: {0}")]
    InvalidDatabaseUrl(String),
}

/// Worker process settings.
#[derive(Clone, Parser)]
#[command(name = "docscore-worker")]
#[command(about = "Score converted documents delivered as newline-delimited task messages")]
#[command(version)]
pub struct WorkerSettings {
    /// Database host name.
    #[arg(long, env = "DATABASE_HOST", default_value = "localhost")]
    pub database_host: String,

    /// Database port.
    #[arg(long, env = "DATABASE_PORT", default_value_t = 5432)]
    pub database_port: u16,

    /// Database user.
    #[arg(long, env = "DATABASE_USER", default_value = "postgres")]
    pub database_user: String,

    /// Database password.
    #[arg(long, env = "DATABASE_PASSWORD", hide_env_values = true)]
    pub database_password: Option<String>,

    /// Database name.
    #[arg(long, env = "DATABASE_NAME", default_value = "docscore")]
    pub database_name: String,

    /// Timeout in seconds for establishing a database connection.
    #[arg(
        long,
        env = "DATABASE_CONNECT_TIMEOUT_SECS",
        default_value_t = DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS
    )]
    pub database_connect_timeout_secs: u64,

    /// Timeout in seconds for conversion, download and scoring requests.
    #[arg(long, env = "DOCSCORE_HTTP_TIMEOUT_SECS", default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    pub http_timeout_secs: u64,

    /// Log output format.
    #[arg(long, env = "DOCSCORE_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl WorkerSettings {
    /// Returns the HTTP request timeout.
    #[must_use]
    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Builds the `PostgreSQL` connection URL from the individual parts.
    ///
    /// User and password are percent-encoded, so credentials containing
    /// reserved characters are safe. The connect timeout is passed as the
    /// `connect_timeout` parameter so establishing a connection is bounded.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidDatabaseUrl`] when the host or
    /// credentials cannot be placed in a URL.
    pub fn database_url(&self) -> Result<SecretString, SettingsError> {
        let mut url = Url::parse("postgres://localhost")
            .map_err(|err| SettingsError::InvalidDatabaseUrl(err.to_string()))?;
        url.set_host(Some(&self.database_host))
            .map_err(|err| SettingsError::InvalidDatabaseUrl(format!("host: {err}")))?;
        url.set_port(Some(self.database_port))
            .map_err(|()| SettingsError::InvalidDatabaseUrl("port".to_owned()))?;
        url.set_username(&self.database_user)
            .map_err(|()| SettingsError::InvalidDatabaseUrl("user".to_owned()))?;
        if let Some(password) = &self.database_password {
            url.set_password(Some(password))
                .map_err(|()| SettingsError::InvalidDatabaseUrl("password".to_owned()))?;
        }
        url.set_path(&self.database_name);
        url.query_pairs_mut().append_pair(
            "connect_timeout",
            &self.database_connect_timeout_secs.to_string(),
        );
        Ok(SecretString::from(String::from(url)))
    }
}

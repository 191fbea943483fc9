use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::errors::ApplicationError;
use crate::config::{EnvironmentProvider, SystemEnvironment};

const DEFAULT_DATABASE_URL: &str = "sqlite://roster.db?mode=rwc";
const DEFAULT_AUTHORITY_URL: &str = "https://login.microsoftonline.com";
const DEFAULT_GRAPH_URL: &str = "https://graph.microsoft.com";

/// Infrastructure settings loaded once at startup
pub struct BootstrapSettings {
    database_url: String,
    server_host: String,
    server_port: u16,
    token_ttl_minutes: i64,
    directory_authority_url: String,
    directory_graph_url: String,
    directory_timeout: Duration,
}

impl BootstrapSettings {
    /// Load bootstrap settings from the given environment provider
    ///
    /// Unset variables fall back to defaults; set but invalid values are rejected.
    pub fn from_env_provider(
        env_provider: Arc<dyn EnvironmentProvider>,
    ) -> Result<Self, ApplicationError> {
        let database_url = env_provider
            .get_var("DATABASE_URL")
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        if database_url.is_empty() {
            return Err(ApplicationError::invalid_setting(
                "DATABASE_URL",
                "must be at least 1 characters long",
            ));
        }

        let server_host = env_provider
            .get_var("HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string());
        if server_host.trim().is_empty() {
            return Err(ApplicationError::invalid_setting("HOST", "cannot be empty"));
        }

        let server_port = match env_provider.get_var("PORT") {
            Some(value) => parse_port(&value)?,
            None => 5000,
        };

        let token_ttl_minutes = match env_provider.get_var("TOKEN_TTL_MINUTES") {
            Some(value) => parse_positive("TOKEN_TTL_MINUTES", &value)?,
            None => 60,
        };

        let directory_authority_url = parse_url(
            "DIRECTORY_AUTHORITY_URL",
            env_provider.get_var("DIRECTORY_AUTHORITY_URL"),
            DEFAULT_AUTHORITY_URL,
        )?;
        let directory_graph_url = parse_url(
            "DIRECTORY_GRAPH_URL",
            env_provider.get_var("DIRECTORY_GRAPH_URL"),
            DEFAULT_GRAPH_URL,
        )?;

        let directory_timeout = match env_provider.get_var("DIRECTORY_TIMEOUT_SECONDS") {
            Some(value) => Duration::from_secs(
                parse_positive("DIRECTORY_TIMEOUT_SECONDS", &value)? as u64,
            ),
            None => Duration::from_secs(30),
        };

        Ok(Self {
            database_url,
            server_host,
            server_port,
            token_ttl_minutes,
            directory_authority_url,
            directory_graph_url,
            directory_timeout,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ApplicationError> {
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn token_ttl_minutes(&self) -> i64 {
        self.token_ttl_minutes
    }

    pub fn directory_authority_url(&self) -> &str {
        &self.directory_authority_url
    }

    pub fn directory_graph_url(&self) -> &str {
        &self.directory_graph_url
    }

    pub fn directory_timeout(&self) -> Duration {
        self.directory_timeout
    }
}

fn parse_port(value: &str) -> Result<u16, ApplicationError> {
    let port: u32 = value.trim().parse().map_err(|_| {
        ApplicationError::invalid_setting(
            "PORT",
            format!("Expected port number between 1 and 65535, got '{}'", value),
        )
    })?;
    if port == 0 || port > 65535 {
        return Err(ApplicationError::invalid_setting(
            "PORT",
            format!("{} is outside valid range 1-65535", port),
        ));
    }
    Ok(port as u16)
}

fn parse_positive(setting_name: &str, value: &str) -> Result<i64, ApplicationError> {
    match value.trim().parse::<i64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ApplicationError::invalid_setting(
            setting_name,
            format!("Expected a positive integer, got '{}'", value),
        )),
    }
}

fn parse_url(
    setting_name: &str,
    value: Option<String>,
    default: &str,
) -> Result<String, ApplicationError> {
    let url = value.unwrap_or_else(|| default.to_string());
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ApplicationError::invalid_setting(
            setting_name,
            format!("Expected an http(s) URL, got '{}'", url),
        ));
    }
    Ok(url.trim_end_matches('/').to_string())
}

impl fmt::Debug for BootstrapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapSettings")
            .field("database_url", &self.database_url)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .field("directory_authority_url", &self.directory_authority_url)
            .field("directory_graph_url", &self.directory_graph_url)
            .field("directory_timeout", &self.directory_timeout)
            .finish()
    }
}

//! Service configuration.
//!
//! Values are layered, later sources overriding earlier ones:
//! defaults, an optional TOML file, `FIXPOINT_*` environment variables, and
//! command-line flags.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Prefix of every environment variable the service reads.
pub const ENV_PREFIX: &str = "FIXPOINT_";

/// Configuration error types.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid port number: {0}, must be between 1 and 65535")]
    InvalidPort(String),

    #[error("invalid log level: {0}, must be one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("invalid body limit: {0}, must be a positive number of bytes")]
    InvalidBodyLimit(String),

    #[error("invalid iteration limit: {0}, must be a positive integer")]
    InvalidMaxIterLimit(String),

    #[error("invalid listen address {0}")]
    InvalidAddress(String),

    #[error("configuration file error: {0}")]
    FileError(String),
}

/// Log levels supported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_owned())),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, ConfigError> {
        s.parse()
    }
}

impl LogLevel {
    /// Returns the level as a tracing filter directive.
    #[must_use]
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// Host address to bind to.
    pub host: String,

    /// Port to listen on.
    pub port: u16,

    /// Log level used when `RUST_LOG` is not set.
    pub log_level: LogLevel,

    /// Largest accepted request body, in bytes.
    pub body_limit: u64,

    /// Largest `max_iter` a `/solve` request may ask for.
    pub max_iter_limit: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3030,
            log_level: LogLevel::Info,
            body_limit: 16 * 1024,
            max_iter_limit: 10_000,
        }
    }
}

impl ServiceConfig {
    /// Loads configuration from a TOML file. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileError`] if the file cannot be read or
    /// parsed, or a validation error.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::FileError(format!("failed to read {}: {e}", path.display()))
        })?;
        let config: ServiceConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("failed to parse TOML: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Overrides fields from `FIXPOINT_HOST`, `FIXPOINT_PORT`,
    /// `FIXPOINT_LOG_LEVEL`, `FIXPOINT_BODY_LIMIT` and
    /// `FIXPOINT_MAX_ITER_LIMIT`, looked up through `var`.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unparseable value.
    pub fn apply_env<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| var(&format!("{ENV_PREFIX}{name}"));

        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port.trim().parse().map_err(|_| ConfigError::InvalidPort(port))?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log_level = level.parse()?;
        }
        if let Some(limit) = lookup("BODY_LIMIT") {
            self.body_limit = limit
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidBodyLimit(limit))?;
        }
        if let Some(limit) = lookup("MAX_ITER_LIMIT") {
            self.max_iter_limit = limit
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidMaxIterLimit(limit))?;
        }
        Ok(())
    }

    /// Overrides fields with the flags given on the command line.
    pub fn merge_with_cli(&mut self, cli: &CliArgs) {
        if let Some(host) = &cli.host {
            self.host.clone_from(host);
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(level) = cli.log_level {
            self.log_level = level;
        }
    }

    /// Checks the configuration for values the service cannot run with.
    ///
    /// # Errors
    ///
    /// Returns an error for port 0, a zero body limit or a zero iteration
    /// limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port.to_string()));
        }
        if self.body_limit == 0 {
            return Err(ConfigError::InvalidBodyLimit(self.body_limit.to_string()));
        }
        if self.max_iter_limit == 0 {
            return Err(ConfigError::InvalidMaxIterLimit(
                self.max_iter_limit.to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the address to listen on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAddress`] if `host` is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let text = format!("{}:{}", self.host, self.port);
        text.parse().map_err(|_| ConfigError::InvalidAddress(text))
    }
}

/// Command-line overrides.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config_file: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<LogLevel>,
}

/// Builds the configuration from every source.
///
/// Priority, highest first: CLI arguments, environment variables, config
/// file, defaults.
///
/// # Errors
///
/// Returns an error if any source holds an invalid value.
pub fn build_config(cli: &CliArgs) -> Result<ServiceConfig, ConfigError> {
    build_config_with(cli, |name| std::env::var(name).ok())
}

/// Like [`build_config`], reading environment variables through `var`.
///
/// # Errors
///
/// Returns an error if any source holds an invalid value.
pub fn build_config_with<F>(cli: &CliArgs, var: F) -> Result<ServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &cli.config_file {
        Some(path) => ServiceConfig::from_file(path)?,
        None => ServiceConfig::default(),
    };

    config.apply_env(var)?;
    config.merge_with_cli(cli);
    config.validate()?;

    Ok(config)
}

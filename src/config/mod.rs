//! Configuration management for the dayone-tools application.
//!
//! This module handles loading and validating configuration settings from environment
//! variables, with sensible defaults. It supports configuring the Day One CLI command
//! used for mutations and the location of the Day One database used for reads.
//!
//! # Environment Variables
//!
//! - `DAYONE_CLI`: Day One CLI executable (defaults to "dayone2")
//! - `DAYONE_DB`: Path to the Day One database (defaults to the Day One group container)
//! - `DAYONE_LOG_FORMAT`: "text" or "json"
//! - `HOME`: Used for expanding the default database path

use crate::constants::{
    CLI_FORBIDDEN_CHARS, DEFAULT_CLI_COMMAND, DEFAULT_DB_SUBPATH, ENV_VAR_DAYONE_CLI,
    ENV_VAR_DAYONE_DB, ENV_VAR_DAYONE_LOG_FORMAT, ENV_VAR_HOME, LOG_FORMAT_JSON,
    LOG_FORMAT_TEXT, REDACTED_PLACEHOLDER,
};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Configuration for the dayone-tools application.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use dayone_tools::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     cli_command: "dayone2".to_string(),
///     db_path: PathBuf::from("/path/to/DayOne.sqlite"),
///     log_format: "text".to_string(),
/// };
/// assert!(config.validate().is_ok());
/// ```
pub struct Config {
    /// Executable used for creating and updating entries.
    ///
    /// Loaded from `DAYONE_CLI`, defaulting to "dayone2".
    pub cli_command: String,

    /// Location of the Day One SQLite store.
    ///
    /// Loaded from `DAYONE_DB`, falling back to the Day One group container
    /// under the user's home directory.
    pub db_path: PathBuf,

    /// Log output format, either "text" or "json".
    pub log_format: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("cli_command", &self.cli_command)
            .field("db_path", &REDACTED_PLACEHOLDER)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cli_command: DEFAULT_CLI_COMMAND.to_string(),
            db_path: PathBuf::from(""),
            log_format: LOG_FORMAT_TEXT.to_string(),
        }
    }
}

impl Config {
    /// Validates a CLI command string for security.
    ///
    /// The command must be non-empty, contain no spaces and no shell
    /// metacharacters. Arguments are always passed separately, never through
    /// a shell.
    fn validate_cli_command(cli_cmd: &str) -> AppResult<&str> {
        if cli_cmd.is_empty() {
            return Err(AppError::Config("CLI command cannot be empty".to_string()));
        }

        if cli_cmd.contains(' ') {
            return Err(AppError::Config(
                "CLI command cannot contain spaces. Use a wrapper script if the CLI needs extra arguments".to_string(),
            ));
        }

        for &ch in CLI_FORBIDDEN_CHARS.iter() {
            if cli_cmd.contains(ch) {
                return Err(AppError::Config(format!(
                    "CLI command cannot contain shell metacharacters: '{}'",
                    ch
                )));
            }
        }

        Ok(cli_cmd)
    }

    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// The database path is expanded with `shellexpand`, so `~` and environment
    /// variable references are honoured.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - The database path expansion fails or yields an empty path
    /// - The CLI command fails validation
    /// - The log format is neither "text" nor "json"
    pub fn load() -> AppResult<Self> {
        let cli_raw =
            env::var(ENV_VAR_DAYONE_CLI).unwrap_or_else(|_| DEFAULT_CLI_COMMAND.to_string());
        let cli_command = Config::validate_cli_command(&cli_raw)?;

        let db_path_str = env::var(ENV_VAR_DAYONE_DB).unwrap_or_else(|_| {
            let home = env::var(ENV_VAR_HOME).unwrap_or_default();
            format!("{}/{}", home, DEFAULT_DB_SUBPATH)
        });

        let expanded_path = shellexpand::full(&db_path_str)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
        let db_path = PathBuf::from(expanded_path.into_owned());

        if db_path.as_os_str().is_empty() {
            return Err(AppError::Config("Database path is empty".to_string()));
        }

        let log_format = match env::var(ENV_VAR_DAYONE_LOG_FORMAT) {
            Ok(format) => Config::validate_log_format(&format)?.to_string(),
            Err(_) => LOG_FORMAT_TEXT.to_string(),
        };

        Ok(Config {
            cli_command: cli_command.to_string(),
            db_path,
            log_format,
        })
    }

    fn validate_log_format(format: &str) -> AppResult<&str> {
        match format {
            LOG_FORMAT_TEXT | LOG_FORMAT_JSON => Ok(format),
            other => Err(AppError::Config(format!(
                "Unknown log format '{}'. Expected '{}' or '{}'",
                other, LOG_FORMAT_TEXT, LOG_FORMAT_JSON
            ))),
        }
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` with one of the following messages:
    /// - "Database path is empty"
    /// - "CLI command is empty"
    /// - "Database path must be an absolute path"
    pub fn validate(&self) -> AppResult<()> {
        if self.db_path.as_os_str().is_empty() {
            return Err(AppError::Config("Database path is empty".to_string()));
        }

        if self.cli_command.is_empty() {
            return Err(AppError::Config("CLI command is empty".to_string()));
        }

        if !self.db_path.is_absolute() {
            return Err(AppError::Config(
                "Database path must be an absolute path".to_string(),
            ));
        }

        Config::validate_log_format(&self.log_format)?;

        Ok(())
    }
}

//! Constants used throughout the application.
//!
//! This module contains all constants used by dayone-tools, organized into
//! logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "dayone-tools";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "Read and write access to a Day One journal for tool-calling agents";

// CLI Arguments & Defaults
/// Default command for the Day One command-line collaborator.
pub const DEFAULT_CLI_COMMAND: &str = "dayone2";
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Configuration Keys & Environment Variables
/// Environment variable for overriding the Day One CLI executable.
pub const ENV_VAR_DAYONE_CLI: &str = "DAYONE_CLI";
/// Environment variable for overriding the Day One database location.
pub const ENV_VAR_DAYONE_DB: &str = "DAYONE_DB";
/// Environment variable for selecting the log format.
pub const ENV_VAR_DAYONE_LOG_FORMAT: &str = "DAYONE_LOG_FORMAT";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default location of the Day One store, relative to the home directory.
pub const DEFAULT_DB_SUBPATH: &str =
    "Library/Group Containers/5U8NS4GX82.dayoneapp2/Data/Documents/DayOne.sqlite";

// Validation
/// Characters forbidden in the CLI command for security reasons.
pub const CLI_FORBIDDEN_CHARS: &[char] =
    &['|', '&', ';', '$', '(', ')', '`', '\\', '<', '>', '\'', '"'];
/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";
/// Maximum number of attachments the CLI accepts per entry.
pub const MAX_ATTACHMENTS: usize = 10;

// Day One CLI Contract
/// Subcommand that creates an entry.
pub const CLI_COMMAND_NEW: &str = "new";
/// Subcommand that replaces the body of an existing entry.
pub const CLI_COMMAND_EDIT: &str = "edit";
/// Flag that prints the CLI version.
pub const CLI_VERSION_FLAG: &str = "--version";
/// Standard output prefix preceding the identifier of a created entry.
pub const CLI_CREATED_PREFIX: &str = "Created new entry with uuid:";
/// Standard output prefix preceding the identifier of an updated entry.
pub const CLI_UPDATED_PREFIX: &str = "Updated entry with uuid:";

// Storage
/// Seconds between the Unix epoch and the storage epoch (2001-01-01T00:00:00Z).
pub const STORAGE_EPOCH_OFFSET_SECS: i64 = 978_307_200;
/// Journal name reported for entries whose journal relation is null.
pub const DEFAULT_JOURNAL_NAME: &str = "Default";

// Query Limits
/// Smallest number of entries a listing query returns.
pub const MIN_QUERY_LIMIT: usize = 1;
/// Largest number of entries a listing query returns.
pub const MAX_QUERY_LIMIT: usize = 50;
/// Default limit for recent entry listings.
pub const DEFAULT_RECENT_LIMIT: usize = 10;
/// Default limit for search results.
pub const DEFAULT_SEARCH_LIMIT: usize = 20;
/// Default number of years an on-this-day lookup reaches back.
pub const DEFAULT_YEARS_BACK: u32 = 5;
/// Maximum number of years an on-this-day lookup reaches back.
pub const MAX_YEARS_BACK: u32 = 100;

// Date/Time Logic
/// Date format string for ISO date format (YYYY-MM-DD).
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Separator placed between existing text and appended text.
pub const DEFAULT_APPEND_SEPARATOR: &str = "\n\n";

// Logging Configuration
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "dayone-tools";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";

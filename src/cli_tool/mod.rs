//! The Day One command-line tool, used for every mutation.
//!
//! Entries are never written to the database directly. Creating or updating an
//! entry spawns the Day One CLI as a subprocess and reads the affected entry's
//! identifier back from its standard output. The process is abstracted behind
//! [`JournalCli`] so operations can be exercised without the real tool.
//!
//! The output format of the CLI is a fragile contract; the recognised success
//! prefixes live in [`CliAction::success_prefix`] and are only consumed by
//! [`parse_cli_output`].

use crate::constants::{
    CLI_COMMAND_EDIT, CLI_COMMAND_NEW, CLI_CREATED_PREFIX, CLI_UPDATED_PREFIX, MAX_ATTACHMENTS,
};
use crate::errors::{AppError, AppResult, CliToolError};
use std::io;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Captured output of a successful CLI run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Trait defining the interface to the Day One command-line tool.
///
/// # Examples
///
/// ```
/// use dayone_tools::cli_tool::{CliOutput, JournalCli};
/// use dayone_tools::errors::CliToolError;
///
/// struct EchoCli;
///
/// impl JournalCli for EchoCli {
///     fn command(&self) -> &str {
///         "echo"
///     }
///
///     fn run(&self, args: &[String]) -> Result<CliOutput, CliToolError> {
///         Ok(CliOutput {
///             stdout: args.join(" "),
///             stderr: String::new(),
///         })
///     }
/// }
///
/// let output = EchoCli.run(&["--version".to_string()]).unwrap();
/// assert_eq!(output.stdout, "--version");
/// ```
pub trait JournalCli {
    /// The executable name, used in error messages.
    fn command(&self) -> &str;

    /// Runs the tool with `args` and captures its output.
    ///
    /// # Errors
    ///
    /// Implementations return `CliToolError` when the tool cannot be spawned
    /// or exits with a non-zero status.
    fn run(&self, args: &[String]) -> Result<CliOutput, CliToolError>;
}

/// A [`JournalCli`] that spawns the configured executable.
///
/// Arguments are passed directly to the process, never through a shell.
///
/// # Examples
///
/// ```no_run
/// use dayone_tools::cli_tool::{JournalCli, SystemCli};
///
/// let cli = SystemCli::new("dayone2");
/// let output = cli.run(&["--version".to_string()]).expect("Day One CLI not available");
/// println!("{}", output.stdout);
/// ```
#[derive(Debug, Clone)]
pub struct SystemCli {
    /// The executable to run (e.g., "dayone2").
    pub program: String,
}

impl SystemCli {
    pub fn new(program: impl Into<String>) -> Self {
        SystemCli {
            program: program.into(),
        }
    }
}

impl JournalCli for SystemCli {
    fn command(&self) -> &str {
        &self.program
    }

    fn run(&self, args: &[String]) -> Result<CliOutput, CliToolError> {
        debug!("Running {} with {} arguments", self.program, args.len());

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| spawn_error(&self.program, e))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(CliToolError::NonZeroExit {
                command: self.program.clone(),
                status_code: output.status.code().unwrap_or(-1),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(CliOutput { stdout, stderr })
    }
}

fn spawn_error(command: &str, e: io::Error) -> CliToolError {
    let command = command.to_string();
    match e.kind() {
        io::ErrorKind::NotFound => CliToolError::CommandNotFound { command, source: e },
        io::ErrorKind::PermissionDenied => CliToolError::PermissionDenied { command, source: e },
        _ => CliToolError::ExecutionFailed { command, source: e },
    }
}

/// A mutation performed through the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliAction {
    Create,
    Update,
}

impl CliAction {
    /// Standard output prefix that precedes the entry identifier on success.
    pub fn success_prefix(self) -> &'static str {
        match self {
            CliAction::Create => CLI_CREATED_PREFIX,
            CliAction::Update => CLI_UPDATED_PREFIX,
        }
    }
}

/// Extracts the entry identifier from the CLI's standard output.
///
/// Returns `None` when the success prefix for `action` is absent or is not
/// followed by an identifier.
///
/// # Examples
///
/// ```
/// use dayone_tools::cli_tool::{parse_cli_output, CliAction};
///
/// let stdout = "Created new entry with uuid: 5F3A9C2B\n";
/// assert_eq!(parse_cli_output(CliAction::Create, stdout), Some("5F3A9C2B".to_string()));
/// assert_eq!(parse_cli_output(CliAction::Create, "Something else"), None);
/// ```
pub fn parse_cli_output(action: CliAction, stdout: &str) -> Option<String> {
    let prefix = action.success_prefix();
    let start = stdout.rfind(prefix)? + prefix.len();
    stdout[start..]
        .split_whitespace()
        .next()
        .map(str::to_string)
}

/// Runs `args` and returns the identifier reported for `action`.
///
/// # Errors
///
/// Returns the spawn or exit error from the CLI, or
/// `CliToolError::UnexpectedOutput` if the success prefix is missing.
pub fn run_action(
    cli: &dyn JournalCli,
    action: CliAction,
    args: &[String],
) -> Result<String, CliToolError> {
    let output = cli.run(args)?;
    parse_cli_output(action, &output.stdout).ok_or_else(|| CliToolError::UnexpectedOutput {
        command: cli.command().to_string(),
        stdout: output.stdout.trim().to_string(),
    })
}

/// A location attached to a new entry. Both halves are required.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Coordinates {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Parameters for creating an entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewEntry {
    pub content: String,
    pub tags: Vec<String>,
    pub journal: Option<String>,
    /// Passed to the CLI verbatim (e.g., "2024-06-14 09:30:00")
    pub date: Option<String>,
    pub attachments: Vec<PathBuf>,
    pub starred: bool,
    pub coordinates: Option<Coordinates>,
    pub timezone: Option<String>,
    pub all_day: bool,
}

impl NewEntry {
    /// Creates a request with only content set.
    pub fn new(content: impl Into<String>) -> Self {
        NewEntry {
            content: content.into(),
            ..Default::default()
        }
    }

    /// Checks the request before anything is spawned.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the content is blank, there are more
    /// than ten attachments, an attachment does not exist, or the coordinate
    /// pair is incomplete.
    pub fn validate(&self) -> AppResult<()> {
        if self.content.trim().is_empty() {
            return Err(AppError::Validation(
                "Entry content cannot be empty".to_string(),
            ));
        }

        if self.attachments.len() > MAX_ATTACHMENTS {
            return Err(AppError::Validation(format!(
                "Maximum {} attachments allowed per entry, got {}",
                MAX_ATTACHMENTS,
                self.attachments.len()
            )));
        }

        if let Some(missing) = self.attachments.iter().find(|path| !path.exists()) {
            return Err(AppError::Validation(format!(
                "Attachment file not found: {}",
                missing.display()
            )));
        }

        if let Some(coordinates) = &self.coordinates {
            if coordinates.latitude.is_none() || coordinates.longitude.is_none() {
                return Err(AppError::Validation(
                    "Coordinates must include both latitude and longitude".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Builds the CLI argument list.
    ///
    /// Options come first, followed by a `--` separator when any option is
    /// present, then the `new` command and the content.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if !self.attachments.is_empty() {
            args.push("--attachments".to_string());
            args.extend(
                self.attachments
                    .iter()
                    .map(|path| path.to_string_lossy().into_owned()),
            );
        }
        if !self.tags.is_empty() {
            args.push("--tags".to_string());
            args.extend(self.tags.iter().cloned());
        }
        if let Some(journal) = non_empty(&self.journal) {
            args.push("--journal".to_string());
            args.push(journal.to_string());
        }
        if let Some(date) = non_empty(&self.date) {
            args.push("--date".to_string());
            args.push(date.to_string());
        }
        if self.starred {
            args.push("--starred".to_string());
        }
        if let Some(Coordinates {
            latitude: Some(latitude),
            longitude: Some(longitude),
        }) = self.coordinates
        {
            args.push("--coordinate".to_string());
            args.push(latitude.to_string());
            args.push(longitude.to_string());
        }
        if let Some(timezone) = non_empty(&self.timezone) {
            args.push("--time-zone".to_string());
            args.push(timezone.to_string());
        }
        if self.all_day {
            args.push("--all-day".to_string());
        }

        if !args.is_empty() {
            args.push("--".to_string());
        }
        args.push(CLI_COMMAND_NEW.to_string());
        args.push(self.content.clone());
        args
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Replacement of an existing entry's body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryUpdate {
    pub uuid: String,
    pub content: String,
}

impl EntryUpdate {
    /// Builds the CLI argument list for replacing the entry body.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "--uuid".to_string(),
            self.uuid.clone(),
            "--".to_string(),
            CLI_COMMAND_EDIT.to_string(),
            self.content.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    struct MockCli {
        stdout: String,
        calls: Arc<Mutex<Vec<Vec<String>>>>,
    }

    impl MockCli {
        fn new(stdout: &str) -> Self {
            MockCli {
                stdout: stdout.to_string(),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl JournalCli for MockCli {
        fn command(&self) -> &str {
            "mock-dayone"
        }

        fn run(&self, args: &[String]) -> Result<CliOutput, CliToolError> {
            self.calls.lock().unwrap().push(args.to_vec());
            Ok(CliOutput {
                stdout: self.stdout.clone(),
                stderr: String::new(),
            })
        }
    }

    #[test]
    fn test_plain_entry_has_no_separator() {
        let args = NewEntry::new("Hello").to_args();
        assert_eq!(args, vec!["new", "Hello"]);
    }

    #[test]
    fn test_argument_order() {
        let temp_dir = TempDir::new().unwrap();
        let photo = temp_dir.path().join("photo.jpg");
        std::fs::write(&photo, b"jpg").unwrap();

        let entry = NewEntry {
            content: "Trip notes".to_string(),
            tags: vec!["travel".to_string(), "food".to_string()],
            journal: Some("Travel".to_string()),
            date: Some("2024-06-14 09:30:00".to_string()),
            attachments: vec![photo.clone()],
            starred: true,
            coordinates: Some(Coordinates {
                latitude: Some(38.7),
                longitude: Some(-9.1),
            }),
            timezone: Some("Europe/Lisbon".to_string()),
            all_day: true,
        };
        assert!(entry.validate().is_ok());

        let expected: Vec<String> = vec![
            "--attachments".to_string(),
            photo.to_string_lossy().into_owned(),
            "--tags".to_string(),
            "travel".to_string(),
            "food".to_string(),
            "--journal".to_string(),
            "Travel".to_string(),
            "--date".to_string(),
            "2024-06-14 09:30:00".to_string(),
            "--starred".to_string(),
            "--coordinate".to_string(),
            "38.7".to_string(),
            "-9.1".to_string(),
            "--time-zone".to_string(),
            "Europe/Lisbon".to_string(),
            "--all-day".to_string(),
            "--".to_string(),
            "new".to_string(),
            "Trip notes".to_string(),
        ];
        assert_eq!(entry.to_args(), expected);
    }

    #[test]
    fn test_validate_rejects_blank_content() {
        match NewEntry::new("   \n").validate() {
            Err(AppError::Validation(msg)) => assert!(msg.contains("empty")),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_too_many_attachments() {
        let temp_dir = TempDir::new().unwrap();
        let attachments: Vec<PathBuf> = (0..11)
            .map(|i| {
                let path = temp_dir.path().join(format!("{}.png", i));
                std::fs::write(&path, b"png").unwrap();
                path
            })
            .collect();
        let entry = NewEntry {
            attachments,
            ..NewEntry::new("Too many")
        };

        match entry.validate() {
            Err(AppError::Validation(msg)) => assert!(msg.contains("Maximum 10")),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_missing_attachment() {
        let entry = NewEntry {
            attachments: vec![PathBuf::from("/nonexistent/photo.jpg")],
            ..NewEntry::new("Photo")
        };
        match entry.validate() {
            Err(AppError::Validation(msg)) => assert!(msg.contains("/nonexistent/photo.jpg")),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_half_coordinates() {
        let entry = NewEntry {
            coordinates: Some(Coordinates {
                latitude: Some(38.7),
                longitude: None,
            }),
            ..NewEntry::new("Somewhere")
        };
        assert!(matches!(entry.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_empty_optional_strings_are_skipped() {
        let entry = NewEntry {
            journal: Some(String::new()),
            timezone: Some(String::new()),
            ..NewEntry::new("Hello")
        };
        assert_eq!(entry.to_args(), vec!["new", "Hello"]);
    }

    #[test]
    fn test_update_args() {
        let update = EntryUpdate {
            uuid: "ABC123".to_string(),
            content: "Replaced".to_string(),
        };
        assert_eq!(
            update.to_args(),
            vec!["--uuid", "ABC123", "--", "edit", "Replaced"]
        );
    }

    #[test]
    fn test_parse_cli_output() {
        assert_eq!(
            parse_cli_output(CliAction::Create, "Created new entry with uuid: ABC123\n"),
            Some("ABC123".to_string())
        );
        assert_eq!(
            parse_cli_output(
                CliAction::Create,
                "Importing photo...\nCreated new entry with uuid:DEF456"
            ),
            Some("DEF456".to_string())
        );
        assert_eq!(
            parse_cli_output(CliAction::Update, "Updated entry with uuid: ABC123"),
            Some("ABC123".to_string())
        );
        assert_eq!(
            parse_cli_output(CliAction::Update, "Created new entry with uuid: ABC123"),
            None
        );
        assert_eq!(
            parse_cli_output(CliAction::Create, "Created new entry with uuid:   "),
            None
        );
    }

    #[test]
    fn test_run_action_reports_unexpected_output() {
        let cli = MockCli::new("Done.");
        match run_action(&cli, CliAction::Create, &["new".to_string()]) {
            Err(CliToolError::UnexpectedOutput { command, stdout }) => {
                assert_eq!(command, "mock-dayone");
                assert_eq!(stdout, "Done.");
            }
            other => panic!("Expected UnexpectedOutput, got {:?}", other),
        }
    }

    #[test]
    fn test_run_action_passes_arguments() {
        let cli = MockCli::new("Created new entry with uuid: XYZ\n");
        let args = NewEntry::new("Hi").to_args();

        let uuid = run_action(&cli, CliAction::Create, &args).unwrap();
        assert_eq!(uuid, "XYZ");

        let calls = cli.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], vec!["new", "Hi"]);
    }

    #[test]
    fn test_system_cli_missing_command() {
        let cli = SystemCli::new("dayone-tools-nonexistent-cli-12345");
        match cli.run(&[]) {
            Err(CliToolError::CommandNotFound { command, .. }) => {
                assert_eq!(command, "dayone-tools-nonexistent-cli-12345")
            }
            other => panic!("Expected CommandNotFound, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_system_cli_non_zero_exit() {
        let cli = SystemCli::new("false");
        match cli.run(&[]) {
            Err(CliToolError::NonZeroExit { status_code, .. }) => assert_eq!(status_code, 1),
            other => panic!("Expected NonZeroExit, got {:?}", other),
        }
    }
}

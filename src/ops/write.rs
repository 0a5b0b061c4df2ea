//! Mutations through the Day One CLI.
//!
//! The database is only ever read here: to check that an entry exists before
//! changing it and to return the entry as it looks afterwards.

use super::read::read_full_entry;
use super::Context;
use crate::cli_tool::{run_action, CliAction, EntryUpdate, NewEntry};
use crate::constants::{CLI_VERSION_FLAG, DEFAULT_APPEND_SEPARATOR};
use crate::db::entries::entry_exists;
use crate::errors::{AppError, AppResult};
use crate::record::JournalEntry;
use tracing::{debug, info};

/// Creates an entry and returns the identifier the CLI assigned to it.
///
/// # Errors
///
/// Returns `AppError::Validation` if the request is invalid (no process is
/// spawned in that case), or `AppError::ExternalTool` if the CLI is missing,
/// fails, or does not report an identifier.
pub fn create_entry(ctx: &Context, entry: &NewEntry) -> AppResult<String> {
    entry.validate()?;

    let uuid = run_action(ctx.cli(), CliAction::Create, &entry.to_args())?;
    info!("Created entry {}", uuid);
    Ok(uuid)
}

/// Replaces the body of an existing entry and returns the re-read entry.
///
/// # Errors
///
/// Returns `AppError::Validation` for blank content, `AppError::NotFound` if
/// the entry does not exist, storage errors from the existence check, or
/// `AppError::ExternalTool` if the CLI fails.
pub fn update_entry(ctx: &Context, uuid: &str, content: &str) -> AppResult<JournalEntry> {
    if content.trim().is_empty() {
        return Err(AppError::Validation(
            "Entry content cannot be empty".to_string(),
        ));
    }

    {
        let db = ctx.open_db()?;
        if !entry_exists(&db, uuid)? {
            return Err(not_found(uuid));
        }
    }

    let update = EntryUpdate {
        uuid: uuid.to_string(),
        content: content.to_string(),
    };
    let reported = run_action(ctx.cli(), CliAction::Update, &update.to_args())?;
    debug!("CLI reported update of {}", reported);
    info!("Updated entry {}", uuid);

    read_full_entry(ctx, uuid, true)?.ok_or_else(|| not_found(uuid))
}

/// Appends `content` to an entry's current text.
///
/// The existing extracted text, `separator` (two newlines when `None`) and
/// `content` are joined and written with [`update_entry`]. An entry with no
/// text ends up with `content` alone.
///
/// # Errors
///
/// Same as [`update_entry`].
pub fn append_to_entry(
    ctx: &Context,
    uuid: &str,
    content: &str,
    separator: Option<&str>,
) -> AppResult<JournalEntry> {
    if content.trim().is_empty() {
        return Err(AppError::Validation(
            "Content to append cannot be empty".to_string(),
        ));
    }

    let current = read_full_entry(ctx, uuid, false)?.ok_or_else(|| not_found(uuid))?;

    let combined = if current.text.is_empty() {
        content.to_string()
    } else {
        let separator = separator.unwrap_or(DEFAULT_APPEND_SEPARATOR);
        format!("{}{}{}", current.text, separator, content)
    };

    update_entry(ctx, uuid, &combined)
}

/// Runs the CLI's version check and returns what it printed.
///
/// # Errors
///
/// Returns `AppError::ExternalTool` if the CLI is missing or fails.
pub fn verify_cli(ctx: &Context) -> AppResult<String> {
    let output = ctx.cli().run(&[CLI_VERSION_FLAG.to_string()])?;
    let version = output.stdout.trim().to_string();
    debug!("{} reports version {:?}", ctx.cli().command(), version);
    Ok(version)
}

fn not_found(uuid: &str) -> AppError {
    AppError::NotFound(format!("Entry with UUID {} not found", uuid))
}

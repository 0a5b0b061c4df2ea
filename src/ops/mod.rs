//! Public operations over a Day One journal.
//!
//! Every operation takes an explicitly constructed [`Context`]. Reads open
//! their own read-only [`Database`] and drop it before returning; writes go
//! through the Day One CLI held by the context.
//!
//! # Module Structure
//!
//! - `read`: recent entries, search, on-this-day, full entry, counts
//! - `journals`: journal names and per-journal statistics
//! - `write`: create, update, append, CLI verification

pub mod journals;
pub mod read;
pub mod write;

pub use journals::{list_journals, list_journals_with_counts};
pub use read::{
    get_entries_by_date, get_entry_count, read_full_entry, read_recent_entries, search_entries,
};
pub use write::{append_to_entry, create_entry, update_entry, verify_cli};

use crate::cli_tool::{JournalCli, SystemCli};
use crate::config::Config;
use crate::db::entries::{entry_tags, EntryRow};
use crate::db::Database;
use crate::errors::AppResult;
use crate::record::JournalEntry;

/// Everything an operation needs: configuration and the CLI collaborator.
pub struct Context {
    pub config: Config,
    cli: Box<dyn JournalCli>,
}

impl Context {
    /// Creates a context that spawns the configured Day One CLI.
    pub fn new(config: Config) -> Self {
        let cli = SystemCli::new(config.cli_command.clone());
        Context {
            config,
            cli: Box::new(cli),
        }
    }

    /// Creates a context with a custom CLI implementation.
    pub fn with_cli(config: Config, cli: Box<dyn JournalCli>) -> Self {
        Context { config, cli }
    }

    /// The CLI used for mutations.
    pub fn cli(&self) -> &dyn JournalCli {
        self.cli.as_ref()
    }

    pub(crate) fn open_db(&self) -> AppResult<Database> {
        Database::open(&self.config.db_path)
    }
}

/// Treats an empty journal filter as no filter.
pub(crate) fn journal_filter(journal: Option<&str>) -> Option<&str> {
    journal.map(str::trim).filter(|name| !name.is_empty())
}

/// Assembles records for rows, fetching tags for each one.
pub(crate) fn assemble(db: &Database, rows: Vec<EntryRow>) -> Vec<JournalEntry> {
    rows.into_iter()
        .map(|row| {
            let tags = entry_tags(db, &row.uuid);
            JournalEntry::from_row(row, tags)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_journal_filter() {
        assert_eq!(journal_filter(None), None);
        assert_eq!(journal_filter(Some("")), None);
        assert_eq!(journal_filter(Some("  ")), None);
        assert_eq!(journal_filter(Some("Work")), Some("Work"));
    }

    #[test]
    fn test_context_uses_configured_cli() {
        let config = Config {
            cli_command: "my-dayone".to_string(),
            ..Config::default()
        };
        let ctx = Context::new(config);
        assert_eq!(ctx.cli().command(), "my-dayone");
    }
}

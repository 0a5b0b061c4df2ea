//! Command-line argument model for the `dayone-tools` binary.

use crate::cli_tool::{Coordinates, NewEntry};
use crate::constants::{
    APP_DESCRIPTION, APP_NAME, DEFAULT_LOG_LEVEL, DEFAULT_RECENT_LIMIT, DEFAULT_SEARCH_LIMIT,
    DEFAULT_YEARS_BACK, LOG_FORMAT_JSON, LOG_FORMAT_TEXT,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level arguments for the binary.
#[derive(Parser, Debug)]
#[command(name = APP_NAME, about = APP_DESCRIPTION)]
#[command(author, version, long_about = None)]
pub struct CliArgs {
    /// Log format written to stderr (overrides DAYONE_LOG_FORMAT)
    #[arg(long, global = true, value_parser = [LOG_FORMAT_TEXT, LOG_FORMAT_JSON])]
    pub log_format: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl CliArgs {
    /// Log level used when `RUST_LOG` is not set.
    pub fn default_log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            DEFAULT_LOG_LEVEL
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new entry through the Day One CLI
    Create(CreateArgs),

    /// List journals
    Journals {
        /// Include entry counts and the newest entry date
        #[arg(long)]
        counts: bool,
    },

    /// Count entries
    Count {
        /// Only count entries in this journal
        #[arg(long, short)]
        journal: Option<String>,
    },

    /// Show the most recent entries
    Recent {
        /// Number of entries (1-50)
        #[arg(long, short, default_value_t = DEFAULT_RECENT_LIMIT)]
        limit: usize,

        /// Only include entries in this journal
        #[arg(long, short)]
        journal: Option<String>,
    },

    /// Search entry text
    Search {
        /// Text to look for
        text: String,

        /// Number of entries (1-50)
        #[arg(long, short, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,

        /// Only include entries in this journal
        #[arg(long, short)]
        journal: Option<String>,
    },

    /// Show entries written on this day in previous years
    OnThisDay {
        /// MM-DD or YYYY-MM-DD (defaults to today)
        date: Option<String>,

        /// How many years to look back
        #[arg(long, default_value_t = DEFAULT_YEARS_BACK)]
        years_back: u32,
    },

    /// Show one entry in full
    Show {
        /// Entry identifier
        uuid: String,

        /// Leave out tags
        #[arg(long)]
        no_tags: bool,
    },

    /// Replace the text of an entry
    Update {
        /// Entry identifier
        uuid: String,

        /// New entry text
        content: String,
    },

    /// Append text to an entry
    Append {
        /// Entry identifier
        uuid: String,

        /// Text to append
        content: String,

        /// Placed between the existing text and the new text
        #[arg(long)]
        separator: Option<String>,
    },

    /// Check that the Day One CLI is installed and working
    Verify,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Entry text
    pub content: String,

    /// Tag to add (repeatable)
    #[arg(long = "tag", short)]
    pub tags: Vec<String>,

    /// Journal to create the entry in
    #[arg(long, short)]
    pub journal: Option<String>,

    /// Entry date, e.g. "2024-06-14 09:30:00"
    #[arg(long, short)]
    pub date: Option<String>,

    /// File to attach (repeatable, at most 10)
    #[arg(long = "attachment", short)]
    pub attachments: Vec<PathBuf>,

    /// Mark the entry as starred
    #[arg(long)]
    pub starred: bool,

    /// Latitude of the entry location
    #[arg(long, allow_negative_numbers = true)]
    pub latitude: Option<f64>,

    /// Longitude of the entry location
    #[arg(long, allow_negative_numbers = true)]
    pub longitude: Option<f64>,

    /// Time zone of the entry, e.g. "Europe/Lisbon"
    #[arg(long)]
    pub timezone: Option<String>,

    /// Mark the entry as an all-day event
    #[arg(long)]
    pub all_day: bool,
}

impl CreateArgs {
    /// Converts the arguments into a creation request.
    ///
    /// A single coordinate still yields `Some`, so validation can reject it.
    pub fn into_new_entry(self) -> NewEntry {
        let coordinates = match (self.latitude, self.longitude) {
            (None, None) => None,
            (latitude, longitude) => Some(Coordinates {
                latitude,
                longitude,
            }),
        };

        NewEntry {
            content: self.content,
            tags: self.tags,
            journal: self.journal,
            date: self.date,
            attachments: self.attachments,
            starred: self.starred,
            coordinates,
            timezone: self.timezone,
            all_day: self.all_day,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_defaults() {
        let args = CliArgs::parse_from(["dayone-tools", "recent"]);
        match args.command {
            Commands::Recent { limit, journal } => {
                assert_eq!(limit, 10);
                assert!(journal.is_none());
            }
            other => panic!("Expected Recent, got {:?}", other),
        }
        assert!(args.log_format.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn test_command_metadata() {
        use clap::CommandFactory;

        let command = CliArgs::command();
        assert_eq!(command.get_name(), APP_NAME);
        assert_eq!(
            command.get_about().map(|about| about.to_string()),
            Some(APP_DESCRIPTION.to_string())
        );
    }

    #[test]
    fn test_default_log_level() {
        let args = CliArgs::parse_from(["dayone-tools", "verify"]);
        assert_eq!(args.default_log_level(), DEFAULT_LOG_LEVEL);

        let args = CliArgs::parse_from(["dayone-tools", "-v", "verify"]);
        assert_eq!(args.default_log_level(), "debug");
    }

    #[test]
    fn test_on_this_day_arguments() {
        let args = CliArgs::parse_from(["dayone-tools", "on-this-day", "06-14", "--years-back", "3"]);
        match args.command {
            Commands::OnThisDay { date, years_back } => {
                assert_eq!(date.as_deref(), Some("06-14"));
                assert_eq!(years_back, 3);
            }
            other => panic!("Expected OnThisDay, got {:?}", other),
        }
    }

    #[test]
    fn test_create_arguments() {
        let args = CliArgs::parse_from([
            "dayone-tools",
            "create",
            "Lunch by the river",
            "--tag",
            "food",
            "--tag",
            "lisbon",
            "--journal",
            "Travel",
            "--latitude",
            "38.7",
            "--longitude",
            "-9.1",
            "--starred",
        ]);
        let Commands::Create(create) = args.command else {
            panic!("Expected Create");
        };
        let entry = create.into_new_entry();

        assert_eq!(entry.content, "Lunch by the river");
        assert_eq!(entry.tags, vec!["food", "lisbon"]);
        assert_eq!(entry.journal.as_deref(), Some("Travel"));
        assert!(entry.starred);
        assert!(!entry.all_day);
        assert_eq!(
            entry.coordinates,
            Some(Coordinates {
                latitude: Some(38.7),
                longitude: Some(-9.1),
            })
        );
    }

    #[test]
    fn test_single_coordinate_is_kept_for_validation() {
        let args = CliArgs::parse_from(["dayone-tools", "create", "Hi", "--latitude", "1.5"]);
        let Commands::Create(create) = args.command else {
            panic!("Expected Create");
        };
        let entry = create.into_new_entry();
        assert!(entry.validate().is_err());
    }

    #[test]
    fn test_log_format_is_restricted() {
        assert!(CliArgs::try_parse_from(["dayone-tools", "--log-format", "xml", "verify"]).is_err());

        let args = CliArgs::parse_from(["dayone-tools", "verify", "--log-format", "json"]);
        assert_eq!(args.log_format.as_deref(), Some("json"));
    }
}

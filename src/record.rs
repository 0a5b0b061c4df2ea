//! Read models returned to callers.
//!
//! Records are built fresh for every call from raw rows, extracted text and
//! converted timestamps. They are never cached and never written back.

use crate::constants::DEFAULT_JOURNAL_NAME;
use crate::db::entries::EntryRow;
use crate::db::journals::JournalRow;
use crate::extract::extract_text;
use crate::timestamp::to_calendar_time;
use chrono::{DateTime, Datelike, Local};
use serde::Serialize;

/// A journal entry as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JournalEntry {
    /// Identifier assigned by Day One
    pub uuid: String,
    /// Plain text extracted from the entry body; may be empty
    pub text: String,
    pub creation_date: Option<DateTime<Local>>,
    pub modified_date: Option<DateTime<Local>>,
    pub starred: bool,
    /// Advisory only, never applied to the dates above
    pub timezone: Option<String>,
    pub journal_name: String,
    pub has_location: bool,
    pub has_weather: bool,
    pub tags: Vec<String>,
    /// Calendar year of creation, set by on-this-day lookups
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Years between creation and the lookup, set by on-this-day lookups
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years_ago: Option<u32>,
}

impl JournalEntry {
    /// Assembles a record from a stored row and its tags.
    pub fn from_row(row: EntryRow, tags: Vec<String>) -> Self {
        let text = extract_text(row.rich_text.as_deref(), row.markdown.as_deref());
        JournalEntry {
            uuid: row.uuid,
            text,
            creation_date: to_calendar_time(row.created),
            modified_date: to_calendar_time(row.modified),
            starred: row.starred,
            timezone: row.timezone,
            journal_name: row
                .journal_name
                .unwrap_or_else(|| DEFAULT_JOURNAL_NAME.to_string()),
            has_location: row.has_location,
            has_weather: row.has_weather,
            tags,
            year: None,
            years_ago: None,
        }
    }

    /// Annotates the record with its creation year relative to `current_year`.
    ///
    /// `years_ago` never goes negative, even for entries dated in the future.
    pub fn with_recurrence(mut self, current_year: i32) -> Self {
        if let Some(created) = self.creation_date {
            let year = created.year();
            self.year = Some(year);
            self.years_ago = Some((current_year - year).max(0) as u32);
        }
        self
    }
}

/// A journal with aggregated entry statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Journal {
    pub name: String,
    /// Stable identifier; absent for the "Default" bucket
    pub uuid: Option<String>,
    pub entry_count: u64,
    /// Creation time of the newest entry; absent when the journal is empty
    pub last_entry_date: Option<DateTime<Local>>,
}

impl From<JournalRow> for Journal {
    fn from(row: JournalRow) -> Self {
        let last_entry_date = if row.entry_count == 0 {
            None
        } else {
            to_calendar_time(row.last_entry)
        };
        Journal {
            name: row.name,
            uuid: row.uuid,
            entry_count: row.entry_count,
            last_entry_date,
        }
    }
}

//! Read operations over entries.

use super::{assemble, journal_filter, Context};
use crate::db::entries;
use crate::errors::{AppError, AppResult};
use crate::query::{clamp_limit, clamp_years_back, storage_day_ranges, MonthDay};
use crate::record::JournalEntry;
use chrono::{Datelike, NaiveDate};
use tracing::{debug, info};

/// Returns the newest entries, newest first.
///
/// `limit` is clamped to `[1, 50]`. An empty journal name means all journals.
///
/// # Errors
///
/// Returns `AppError::StorageUnavailable` if the store cannot be opened, or
/// `AppError::Database` if the query fails.
pub fn read_recent_entries(
    ctx: &Context,
    limit: usize,
    journal: Option<&str>,
) -> AppResult<Vec<JournalEntry>> {
    let limit = clamp_limit(limit);
    let journal = journal_filter(journal);
    info!("Reading up to {} recent entries", limit);

    let db = ctx.open_db()?;
    let rows = entries::recent_entries(&db, journal, limit)?;
    Ok(assemble(&db, rows))
}

/// Returns entries whose stored text contains `text`, newest first.
///
/// # Errors
///
/// Returns `AppError::Validation` if `text` is blank, otherwise the same
/// errors as [`read_recent_entries`].
pub fn search_entries(
    ctx: &Context,
    text: &str,
    limit: usize,
    journal: Option<&str>,
) -> AppResult<Vec<JournalEntry>> {
    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "Search text cannot be empty".to_string(),
        ));
    }
    let limit = clamp_limit(limit);
    let journal = journal_filter(journal);
    info!("Searching entries (limit {})", limit);

    let db = ctx.open_db()?;
    let rows = entries::search_entries(&db, text, journal, limit)?;
    debug!("Search matched {} entries", rows.len());
    Ok(assemble(&db, rows))
}

/// Returns entries written on the same month and day in each of the last
/// `years_back` years and the current one, newest first.
///
/// `target` is `MM-DD` or `YYYY-MM-DD` (the year is ignored). `today` fixes
/// the current year. `years_back` is clamped to 100.
///
/// # Errors
///
/// Returns `AppError::InvalidDate` if `target` cannot be parsed, before the
/// store is opened. Storage errors as for [`read_recent_entries`].
pub fn get_entries_by_date(
    ctx: &Context,
    target: &str,
    years_back: u32,
    today: NaiveDate,
) -> AppResult<Vec<JournalEntry>> {
    let month_day = MonthDay::parse(target)?;
    let years_back = clamp_years_back(years_back);
    let current_year = today.year();
    info!(
        "Reading entries for {:02}-{:02} over {} years",
        month_day.month, month_day.day, years_back
    );

    let ranges = storage_day_ranges(month_day, years_back, current_year);

    let db = ctx.open_db()?;
    let rows = entries::entries_created_in(&db, &ranges)?;
    Ok(assemble(&db, rows)
        .into_iter()
        .map(|entry| entry.with_recurrence(current_year))
        .collect())
}

/// Reads one entry by identifier with its complete text.
///
/// With `include_tags` false the tag list is left empty.
///
/// # Errors
///
/// Storage errors as for [`read_recent_entries`].
/// Returns `Ok(None)` if no entry has this identifier.
pub fn read_full_entry(
    ctx: &Context,
    uuid: &str,
    include_tags: bool,
) -> AppResult<Option<JournalEntry>> {
    info!("Reading entry {}", uuid);

    let db = ctx.open_db()?;
    let Some(row) = entries::entry_by_uuid(&db, uuid)? else {
        debug!("Entry {} not found", uuid);
        return Ok(None);
    };

    let tags = if include_tags {
        entries::entry_tags(&db, &row.uuid)
    } else {
        Vec::new()
    };
    Ok(Some(JournalEntry::from_row(row, tags)))
}

/// Counts all entries, or the entries of one journal.
///
/// # Errors
///
/// Storage errors as for [`read_recent_entries`].
pub fn get_entry_count(ctx: &Context, journal: Option<&str>) -> AppResult<u64> {
    let journal = journal_filter(journal);
    let db = ctx.open_db()?;
    entries::count_entries(&db, journal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::path::PathBuf;

    fn missing_store_context() -> Context {
        Context::new(Config {
            db_path: PathBuf::from("/nonexistent/dayone-tools/DayOne.sqlite"),
            ..Config::default()
        })
    }

    #[test]
    fn test_invalid_date_fails_before_opening_store() {
        let ctx = missing_store_context();
        let today = NaiveDate::from_ymd_opt(2026, 6, 14).unwrap();

        match get_entries_by_date(&ctx, "13-40", 5, today) {
            Err(AppError::InvalidDate(input)) => assert_eq!(input, "13-40"),
            other => panic!("Expected InvalidDate, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_search_is_validation_error() {
        let ctx = missing_store_context();
        assert!(matches!(
            search_entries(&ctx, "  ", 10, None),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_missing_store_is_storage_unavailable() {
        let ctx = missing_store_context();
        assert!(matches!(
            read_recent_entries(&ctx, 10, None),
            Err(AppError::StorageUnavailable(_))
        ));
        assert!(matches!(
            get_entry_count(&ctx, None),
            Err(AppError::StorageUnavailable(_))
        ));
    }
}

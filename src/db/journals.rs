//! Journal aggregation.

use super::{text_column, Database};
use crate::constants::DEFAULT_JOURNAL_NAME;
use crate::errors::{AppResult, DatabaseError};
use rusqlite::params;
use tracing::debug;

/// One journal with its aggregated entry statistics, as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalRow {
    pub name: String,
    /// `None` when only entries without a journal back the row
    pub uuid: Option<String>,
    pub entry_count: u64,
    /// Newest creation time, in storage-epoch seconds
    pub last_entry: Option<f64>,
}

/// Lists every journal with its entry count and newest entry.
///
/// Rows are grouped by display name, so a journal whose name is null falls
/// into the same "Default" bucket as entries whose journal relation is null
/// (or points at a missing journal). This is the same resolution the journal
/// filter uses. Journals with no entries are included with a count of zero;
/// the "Default" bucket only appears when it is non-empty or backed by a
/// journal row. The counts always sum to the total number of entries.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_journals(db: &Database) -> AppResult<Vec<JournalRow>> {
    let m = db.mapping();

    let sql = format!(
        "SELECT name, MIN(journal_uuid), SUM(entries), MAX(last_entry) FROM ( \
             SELECT COALESCE(j.{name}, ?1) AS name, j.{uuid} AS journal_uuid, \
                    COUNT(e.{entry_pk}) AS entries, MAX(e.{created}) AS last_entry, \
                    1 AS is_journal \
             FROM {journal_table} j \
             LEFT JOIN {entry_table} e ON e.{entry_journal} = j.{journal_pk} \
             GROUP BY j.{journal_pk} \
             UNION ALL \
             SELECT ?1, NULL, COUNT(e.{entry_pk}), MAX(e.{created}), 0 \
             FROM {entry_table} e \
             LEFT JOIN {journal_table} j ON e.{entry_journal} = j.{journal_pk} \
             WHERE j.{journal_pk} IS NULL \
         ) \
         GROUP BY name \
         HAVING SUM(entries) > 0 OR MAX(is_journal) = 1 \
         ORDER BY name",
        name = m.journal_name,
        uuid = m.journal_uuid,
        entry_pk = m.entry_pk,
        created = m.entry_created,
        journal_table = m.journal_table,
        entry_table = m.entry_table,
        entry_journal = m.entry_journal,
        journal_pk = m.journal_pk,
    );

    let mut stmt = db.conn().prepare(&sql).map_err(DatabaseError::Sqlite)?;
    let journals = stmt
        .query_map(params![DEFAULT_JOURNAL_NAME], |row| {
            Ok(JournalRow {
                name: text_column(row.get_ref(0)?)
                    .unwrap_or_else(|| DEFAULT_JOURNAL_NAME.to_string()),
                uuid: text_column(row.get_ref(1)?),
                entry_count: row.get::<_, i64>(2)?.max(0) as u64,
                last_entry: row.get(3)?,
            })
        })
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;

    debug!("Found {} journals", journals.len());
    Ok(journals)
}

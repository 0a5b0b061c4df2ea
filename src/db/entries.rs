//! Entry queries.
//!
//! This module reads raw entry rows, their tags and entry counts from the
//! Day One store. All caller-supplied values are bound parameters; only the
//! table and column names from the schema mapping are interpolated.

use super::schema::SchemaMapping;
use super::{column_present, text_column, Database};
use crate::constants::DEFAULT_JOURNAL_NAME;
use crate::errors::{AppResult, DatabaseError};
use rusqlite::{params, params_from_iter, types::Value, Row};
use tracing::{debug, warn};

/// An entry exactly as stored, before text extraction and date conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryRow {
    pub uuid: String,
    pub rich_text: Option<String>,
    pub markdown: Option<String>,
    /// Seconds since the storage epoch
    pub created: Option<f64>,
    /// Seconds since the storage epoch
    pub modified: Option<f64>,
    pub starred: bool,
    pub timezone: Option<String>,
    /// `None` when the journal relation is null or dangling
    pub journal_name: Option<String>,
    pub has_location: bool,
    pub has_weather: bool,
}

fn select_entries(m: &SchemaMapping) -> String {
    format!(
        "SELECT e.{uuid}, e.{rich}, e.{markdown}, e.{created}, e.{modified}, e.{starred}, \
         e.{timezone}, j.{journal_name}, e.{location}, e.{weather} \
         FROM {entry_table} e \
         LEFT JOIN {journal_table} j ON e.{entry_journal} = j.{journal_pk}",
        uuid = m.entry_uuid,
        rich = m.entry_rich_text,
        markdown = m.entry_markdown,
        created = m.entry_created,
        modified = m.entry_modified,
        starred = m.entry_starred,
        timezone = m.entry_timezone,
        journal_name = m.journal_name,
        location = m.entry_location,
        weather = m.entry_weather,
        entry_table = m.entry_table,
        journal_table = m.journal_table,
        entry_journal = m.entry_journal,
        journal_pk = m.journal_pk,
    )
}

/// Journal filter that also resolves the "Default" bucket for entries
/// without a journal. Binds two parameters: the name and the default name.
fn journal_filter(m: &SchemaMapping) -> String {
    format!("COALESCE(j.{}, ?) = ?", m.journal_name)
}

fn order_newest_first(m: &SchemaMapping) -> String {
    format!(" ORDER BY e.{} DESC, e.{} DESC", m.entry_created, m.entry_pk)
}

fn map_entry_row(row: &Row<'_>) -> rusqlite::Result<EntryRow> {
    Ok(EntryRow {
        uuid: text_column(row.get_ref(0)?).unwrap_or_default(),
        rich_text: text_column(row.get_ref(1)?),
        markdown: text_column(row.get_ref(2)?),
        created: row.get(3)?,
        modified: row.get(4)?,
        starred: column_present(row.get_ref(5)?),
        timezone: text_column(row.get_ref(6)?),
        journal_name: text_column(row.get_ref(7)?),
        has_location: column_present(row.get_ref(8)?),
        has_weather: column_present(row.get_ref(9)?),
    })
}

fn query_entries(db: &Database, sql: &str, values: Vec<Value>) -> AppResult<Vec<EntryRow>> {
    let mut stmt = db.conn().prepare(sql).map_err(DatabaseError::Sqlite)?;
    let rows = stmt
        .query_map(params_from_iter(values), map_entry_row)
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;
    Ok(rows)
}

/// Returns the newest entries, optionally restricted to one journal.
///
/// `limit` is used as given; clamping is the caller's concern.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn recent_entries(
    db: &Database,
    journal: Option<&str>,
    limit: usize,
) -> AppResult<Vec<EntryRow>> {
    debug!("Reading {} recent entries (journal: {:?})", limit, journal);
    let m = db.mapping();

    let mut sql = select_entries(m);
    let mut values = Vec::new();
    if let Some(name) = journal {
        sql.push_str(" WHERE ");
        sql.push_str(&journal_filter(m));
        values.push(Value::from(DEFAULT_JOURNAL_NAME.to_string()));
        values.push(Value::from(name.to_string()));
    }
    sql.push_str(&order_newest_first(m));
    sql.push_str(" LIMIT ?");
    values.push(Value::from(limit as i64));

    query_entries(db, &sql, values)
}

/// Escapes `LIKE` wildcards so the search text matches literally.
fn like_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Returns entries whose stored rich text or markdown contains `text`.
///
/// Matching runs against the raw columns, so a hit inside rich-text JSON
/// structure is possible. Case sensitivity follows SQLite's `LIKE`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn search_entries(
    db: &Database,
    text: &str,
    journal: Option<&str>,
    limit: usize,
) -> AppResult<Vec<EntryRow>> {
    debug!("Searching entries (journal: {:?}, limit: {})", journal, limit);
    let m = db.mapping();

    let mut sql = select_entries(m);
    sql.push_str(&format!(
        " WHERE (e.{rich} LIKE ?1 ESCAPE '\\' OR e.{markdown} LIKE ?1 ESCAPE '\\')",
        rich = m.entry_rich_text,
        markdown = m.entry_markdown,
    ));
    let mut values = vec![Value::from(like_pattern(text))];
    if let Some(name) = journal {
        sql.push_str(&format!(" AND COALESCE(j.{}, ?2) = ?3", m.journal_name));
        values.push(Value::from(DEFAULT_JOURNAL_NAME.to_string()));
        values.push(Value::from(name.to_string()));
    }
    sql.push_str(&order_newest_first(m));
    sql.push_str(&format!(" LIMIT ?{}", values.len() + 1));
    values.push(Value::from(limit as i64));

    query_entries(db, &sql, values)
}

/// Returns entries created inside any of the half-open `[start, end)` ranges,
/// given in storage-epoch seconds.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn entries_created_in(db: &Database, ranges: &[(f64, f64)]) -> AppResult<Vec<EntryRow>> {
    if ranges.is_empty() {
        return Ok(Vec::new());
    }
    debug!("Reading entries across {} date ranges", ranges.len());
    let m = db.mapping();

    let condition = format!("(e.{0} >= ? AND e.{0} < ?)", m.entry_created);
    let conditions = vec![condition; ranges.len()].join(" OR ");

    let mut sql = select_entries(m);
    sql.push_str(&format!(" WHERE ({})", conditions));
    sql.push_str(&order_newest_first(m));

    let values = ranges
        .iter()
        .flat_map(|(start, end)| [Value::from(*start), Value::from(*end)])
        .collect();

    query_entries(db, &sql, values)
}

/// Retrieves one entry by its identifier.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no entry has this identifier.
pub fn entry_by_uuid(db: &Database, uuid: &str) -> AppResult<Option<EntryRow>> {
    debug!("Reading entry {}", uuid);
    let m = db.mapping();

    let sql = format!("{} WHERE e.{} = ?1", select_entries(m), m.entry_uuid);
    let result = db.conn().query_row(&sql, params![uuid], map_entry_row);

    match result {
        Ok(row) => Ok(Some(row)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DatabaseError::Sqlite(e).into()),
    }
}

/// Checks whether an entry with this identifier exists.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn entry_exists(db: &Database, uuid: &str) -> AppResult<bool> {
    let m = db.mapping();
    let sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?1)",
        m.entry_table, m.entry_uuid
    );
    let exists: bool = db
        .conn()
        .query_row(&sql, params![uuid], |row| row.get(0))
        .map_err(DatabaseError::Sqlite)?;
    Ok(exists)
}

/// Counts entries, optionally restricted to one journal.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_entries(db: &Database, journal: Option<&str>) -> AppResult<u64> {
    let m = db.mapping();

    let count: i64 = match journal {
        Some(name) => {
            let sql = format!(
                "SELECT COUNT(*) FROM {} e LEFT JOIN {} j ON e.{} = j.{} WHERE {}",
                m.entry_table,
                m.journal_table,
                m.entry_journal,
                m.journal_pk,
                journal_filter(m)
            );
            db.conn()
                .query_row(&sql, params![DEFAULT_JOURNAL_NAME, name], |row| row.get(0))
        }
        None => {
            let sql = format!("SELECT COUNT(*) FROM {}", m.entry_table);
            db.conn().query_row(&sql, [], |row| row.get(0))
        }
    }
    .map_err(DatabaseError::Sqlite)?;

    debug!("Counted {} entries (journal: {:?})", count, journal);
    Ok(count.max(0) as u64)
}

/// Returns the tag names attached to an entry.
///
/// Best-effort: any failure is logged and yields an empty list, so one entry
/// with unreadable tags never fails the surrounding read.
pub fn entry_tags(db: &Database, uuid: &str) -> Vec<String> {
    let m = db.mapping();
    let Some(join) = &m.tag_join else {
        return Vec::new();
    };

    let sql = format!(
        "SELECT t.{tag_name} FROM {tag_table} t \
         JOIN {join_table} zt ON t.{tag_pk} = zt.{join_tag} \
         JOIN {entry_table} e ON zt.{join_entry} = e.{entry_pk} \
         WHERE e.{entry_uuid} = ?1 \
         ORDER BY t.{tag_name}",
        tag_name = m.tag_name,
        tag_table = m.tag_table,
        join_table = join.table,
        tag_pk = m.tag_pk,
        join_tag = join.tag_column,
        entry_table = m.entry_table,
        join_entry = join.entry_column,
        entry_pk = m.entry_pk,
        entry_uuid = m.entry_uuid,
    );

    let result = db.conn().prepare(&sql).and_then(|mut stmt| {
        let names = stmt
            .query_map(params![uuid], |row| Ok(text_column(row.get_ref(0)?)))?
            .collect::<Result<Vec<_>, _>>();
        names
    });

    match result {
        Ok(names) => names.into_iter().flatten().collect(),
        Err(e) => {
            warn!("Failed to read tags for entry {}: {}", uuid, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("coffee"), "%coffee%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("snake_case"), "%snake\\_case%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_select_uses_mapping_names() {
        let sql = select_entries(&SchemaMapping::day_one_2());
        assert!(sql.contains("e.ZRICHTEXTJSON"));
        assert!(sql.contains("LEFT JOIN ZJOURNAL j ON e.ZJOURNAL = j.Z_PK"));
    }
}

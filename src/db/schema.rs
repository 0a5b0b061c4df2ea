//! Table and column names of the Day One store.
//!
//! The store is generated by an object-graph persistence framework, so every
//! table and column carries a `Z` prefix and the many-to-many join between
//! entries and tags is named after internal entity numbers. Those names have
//! changed across app versions. Queries are built from a [`SchemaMapping`]
//! rather than inline literals, so supporting another storage generation means
//! adding a mapping, not editing queries.

use rusqlite::{params, Connection};
use tracing::{debug, warn};

/// The join table linking entries to tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagJoin {
    /// Join table name, e.g. `Z_13TAGS`
    pub table: String,
    /// Column referencing the entry primary key, e.g. `Z_13ENTRIES`
    pub entry_column: String,
    /// Column referencing the tag primary key, e.g. `Z_55TAGS1`
    pub tag_column: String,
}

/// Names used to query one generation of the Day One schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaMapping {
    pub entry_table: &'static str,
    pub entry_pk: &'static str,
    pub entry_uuid: &'static str,
    pub entry_rich_text: &'static str,
    pub entry_markdown: &'static str,
    pub entry_created: &'static str,
    pub entry_modified: &'static str,
    pub entry_starred: &'static str,
    pub entry_timezone: &'static str,
    pub entry_location: &'static str,
    pub entry_weather: &'static str,
    pub entry_journal: &'static str,

    pub journal_table: &'static str,
    pub journal_pk: &'static str,
    pub journal_name: &'static str,
    pub journal_uuid: &'static str,

    pub tag_table: &'static str,
    pub tag_pk: &'static str,
    pub tag_name: &'static str,

    /// Resolved at open time; `None` when no join table could be found.
    pub tag_join: Option<TagJoin>,
}

impl SchemaMapping {
    /// Mapping for the Day One 2 storage format.
    pub fn day_one_2() -> Self {
        SchemaMapping {
            entry_table: "ZENTRY",
            entry_pk: "Z_PK",
            entry_uuid: "ZUUID",
            entry_rich_text: "ZRICHTEXTJSON",
            entry_markdown: "ZMARKDOWNTEXT",
            entry_created: "ZCREATIONDATE",
            entry_modified: "ZMODIFIEDDATE",
            entry_starred: "ZSTARRED",
            entry_timezone: "ZTIMEZONE",
            entry_location: "ZLOCATION",
            entry_weather: "ZWEATHER",
            entry_journal: "ZJOURNAL",

            journal_table: "ZJOURNAL",
            journal_pk: "Z_PK",
            journal_name: "ZNAME",
            journal_uuid: "ZUUIDFORAUXILIARYSYNC",

            tag_table: "ZTAG",
            tag_pk: "Z_PK",
            tag_name: "ZNAME",

            tag_join: Some(TagJoin {
                table: "Z_13TAGS".to_string(),
                entry_column: "Z_13ENTRIES".to_string(),
                tag_column: "Z_55TAGS1".to_string(),
            }),
        }
    }

    /// Confirms the configured tag join table exists, or discovers the one this
    /// store actually uses.
    ///
    /// Discovery looks for a `Z_<n>TAGS` table that has one column ending in
    /// `ENTRIES` and one starting with `Z_` and containing `TAGS`. Failure is
    /// not fatal: tags are enrichment, and a store without a usable join table
    /// simply reports no tags.
    pub fn resolve_tag_join(mut self, conn: &Connection) -> Self {
        if let Some(join) = &self.tag_join {
            if join_table_matches(conn, join) {
                debug!("Using tag join table {}", join.table);
                return self;
            }
        }

        self.tag_join = discover_tag_join(conn);
        match &self.tag_join {
            Some(join) => debug!("Discovered tag join table {}", join.table),
            None => warn!("No entry/tag join table found; tags will be empty"),
        }
        self
    }
}

fn table_columns(conn: &Connection, table: &str) -> Vec<String> {
    let sql = format!("PRAGMA table_info(\"{}\")", table.replace('"', ""));
    let mut stmt = match conn.prepare(&sql) {
        Ok(stmt) => stmt,
        Err(_) => return Vec::new(),
    };
    let columns = stmt.query_map([], |row| row.get::<_, String>(1));
    match columns {
        Ok(rows) => rows.filter_map(Result::ok).collect(),
        Err(_) => Vec::new(),
    }
}

fn join_table_matches(conn: &Connection, join: &TagJoin) -> bool {
    let columns = table_columns(conn, &join.table);
    columns.contains(&join.entry_column) && columns.contains(&join.tag_column)
}

fn discover_tag_join(conn: &Connection) -> Option<TagJoin> {
    let mut stmt = conn
        .prepare(
            r#"
            SELECT name FROM sqlite_master
            WHERE type = 'table' AND name LIKE ?1 ESCAPE '\'
            ORDER BY name
            "#,
        )
        .ok()?;
    let tables: Vec<String> = stmt
        .query_map(params![r"Z\_%TAGS"], |row| row.get(0))
        .ok()?
        .filter_map(Result::ok)
        .collect();

    for table in tables {
        let columns = table_columns(conn, &table);
        let entry_column = columns.iter().find(|c| c.ends_with("ENTRIES"));
        let tag_column = columns
            .iter()
            .find(|c| c.starts_with("Z_") && c.contains("TAGS"));
        if let (Some(entry_column), Some(tag_column)) = (entry_column, tag_column) {
            return Some(TagJoin {
                table: table.clone(),
                entry_column: entry_column.clone(),
                tag_column: tag_column.clone(),
            });
        }
    }
    None
}

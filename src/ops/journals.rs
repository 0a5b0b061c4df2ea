//! Journal listing.

use super::Context;
use crate::db::journals;
use crate::errors::AppResult;
use crate::record::Journal;
use tracing::info;

/// Lists journal names, including "Default" when entries without a journal
/// exist.
///
/// # Errors
///
/// Returns `AppError::StorageUnavailable` if the store cannot be opened, or
/// `AppError::Database` if the query fails.
pub fn list_journals(ctx: &Context) -> AppResult<Vec<String>> {
    Ok(list_journals_with_counts(ctx)?
        .into_iter()
        .map(|journal| journal.name)
        .collect())
}

/// Lists every journal with its entry count and newest entry date.
///
/// The counts sum to the total number of entries.
///
/// # Errors
///
/// Same as [`list_journals`].
pub fn list_journals_with_counts(ctx: &Context) -> AppResult<Vec<Journal>> {
    let db = ctx.open_db()?;
    let journals: Vec<Journal> = journals::list_journals(&db)?
        .into_iter()
        .map(Journal::from)
        .collect();
    info!("Listed {} journals", journals.len());
    Ok(journals)
}

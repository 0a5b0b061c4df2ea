/*!
# dayone-tools

Read and write access to a Day One journal, intended for tool-calling agents.

Reads open the Day One SQLite store read-only and rebuild journal entries from
its Core Data schema: timestamps are converted from the storage epoch, and
plain text is extracted from whichever rich-text encoding an entry carries.
Mutations are delegated to the Day One command-line tool.

## Architecture

- `cli`: Command-line interface handling using clap
- `cli_tool`: The Day One CLI collaborator used for mutations
- `config`: Configuration loading and validation
- `constants`: Shared constants
- `db`: Read-only schema access layer
- `errors`: Error handling infrastructure
- `extract`: Plain-text extraction from stored entry bodies
- `ops`: Public operations, each taking an explicit `Context`
- `query`: Result limits and on-this-day date ranges
- `record`: Entry and journal read models
- `timestamp`: Storage epoch conversion

## Usage Example

```rust,no_run
use dayone_tools::{ops, Config, Context};

fn main() -> dayone_tools::AppResult<()> {
    let config = Config::load()?;
    config.validate()?;
    let ctx = Context::new(config);

    for entry in ops::read_recent_entries(&ctx, 5, None)? {
        println!("{} {}", entry.uuid, entry.text);
    }
    Ok(())
}
```
*/

/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// The Day One command-line tool
pub mod cli_tool;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// Read-only access to the Day One store
pub mod db;
/// Error types and utilities for error handling
pub mod errors;
/// Plain-text extraction
pub mod extract;
/// Public operations
pub mod ops;
/// Query planning helpers
pub mod query;
/// Read models
pub mod record;
/// Storage timestamp conversion
pub mod timestamp;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use cli_tool::NewEntry;
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use ops::Context;
pub use record::{Journal, JournalEntry};

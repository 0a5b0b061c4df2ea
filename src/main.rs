/*!
# dayone-tools

Command-line access to a Day One journal. Reads go straight to the Day One
SQLite store (read-only); creating and changing entries goes through the
`dayone2` CLI. Every command prints its result to stdout as JSON.

## Usage

```
dayone-tools [OPTIONS] <COMMAND>

Commands:
  create       Create a new entry through the Day One CLI
  journals     List journals
  count        Count entries
  recent       Show the most recent entries
  search       Search entry text
  on-this-day  Show entries written on this day in previous years
  show         Show one entry in full
  update       Replace the text of an entry
  append       Append text to an entry
  verify       Check that the Day One CLI is installed and working
```

## Configuration

- `DAYONE_CLI`: Day One CLI executable (defaults to "dayone2")
- `DAYONE_DB`: Day One database path (defaults to the Day One group container)
- `DAYONE_LOG_FORMAT`: "text" or "json" log output on stderr
- `RUST_LOG`: log filter (defaults to "info")
*/

use chrono::{Local, NaiveDate};
use clap::Parser;
use dayone_tools::cli::{CliArgs, Commands};
use dayone_tools::constants::{LOG_FORMAT_JSON, TRACING_ROOT_SPAN_NAME, TRACING_SERVICE_NAME};
use dayone_tools::errors::{AppError, AppResult};
use dayone_tools::ops::{self, Context};
use dayone_tools::Config;
use serde_json::{json, Value};
use tracing::{debug, error, info, info_span, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

fn main() {
    if let Err(e) = run() {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> AppResult<()> {
    // Obtain current date/time once at the beginning
    let current_datetime = Local::now();

    let args = CliArgs::parse();

    let mut config = Config::load()?;
    if let Some(format) = &args.log_format {
        config.log_format = format.clone();
    }

    init_tracing(&config.log_format, args.default_log_level())?;

    let correlation_id = Uuid::new_v4();
    let root_span = info_span!(
        TRACING_ROOT_SPAN_NAME,
        service_name = TRACING_SERVICE_NAME,
        correlation_id = %correlation_id
    );
    let _guard = root_span.enter();

    debug!("Configuration: {:?}", config);
    config.validate()?;

    let ctx = Context::new(config);
    let result = dispatch(&ctx, args.command, current_datetime.date_naive())?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    info!("Command completed");
    Ok(())
}

fn init_tracing(log_format: &str, default_level: &str) -> AppResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);

    let result = if log_format == LOG_FORMAT_JSON {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_ansi(false)
                    .with_current_span(true),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()
    };

    result.map_err(|e| AppError::Config(format!("Failed to initialize logging: {}", e)))
}

fn dispatch(ctx: &Context, command: Commands, today: NaiveDate) -> AppResult<Value> {
    let value = match command {
        Commands::Create(create) => {
            let uuid = ops::create_entry(ctx, &create.into_new_entry())?;
            json!({ "uuid": uuid })
        }
        Commands::Journals { counts: true } => {
            serde_json::to_value(ops::list_journals_with_counts(ctx)?)?
        }
        Commands::Journals { counts: false } => serde_json::to_value(ops::list_journals(ctx)?)?,
        Commands::Count { journal } => {
            let count = ops::get_entry_count(ctx, journal.as_deref())?;
            json!({ "journal": journal, "count": count })
        }
        Commands::Recent { limit, journal } => {
            serde_json::to_value(ops::read_recent_entries(ctx, limit, journal.as_deref())?)?
        }
        Commands::Search {
            text,
            limit,
            journal,
        } => serde_json::to_value(ops::search_entries(ctx, &text, limit, journal.as_deref())?)?,
        Commands::OnThisDay { date, years_back } => {
            let target = date.unwrap_or_else(|| today.format("%m-%d").to_string());
            serde_json::to_value(ops::get_entries_by_date(ctx, &target, years_back, today)?)?
        }
        Commands::Show { uuid, no_tags } => match ops::read_full_entry(ctx, &uuid, !no_tags)? {
            Some(entry) => serde_json::to_value(entry)?,
            None => {
                return Err(AppError::NotFound(format!(
                    "Entry with UUID {} not found",
                    uuid
                )))
            }
        },
        Commands::Update { uuid, content } => {
            serde_json::to_value(ops::update_entry(ctx, &uuid, &content)?)?
        }
        Commands::Append {
            uuid,
            content,
            separator,
        } => serde_json::to_value(ops::append_to_entry(
            ctx,
            &uuid,
            &content,
            separator.as_deref(),
        )?)?,
        Commands::Verify => match ops::verify_cli(ctx) {
            Ok(version) => json!({ "command": ctx.cli().command(), "version": version }),
            Err(e) => {
                warn!("Day One CLI is not available; entries can be read but not written");
                return Err(e);
            }
        },
    };
    Ok(value)
}

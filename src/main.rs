//! search-select CLI entry point
//!
//! Hosts a search-select control over a JSON or CSV record file.
//!
//! # Usage
//!
//! ```bash
//! # Candidates for a term
//! search-select query -r people.json an
//!
//! # Starter list shown on focus
//! search-select query -r people.json --initial
//!
//! # SQL for a database-backed host
//! search-select sql "ada l" -x 3 7
//!
//! # Replay a session
//! search-select replay -r people.csv session.txt
//! ```
//!
//! # Configuration
//!
//! Options are read from `--config FILE`, or from the user's config
//! directory (`~/.config/search-select/config.toml` on Linux).
//! `SEARCH_SELECT_*` environment variables override file values.

use colored::Colorize;
use search_select::{
    SearchSelectError,
    cli::{Cli, Commands, RecordArgs},
    config::SearchSelectConfig,
    controller::{EventLog, SearchSelect},
    query::{QueryDescriptor, sql},
    record::Identifier,
    replay,
    source::{self, DataSource, MemorySource},
};
use std::io::{self, Read};
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

type Result<T> = std::result::Result<T, SearchSelectError>;

/// Print candidate rows as `id  label`
fn print_candidates<S: DataSource>(control: &SearchSelect<S>, quiet: bool) {
    if control.candidates().is_empty() {
        if !quiet {
            println!("{}", "No results found.".dimmed());
        }
        return;
    }

    for (record, label) in control.candidates().iter().zip(control.candidate_labels()) {
        println!("  {:>6}  {label}", record.id.to_string().cyan());
    }
}

fn describe_query(query: &QueryDescriptor) -> String {
    let filter = match (&query.filter, &query.term) {
        (Some(filter), Some(term)) => format!("{:?} ~ {term:?}", filter.fields()),
        _ => "no term filter".to_string(),
    };
    format!(
        "{filter}, order by {} {}, limit {}",
        query.order_by.field, query.order_by.direction, query.limit
    )
}

fn load_source(records: &RecordArgs) -> Result<MemorySource> {
    let source = source::load_records(&records.records, &records.id_field)?;
    tracing::debug!(count = source.len(), path = %records.records.display(), "loaded records");
    Ok(source)
}

fn load_config(path: Option<&Path>) -> Result<SearchSelectConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => SearchSelectConfig::default_path()?,
    };
    tracing::debug!(path = %path.display(), "loading configuration");
    Ok(SearchSelectConfig::load(&path)?)
}

/// Handle the query command - one search, printed candidates
fn handle_query_command(
    config: &SearchSelectConfig,
    records: &RecordArgs,
    term: &str,
    initial: bool,
    quiet: bool,
) -> Result<()> {
    let mut control = SearchSelect::new(config, load_source(records)?)?;

    let exclude = control.selection().exclusions().to_vec();
    let query = if initial {
        control.on_focus_gained()?;
        control.settings().query.build_initial(&exclude)?
    } else {
        control.on_search_term_changed(term)?;
        control.settings().query.build(term, &exclude)?
    };

    if !quiet {
        match query {
            Some(query) => println!("{} {}", "query:".bold(), describe_query(&query)),
            None => println!("{} {}", "query:".bold(), "none".dimmed()),
        }
    }

    print_candidates(&control, quiet);
    Ok(())
}

/// Handle the sql command - render the statement for a term
fn handle_sql_command(
    config: &SearchSelectConfig,
    term: &str,
    initial: bool,
    exclude: &[String],
    quiet: bool,
) -> Result<()> {
    let settings = config.normalize()?;
    let exclude: Vec<Identifier> = exclude.iter().map(|id| Identifier::parse(id)).collect();

    let query = if initial {
        settings.query.build_initial(&exclude)?
    } else {
        settings.query.build(term, &exclude)?
    };

    let Some(query) = query else {
        if !quiet {
            println!("{}", "No query: blank term or initial load disabled.".dimmed());
        }
        return Ok(());
    };

    let statement = sql::render(&settings.model_source, &query)?;
    println!("{}", statement.text);
    println!(
        "{} {}",
        "params:".bold(),
        serde_json::Value::Array(statement.params)
    );
    Ok(())
}

/// Handle the replay command - drive a control with a script
fn handle_replay_command(
    config: &SearchSelectConfig,
    records: &RecordArgs,
    script: &Path,
    quiet: bool,
) -> Result<()> {
    let text = if script == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        text
    } else {
        std::fs::read_to_string(script)?
    };
    let steps = replay::parse_script(&text)?;

    let log = EventLog::new();
    let mut control = SearchSelect::builder()
        .config(config.clone())
        .source(load_source(records)?)
        .listener(log.clone())
        .build()?;

    for step in steps {
        let seen = log.len();
        step.apply(&mut control)?;

        println!("{} {}", ">".bold(), step);
        for event in log.events().into_iter().skip(seen) {
            println!(
                "  {} {} {}",
                "event".green(),
                event.name,
                event.value.to_json()
            );
        }
        if !quiet {
            println!("  {} {:?}", "term".dimmed(), control.term());
            print_candidates(&control, quiet);
        }
    }

    println!("{} {}", "selection:".bold(), control.value().to_json());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())))
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let config = load_config(cli.config.as_deref())?;
    let quiet = cli.quiet;

    match &cli.command {
        Commands::Query {
            records,
            term,
            initial,
        } => handle_query_command(&config, records, term, *initial, quiet),
        Commands::Sql {
            term,
            initial,
            exclude,
        } => handle_sql_command(&config, term, *initial, exclude, quiet),
        Commands::Replay { records, script } => {
            handle_replay_command(&config, records, script, quiet)
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

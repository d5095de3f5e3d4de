mod app;
mod cli;
mod config;
mod consts;
mod core;
mod error;
mod output;
mod source;
mod utils;

use clap::Parser;
use tracing::Level;

use crate::app::{CommandContext, handle_command};
use crate::cli::{Cli, Commands, parse_command};
use crate::config::Config;
use crate::core::{DateFilter, DateResolver};
use crate::error::AppError;
use crate::output::{NumberFormat, TableOptions};
use crate::source::csv::{DEFAULT_DELIMITER, parse_delimiter};
use crate::source::{DEFAULT_TABLE, SourceOptions, build_sources};
use crate::utils::{Timezone, parse_date_opt};

fn init_tracing(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let command = parse_command(&cli.command);
    let is_import = matches!(command, Commands::Import);

    let timezone = Timezone::parse(cli.timezone.as_deref())?;
    let number_format = NumberFormat::from_locale(cli.locale.as_deref())?;
    let filter = DateFilter {
        since: parse_date_opt(cli.since.as_deref())?,
        until: parse_date_opt(cli.until.as_deref())?,
        year: cli.year,
    };
    let delimiter = match cli.delimiter.as_deref() {
        Some(raw) => parse_delimiter(raw)?,
        None => DEFAULT_DELIMITER,
    };

    let options = SourceOptions {
        rows: cli.rows.clone(),
        inputs: cli.input.clone(),
        url: cli.url.clone(),
        // the import destination is never read back as a source
        database: if is_import { None } else { cli.database.clone() },
        table: cli.table.clone().unwrap_or_else(|| DEFAULT_TABLE.to_string()),
        delimiter,
    };

    let ctx = CommandContext {
        cli,
        sources: build_sources(&options)?,
        resolver: DateResolver::new(timezone),
        filter,
        table: TableOptions {
            use_color: cli.use_color(),
            number_format,
        },
    };
    handle_command(&command, &ctx)
}

fn main() {
    let cli = Cli::parse();
    let (config, origin) = Config::load();
    let cli = cli.with_config(&config);

    init_tracing(cli.debug);
    origin.log();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

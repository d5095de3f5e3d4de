use std::borrow::Cow;
use std::path::Path;

use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::consts::{DEFAULT_TOP, NO_DATA};
use crate::core::{
    CrossKind, DateFilter, DateResolver, Dimension, OrderRecord, aggregate_cross,
    aggregate_daily, aggregate_dimension, aggregate_monthly, filter_records, orders_on,
    summarize, top_n, verify_monthly,
};
use crate::error::AppError;
use crate::output::{
    TableOptions, output_breakdown_csv, output_breakdown_json, output_cross_csv,
    output_cross_json, output_lookup_json, output_period_csv, output_period_json,
    output_summary_json, print_breakdown_table, print_cross_table, print_date_lookup,
    print_load_line, print_period_table, print_summary_table, render_context,
};
use crate::source::{BoxedSource, DEFAULT_TABLE, LoadResult, load_records, save_records};
use crate::utils::parse_date;

pub(crate) struct CommandContext<'a> {
    pub(crate) cli: &'a Cli,
    pub(crate) sources: Vec<BoxedSource>,
    pub(crate) resolver: DateResolver,
    pub(crate) filter: DateFilter,
    pub(crate) table: TableOptions,
}

impl CommandContext<'_> {
    fn load(&self) -> Result<LoadResult, AppError> {
        load_records(&self.sources)
    }

    /// Records inside `--year`/`--since`/`--until`, all of them when no bound is set
    fn in_range<'r>(&self, records: &'r [OrderRecord]) -> Cow<'r, [OrderRecord]> {
        if self.filter.is_active() {
            Cow::Owned(filter_records(records, &self.resolver, &self.filter))
        } else {
            Cow::Borrowed(records)
        }
    }

    fn table_name(&self) -> &str {
        self.cli.table.as_deref().unwrap_or(DEFAULT_TABLE)
    }

    fn reject_csv(&self, command: &'static str) -> Result<(), AppError> {
        if self.cli.csv {
            return Err(AppError::UnsupportedOutput {
                format: "csv",
                command,
            });
        }
        Ok(())
    }
}

fn handle_summary(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    ctx.reject_csv("summary")?;
    let loaded = ctx.load()?;
    if loaded.records.is_empty() {
        println!("{NO_DATA}");
        return Ok(());
    }

    let summary = summarize(&loaded.records, &ctx.resolver);
    let monthly = aggregate_monthly(&loaded.records, &ctx.resolver);
    let verification = verify_monthly(&summary, &monthly);
    debug!(consistent = verification.consistent, "verified monthly breakdown");

    if ctx.cli.json {
        println!("{}", output_summary_json(&summary, &verification)?);
    } else {
        print_summary_table(&summary, &verification, ctx.table);
        print_load_line(loaded.rows, loaded.elapsed_ms, ctx.table);
    }
    Ok(())
}

fn handle_monthly(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let loaded = ctx.load()?;
    if loaded.records.is_empty() {
        println!("{NO_DATA}");
        return Ok(());
    }

    let periods = aggregate_monthly(&ctx.in_range(&loaded.records), &ctx.resolver);
    if ctx.cli.json {
        println!("{}", output_period_json(&periods)?);
    } else if ctx.cli.csv {
        print!("{}", output_period_csv(&periods)?);
    } else if periods.is_empty() {
        println!("No dated orders in the selected period.");
    } else {
        print_period_table(&periods, ctx.table);
        print_load_line(loaded.rows, loaded.elapsed_ms, ctx.table);
    }
    Ok(())
}

fn handle_daily(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let loaded = ctx.load()?;
    if loaded.records.is_empty() {
        println!("{NO_DATA}");
        return Ok(());
    }

    let periods = aggregate_daily(&ctx.in_range(&loaded.records), &ctx.resolver);
    if ctx.cli.json {
        println!("{}", output_period_json(&periods)?);
    } else if ctx.cli.csv {
        print!("{}", output_period_csv(&periods)?);
    } else if periods.is_empty() {
        println!("No dated orders in the selected period.");
    } else {
        print_period_table(&periods, ctx.table);
        print_load_line(loaded.rows, loaded.elapsed_ms, ctx.table);
    }
    Ok(())
}

fn handle_breakdown(
    ctx: &CommandContext<'_>,
    dimension: Dimension,
    top: Option<usize>,
) -> Result<(), AppError> {
    let loaded = ctx.load()?;
    if loaded.records.is_empty() {
        println!("{NO_DATA}");
        return Ok(());
    }

    let groups = top_n(
        aggregate_dimension(&loaded.records, dimension),
        top.or(ctx.cli.default_top),
    );
    if ctx.cli.json {
        println!("{}", output_breakdown_json(dimension, &groups)?);
    } else if ctx.cli.csv {
        print!("{}", output_breakdown_csv(dimension, &groups)?);
    } else if groups.is_empty() {
        println!("No rows carry a {}.", dimension.label().to_lowercase());
    } else {
        print_breakdown_table(dimension, &groups, ctx.table);
        print_load_line(loaded.rows, loaded.elapsed_ms, ctx.table);
    }
    Ok(())
}

fn handle_cross(ctx: &CommandContext<'_>, kind: CrossKind) -> Result<(), AppError> {
    let loaded = ctx.load()?;
    if loaded.records.is_empty() {
        println!("{NO_DATA}");
        return Ok(());
    }

    let records = if kind.is_monthly() {
        ctx.in_range(&loaded.records)
    } else {
        Cow::Borrowed(loaded.records.as_slice())
    };
    let cross = aggregate_cross(&records, &ctx.resolver, kind);
    if ctx.cli.json {
        println!("{}", output_cross_json(kind, &cross)?);
    } else if ctx.cli.csv {
        print!("{}", output_cross_csv(&cross)?);
    } else {
        print_cross_table(kind, &cross, ctx.table);
        print_load_line(loaded.rows, loaded.elapsed_ms, ctx.table);
    }
    Ok(())
}

fn handle_on(ctx: &CommandContext<'_>, date: &str) -> Result<(), AppError> {
    ctx.reject_csv("on")?;
    let target = parse_date(date)?;
    let loaded = ctx.load()?;
    if loaded.records.is_empty() {
        println!("{NO_DATA}");
        return Ok(());
    }

    let lookup = orders_on(&loaded.records, &ctx.resolver, target);
    if ctx.cli.json {
        println!("{}", output_lookup_json(&lookup)?);
    } else {
        print_date_lookup(&lookup, ctx.table);
    }
    Ok(())
}

fn handle_context(
    ctx: &CommandContext<'_>,
    question: Option<&str>,
    top: Option<usize>,
) -> Result<(), AppError> {
    ctx.reject_csv("context")?;
    let loaded = ctx.load()?;
    let top = top.or(ctx.cli.default_top).unwrap_or(DEFAULT_TOP);
    print!(
        "{}",
        render_context(&loaded.records, &ctx.resolver, question, top)
    );
    Ok(())
}

fn handle_import(ctx: &CommandContext<'_>, destination: Option<&Path>) -> Result<(), AppError> {
    let Some(destination) = destination else {
        return Err(AppError::MissingDestination);
    };
    let loaded = ctx.load()?;
    let table = ctx.table_name();
    let inserted = save_records(destination, table, &loaded.records)?;
    println!(
        "Imported {inserted} rows into {table} ({})",
        destination.display()
    );
    Ok(())
}

/// Run one command against the configured sources
pub(crate) fn handle_command(command: &Commands, ctx: &CommandContext<'_>) -> Result<(), AppError> {
    match command {
        Commands::Summary => handle_summary(ctx),
        Commands::Monthly => handle_monthly(ctx),
        Commands::Daily => handle_daily(ctx),
        Commands::Breakdown { dimension, top } => handle_breakdown(ctx, (*dimension).into(), *top),
        Commands::Cross { kind } => handle_cross(ctx, (*kind).into()),
        Commands::On { date } => handle_on(ctx, date),
        Commands::Context { question, top } => handle_context(ctx, question.as_deref(), *top),
        Commands::Import => handle_import(ctx, ctx.cli.database.as_deref()),
    }
}

//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{Config, ConfigColorMode};

use super::commands::Commands;

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Parser)]
#[command(name = "orderlens")]
#[command(about = "E-commerce order analytics: monthly, marketplace, country and product breakdowns", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// CSV file or glob pattern to read (repeatable)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub(crate) input: Vec<String>,

    /// JSON file holding an array of order rows
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) rows: Option<PathBuf>,

    /// CSV export endpoint to fetch
    #[arg(long, global = true, value_name = "URL")]
    pub(crate) url: Option<String>,

    /// SQLite database to read (for `import`: the destination)
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) database: Option<PathBuf>,

    /// Table inside the SQLite database [default: orders]
    #[arg(long, global = true, value_name = "NAME")]
    pub(crate) table: Option<String>,

    /// CSV field delimiter (single character, or "tab") [default: ,]
    #[arg(long, global = true, value_name = "CHAR")]
    pub(crate) delimiter: Option<String>,

    /// Only count orders from this date on (YYYYMMDD or YYYY-MM-DD; monthly, daily, month cross)
    #[arg(short, long, global = true)]
    pub(crate) since: Option<String>,

    /// Only count orders up to this date (YYYYMMDD or YYYY-MM-DD)
    #[arg(short, long, global = true)]
    pub(crate) until: Option<String>,

    /// Only count orders placed in this year
    #[arg(short, long, global = true)]
    pub(crate) year: Option<i32>,

    /// Output as JSON
    #[arg(short, long, global = true, conflicts_with = "csv")]
    pub(crate) json: bool,

    /// Output as CSV (tabular commands only)
    #[arg(long, global = true)]
    pub(crate) csv: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    pub(crate) debug: bool,

    /// Timezone for reading timestamps with an offset (e.g. "Europe/Berlin", "UTC", "original")
    #[arg(long, global = true, value_name = "TZ")]
    pub(crate) timezone: Option<String>,

    /// Locale for number formatting (en, de, fr, ru, zh)
    #[arg(long, global = true, value_name = "LOCALE")]
    pub(crate) locale: Option<String>,

    /// Ranking length from config, used when a command has no --top
    #[arg(skip)]
    pub(crate) default_top: Option<usize>,
}

impl Cli {
    fn has_source(&self) -> bool {
        !self.input.is_empty() || self.rows.is_some() || self.url.is_some() || self.database.is_some()
    }

    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        // For boolean flags, config only applies if CLI is false (default)
        if !self.no_color && config.no_color {
            self.no_color = true;
        }
        if !self.debug && config.debug {
            self.debug = true;
        }

        if let Some(color) = config.color
            && self.color == ColorMode::Auto
        {
            self.color = match color {
                ConfigColorMode::Auto => ColorMode::Auto,
                ConfigColorMode::Always => ColorMode::Always,
                ConfigColorMode::Never => ColorMode::Never,
            };
        }

        // Config sources only stand in when the command line names none
        if !self.has_source() {
            self.url = config.url.clone();
            self.database = config.database.clone();
        }

        // String options: only apply if CLI didn't set them
        if self.timezone.is_none() {
            self.timezone = config.timezone.clone();
        }
        if self.locale.is_none() {
            self.locale = config.locale.clone();
        }
        if self.delimiter.is_none() {
            self.delimiter = config.delimiter.clone();
        }
        if self.table.is_none() {
            self.table = config.table.clone();
        }
        self.default_top = config.top;

        self
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }
}

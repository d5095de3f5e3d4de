//! CLI subcommand definitions

use clap::{Subcommand, ValueEnum};

use crate::core::{CrossKind, Dimension};

/// Main CLI commands
#[derive(Debug, Clone, Subcommand)]
pub(crate) enum Commands {
    /// Show global totals and quantity statistics (default)
    Summary,
    /// Show orders per calendar month
    Monthly,
    /// Show orders per calendar day
    Daily,
    /// Rank the values of one dimension by quantity
    Breakdown {
        #[arg(value_enum)]
        dimension: DimensionArg,
        /// Show only the first N values
        #[arg(short, long)]
        top: Option<usize>,
    },
    /// Two-level breakdown, e.g. month × marketplace
    Cross {
        #[arg(value_enum)]
        kind: CrossArg,
    },
    /// Look up the orders placed on one calendar date
    On {
        /// e.g. 2024-12-31, 20241231 or "December 31, 2024"
        date: String,
    },
    /// Print the context block for a natural-language question
    Context {
        /// The question; a date mentioned in it adds a date lookup
        #[arg(short, long)]
        question: Option<String>,
        /// Ranking length per dimension
        #[arg(short, long)]
        top: Option<usize>,
    },
    /// Store the loaded rows in the SQLite database given by --database
    Import,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum DimensionArg {
    Attribute,
    Marketplace,
    Country,
    Product,
    Variation,
}

impl From<DimensionArg> for Dimension {
    fn from(arg: DimensionArg) -> Self {
        match arg {
            DimensionArg::Attribute => Dimension::Attribute,
            DimensionArg::Marketplace => Dimension::Marketplace,
            DimensionArg::Country => Dimension::Country,
            DimensionArg::Product => Dimension::Product,
            DimensionArg::Variation => Dimension::Variation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum CrossArg {
    MonthMarketplace,
    MonthCountry,
    MarketplaceCountry,
    AttributeMarketplace,
}

impl From<CrossArg> for CrossKind {
    fn from(arg: CrossArg) -> Self {
        match arg {
            CrossArg::MonthMarketplace => CrossKind::MonthMarketplace,
            CrossArg::MonthCountry => CrossKind::MonthCountry,
            CrossArg::MarketplaceCountry => CrossKind::MarketplaceCountry,
            CrossArg::AttributeMarketplace => CrossKind::AttributeMarketplace,
        }
    }
}

/// Resolve the command, `summary` when none is given
pub(crate) fn parse_command(cmd: &Option<Commands>) -> Commands {
    cmd.clone().unwrap_or(Commands::Summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    fn command(args: &[&str]) -> Commands {
        let cli = Cli::try_parse_from(std::iter::once("orderlens").chain(args.iter().copied()))
            .unwrap();
        parse_command(&cli.command)
    }

    #[test]
    fn default_command_is_summary() {
        assert!(matches!(command(&[]), Commands::Summary));
    }

    #[test]
    fn breakdown_parses_dimension_and_top() {
        match command(&["breakdown", "country", "--top", "3"]) {
            Commands::Breakdown { dimension, top } => {
                assert_eq!(Dimension::from(dimension), Dimension::Country);
                assert_eq!(top, Some(3));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cross_kinds_are_kebab_case() {
        match command(&["cross", "attribute-marketplace"]) {
            Commands::Cross { kind } => {
                assert_eq!(CrossKind::from(kind), CrossKind::AttributeMarketplace);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn every_cross_kind_has_an_argument() {
        let mapped: Vec<CrossKind> = CrossArg::value_variants()
            .iter()
            .map(|&a| CrossKind::from(a))
            .collect();
        assert_eq!(mapped, CrossKind::ALL);
    }

    #[test]
    fn every_dimension_has_an_argument() {
        let mapped: Vec<Dimension> = DimensionArg::value_variants()
            .iter()
            .map(|&a| Dimension::from(a))
            .collect();
        assert_eq!(mapped, Dimension::ALL);
    }

    #[test]
    fn unknown_dimension_is_rejected() {
        assert!(Cli::try_parse_from(["orderlens", "breakdown", "color"]).is_err());
    }
}

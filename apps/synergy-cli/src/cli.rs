//! Command-line surface.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use synergy_core::validation::parse_date;
use synergy_core::{ComparisonParams, ComparisonType, ProductId, SearchType, ValidationError};

#[derive(Debug, Parser)]
#[command(name = "synergy")]
#[command(version)]
#[command(about = "Sales & inventory analytics over the purchase database", long_about = None)]
pub struct Cli {
    /// Config file (default: synergy.toml in the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file, overrides config and SYNERGY_DB_PATH
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Pretty-print the JSON result
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up a product by name fragment or identifier
    Find {
        query: String,

        /// name | id
        #[arg(long = "by", default_value = "name")]
        search_type: SearchType,
    },

    /// Products most often bought with PRODUCT_ID in a date range
    Related {
        product_id: ProductId,

        #[arg(long, value_parser = date_arg)]
        start: NaiveDate,

        #[arg(long, value_parser = date_arg)]
        end: NaiveDate,
    },

    /// Compare sales of PRODUCT_ID across days, periods or products
    Compare(CompareArgs),

    /// Daily stock balance of a product found by identifier or name fragment
    History {
        query: String,

        /// id | name
        #[arg(long = "by", default_value = "id")]
        search_type: SearchType,

        #[arg(long, value_parser = date_arg)]
        start: NaiveDate,

        #[arg(long, value_parser = date_arg)]
        end: NaiveDate,
    },

    /// Bucket the available lots of PRODUCT_ID
    Classify {
        product_id: ProductId,

        /// Reference day (default: today)
        #[arg(long, value_parser = date_arg)]
        as_of: Option<NaiveDate>,
    },

    /// Available units of PRODUCT_ID and their value
    Totals { product_id: ProductId },
}

/// Flat comparison flags, resolved to a mode by the engine.
#[derive(Debug, clap::Args)]
pub struct CompareArgs {
    pub product_id: ProductId,

    /// compare | until
    #[arg(long = "type", default_value = "compare")]
    pub comparison_type: ComparisonType,

    #[arg(long, value_parser = date_arg)]
    pub start: NaiveDate,

    #[arg(long, value_parser = date_arg)]
    pub end: NaiveDate,

    /// With --type until: compare against --first-product-id
    #[arg(long, default_value_t = false)]
    pub second_product: bool,

    #[arg(long)]
    pub first_product_id: Option<ProductId>,

    /// With --type compare: compare [start, end] with the second range
    #[arg(long, default_value_t = false)]
    pub compare_periods: bool,

    #[arg(long, value_parser = date_arg)]
    pub second_start: Option<NaiveDate>,

    #[arg(long, value_parser = date_arg)]
    pub second_end: Option<NaiveDate>,

    /// With --type until: compare against this product over the range
    #[arg(long)]
    pub comparison_product_id: Option<ProductId>,
}

/// Date flags go through the same `YYYY-MM-DD` check as every other caller.
fn date_arg(raw: &str) -> Result<NaiveDate, ValidationError> {
    parse_date("date", raw)
}

impl CompareArgs {
    pub fn params(&self) -> ComparisonParams {
        ComparisonParams {
            comparison_type: self.comparison_type,
            start_date: self.start,
            end_date: self.end,
            is_second_product: self.second_product,
            first_product_id: self.first_product_id,
            compare_periods: self.compare_periods,
            second_start_date: self.second_start,
            second_end_date: self.second_end,
            comparison_product_id: self.comparison_product_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_compare_flags_map_to_params() {
        let cli = Cli::parse_from([
            "synergy",
            "compare",
            "7",
            "--type",
            "until",
            "--start",
            "2024-01-01",
            "--end",
            "2024-01-31",
            "--comparison-product-id",
            "9",
        ]);
        let Command::Compare(args) = cli.command else {
            panic!("expected compare");
        };
        let params = args.params();
        assert_eq!(params.comparison_type, ComparisonType::Until);
        assert_eq!(params.comparison_product_id, Some(9));
        assert!(!params.compare_periods);
    }

    #[test]
    fn test_find_by_id() {
        let cli = Cli::parse_from(["synergy", "--pretty", "find", "42", "--by", "id"]);
        assert!(cli.pretty);
        assert!(matches!(
            cli.command,
            Command::Find {
                search_type: SearchType::Id,
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_bad_date() {
        let err = Cli::try_parse_from([
            "synergy", "history", "1", "--start", "2024-13-01", "--end", "2024-01-02",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("not a YYYY-MM-DD date"));

        let err = Cli::try_parse_from(["synergy", "classify", "1", "--as-of", "01/06/2024"])
            .unwrap_err();
        assert!(err.to_string().contains("not a YYYY-MM-DD date"));
    }

    #[test]
    fn test_history_by_name() {
        let cli = Cli::parse_from([
            "synergy", "history", " leite ", "--by", "name", "--start", "2024-01-01", "--end",
            "2024-01-31",
        ]);
        let Command::History {
            query,
            search_type,
            start,
            ..
        } = cli.command
        else {
            panic!("expected history");
        };
        assert_eq!(query, " leite ");
        assert_eq!(search_type, SearchType::Name);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

        let cli = Cli::parse_from([
            "synergy", "history", "3", "--start", "2024-01-01", "--end", "2024-01-31",
        ]);
        assert!(matches!(
            cli.command,
            Command::History {
                search_type: SearchType::Id,
                ..
            }
        ));
    }
}

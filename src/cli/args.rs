use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::analysis::{FieldConstraint, ToleranceFilter};

#[derive(Parser)]
#[command(name = "sitecheck")]
#[command(about = "Coordinate tolerance auditor for radio-frequency station datasets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Data folder containing CSV files [default: Data]")]
    pub data_dir: Option<PathBuf>,

    #[arg(long, global = true, help = "Configuration file path")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the CSV files available in the data folder
    List,

    /// Show a file's columns, filter capabilities and distinct values
    Columns {
        #[arg(short, long, help = "CSV file name within the data folder")]
        file: String,

        #[arg(long, default_value = ",", help = "Field delimiter")]
        delimiter: char,

        #[arg(long, default_value = "8", help = "Distinct values shown per column")]
        values: usize,
    },

    /// Load, filter and summarize coordinate tolerance statistics
    Report {
        #[arg(short, long, help = "CSV file name within the data folder")]
        file: String,

        #[arg(
            long = "filter",
            value_name = "COLUMN=VALUE",
            help = "Exact-match constraint, repeatable"
        )]
        filters: Vec<FieldConstraint>,

        #[arg(long, default_value = "any", help = "Tolerance selector: any, within or exceeded")]
        tolerance: ToleranceFilter,

        #[arg(long, default_value = ",", help = "Field delimiter")]
        delimiter: char,

        #[arg(long, help = "Emit statistics as JSON")]
        json: bool,

        #[arg(long, default_value = "10", help = "Exceeded records listed, by distance")]
        top: usize,
    },

    /// Export the filtered view or the exceeded subset as CSV
    Export {
        #[arg(short, long, help = "CSV file name within the data folder")]
        file: String,

        #[arg(
            long = "filter",
            value_name = "COLUMN=VALUE",
            help = "Exact-match constraint, repeatable"
        )]
        filters: Vec<FieldConstraint>,

        #[arg(long, default_value = "any", help = "Tolerance selector: any, within or exceeded")]
        tolerance: ToleranceFilter,

        #[arg(long, default_value = ",", help = "Field delimiter")]
        delimiter: char,

        #[arg(long, help = "Export only records exceeding tolerance, with distance columns")]
        exceeded_only: bool,

        #[arg(
            short,
            long,
            help = "Output CSV path [default: exports/{stem}-{kind}-{YYMMDD}.csv]"
        )]
        output: Option<PathBuf>,
    },
}

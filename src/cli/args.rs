//! CLI argument structures

use crate::io::{InputFormat, OutputFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Normalize order feeds into relational tables
#[derive(Parser)]
#[command(name = "orderfeed")]
#[command(about = "orderfeed - Normalize order feeds into relational tables", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize an order table and write the output tables
    #[command(name = "run")]
    Run {
        /// Pipeline configuration file (JSON)
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// Order table to read (overrides the config file)
        #[arg(short = 'o', long)]
        orders: Option<PathBuf>,

        /// Invoice document to read (overrides the config file)
        #[arg(short = 'i', long)]
        invoices: Option<PathBuf>,

        /// Directory for the output tables
        #[arg(short = 'd', long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Output table format
        #[arg(short = 'f', long, value_enum)]
        format: Option<OutputFormat>,

        /// Order table format (detected from the extension by default)
        #[arg(long, value_enum)]
        input_format: Option<InputFormat>,

        /// Field delimiter of the order CSV
        #[arg(long)]
        delimiter: Option<char>,
    },

    /// Parse one embedded contact string and print the result as JSON
    #[command(name = "parse-contact")]
    ParseContact {
        /// Raw contact string, e.g. "[{ 'contact_name':'Curtis' }]"
        raw: String,
    },
}

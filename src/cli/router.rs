//! Command routing and execution

use crate::cli::args::{Cli, Commands};
use crate::config::{ConfigOverrides, PipelineConfig};
use crate::normalize::parse_contact_data;
use crate::pipeline::run_pipeline;
use crate::report::TracingReporter;
use anyhow::{Context, Result};
use clap::CommandFactory;
use tracing::debug;

/// Execute a CLI command based on the parsed arguments
pub async fn execute_command(command: Option<Commands>) -> Result<()> {
    match command {
        Some(Commands::Run {
            config,
            orders,
            invoices,
            out_dir,
            format,
            input_format,
            delimiter,
        }) => {
            let overrides = ConfigOverrides {
                orders_path: orders,
                invoices_path: invoices,
                out_dir,
                output_format: format,
                input_format,
                csv_delimiter: delimiter,
            };
            run_command(config, overrides).await
        }
        Some(Commands::ParseContact { raw }) => parse_contact_command(&raw),
        None => {
            // No command provided, show help
            let help = Cli::command().render_help();
            println!("{}", help);
            Ok(())
        }
    }
}

async fn run_command(
    config_path: Option<std::path::PathBuf>,
    overrides: ConfigOverrides,
) -> Result<()> {
    let config = match config_path {
        Some(path) => {
            let mut config = PipelineConfig::load(&path).await?;
            config.apply_overrides(overrides);
            config
        }
        None => PipelineConfig::from_overrides(overrides)?,
    };

    let summary = run_pipeline(&config, &TracingReporter).await?;
    for path in &summary.written {
        println!("{}", path.display());
    }
    Ok(())
}

fn parse_contact_command(raw: &str) -> Result<()> {
    debug!("Parsing contact string of {} bytes", raw.len());
    let record = parse_contact_data(raw, &TracingReporter);
    let json = serde_json::to_string_pretty(&record).context("failed to render contact")?;
    println!("{}", json);
    Ok(())
}

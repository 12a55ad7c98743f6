//! End-to-end pipeline run: read inputs, normalize, write outputs

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::io::{read_invoices, read_orders, write_invoices, write_table};
use crate::normalize::{NormalizeStats, Normalizer};
use crate::report::Reporter;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

/// What a completed run produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    #[serde(flatten)]
    pub stats: NormalizeStats,
    pub invoices: Option<usize>,
    pub written: Vec<PathBuf>,
}

/// Execute one full pipeline run
pub async fn run_pipeline(config: &PipelineConfig, reporter: &dyn Reporter) -> Result<RunSummary> {
    config.validate()?;

    let raw = read_orders(&config.orders_path, config.input_format, config.csv_delimiter).await?;
    debug!("Read {} raw order rows", raw.len());

    let normalized = Normalizer::new(reporter).run(&raw)?;
    info!("Orders data processing complete.");

    let invoices = match &config.invoices_path {
        Some(path) => Some(read_invoices(path, reporter).await?),
        None => None,
    };

    let paths = &config.output_paths;
    let mut written = Vec::new();

    write_table(&paths.orders, &normalized.orders, config.format_for(&paths.orders)).await?;
    written.push(paths.orders.clone());

    let format = config.format_for(&paths.salesowners);
    write_table(&paths.salesowners, &normalized.salesowners, format).await?;
    written.push(paths.salesowners.clone());

    if let (Some(table), Some(path)) = (&invoices, &paths.invoices) {
        write_invoices(path, table, config.format_for(path)).await?;
        written.push(path.clone());
    }

    let summary = RunSummary {
        stats: normalized.stats,
        invoices: invoices.as_ref().map(|t| t.len()),
        written,
    };

    info!(
        rows_read = summary.stats.rows_read,
        rows_after_dedup = summary.stats.rows_after_dedup,
        distinct_contacts = summary.stats.distinct_contacts,
        unparsed_contacts = summary.stats.unparsed_contacts,
        cleaned_orders = summary.stats.cleaned_orders,
        salesowner_rows = summary.stats.salesowner_rows,
        invoices = ?summary.invoices,
        "Data saved successfully"
    );

    Ok(summary)
}

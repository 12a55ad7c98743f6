//! Pipeline configuration
//!
//! Configuration is a small JSON document naming the input files and the
//! output locations. Field aliases accept the layout of older config files
//! (`orders_csv_path`, `invoice_json_path`, `*_parquet` outputs).

use crate::error::{common, ErrorCode, FeedError, Result};
use crate::io::{InputFormat, OutputFormat, DEFAULT_DELIMITER};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Where each output table is written
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputPaths {
    #[serde(alias = "orders_parquet")]
    pub orders: PathBuf,
    #[serde(alias = "salesowners_parquet")]
    pub salesowners: PathBuf,
    #[serde(default, alias = "invoice_parquet", alias = "invoices_parquet")]
    pub invoices: Option<PathBuf>,
}

impl OutputPaths {
    /// Default file names inside one directory
    pub fn in_dir(dir: &Path, format: OutputFormat, with_invoices: bool) -> Self {
        let ext = format.extension();
        Self {
            orders: dir.join(format!("orders.{}", ext)),
            salesowners: dir.join(format!("salesowners.{}", ext)),
            invoices: with_invoices.then(|| dir.join(format!("invoices.{}", ext))),
        }
    }

    /// Give every output file the extension of `format`
    pub fn set_format(&mut self, format: OutputFormat) {
        let ext = format.extension();
        self.orders.set_extension(ext);
        self.salesowners.set_extension(ext);
        if let Some(path) = self.invoices.as_mut() {
            path.set_extension(ext);
        }
    }
}

/// Full configuration for one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(alias = "orders_csv_path")]
    pub orders_path: PathBuf,
    #[serde(default, alias = "invoice_json_path")]
    pub invoices_path: Option<PathBuf>,
    pub output_paths: OutputPaths,
    #[serde(default = "default_delimiter")]
    pub csv_delimiter: char,
    #[serde(default)]
    pub input_format: Option<InputFormat>,
    #[serde(default)]
    pub output_format: OutputFormat,
}

fn default_delimiter() -> char {
    DEFAULT_DELIMITER
}

/// Values given on the command line, applied on top of a config file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub orders_path: Option<PathBuf>,
    pub invoices_path: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub output_format: Option<OutputFormat>,
    pub input_format: Option<InputFormat>,
    pub csv_delimiter: Option<char>,
}

impl PipelineConfig {
    /// Configuration reading `orders_path` and writing into `out_dir`
    pub fn new(orders_path: impl Into<PathBuf>, out_dir: &Path) -> Self {
        Self {
            orders_path: orders_path.into(),
            invoices_path: None,
            output_paths: OutputPaths::in_dir(out_dir, OutputFormat::default(), false),
            csv_delimiter: DEFAULT_DELIMITER,
            input_format: None,
            output_format: OutputFormat::default(),
        }
    }

    /// Load a configuration file
    ///
    /// Relative paths inside the file are resolved against the file's directory.
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(common::config_not_found(path));
        }

        let content = fs::read_to_string(path).await.map_err(|e| {
            FeedError::config(format!("failed to read {}", path.display())).with_source(e)
        })?;
        let mut config = Self::from_json(&content)?;

        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }

        info!("Configuration loaded successfully from {}", path.display());
        Ok(config)
    }

    /// Parse a configuration document
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| {
            FeedError::config_with_code(ErrorCode::CONFIG_INVALID_JSON, "Invalid configuration")
                .with_source(e)
        })
    }

    /// Build a configuration purely from command-line values
    pub fn from_overrides(overrides: ConfigOverrides) -> Result<Self> {
        let orders_path = overrides
            .orders_path
            .clone()
            .ok_or_else(|| common::missing_required_field("orders_path"))?;
        let out_dir = overrides
            .out_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("output"));

        let mut config = Self::new(orders_path, &out_dir);
        config.apply_overrides(overrides);
        Ok(config)
    }

    /// Apply command-line values on top of this configuration
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(path) = overrides.orders_path {
            self.orders_path = path;
        }
        if let Some(path) = overrides.invoices_path {
            self.invoices_path = Some(path);
        }
        let format_changed = overrides.output_format.is_some();
        if let Some(format) = overrides.output_format {
            self.output_format = format;
        }
        if let Some(format) = overrides.input_format {
            self.input_format = Some(format);
        }
        if let Some(delimiter) = overrides.csv_delimiter {
            self.csv_delimiter = delimiter;
        }
        if let Some(dir) = overrides.out_dir {
            self.output_paths =
                OutputPaths::in_dir(&dir, self.output_format, self.invoices_path.is_some());
        } else {
            if format_changed {
                self.output_paths.set_format(self.output_format);
            }
            if self.invoices_path.is_some() && self.output_paths.invoices.is_none() {
                if let Some(dir) = self.output_paths.orders.parent() {
                    let ext = self.output_format.extension();
                    self.output_paths.invoices = Some(dir.join(format!("invoices.{}", ext)));
                }
            }
        }
        debug!("Effective configuration: {:?}", self);
    }

    /// Format an output file is written in
    ///
    /// The file's extension decides; `output_format` covers paths without a
    /// recognised extension.
    pub fn format_for(&self, path: &Path) -> OutputFormat {
        OutputFormat::from_path(path).unwrap_or(self.output_format)
    }

    /// Check the configuration for missing or inconsistent values
    pub fn validate(&self) -> Result<()> {
        if self.orders_path.as_os_str().is_empty() {
            return Err(common::missing_required_field("orders_path"));
        }
        if self.output_paths.orders.as_os_str().is_empty() {
            return Err(common::missing_required_field("output_paths.orders"));
        }
        if self.output_paths.salesowners.as_os_str().is_empty() {
            return Err(common::missing_required_field("output_paths.salesowners"));
        }
        if self.output_paths.invoices.is_some() && self.invoices_path.is_none() {
            return Err(FeedError::config_with_code(
                ErrorCode::CONFIG_INVALID_VALUE,
                "output_paths.invoices is set but no invoices_path was given",
            ));
        }
        if !self.csv_delimiter.is_ascii() {
            return Err(FeedError::config_with_code(
                ErrorCode::CONFIG_INVALID_VALUE,
                format!(
                    "csv_delimiter {:?} must be a single ASCII character",
                    self.csv_delimiter
                ),
            ));
        }
        Ok(())
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() && !p.as_os_str().is_empty() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.orders_path);
        if let Some(p) = self.invoices_path.as_mut() {
            resolve(p);
        }
        resolve(&mut self.output_paths.orders);
        resolve(&mut self.output_paths.salesowners);
        if let Some(p) = self.output_paths.invoices.as_mut() {
            resolve(p);
        }
    }
}

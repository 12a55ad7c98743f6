//! # orderfeed
//!
//! Normalizes a denormalized order feed into relational tables: cleaned
//! orders with their embedded contact expanded into columns, and one
//! salesowner row per name in each order's salesowner list.
//!
//! ## Usage
//!
//! ```bash
//! orderfeed run --orders resources/orders.csv --invoices resources/invoicing_data.json --out-dir output
//! orderfeed run --config pipeline.json --format json
//! orderfeed parse-contact "{ 'contact_name':'Curtis', 'city':'Chicago' }"
//! ```
//!
//! ## Modules
//!
//! - `app` - Logging setup and fatal error handling for the binary
//! - `cli` - Argument parsing and command dispatch
//! - `config` - Pipeline configuration file and command-line overrides
//! - `error` - Error types with stable numeric codes
//! - `io` - Order and invoice readers, table writers
//! - `normalize` - Stabilize, dedup, contact parsing, join and salesowner fan-out
//! - `pipeline` - One end-to-end run from input files to output tables
//! - `report` - Injectable diagnostics sink for pipeline stages

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod normalize;
pub mod pipeline;
pub mod report;

pub use config::{ConfigOverrides, OutputPaths, PipelineConfig};
pub use error::{FeedError, Result};
pub use normalize::{NormalizedOrders, Normalizer};
pub use pipeline::{run_pipeline, RunSummary};
pub use report::{Diagnostic, MemoryReporter, Reporter, TracingReporter};

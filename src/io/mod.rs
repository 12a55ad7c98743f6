//! File boundaries of the pipeline
//!
//! - `orders` - order table reader (CSV or JSON)
//! - `invoices` - invoice document reader
//! - `sink` - CSV/JSON/Parquet table writers
//! - `columnar` - Parquet encoding

pub mod columnar;
pub mod invoices;
pub mod orders;
pub mod sink;

pub use columnar::{encode_parquet, ColumnKind};
pub use invoices::{extract_invoices, read_invoices, InvoiceTable};
pub use orders::{parse_orders_csv, parse_orders_json, read_orders, InputFormat, DEFAULT_DELIMITER};
pub use sink::{render_invoices, render_table, write_invoices, write_table, OutputFormat, TableRow};

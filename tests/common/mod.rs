//! Common test utilities and fixtures

#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Header row of the order feed, `;` separated
pub const ORDERS_HEADER: &str =
    "order_id;date;company_id;company_name;crate_type;contact_data;salesowners";

/// Contact string shared by two orders in [`sample_orders_csv`]
pub const CURTIS_CONTACT: &str = r#""[{ ""contact_name"":""Curtis"", ""contact_surname"":""Jackson"", ""city"":""Chicago"", ""cp"": ""12345"" }]""#;

/// Small order feed covering duplicates, a shared contact, sentinels and blank cells
pub fn sample_orders_csv() -> String {
    [
        ORDERS_HEADER.to_string(),
        format!("f47ac10b;29.01.22;1e2b47e6;Fresh Fruits Co;Plastic;{CURTIS_CONTACT};Leonard Cohen, Luke Skywalker, Ammon Bundy"),
        format!("f47ac10c;21.02.22;1e2b47e6;Fresh Fruits Co;Wood;{CURTIS_CONTACT};Luke Skywalker"),
        "f47ac10d;;0b1e3a5c;Veggies Inc;Metal;0;Ammon Bundy".to_string(),
        format!("f47ac10b;29.01.22;1e2b47e6;Fresh Fruits Co;Plastic;{CURTIS_CONTACT};Leonard Cohen, Luke Skywalker, Ammon Bundy"),
    ]
    .join("\n")
        + "\n"
}

/// Invoice document matching the sample orders
pub const SAMPLE_INVOICES: &str = r#"{
  "data": {
    "invoices": [
      {"id": "e1e1e1e1", "orderId": "f47ac10b", "companyId": "1e2b47e6", "grossValue": "324222", "vat": "0"},
      {"id": "e1e1e1e2", "orderId": "f47ac10c", "companyId": "1e2b47e6", "grossValue": "133500", "vat": "19"}
    ]
  }
}"#;

/// Temporary directory pre-populated with input files
pub struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    /// Context holding `orders.csv` and `invoicing_data.json` under `resources/`
    pub fn with_sample_inputs() -> Result<Self> {
        let ctx = Self::new()?;
        ctx.write_file("resources/orders.csv", &sample_orders_csv())?;
        ctx.write_file("resources/invoicing_data.json", SAMPLE_INVOICES)?;
        Ok(ctx)
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.temp_dir.path().join(relative)
    }

    pub fn write_file(&self, relative: impl AsRef<Path>, content: &str) -> Result<PathBuf> {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    pub fn read_file(&self, relative: impl AsRef<Path>) -> Result<String> {
        Ok(fs::read_to_string(self.join(relative))?)
    }
}

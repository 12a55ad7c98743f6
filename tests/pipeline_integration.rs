//! End-to-end pipeline runs over files in a temporary directory

mod common;

use arrow_array::{Array, Int64Array, RecordBatch, StringArray};
use common::TestContext;
use orderfeed::error::ErrorCode;
use orderfeed::io::OutputFormat;
use orderfeed::report::{Diagnostic, MemoryReporter, Stage};
use orderfeed::{run_pipeline, ConfigOverrides, PipelineConfig};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value;
use std::fs::File;
use std::path::Path;

fn sample_config(ctx: &TestContext) -> PipelineConfig {
    PipelineConfig::from_overrides(ConfigOverrides {
        orders_path: Some(ctx.join("resources/orders.csv")),
        invoices_path: Some(ctx.join("resources/invoicing_data.json")),
        out_dir: Some(ctx.join("output")),
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_sample_feed_produces_expected_tables() {
    let ctx = TestContext::with_sample_inputs().unwrap();
    let reporter = MemoryReporter::new();

    let summary = run_pipeline(&sample_config(&ctx), &reporter).await.unwrap();

    assert_eq!(summary.stats.rows_read, 4);
    assert_eq!(summary.stats.rows_after_dedup, 3);
    assert_eq!(summary.stats.distinct_contacts, 2);
    assert_eq!(summary.stats.unparsed_contacts, 0);
    assert_eq!(summary.invoices, Some(2));
    assert_eq!(summary.written.len(), 3);

    let orders = ctx.read_file("output/orders.csv").unwrap();
    let lines: Vec<&str> = orders.lines().collect();
    assert_eq!(
        lines,
        vec![
            "order_id,date,company_id,company_name,crate_type,contact_name,contact_surname,city,cp",
            "f47ac10b,29.01.22,1e2b47e6,Fresh Fruits Co,Plastic,Curtis,Jackson,Chicago,12345",
            "f47ac10c,21.02.22,1e2b47e6,Fresh Fruits Co,Wood,Curtis,Jackson,Chicago,12345",
            "f47ac10d,N/A,0b1e3a5c,Veggies Inc,Metal,,,,",
        ]
    );
}

#[tokio::test]
async fn test_salesowners_fan_out_numbering() {
    let ctx = TestContext::with_sample_inputs().unwrap();
    let reporter = MemoryReporter::new();

    run_pipeline(&sample_config(&ctx), &reporter).await.unwrap();

    let salesowners = ctx.read_file("output/salesowners.csv").unwrap();
    assert_eq!(
        salesowners,
        "order_id,salesowner,salesowners_order\n\
         f47ac10b,Leonard Cohen,1\n\
         f47ac10b,Luke Skywalker,2\n\
         f47ac10b,Ammon Bundy,3\n\
         f47ac10c,Luke Skywalker,1\n\
         f47ac10d,Ammon Bundy,1\n"
    );
    assert_eq!(reporter.rows_for(Stage::SalesownerFanOut), Some(5));
}

#[tokio::test]
async fn test_invoices_are_flattened_with_sorted_columns() {
    let ctx = TestContext::with_sample_inputs().unwrap();
    let reporter = MemoryReporter::new();

    run_pipeline(&sample_config(&ctx), &reporter).await.unwrap();

    let invoices = ctx.read_file("output/invoices.csv").unwrap();
    let mut lines = invoices.lines();
    assert_eq!(lines.next(), Some("companyId,grossValue,id,orderId,vat"));
    assert_eq!(lines.next(), Some("1e2b47e6,324222,e1e1e1e1,f47ac10b,0"));
    assert_eq!(reporter.rows_for(Stage::Invoices), Some(2));
    assert_eq!(
        reporter.count(|d| matches!(d, Diagnostic::InconsistentInvoiceKeys { .. })),
        0
    );
}

#[tokio::test]
async fn test_json_output_uses_null_for_missing_contact() {
    let ctx = TestContext::with_sample_inputs().unwrap();
    let mut config = sample_config(&ctx);
    config.apply_overrides(ConfigOverrides {
        out_dir: Some(ctx.join("json-out")),
        output_format: Some(OutputFormat::Json),
        ..Default::default()
    });
    let reporter = MemoryReporter::new();

    run_pipeline(&config, &reporter).await.unwrap();

    let orders: Value =
        serde_json::from_str(&ctx.read_file("json-out/orders.json").unwrap()).unwrap();
    let rows = orders.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2]["order_id"], "f47ac10d");
    assert_eq!(rows[2]["date"], "N/A");
    assert_eq!(rows[2]["contact_name"], Value::Null);

    let salesowners: Value =
        serde_json::from_str(&ctx.read_file("json-out/salesowners.json").unwrap()).unwrap();
    assert_eq!(salesowners[1]["salesowners_order"], 2);
}

#[tokio::test]
async fn test_json_order_input_with_numeric_values() {
    let ctx = TestContext::new().unwrap();
    ctx.write_file(
        "orders.json",
        r#"[
            {"order_id": 17, "date": "01.03.22", "company_id": "c1", "company_name": "Acme",
             "crate_type": "Plastic", "contact_data": "{'contact_name': 'Ann', 'cp': 10115}",
             "salesowners": "Ann Smith"},
            {"order_id": 18, "date": null, "company_id": "c1", "company_name": "Acme",
             "crate_type": "Wood", "contact_data": null, "salesowners": "Bob Stone, Ann Smith"}
        ]"#,
    )
    .unwrap();
    let config = PipelineConfig::new(ctx.join("orders.json"), &ctx.join("out"));
    let reporter = MemoryReporter::new();

    let summary = run_pipeline(&config, &reporter).await.unwrap();

    assert_eq!(summary.stats.cleaned_orders, 2);
    assert_eq!(summary.invoices, None);
    let orders = ctx.read_file("out/orders.csv").unwrap();
    assert!(orders.contains("17,01.03.22,c1,Acme,Plastic,Ann,,,10115"));
    assert!(orders.contains("18,N/A,c1,Acme,Wood,,,,"));
}

#[tokio::test]
async fn test_malformed_contacts_are_reported_not_fatal() {
    let ctx = TestContext::new().unwrap();
    ctx.write_file(
        "orders.csv",
        "order_id;date;company_id;company_name;crate_type;contact_data;salesowners\n\
         O1;29.01.22;c1;Acme;Plastic;{broken;Ann\n\
         O2;29.01.22;c1;Acme;Plastic;{broken;Bob\n\
         O3;29.01.22;c1;Acme;Plastic;[1, 2];Carol\n",
    )
    .unwrap();
    let config = PipelineConfig::new(ctx.join("orders.csv"), &ctx.join("out"));
    let reporter = MemoryReporter::new();

    let summary = run_pipeline(&config, &reporter).await.unwrap();

    assert_eq!(summary.stats.cleaned_orders, 3);
    assert_eq!(summary.stats.unparsed_contacts, 2);
    assert_eq!(
        reporter.count(|d| matches!(d, Diagnostic::ContactParseFailed { .. })),
        1
    );
    assert_eq!(
        reporter.count(|d| matches!(d, Diagnostic::ContactNotObject { .. })),
        1
    );
}

#[tokio::test]
async fn test_short_csv_row_is_filled_with_sentinel() {
    let ctx = TestContext::new().unwrap();
    ctx.write_file(
        "orders.csv",
        &format!("{}\nO1;29.01.22;c1;Acme;Plastic\n", common::ORDERS_HEADER),
    )
    .unwrap();
    let config = PipelineConfig::new(ctx.join("orders.csv"), &ctx.join("out"));

    run_pipeline(&config, &MemoryReporter::new()).await.unwrap();

    assert_eq!(
        ctx.read_file("out/salesowners.csv").unwrap(),
        "order_id,salesowner,salesowners_order\nO1,N/A,1\n"
    );
    assert!(ctx
        .read_file("out/orders.csv")
        .unwrap()
        .contains("O1,29.01.22,c1,Acme,Plastic,,,,"));
}

#[tokio::test]
async fn test_empty_order_file_writes_headers_only() {
    let ctx = TestContext::new().unwrap();
    ctx.write_file("orders.csv", &format!("{}\n", common::ORDERS_HEADER))
        .unwrap();
    let config = PipelineConfig::new(ctx.join("orders.csv"), &ctx.join("out"));

    run_pipeline(&config, &MemoryReporter::new()).await.unwrap();

    assert_eq!(
        ctx.read_file("out/salesowners.csv").unwrap(),
        "order_id,salesowner,salesowners_order\n"
    );
}

#[tokio::test]
async fn test_missing_orders_file_is_input_error() {
    let ctx = TestContext::new().unwrap();
    let config = PipelineConfig::new(ctx.join("absent.csv"), &ctx.join("out"));

    let err = run_pipeline(&config, &MemoryReporter::new())
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::INPUT_NOT_FOUND);
    assert_eq!(err.exit_code(), 3);
    assert!(!ctx.join("out").exists());
}

#[tokio::test]
async fn test_invoice_document_without_section_fails() {
    let ctx = TestContext::with_sample_inputs().unwrap();
    ctx.write_file("resources/invoicing_data.json", r#"{"data": {}}"#)
        .unwrap();

    let err = run_pipeline(&sample_config(&ctx), &MemoryReporter::new())
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::INPUT_MISSING_SECTION);
    assert!(err.user_message().contains("invoicing_data.json"));
}

#[tokio::test]
async fn test_legacy_config_writes_parquet() {
    let ctx = TestContext::with_sample_inputs().unwrap();
    let config_path = ctx
        .write_file(
            "config.json",
            r#"{
                "orders_csv_path": "resources/orders.csv",
                "invoice_json_path": "resources/invoicing_data.json",
                "output_paths": {
                    "orders_parquet": "output/orders.parquet",
                    "salesowners_parquet": "output/salesowners.parquet",
                    "invoice_parquet": "output/invoices.parquet"
                }
            }"#,
        )
        .unwrap();

    let config = PipelineConfig::load(&config_path).await.unwrap();
    let summary = run_pipeline(&config, &MemoryReporter::new()).await.unwrap();
    assert_eq!(summary.written[2], ctx.join("output/invoices.parquet"));

    let orders = read_parquet(&ctx.join("output/orders.parquet"));
    assert_eq!(orders.num_rows(), 3);
    assert_eq!(orders.schema().field(5).name(), "contact_name");
    let names = orders
        .column(5)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(names.value(0), "Curtis");
    assert!(names.is_null(2));

    let salesowners = read_parquet(&ctx.join("output/salesowners.parquet"));
    assert_eq!(salesowners.num_rows(), 5);
    let positions = salesowners
        .column(2)
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    assert_eq!(positions.values().to_vec(), vec![1, 2, 3, 1, 1]);

    let invoices = read_parquet(&ctx.join("output/invoices.parquet"));
    assert_eq!(invoices.num_rows(), 2);
}

#[tokio::test]
async fn test_format_override_keeps_names_and_contents_in_step() {
    let ctx = TestContext::with_sample_inputs().unwrap();
    let config_path = ctx
        .write_file(
            "pipeline.json",
            r#"{
                "orders_path": "resources/orders.csv",
                "output_paths": {
                    "orders": "output/orders.csv",
                    "salesowners": "output/salesowners.csv"
                }
            }"#,
        )
        .unwrap();

    let mut config = PipelineConfig::load(&config_path).await.unwrap();
    config.apply_overrides(ConfigOverrides {
        output_format: Some(OutputFormat::Json),
        ..Default::default()
    });
    let summary = run_pipeline(&config, &MemoryReporter::new()).await.unwrap();

    assert_eq!(summary.written[0], ctx.join("output/orders.json"));
    assert!(!ctx.join("output/orders.csv").exists());
    let orders: Value =
        serde_json::from_str(&ctx.read_file("output/orders.json").unwrap()).unwrap();
    assert_eq!(orders[0]["order_id"], "f47ac10b");
}

#[tokio::test]
async fn test_output_extension_wins_over_configured_format() {
    let ctx = TestContext::with_sample_inputs().unwrap();
    let config_path = ctx
        .write_file(
            "pipeline.json",
            r#"{
                "orders_path": "resources/orders.csv",
                "output_format": "json",
                "output_paths": {
                    "orders": "output/orders.csv",
                    "salesowners": "output/salesowners"
                }
            }"#,
        )
        .unwrap();

    let config = PipelineConfig::load(&config_path).await.unwrap();
    run_pipeline(&config, &MemoryReporter::new()).await.unwrap();

    assert!(ctx
        .read_file("output/orders.csv")
        .unwrap()
        .starts_with("order_id,date,"));
    assert!(ctx.read_file("output/salesowners").unwrap().starts_with('['));
}

fn read_parquet(path: &Path) -> RecordBatch {
    let file = File::open(path).unwrap();
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .unwrap()
        .build()
        .unwrap();
    let batches: Vec<RecordBatch> = reader.map(|batch| batch.unwrap()).collect();
    assert_eq!(batches.len(), 1);
    batches.into_iter().next().unwrap()
}

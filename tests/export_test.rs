mod common;

use anyhow::Result;
use common::{SampleExpenses, parse_date, test_ledger, test_ledger_with};
use spendlog::application::{BucketReport, CategoryReport};
use spendlog::domain::{Bucket, Catalog, CategoryFilter};
use spendlog::io::{Exporter, export_json};
use spendlog::storage::{RecordSchema, read_records};

fn to_string(buf: Vec<u8>) -> String {
    String::from_utf8(buf).unwrap()
}

#[test]
fn test_export_records_matches_store_layout() -> Result<()> {
    let (mut ledger, _temp) = test_ledger()?;
    ledger.add(parse_date("2024-01-05"), "Food", 10000, "", Some("Lunch"))?;
    ledger.add(parse_date("2024-02-01"), "Transport", 3000, "airport", None)?;

    let mut buf = Vec::new();
    let count = Exporter::new(&ledger).export_records_csv(&mut buf)?;

    assert_eq!(count, 2);
    assert_eq!(
        to_string(buf),
        "Date,Category,Type,Amount,Description\n\
         2024-01-05,Food,Lunch,100.00,\n\
         2024-02-01,Transport,,30.00,airport\n"
    );
    Ok(())
}

#[test]
fn test_exported_records_read_back() -> Result<()> {
    let (mut ledger, _temp) = test_ledger_with(RecordSchema::Basic, Catalog::open())?;
    ledger.add(parse_date("2024-01-05"), "Food", 1234, "fish, chips", None)?;

    let mut buf = Vec::new();
    Exporter::new(&ledger).export_records_csv(&mut buf)?;
    let records = read_records(buf.as_slice())?;

    assert_eq!(records.len(), 1);
    assert!(records[0].same_entry(&ledger.records()[0]));
    Ok(())
}

#[test]
fn test_export_filtered_records() -> Result<()> {
    let (mut ledger, _temp) = test_ledger()?;
    SampleExpenses::create(&mut ledger)?;

    let mut buf = Vec::new();
    let count = Exporter::new(&ledger)
        .export_filtered_csv(&CategoryFilter::from("Transport"), &mut buf)?;

    assert_eq!(count, 1);
    assert!(to_string(buf).ends_with("2024-02-01,Transport,,30.00,\n"));
    Ok(())
}

#[test]
fn test_export_monthly_totals() -> Result<()> {
    let (mut ledger, _temp) = test_ledger()?;
    SampleExpenses::create(&mut ledger)?;

    let mut buf = Vec::new();
    let count =
        Exporter::new(&ledger).export_buckets_csv(Bucket::Month, &CategoryFilter::All, &mut buf)?;

    assert_eq!(count, 2);
    assert_eq!(to_string(buf), "Month,Amount\n2024-01,150.00\n2024-02,30.00\n");
    Ok(())
}

#[test]
fn test_export_weekly_totals() -> Result<()> {
    let (mut ledger, _temp) = test_ledger()?;
    SampleExpenses::create(&mut ledger)?;

    let mut buf = Vec::new();
    Exporter::new(&ledger).export_buckets_csv(
        Bucket::IsoWeek,
        &CategoryFilter::from("Food"),
        &mut buf,
    )?;

    assert_eq!(to_string(buf), "Week,Amount\n2024-W01,100.00\n2024-W03,50.00\n");
    Ok(())
}

#[test]
fn test_export_category_totals() -> Result<()> {
    let (mut ledger, _temp) = test_ledger()?;
    SampleExpenses::create(&mut ledger)?;

    let mut buf = Vec::new();
    let count = Exporter::new(&ledger).export_categories_csv(&mut buf)?;

    assert_eq!(count, 2);
    assert_eq!(to_string(buf), "Category,Amount\nFood,150.00\nTransport,30.00\n");
    Ok(())
}

#[test]
fn test_export_json_reports() -> Result<()> {
    let (mut ledger, _temp) = test_ledger()?;
    SampleExpenses::create(&mut ledger)?;

    let mut buf = Vec::new();
    export_json(
        &BucketReport::build(&ledger, Bucket::Day, &CategoryFilter::All),
        &mut buf,
    )?;
    let value: serde_json::Value = serde_json::from_slice(&buf)?;

    assert_eq!(value["bucket"], "day");
    assert_eq!(value["category"], serde_json::Value::Null);
    assert_eq!(value["periods"].as_array().unwrap().len(), 3);
    assert_eq!(value["total"], 18000);

    let mut buf = Vec::new();
    export_json(&CategoryReport::build(&ledger), &mut buf)?;
    let value: serde_json::Value = serde_json::from_slice(&buf)?;
    assert_eq!(value["categories"][0]["category"], "Food");
    Ok(())
}

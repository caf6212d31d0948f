//! ワークブック読み込みから解析までの統合テスト
//!
//! rust_xlsxwriter でテスト用ブックを作り、calamine で読み戻す。

use std::path::Path;
use tempfile::tempdir;
use vigilance_common::{Cell, LineItem, Signal};
use vigilance_rust::analyzer::{self, AnalysisOptions};
use vigilance_rust::scanner::{self, DecodeOptions};

type Row<'a> = (&'a str, Option<f64>);

fn write_book(path: &Path, sheets: &[(&str, Vec<Row<'_>>)]) {
    let mut book = rust_xlsxwriter::Workbook::new();
    for (name, rows) in sheets {
        let sheet = book.add_worksheet();
        sheet.set_name(*name).unwrap();
        for (r, (label, value)) in rows.iter().enumerate() {
            sheet.write_string(r as u32, 0, *label).unwrap();
            if let Some(v) = value {
                sheet.write_number(r as u32, 1, *v).unwrap();
            }
        }
    }
    book.save(path).unwrap();
}

fn financial_rows() -> Vec<Row<'static>> {
    vec![
        // 見出し行（既定では読み飛ばす）
        ("Revenue (header)", Some(9999.0)),
        ("Revenue", Some(1000.0)),
        ("Trade Receivables", Some(400.0)),
        ("Total Assets", Some(5000.0)),
        ("Borrowings", Some(1000.0)),
        ("Other loans", Some(500.0)),
        ("Tax", Some(100.0)),
        ("Profit before tax", Some(800.0)),
        ("Cash from operating activities", Some(300.0)),
    ]
}

fn cover_rows() -> Vec<Row<'static>> {
    vec![("Annual Report", None), ("Prepared by finance", None)]
}

#[test]
fn test_load_workbook_keeps_sheet_order() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("acme.xlsx");
    write_book(&path, &[("Cover", cover_rows()), ("Data Sheet", financial_rows())]);

    let book = scanner::load_workbook(&path, DecodeOptions::default()).expect("読み込み失敗");
    assert_eq!(book.sheet_names(), vec!["Cover", "Data Sheet"]);

    let data = book.get("Data Sheet").unwrap();
    assert_eq!(data.rows().len(), 8);
    assert_eq!(data.rows()[0][0], Cell::from("Revenue"));
    assert_eq!(data.rows()[0][1], Cell::Number(1000.0));
}

#[test]
fn test_analyze_file_end_to_end() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("acme_ltd.xlsx");
    write_book(&path, &[("Cover", cover_rows()), ("Data Sheet", financial_rows())]);

    let record = analyzer::analyze_file(&path, None, &AnalysisOptions::default()).expect("解析失敗");

    assert_eq!(record.name, "ACME_LTD");
    assert_eq!(record.revenue, 1000.0);
    assert_eq!(record.receivables, 400.0);
    assert_eq!(record.total_assets, 5000.0);
    assert_eq!(record.borrowings, 1500.0);
    assert_eq!(record.tax_paid, 100.0);
    assert_eq!(record.pbt, 800.0);
    assert_eq!(record.ocf, 300.0);

    assert_eq!(record.beneish_m_score, -4.47);
    assert_eq!(record.accruals_gap, 70.0);
    assert_eq!(record.tax_gap, 12.5);
    assert_eq!(record.debt_asset_stress, 30.0);
    assert_eq!(record.cash_quality, 30.0);

    // 発生主義・税率乖離・ベンフォードの3件
    assert_eq!(record.red_flags, 3);
    assert_eq!(record.earnings_manipulation_signal, Signal::High);
    assert!(record.benford.is_some());
}

#[test]
fn test_header_row_is_data_when_not_skipped() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("acme.xlsx");
    write_book(&path, &[("Data Sheet", financial_rows())]);

    let options = AnalysisOptions {
        decode: DecodeOptions { skip_header_row: false },
        ..Default::default()
    };
    let record = analyzer::analyze_file(&path, Some("acme"), &options).unwrap();
    assert_eq!(record.revenue, 9999.0);
}

#[test]
fn test_first_sheet_used_without_data_sheet() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("beta.xlsx");
    write_book(&path, &[("Financials", financial_rows()), ("Cover", cover_rows())]);

    let record = analyzer::analyze_file(&path, None, &AnalysisOptions::default()).unwrap();
    assert_eq!(record.name, "BETA");
    assert_eq!(record.revenue, 1000.0);
}

#[test]
fn test_analysis_is_deterministic() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("acme.xlsx");
    write_book(&path, &[("Data Sheet", financial_rows())]);

    let options = AnalysisOptions::default();
    let first = serde_json::to_string(&analyzer::analyze_file(&path, None, &options).unwrap()).unwrap();
    let second = serde_json::to_string(&analyzer::analyze_file(&path, None, &options).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_inspect_reports_summed_rows() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("acme.xlsx");
    write_book(&path, &[("Data Sheet", financial_rows())]);

    let entries = analyzer::inspect_file(&path, &AnalysisOptions::default()).unwrap();
    assert_eq!(entries.len(), LineItem::ALL.len());

    let borrowings = entries.iter().find(|e| e.item == LineItem::Borrowings).unwrap();
    assert_eq!(borrowings.sheet.as_deref(), Some("Data Sheet"));
    let labels: Vec<&str> = borrowings.matches.iter().map(|m| m.label.as_str()).collect();
    assert_eq!(labels, vec!["borrowings", "other loans"]);
}

#[test]
fn test_batch_reports_failures_without_aborting() {
    let dir = tempdir().expect("Failed to create temp dir");
    write_book(&dir.path().join("acme.xlsx"), &[("Data Sheet", financial_rows())]);
    write_book(&dir.path().join("beta.xlsx"), &[("Data Sheet", financial_rows())]);
    std::fs::write(dir.path().join("broken.xlsx"), b"not a workbook").unwrap();

    let books = scanner::scan_folder(dir.path(), false).unwrap();
    let paths: Vec<_> = books.into_iter().map(|b| b.path).collect();
    let entries = analyzer::analyze_batch(&paths, &AnalysisOptions::default(), false);

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].record().map(|r| r.name.as_str()), Some("ACME"));
    assert_eq!(entries[1].record().map(|r| r.name.as_str()), Some("BETA"));
    assert!(entries[2].outcome.is_err());
}

#[test]
fn test_labels_outside_column_a_are_not_matched() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("offset.xlsx");

    // B列にラベル、C列に値（A列は空）
    let mut book = rust_xlsxwriter::Workbook::new();
    let sheet = book.add_worksheet();
    sheet.set_name("Data Sheet").unwrap();
    for (r, (label, value)) in financial_rows().iter().enumerate() {
        sheet.write_string(r as u32, 1, *label).unwrap();
        if let Some(v) = value {
            sheet.write_number(r as u32, 2, *v).unwrap();
        }
    }
    book.save(&path).unwrap();

    let loaded = scanner::load_workbook(&path, DecodeOptions::default()).unwrap();
    let data = loaded.get("Data Sheet").unwrap();
    assert_eq!(data.rows()[0][0], Cell::Empty);
    assert_eq!(data.rows()[0][1], Cell::from("Revenue"));

    let record = analyzer::analyze_file(&path, None, &AnalysisOptions::default()).unwrap();
    assert_eq!(record.revenue, 0.0);
    assert_eq!(record.total_assets, 0.0);
    // 数値セルはベンフォード検定には使われる
    assert!(record.benford.is_some());
}

pub mod pdf;
pub mod excel;

use crate::cli::ExportFormat;
use crate::error::Result;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use vigilance_common::ForensicRecord;

/// バッチ出力のファイル名（拡張子なし）
pub const SUMMARY_STEM: &str = "forensic_summary";

/// レポートのファイル名（拡張子なし）
pub fn report_stem(name: &str) -> String {
    lazy_static::lazy_static! {
        // ファイル名に使えない文字
        static ref UNSAFE_RE: Regex = Regex::new(r#"[\\/:*?"<>|\s]+"#).unwrap();
    }

    let safe = UNSAFE_RE.replace_all(name.trim(), "_");
    if safe.is_empty() {
        "Forensic_Report_UNNAMED".to_string()
    } else {
        format!("Forensic_Report_{}", safe)
    }
}

fn output_path_for_format(output: &Path, stem: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", stem, extension))
    } else {
        output.with_extension(extension)
    }
}

pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// 1件のレコードを指定形式で出力し、書き出したパスを返す
pub fn export_record(
    record: &ForensicRecord,
    format: &ExportFormat,
    output: &Path,
    title: &str,
) -> Result<Vec<PathBuf>> {
    let stem = report_stem(&record.name);
    let mut written = Vec::new();

    if output.extension().is_none() {
        std::fs::create_dir_all(output)?;
    }

    if format.includes_pdf() {
        let path = output_path_for_format(output, &stem, "pdf");
        println!("- PDFを生成中...");
        pdf::generate_pdf(record, &path, title)?;
        println!("✔ PDF出力: {}", path.display());
        written.push(path);
    }

    if format.includes_excel() {
        let path = output_path_for_format(output, &stem, "xlsx");
        println!("- Excelを生成中...");
        excel::generate_excel(std::slice::from_ref(record), &path)?;
        println!("✔ Excel出力: {}", path.display());
        written.push(path);
    }

    if matches!(format, ExportFormat::Json) {
        let path = output_path_for_format(output, &stem, "json");
        write_json(record, &path)?;
        println!("✔ JSON出力: {}", path.display());
        written.push(path);
    }

    Ok(written)
}

/// 複数レコードを出力（PDFは1社1ファイル、Excel/JSONはサマリー1ファイル）
pub fn export_records(
    records: &[ForensicRecord],
    format: &ExportFormat,
    output_dir: &Path,
    title: &str,
) -> Result<Vec<PathBuf>> {
    if let [record] = records {
        return export_record(record, format, output_dir, title);
    }

    std::fs::create_dir_all(output_dir)?;
    let mut written = Vec::new();

    if format.includes_pdf() {
        for record in records {
            let path = output_dir.join(format!("{}.pdf", report_stem(&record.name)));
            pdf::generate_pdf(record, &path, title)?;
            println!("✔ PDF出力: {}", path.display());
            written.push(path);
        }
    }

    if format.includes_excel() {
        let path = output_dir.join(format!("{}.xlsx", SUMMARY_STEM));
        excel::generate_excel(records, &path)?;
        println!("✔ Excel出力: {}", path.display());
        written.push(path);
    }

    if matches!(format, ExportFormat::Json) {
        let path = output_dir.join(format!("{}.json", SUMMARY_STEM));
        write_json(records, &path)?;
        println!("✔ JSON出力: {}", path.display());
        written.push(path);
    }

    Ok(written)
}

/// バッチ結果のサマリー（JSON + xlsx）を出力
pub fn export_summary(records: &[ForensicRecord], output_dir: &Path) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(output_dir)?;

    let json_path = output_dir.join(format!("{}.json", SUMMARY_STEM));
    write_json(records, &json_path)?;

    let excel_path = output_dir.join(format!("{}.xlsx", SUMMARY_STEM));
    excel::generate_excel(records, &excel_path)?;

    Ok((json_path, excel_path))
}

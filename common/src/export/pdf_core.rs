//! PDFレポートの内容モデル
//!
//! 描画ライブラリに依存しない形でレポートの行を組み立てる。
//! 実際の描画はCLI側（printpdf）が行う。

use crate::benford::DIGITS;
use crate::indicators::{assess, Indicator};
use crate::keywords::LineItem;
use crate::types::{ForensicRecord, Signal};

/// デフォルトのレポートタイトル
pub const DEFAULT_REPORT_TITLE: &str = "Earnings Quality Management - Forensic Audit";

/// レポート末尾の注記
pub const REPORT_NOTES: [&str; 3] = [
    "This report is generated by the Vigilance Forensic Engine.",
    "Analysis is based on automated extraction; please verify raw values against the source workbook.",
    "A 'HIGH' risk signal suggests the need for a manual investigative audit.",
];

/// 指標定義の折り返し幅（本文フォントでA4本文幅に収まる文字数）
pub const DEFINITION_WRAP_CHARS: usize = 88;

/// 本文の1行
#[derive(Debug, Clone, PartialEq)]
pub enum ReportLine {
    Heading(String),
    Bullet(String),
    Text(String),
    /// 空行
    Spacer,
}

/// レポート全体
#[derive(Debug, Clone, PartialEq)]
pub struct ReportModel {
    pub title: String,
    pub entity_line: String,
    pub verdict_line: String,
    pub signal: Signal,
    pub body: Vec<ReportLine>,
    pub notes: Vec<String>,
}

/// レコードからレポートを構築
///
/// # Arguments
/// * `record` - 解析結果
/// * `title` - ヘッダー帯のタイトル
/// * `generated_at` - 生成日時の表示文字列（空なら省略）
pub fn build_report(record: &ForensicRecord, title: &str, generated_at: &str) -> ReportModel {
    let mut body = Vec::new();

    body.push(ReportLine::Heading("Key Forensic Indicators".to_string()));
    for indicator in Indicator::ALL {
        let value = indicator.value(record);
        body.push(ReportLine::Bullet(format!(
            "{}: {}",
            indicator.label(),
            indicator.format_value(value)
        )));
    }

    body.push(ReportLine::Spacer);
    body.push(ReportLine::Heading("Extracted Financial Values".to_string()));
    for item in LineItem::ALL {
        body.push(ReportLine::Bullet(format!(
            "{}: {}",
            item.label(),
            format_amount(raw_value(record, item))
        )));
    }

    body.push(ReportLine::Spacer);
    body.push(ReportLine::Heading("Benford's Law Distribution".to_string()));
    match &record.benford {
        Some(b) => {
            body.push(ReportLine::Bullet(format!(
                "Mean absolute deviation: {:.5} (threshold 0.012)",
                b.mad
            )));
            body.push(ReportLine::Bullet(format!("Largest deviation at leading digit {}", b.hotspot)));
            for d in 0..DIGITS {
                body.push(ReportLine::Text(format!(
                    "Digit {}: actual {:.1}% / expected {:.1}%",
                    d + 1,
                    b.actual[d],
                    b.theoretical[d]
                )));
            }
        }
        None => {
            body.push(ReportLine::Text(
                "Not enough numeric observations for a first-digit test.".to_string(),
            ));
        }
    }

    body.push(ReportLine::Spacer);
    body.push(ReportLine::Heading("Indicator Assessment".to_string()));
    for a in assess(record) {
        body.push(ReportLine::Bullet(format!("{}: {} - {}", a.label, a.display, a.severity)));
        for chunk in wrap_text(a.indicator.definition(), DEFINITION_WRAP_CHARS) {
            body.push(ReportLine::Text(chunk));
        }
    }
    body.push(ReportLine::Text(format!(
        "Red flags raised: {} of 4 (two or more give a HIGH signal)",
        record.red_flags
    )));

    let mut notes: Vec<String> = REPORT_NOTES.iter().map(|n| n.to_string()).collect();
    if !generated_at.is_empty() {
        notes.push(format!("Generated: {}", generated_at));
    }

    ReportModel {
        title: title.to_string(),
        entity_line: format!("Entity Name: {}", display_name(&record.name)),
        verdict_line: format!("Manipulation Risk: {}", record.earnings_manipulation_signal),
        signal: record.earnings_manipulation_signal,
        body,
        notes,
    }
}

/// 単語単位で折り返す（1単語が幅を超える場合はそのまま1行）
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "N/A"
    } else {
        name
    }
}

fn raw_value(record: &ForensicRecord, item: LineItem) -> f64 {
    match item {
        LineItem::Sales => record.revenue,
        LineItem::Receivables => record.receivables,
        LineItem::TotalAssets => record.total_assets,
        LineItem::Borrowings => record.borrowings,
        LineItem::Tax => record.tax_paid,
        LineItem::ProfitBeforeTax => record.pbt,
        LineItem::OperatingCashFlow => record.ocf,
    }
}

/// 金額表示: 3桁区切り・小数2桁（例: 1,234,567.89）
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

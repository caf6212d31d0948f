//! Excel生成（共通ライブラリ）
//!
//! 複数の解析結果を1つのサマリーブックにまとめる。
//! - Summary: 1企業1行（シグナル・指標・抽出値）
//! - Benford: 企業ごとの先頭桁分布

use crate::benford::{theoretical_distribution, DIGITS};
use crate::error::{Error, Result};
use crate::types::{ForensicRecord, Signal};
use rust_xlsxwriter::*;

/// Summaryシートの列見出し
pub const SUMMARY_HEADERS: [&str; 16] = [
    "Entity",
    "Signal",
    "Red Flags",
    "Beneish M-Score",
    "Accruals Gap (%)",
    "Tax Gap (%)",
    "Debt/Asset Stress (%)",
    "Cash Quality (%)",
    "Revenue",
    "Receivables",
    "Total Assets",
    "Borrowings",
    "Tax",
    "Profit Before Tax",
    "Operating Cash Flow",
    "Benford MAD",
];

/// Summaryシートの Beneish M-Score 列
const M_SCORE_COLUMN: u16 = 3;

/// 指標列の表示書式（M-Scoreは小数2桁、比率は小数1桁）
fn ratio_num_format(col: u16) -> &'static str {
    if col == M_SCORE_COLUMN {
        "0.00"
    } else {
        "0.0"
    }
}

fn xlsx_err(context: &str) -> impl Fn(XlsxError) -> Error + '_ {
    move |e| Error::Export(format!("{}: {}", context, e))
}

/// サマリーブックをバッファに生成
pub fn generate_summary_buffer(records: &[ForensicRecord]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(0x0F172A))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);
    let amount_format = Format::new().set_num_format("#,##0.00");
    let ratio_format = Format::new().set_num_format(ratio_num_format(M_SCORE_COLUMN + 1));
    let score_format = Format::new().set_num_format(ratio_num_format(M_SCORE_COLUMN));
    let high_format = Format::new().set_bold().set_font_color(Color::RGB(0xDC2626));
    let low_format = Format::new().set_bold().set_font_color(Color::RGB(0x059669));

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Summary").map_err(xlsx_err("シート名設定エラー"))?;

        for (col, header) in SUMMARY_HEADERS.iter().enumerate() {
            sheet
                .write_string_with_format(0, col as u16, *header, &header_format)
                .map_err(xlsx_err("見出し書き込みエラー"))?;
            sheet
                .set_column_width(col as u16, if col == 0 { 28 } else { 16 })
                .map_err(xlsx_err("列幅設定エラー"))?;
        }
        sheet.set_freeze_panes(1, 1).map_err(xlsx_err("ウィンドウ枠固定エラー"))?;

        for (i, record) in records.iter().enumerate() {
            let row = (i + 1) as u32;
            let signal_format = match record.earnings_manipulation_signal {
                Signal::High => &high_format,
                Signal::Low => &low_format,
            };

            sheet.write_string(row, 0, &record.name).map_err(xlsx_err("値書き込みエラー"))?;
            sheet
                .write_string_with_format(row, 1, record.earnings_manipulation_signal.to_string(), signal_format)
                .map_err(xlsx_err("値書き込みエラー"))?;
            sheet
                .write_number(row, 2, record.red_flags as f64)
                .map_err(xlsx_err("値書き込みエラー"))?;

            let ratios = [
                record.beneish_m_score,
                record.accruals_gap,
                record.tax_gap,
                record.debt_asset_stress,
                record.cash_quality,
            ];
            for (offset, value) in ratios.iter().enumerate() {
                let col = M_SCORE_COLUMN + offset as u16;
                let format = if col == M_SCORE_COLUMN { &score_format } else { &ratio_format };
                sheet
                    .write_number_with_format(row, col, *value, format)
                    .map_err(xlsx_err("値書き込みエラー"))?;
            }

            let amounts = [
                record.revenue,
                record.receivables,
                record.total_assets,
                record.borrowings,
                record.tax_paid,
                record.pbt,
                record.ocf,
            ];
            for (offset, value) in amounts.iter().enumerate() {
                sheet
                    .write_number_with_format(row, 8 + offset as u16, *value, &amount_format)
                    .map_err(xlsx_err("値書き込みエラー"))?;
            }

            match &record.benford {
                Some(b) => sheet.write_number(row, 15, b.mad),
                None => sheet.write_string(row, 15, "n/a"),
            }
            .map_err(xlsx_err("値書き込みエラー"))?;
        }
    }

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Benford").map_err(xlsx_err("シート名設定エラー"))?;

        sheet
            .write_string_with_format(0, 0, "Digit", &header_format)
            .map_err(xlsx_err("見出し書き込みエラー"))?;
        sheet
            .write_string_with_format(0, 1, "Expected (%)", &header_format)
            .map_err(xlsx_err("見出し書き込みエラー"))?;
        sheet.set_column_width(1, 14).map_err(xlsx_err("列幅設定エラー"))?;

        let theoretical = theoretical_distribution();
        for d in 0..DIGITS {
            let row = (d + 1) as u32;
            sheet.write_number(row, 0, (d + 1) as f64).map_err(xlsx_err("値書き込みエラー"))?;
            sheet
                .write_number_with_format(row, 1, theoretical[d], &ratio_format)
                .map_err(xlsx_err("値書き込みエラー"))?;
        }

        for (i, record) in records.iter().enumerate() {
            let col = (i + 2) as u16;
            sheet
                .write_string_with_format(0, col, &record.name, &header_format)
                .map_err(xlsx_err("見出し書き込みエラー"))?;
            sheet.set_column_width(col, 16).map_err(xlsx_err("列幅設定エラー"))?;

            for d in 0..DIGITS {
                let row = (d + 1) as u32;
                match &record.benford {
                    Some(b) => sheet.write_number_with_format(row, col, b.actual[d], &ratio_format),
                    None => sheet.write_string(row, col, "-"),
                }
                .map_err(xlsx_err("値書き込みエラー"))?;
            }
        }
    }

    workbook.save_to_buffer().map_err(xlsx_err("Excel保存エラー"))
}

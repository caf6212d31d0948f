//! セル値パーサー
//!
//! 汚れた数値テキスト（桁区切り・前後の空白）を寛容に解釈する。
//! 失敗はエラーではなく `None` で返し、呼び出し側は次のセル/行へ進む。

use crate::types::Cell;

/// テキストを数値として解釈
///
/// 桁区切りの `,` と前後の空白を取り除いてから `f64` としてパースする。
/// NaN・無限大は数値とみなさない。
///
/// # Examples
/// ```
/// use vigilance_common::parse_numeric_text;
///
/// assert_eq!(parse_numeric_text(" 1,234.5 "), Some(1234.5));
/// assert_eq!(parse_numeric_text("NaN"), None);
/// assert_eq!(parse_numeric_text("₹ 100"), None);
/// ```
pub fn parse_numeric_text(text: &str) -> Option<f64> {
    let cleaned = text.replace(',', "");
    let value: f64 = cleaned.trim().parse().ok()?;
    finite(value)
}

/// セルを数値として解釈
///
/// 数値セルはそのまま、テキストセルは [`parse_numeric_text`] で解釈する。
/// 空白・真偽値・日付・エラーセルは常に `None`。
pub fn parse_cell(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(n) => finite(*n),
        Cell::Text(s) => parse_numeric_text(s),
        Cell::Empty | Cell::Bool(_) | Cell::Date(_) | Cell::Error(_) => None,
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

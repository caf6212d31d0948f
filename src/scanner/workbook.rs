//! ワークブックのデコード（calamine）
//!
//! 全ワークシートを読み込み順のまま `vigilance_common::Workbook` に変換する。

use crate::error::{Result, VigilanceError};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;
use tracing::debug;
use vigilance_common::{Cell, Sheet, Workbook};

/// デコード設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// 各シートの1行目を見出しとして捨てる
    pub skip_header_row: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self { skip_header_row: true }
    }
}

/// calamineのセルを変換
pub fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Date(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Error(e.to_string()),
    }
}

/// セル範囲をシートに変換
///
/// calamineの範囲は使用セルから始まるので、A1までを空セルで埋め戻す。
/// 1列目は常にA列、見出し行は常に1行目になる。
pub fn range_to_sheet(range: &Range<Data>, options: DecodeOptions) -> Sheet {
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));
    let width = col_offset + range.width();

    let leading = (0..row_offset).map(|_| vec![Cell::Empty; width]);
    let data = range.rows().map(|row| {
        std::iter::repeat(Cell::Empty)
            .take(col_offset)
            .chain(row.iter().map(to_cell))
            .collect()
    });

    let skip = usize::from(options.skip_header_row);
    Sheet::new(leading.chain(data).skip(skip).collect())
}

/// ファイルを開いて全シートを読み込む
pub fn load_workbook(path: &Path, options: DecodeOptions) -> Result<Workbook> {
    if !path.exists() {
        return Err(VigilanceError::FileNotFound(path.display().to_string()));
    }

    let mut source = open_workbook_auto(path)
        .map_err(|e| VigilanceError::WorkbookOpen(format!("{}: {}", path.display(), e)))?;

    let mut workbook = Workbook::new();
    for name in source.sheet_names().to_owned() {
        let range = source
            .worksheet_range(&name)
            .map_err(|e| VigilanceError::WorkbookOpen(format!("{} [{}]: {}", path.display(), name, e)))?;
        let sheet = range_to_sheet(&range, options);
        debug!(sheet = %name, rows = sheet.rows().len(), "sheet decoded");
        workbook.insert(name, sheet);
    }

    Ok(workbook)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_cell() {
        assert_eq!(to_cell(&Data::Empty), Cell::Empty);
        assert_eq!(to_cell(&Data::String("Sales".into())), Cell::Text("Sales".into()));
        assert_eq!(to_cell(&Data::Float(1.5)), Cell::Number(1.5));
        assert_eq!(to_cell(&Data::Int(42)), Cell::Number(42.0));
        assert_eq!(to_cell(&Data::Bool(false)), Cell::Bool(false));
    }

    #[test]
    fn test_range_to_sheet_skips_header() {
        let mut range: Range<Data> = Range::new((0, 0), (2, 1));
        range.set_value((0, 0), Data::String("COMPANY NAME".into()));
        range.set_value((1, 0), Data::String("Sales".into()));
        range.set_value((1, 1), Data::Float(100.0));
        range.set_value((2, 0), Data::String("Tax".into()));
        range.set_value((2, 1), Data::Int(7));

        let sheet = range_to_sheet(&range, DecodeOptions::default());
        assert_eq!(sheet.rows().len(), 2);
        assert_eq!(sheet.rows()[0][0], Cell::from("Sales"));
        assert_eq!(sheet.rows()[1][1], Cell::Number(7.0));

        let raw = range_to_sheet(&range, DecodeOptions { skip_header_row: false });
        assert_eq!(raw.rows().len(), 3);
        assert_eq!(raw.rows()[0][0], Cell::from("COMPANY NAME"));
    }

    #[test]
    fn test_range_to_sheet_pads_to_origin() {
        // C3から始まる表: ラベルはA列ではない
        let mut range: Range<Data> = Range::new((2, 2), (3, 3));
        range.set_value((2, 2), Data::String("COMPANY NAME".into()));
        range.set_value((3, 2), Data::String("Sales".into()));
        range.set_value((3, 3), Data::Float(100.0));

        let sheet = range_to_sheet(&range, DecodeOptions::default());
        // 1行目（空）を見出しとして捨て、2〜4行目が残る
        assert_eq!(sheet.rows().len(), 3);
        assert!(sheet.rows()[0].iter().all(Cell::is_empty));
        assert_eq!(sheet.rows()[2].len(), 4);
        assert_eq!(sheet.rows()[2][0], Cell::Empty);
        assert_eq!(sheet.rows()[2][2], Cell::from("Sales"));
        assert_eq!(sheet.rows()[2][3], Cell::Number(100.0));
    }

    #[test]
    fn test_empty_range() {
        let range: Range<Data> = Range::empty();
        assert!(range_to_sheet(&range, DecodeOptions::default()).is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_workbook(Path::new("/nonexistent/book-12345.xlsx"), DecodeOptions::default())
            .unwrap_err();
        assert!(matches!(err, VigilanceError::FileNotFound(_)));
    }
}

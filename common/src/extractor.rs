//! 財務項目抽出モジュール
//!
//! 1列目のラベルをキーワードの部分一致で探し、残りの列から数値を取り出す。
//!
//! ## マッチング規則
//! - ラベル = 1列目のセルを小文字化・trimしたもの
//! - いずれかのキーワードがラベルの部分文字列なら一致
//! - 一致行の2列目以降を左から見て、最初にパースできた値を採用
//! - 一致しても数値が無い行はスキップし、後続の行を探し続ける

use crate::parser::parse_cell;
use crate::types::{Cell, Sheet};
use tracing::debug;

/// 順序付きキーワード集合（小文字）
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    /// キーワードを小文字化して構築（重複は最初の出現のみ残す）
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        set.extend(keywords);
        set
    }

    /// 末尾にキーワードを追加
    pub fn extend<I, S>(&mut self, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for keyword in keywords {
            let keyword = keyword.as_ref().to_lowercase();
            if !self.keywords.contains(&keyword) {
                self.keywords.push(keyword);
            }
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// 正規化済みラベルにいずれかのキーワードが含まれるか
    pub fn matches(&self, label: &str) -> bool {
        self.keywords.iter().any(|k| label.contains(k.as_str()))
    }
}

/// 抽出元の位置情報
#[derive(Debug, Clone, PartialEq)]
pub struct LineMatch {
    /// 0始まりの行番号
    pub row: usize,
    /// 0始まりの列番号（値を取ったセル）
    pub column: usize,
    /// 正規化済みラベル
    pub label: String,
    pub value: f64,
}

/// 行ラベルを正規化（1列目が無い行は `None`）
pub fn row_label(row: &[Cell]) -> Option<String> {
    row.first().map(|cell| cell.as_label().trim().to_lowercase())
}

/// 2列目以降で最初にパースできる値とその列番号
pub fn first_numeric(row: &[Cell]) -> Option<(usize, f64)> {
    row.iter()
        .enumerate()
        .skip(1)
        .find_map(|(column, cell)| parse_cell(cell).map(|value| (column, value)))
}

fn matches_in<'a>(
    sheet: &'a Sheet,
    keywords: &'a KeywordSet,
) -> impl Iterator<Item = LineMatch> + 'a {
    sheet.rows().iter().enumerate().filter_map(move |(row, cells)| {
        let label = row_label(cells)?;
        if !keywords.matches(&label) {
            return None;
        }
        let (column, value) = first_numeric(cells)?;
        Some(LineMatch { row, column, label, value })
    })
}

/// 値を持つ最初の一致行
pub fn locate(sheet: &Sheet, keywords: &KeywordSet) -> Option<LineMatch> {
    matches_in(sheet, keywords).next()
}

/// 値を持つすべての一致行（行順）
pub fn locate_all(sheet: &Sheet, keywords: &KeywordSet) -> Vec<LineMatch> {
    matches_in(sheet, keywords).collect()
}

/// 単一値の抽出
///
/// 値を持つ最初の一致行の、最初にパースできたセル。見つからなければ `0.0`。
pub fn find_value(sheet: &Sheet, keywords: &KeywordSet) -> f64 {
    match locate(sheet, keywords) {
        Some(m) => {
            debug!(row = m.row, column = m.column, label = %m.label, value = m.value, "line item matched");
            m.value
        }
        None => {
            debug!(keywords = ?keywords.as_slice(), "line item not found");
            0.0
        }
    }
}

/// 複数行の合計
///
/// 一致行ごとに最初にパースできたセルを1つだけ加算する。
pub fn sum_values(sheet: &Sheet, keywords: &KeywordSet) -> f64 {
    let matches = locate_all(sheet, keywords);
    debug!(rows = matches.len(), keywords = ?keywords.as_slice(), "summing line items");
    matches.iter().map(|m| m.value).sum()
}

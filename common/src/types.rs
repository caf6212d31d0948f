//! ワークブック・解析結果の型定義
//!
//! デコーダとCLIで共有される型:
//! - Cell / Sheet / Workbook: デコード済みの表データ（入力、変更しない）
//! - BenfordResult: ベンフォード分析の結果
//! - ForensicRecord: 最終出力（1回の解析リクエストにつき1つ）

use serde::{Deserialize, Serialize};

/// 主データシートとして優先されるシート名
pub const PRIMARY_SHEET_NAME: &str = "Data Sheet";

/// セル値
///
/// 数値として解釈されうるのは `Number` と `Text` のみ。
/// 日付はシリアル値を保持するが、金額としては扱わない。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(f64),
    Error(String),
}

impl Cell {
    /// ラベルとして見たときの文字列表現
    pub fn as_label(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) | Cell::Error(s) => s.clone(),
            Cell::Number(n) | Cell::Date(n) => n.to_string(),
            Cell::Bool(b) => b.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(value as f64)
    }
}

/// 1シート分の表データ（行 × セル）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sheet {
    rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 全セルを行優先で走査
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flat_map(|row| row.iter())
    }
}

/// シート名 → シートのマップ（デコーダの並び順を保持）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Workbook {
    sheets: Vec<(String, Sheet)>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// シートを追加（同名シートがあれば位置を保ったまま置き換え）
    pub fn insert(&mut self, name: impl Into<String>, sheet: Sheet) {
        let name = name.into();
        match self.sheets.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = sheet,
            None => self.sheets.push((name, sheet)),
        }
    }

    /// ビルダー形式で追加
    pub fn with_sheet(mut self, name: impl Into<String>, sheet: Sheet) -> Self {
        self.insert(name, sheet);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn sheets(&self) -> impl Iterator<Item = (&str, &Sheet)> {
        self.sheets.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// 主データシートを選択
    ///
    /// `preferred` と同名のシートがあればそれを、なければ先頭シートを返す。
    /// シートが1枚もない場合は `None`。
    pub fn primary_sheet(&self, preferred: &str) -> Option<(&str, &Sheet)> {
        self.sheets
            .iter()
            .find(|(n, _)| n == preferred)
            .or_else(|| self.sheets.first())
            .map(|(n, s)| (n.as_str(), s))
    }
}

/// ベンフォード分析結果（全項目が揃っているか、結果自体が無いかのどちらか）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenfordResult {
    /// 先頭桁1〜9の実測頻度（%）
    pub actual: [f64; 9],
    /// 先頭桁1〜9の理論頻度（%）
    pub theoretical: [f64; 9],
    /// 平均絶対偏差（小数5桁に丸め）
    pub mad: f64,
    /// 乖離が最大の桁（1〜9）
    pub hotspot: u8,
}

/// 利益操作シグナル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    High,
    #[default]
    Low,
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::High => write!(f, "HIGH"),
            Signal::Low => write!(f, "LOW"),
        }
    }
}

/// フォレンジック分析の最終結果
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForensicRecord {
    /// 企業名（大文字）
    pub name: String,

    // フォレンジック指標
    pub beneish_m_score: f64,
    pub accruals_gap: f64,
    pub tax_gap: f64,
    pub debt_asset_stress: f64,
    pub cash_quality: f64,

    // 抽出した財務数値
    pub revenue: f64,
    pub total_assets: f64,
    pub ocf: f64,
    pub receivables: f64,
    pub borrowings: f64,
    pub tax_paid: f64,
    pub pbt: f64,

    pub earnings_manipulation_signal: Signal,

    /// 成立したレッドフラグの数（0〜4）
    #[serde(default)]
    pub red_flags: u32,

    pub benford: Option<BenfordResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(label: &str) -> Sheet {
        Sheet::new(vec![vec![Cell::from(label), Cell::from(1.0)]])
    }

    #[test]
    fn test_primary_sheet_by_name() {
        let workbook = Workbook::new()
            .with_sheet("Balance Sheet", sheet("a"))
            .with_sheet("Data Sheet", sheet("b"));

        let (name, _) = workbook.primary_sheet(PRIMARY_SHEET_NAME).expect("シートなし");
        assert_eq!(name, "Data Sheet");
    }

    #[test]
    fn test_primary_sheet_falls_back_to_first() {
        let workbook = Workbook::new()
            .with_sheet("Profit & Loss", sheet("a"))
            .with_sheet("Cash Flow", sheet("b"));

        let (name, _) = workbook.primary_sheet(PRIMARY_SHEET_NAME).expect("シートなし");
        assert_eq!(name, "Profit & Loss");
    }

    #[test]
    fn test_primary_sheet_empty_workbook() {
        assert!(Workbook::new().primary_sheet(PRIMARY_SHEET_NAME).is_none());
    }

    #[test]
    fn test_insert_replaces_same_name_in_place() {
        let mut workbook = Workbook::new()
            .with_sheet("A", sheet("first"))
            .with_sheet("B", sheet("second"));
        workbook.insert("A", sheet("replaced"));

        assert_eq!(workbook.sheet_names(), vec!["A", "B"]);
        let a = workbook.get("A").expect("シートなし");
        assert_eq!(a.rows()[0][0], Cell::from("replaced"));
    }

    #[test]
    fn test_cell_as_label() {
        assert_eq!(Cell::Empty.as_label(), "");
        assert_eq!(Cell::from("Sales").as_label(), "Sales");
        assert_eq!(Cell::Number(2023.0).as_label(), "2023");
        assert_eq!(Cell::Bool(true).as_label(), "true");
    }

    #[test]
    fn test_signal_serialize() {
        assert_eq!(serde_json::to_string(&Signal::High).unwrap(), "\"HIGH\"");
        assert_eq!(serde_json::to_string(&Signal::Low).unwrap(), "\"LOW\"");
    }

    #[test]
    fn test_record_serialize_keys() {
        let record = ForensicRecord {
            name: "ACME".to_string(),
            tax_paid: 12.5,
            ..Default::default()
        };

        let json = serde_json::to_string(&record).expect("シリアライズ失敗");
        assert!(json.contains("\"name\":\"ACME\""));
        assert!(json.contains("\"tax_paid\":12.5"));
        assert!(json.contains("\"earnings_manipulation_signal\":\"LOW\""));
        assert!(json.contains("\"benford\":null"));
    }

    #[test]
    fn test_record_deserialize_without_red_flags() {
        let json = r#"{
            "name": "ACME",
            "beneish_m_score": -4.84, "accruals_gap": 0.0, "tax_gap": 25.0,
            "debt_asset_stress": 0.0, "cash_quality": 0.0,
            "revenue": 0.0, "total_assets": 0.0, "ocf": 0.0, "receivables": 0.0,
            "borrowings": 0.0, "tax_paid": 0.0, "pbt": 0.0,
            "earnings_manipulation_signal": "HIGH",
            "benford": null
        }"#;

        let record: ForensicRecord = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(record.earnings_manipulation_signal, Signal::High);
        assert_eq!(record.red_flags, 0);
        assert!(record.benford.is_none());
    }
}

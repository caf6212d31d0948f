//! 財務項目キーワード
//!
//! 損益計算書・貸借対照表・キャッシュフロー計算書の表記ゆれを吸収する
//! 組み込み語彙と、分析者が追加できるキーワードプロファイル。

use crate::error::{Error, Result};
use crate::extractor::KeywordSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 抽出対象の財務項目
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItem {
    Sales,
    Receivables,
    TotalAssets,
    Borrowings,
    Tax,
    ProfitBeforeTax,
    OperatingCashFlow,
}

/// 集計方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    /// 最初に見つかった1行
    Single,
    /// 一致した全行の合計
    Sum,
}

impl LineItem {
    pub const ALL: [LineItem; 7] = [
        LineItem::Sales,
        LineItem::Receivables,
        LineItem::TotalAssets,
        LineItem::Borrowings,
        LineItem::Tax,
        LineItem::ProfitBeforeTax,
        LineItem::OperatingCashFlow,
    ];

    /// 組み込みキーワード
    pub fn default_keywords(&self) -> &'static [&'static str] {
        match self {
            LineItem::Sales => &["revenue", "revenue from operations", "sales"],
            LineItem::Receivables => &["receivables", "trade receivables", "debtors"],
            LineItem::TotalAssets => &[
                "total assets",
                "total",
                "total assets (a)",
                "total assets as at",
                "total (assets)",
                "non-current assets",
                "current assets",
            ],
            LineItem::Borrowings => &["borrowings", "total borrowings", "loans", "debt"],
            LineItem::Tax => &["tax", "current tax", "provision for tax"],
            LineItem::ProfitBeforeTax => &["profit before tax", "pbt"],
            LineItem::OperatingCashFlow => &[
                "cash from operating",
                "cash flow from operating",
                "net cash from operating",
            ],
        }
    }

    pub fn aggregation(&self) -> Aggregation {
        match self {
            LineItem::Borrowings => Aggregation::Sum,
            _ => Aggregation::Single,
        }
    }

    /// 表示名
    pub fn label(&self) -> &'static str {
        match self {
            LineItem::Sales => "Reported Revenue",
            LineItem::Receivables => "Trade Receivables",
            LineItem::TotalAssets => "Total Assets",
            LineItem::Borrowings => "Total Borrowings",
            LineItem::Tax => "Tax Provision",
            LineItem::ProfitBeforeTax => "Profit Before Tax",
            LineItem::OperatingCashFlow => "Operating Cash Flow",
        }
    }
}

impl std::fmt::Display for LineItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// キーワードプロファイル
///
/// 組み込みキーワードの後ろに追加キーワードを足す。置き換えはしない。
///
/// ```json
/// { "keywords": { "sales": ["turnover"], "borrowings": ["term loan"] } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordProfile {
    #[serde(default)]
    pub keywords: BTreeMap<LineItem, Vec<String>>,
}

impl KeywordProfile {
    /// JSONファイルから読み込み
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let profile: Self = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    fn validate(&self) -> Result<()> {
        for (item, extra) in &self.keywords {
            if extra.iter().any(|k| k.trim().is_empty()) {
                return Err(Error::Config(format!("empty keyword for {:?}", item)));
            }
        }
        Ok(())
    }

    /// 項目のキーワード集合（組み込み + 追加分）
    pub fn keywords_for(&self, item: LineItem) -> KeywordSet {
        let mut set = KeywordSet::new(item.default_keywords());
        if let Some(extra) = self.keywords.get(&item) {
            set.extend(extra.iter().map(|k| k.trim()));
        }
        set
    }
}

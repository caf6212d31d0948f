//! Vigilance Common Library
//!
//! 財務諸表ワークブックからの項目抽出とフォレンジック・スコアリング。
//! デコード済みの表データを受け取り、1件の `ForensicRecord` を返す。

pub mod types;
pub mod layout;
pub mod error;
pub mod parser;
pub mod extractor;
pub mod keywords;
pub mod benford;
pub mod analyzer;
pub mod indicators;
pub mod export;

pub use types::{BenfordResult, Cell, ForensicRecord, Sheet, Signal, Workbook, PRIMARY_SHEET_NAME};
pub use error::{Error, Result};
pub use parser::{parse_cell, parse_numeric_text};
pub use extractor::{find_value, locate, locate_all, sum_values, KeywordSet, LineMatch};
pub use keywords::{Aggregation, KeywordProfile, LineItem};
pub use benford::benford;
pub use analyzer::{analyze_entity, analyze_workbook, AnalysisContext};
pub use indicators::{assess, Indicator, IndicatorAssessment, Severity};

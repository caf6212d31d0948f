//! 指標ごとの評価
//!
//! レポートのフラグ表で使う、指標の説明文と重要度。
//! 総合シグナルには影響しない（負債ストレスは表示専用）。

use crate::analyzer::{ACCRUALS_GAP_THRESHOLD, M_SCORE_THRESHOLD, TAX_GAP_THRESHOLD};
use crate::types::ForensicRecord;
use serde::{Deserialize, Serialize};

/// 負債ストレスの警告しきい値（%）
pub const DEBT_STRESS_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    BeneishMScore,
    AccrualsGap,
    TaxGap,
    DebtStress,
    CashQuality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    Optimal,
    Informational,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "CRITICAL"),
            Severity::Optimal => write!(f, "OPTIMAL"),
            Severity::Informational => write!(f, "INFO"),
        }
    }
}

impl Indicator {
    pub const ALL: [Indicator; 5] = [
        Indicator::BeneishMScore,
        Indicator::AccrualsGap,
        Indicator::TaxGap,
        Indicator::DebtStress,
        Indicator::CashQuality,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Indicator::BeneishMScore => "Beneish M-Score",
            Indicator::AccrualsGap => "Accruals Gap",
            Indicator::TaxGap => "Tax Discrepancy Gap",
            Indicator::DebtStress => "Debt/Asset Stress Ratio",
            Indicator::CashQuality => "Revenue vs Cash Flow Quality",
        }
    }

    pub fn definition(&self) -> &'static str {
        match self {
            Indicator::BeneishMScore => {
                "Simplified Beneish model driven by receivables relative to sales. \
                 A score above -1.78 suggests a high probability of earnings manipulation."
            }
            Indicator::AccrualsGap => {
                "Share of reported revenue not backed by operating cash flow. \
                 High positive accruals often signal aggressive non-cash revenue recognition."
            }
            Indicator::TaxGap => {
                "Distance between the effective tax rate (tax / profit before tax) and 25%. \
                 Large gaps can mean paper profits are not supported by real taxable events."
            }
            Indicator::DebtStress => {
                "Total borrowings against total assets. Excessive leverage raises the \
                 incentive to window-dress financial statements."
            }
            Indicator::CashQuality => {
                "Operating cash flow as a percentage of revenue. Values below 70% suggest \
                 that sales may not be turning into cash collections."
            }
        }
    }

    /// 単位付きの表示文字列（M-Scoreは小数2桁、比率は小数1桁+%）
    pub fn format_value(&self, value: f64) -> String {
        match self {
            Indicator::BeneishMScore => format!("{:.2}", value),
            _ => format!("{:.1}%", value),
        }
    }

    /// レコードから表示用の値を取り出す
    pub fn value(&self, record: &ForensicRecord) -> f64 {
        match self {
            Indicator::BeneishMScore => record.beneish_m_score,
            Indicator::AccrualsGap => record.accruals_gap,
            Indicator::TaxGap => record.tax_gap,
            Indicator::DebtStress => record.debt_asset_stress,
            Indicator::CashQuality => record.cash_quality,
        }
    }

    /// 値の重要度
    pub fn severity(&self, value: f64) -> Severity {
        let critical = match self {
            Indicator::BeneishMScore => value > M_SCORE_THRESHOLD,
            Indicator::AccrualsGap => value > ACCRUALS_GAP_THRESHOLD,
            Indicator::TaxGap => value > TAX_GAP_THRESHOLD,
            Indicator::DebtStress => value > DEBT_STRESS_THRESHOLD,
            Indicator::CashQuality => return Severity::Informational,
        };
        if critical {
            Severity::Critical
        } else {
            Severity::Optimal
        }
    }
}

/// 1指標の評価結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorAssessment {
    pub indicator: Indicator,
    pub label: String,
    pub value: f64,
    /// 単位付きの表示文字列（例: "32.5%"）
    pub display: String,
    pub severity: Severity,
}

/// 全指標を評価
pub fn assess(record: &ForensicRecord) -> Vec<IndicatorAssessment> {
    Indicator::ALL
        .iter()
        .map(|indicator| {
            let value = indicator.value(record);
            IndicatorAssessment {
                indicator: *indicator,
                label: indicator.label().to_string(),
                value,
                display: indicator.format_value(value),
                severity: indicator.severity(value),
            }
        })
        .collect()
}

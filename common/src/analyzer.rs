//! フォレンジック・スコアリングエンジン
//!
//! 主データシートから7つの財務数値を抽出し、5つの指標と
//! ベンフォード検定を組み合わせて利益操作シグナルを判定する。
//!
//! ## 処理フロー
//! 1. キーワードで財務数値を抽出（借入金のみ複数行合計）
//! 2. 分母が0の指標は0として指標を計算
//! 3. 全シートでベンフォード検定
//! 4. レッドフラグが2つ以上なら HIGH
//!
//! 状態は持たない。同じ入力からは常に同じ結果が得られる。

use crate::benford::benford;
use crate::extractor::{find_value, sum_values};
use crate::keywords::{Aggregation, KeywordProfile, LineItem};
use crate::types::{BenfordResult, ForensicRecord, Sheet, Signal, Workbook};
use tracing::{debug, info};

/// 簡易Beneish M-Scoreの定数項
pub const M_SCORE_INTERCEPT: f64 = -4.84;
/// DSRI項の係数
pub const DSRI_COEFFICIENT: f64 = 0.92;
/// 基準税率（%）
pub const STATUTORY_TAX_RATE: f64 = 25.0;

/// M-Scoreのしきい値（超えるとフラグ）
pub const M_SCORE_THRESHOLD: f64 = -1.78;
/// 発生主義ギャップのしきい値（%）
pub const ACCRUALS_GAP_THRESHOLD: f64 = 25.0;
/// 税率ギャップのしきい値（%）
pub const TAX_GAP_THRESHOLD: f64 = 10.0;
/// ベンフォードMADのしきい値
pub const BENFORD_MAD_THRESHOLD: f64 = 0.012;
/// HIGH判定に必要なフラグ数
pub const HIGH_SIGNAL_MIN_FLAGS: u32 = 2;

/// 抽出した財務数値（未丸め）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FinancialValues {
    pub sales: f64,
    pub receivables: f64,
    pub total_assets: f64,
    pub borrowings: f64,
    pub tax: f64,
    pub pbt: f64,
    pub ocf: f64,
}

impl FinancialValues {
    /// シートから全項目を抽出
    pub fn extract(sheet: &Sheet, profile: &KeywordProfile) -> Self {
        let value = |item: LineItem| {
            let keywords = profile.keywords_for(item);
            let v = match item.aggregation() {
                Aggregation::Single => find_value(sheet, &keywords),
                Aggregation::Sum => sum_values(sheet, &keywords),
            };
            debug!(item = ?item, value = v, "extracted");
            v
        };

        Self {
            sales: value(LineItem::Sales),
            receivables: value(LineItem::Receivables),
            total_assets: value(LineItem::TotalAssets),
            borrowings: value(LineItem::Borrowings),
            tax: value(LineItem::Tax),
            pbt: value(LineItem::ProfitBeforeTax),
            ocf: value(LineItem::OperatingCashFlow),
        }
    }

}

/// フォレンジック指標（未丸め）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ForensicRatios {
    pub beneish_m_score: f64,
    pub accruals_gap: f64,
    pub tax_gap: f64,
    pub debt_asset_stress: f64,
    pub cash_quality: f64,
}

impl ForensicRatios {
    /// 分母が0の比率は0として計算
    pub fn from_values(v: &FinancialValues) -> Self {
        let dsri = ratio(v.receivables, v.sales);
        let tax_rate = ratio(v.tax, v.pbt) * 100.0;

        Self {
            beneish_m_score: M_SCORE_INTERCEPT + DSRI_COEFFICIENT * dsri,
            accruals_gap: ratio(v.sales - v.ocf, v.sales) * 100.0,
            tax_gap: (STATUTORY_TAX_RATE - tax_rate).abs(),
            debt_asset_stress: ratio(v.borrowings, v.total_assets) * 100.0,
            cash_quality: ratio(v.ocf, v.sales) * 100.0,
        }
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// 個別のレッドフラグ判定結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RedFlags {
    pub m_score: bool,
    pub accruals_gap: bool,
    pub tax_gap: bool,
    pub benford: bool,
}

impl RedFlags {
    /// 未丸めの指標で判定（MADはベンフォード結果の値をそのまま使う）
    pub fn evaluate(ratios: &ForensicRatios, benford: Option<&BenfordResult>) -> Self {
        Self {
            m_score: ratios.beneish_m_score > M_SCORE_THRESHOLD,
            accruals_gap: ratios.accruals_gap > ACCRUALS_GAP_THRESHOLD,
            tax_gap: ratios.tax_gap > TAX_GAP_THRESHOLD,
            benford: benford.is_some_and(|b| b.mad > BENFORD_MAD_THRESHOLD),
        }
    }

    pub fn count(&self) -> u32 {
        [self.m_score, self.accruals_gap, self.tax_gap, self.benford]
            .iter()
            .filter(|f| **f)
            .count() as u32
    }

    pub fn signal(&self) -> Signal {
        signal_for(self.count())
    }
}

/// フラグ数からシグナルを決定
pub fn signal_for(red_flags: u32) -> Signal {
    if red_flags >= HIGH_SIGNAL_MIN_FLAGS {
        Signal::High
    } else {
        Signal::Low
    }
}

/// 1回の解析リクエストのコンテキスト
#[derive(Debug, Clone, Copy)]
pub struct AnalysisContext<'a> {
    /// ベンフォード検定の対象（全シート）
    pub workbook: &'a Workbook,
    /// 財務数値の抽出元
    pub primary_sheet: &'a Sheet,
    pub entity_name: &'a str,
    pub profile: &'a KeywordProfile,
}

/// コンテキストに対してフォレンジック分析を実行
pub fn analyze_entity(ctx: &AnalysisContext<'_>) -> ForensicRecord {
    let values = FinancialValues::extract(ctx.primary_sheet, ctx.profile);
    let ratios = ForensicRatios::from_values(&values);
    let benford = benford(ctx.workbook);
    let flags = RedFlags::evaluate(&ratios, benford.as_ref());
    let signal = flags.signal();

    info!(
        entity = ctx.entity_name,
        red_flags = flags.count(),
        signal = %signal,
        "forensic analysis complete"
    );

    ForensicRecord {
        name: ctx.entity_name.to_uppercase(),

        beneish_m_score: round_to(ratios.beneish_m_score, 2),
        accruals_gap: round_to(ratios.accruals_gap, 1),
        tax_gap: round_to(ratios.tax_gap, 1),
        debt_asset_stress: round_to(ratios.debt_asset_stress, 1),
        cash_quality: round_to(ratios.cash_quality, 1),

        revenue: round_to(values.sales, 2),
        total_assets: round_to(values.total_assets, 2),
        ocf: round_to(values.ocf, 2),
        receivables: round_to(values.receivables, 2),
        borrowings: round_to(values.borrowings, 2),
        tax_paid: round_to(values.tax, 2),
        pbt: round_to(values.pbt, 2),

        earnings_manipulation_signal: signal,
        red_flags: flags.count(),
        benford,
    }
}

/// ワークブックを解析
///
/// `preferred_sheet` と同名のシート（無ければ先頭シート）から財務数値を抽出する。
/// シートが無いワークブックでも空シートとして解析を完了する。
pub fn analyze_workbook(
    workbook: &Workbook,
    preferred_sheet: &str,
    entity_name: &str,
    profile: &KeywordProfile,
) -> ForensicRecord {
    let empty = Sheet::default();
    let primary_sheet = match workbook.primary_sheet(preferred_sheet) {
        Some((name, sheet)) => {
            debug!(sheet = name, "primary data sheet selected");
            sheet
        }
        None => &empty,
    };

    analyze_entity(&AnalysisContext {
        workbook,
        primary_sheet,
        entity_name,
        profile,
    })
}

/// 表示用の丸め（ちょうど半分は偶数側へ、非有限値は0）
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round_ties_even() / factor;
    if rounded.is_finite() {
        rounded
    } else {
        value
    }
}

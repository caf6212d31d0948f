//! ベンフォードの法則による先頭桁分布検定
//!
//! ワークブック全シートの数値セルを1つのプールにまとめ、
//! 先頭桁1〜9の出現頻度を理論分布と比較する。

use crate::analyzer::round_to;
use crate::parser::parse_cell;
use crate::types::{BenfordResult, Workbook};
use tracing::debug;

/// 先頭桁の種類数（1〜9）
pub const DIGITS: usize = 9;

/// MADの丸め桁数
const MAD_DECIMALS: i32 = 5;

/// 理論頻度（%）: `100 * log10(1 + 1/d)`
pub fn theoretical_distribution() -> [f64; DIGITS] {
    let mut dist = [0.0; DIGITS];
    for (i, slot) in dist.iter_mut().enumerate() {
        let d = (i + 1) as f64;
        *slot = (1.0 + 1.0 / d).log10() * 100.0;
    }
    dist
}

/// 先頭桁（1以上の有限値のみ）
///
/// 10進文字列から小数点と先頭の0を除いた最初の文字。
pub fn leading_digit(value: f64) -> Option<u8> {
    if !value.is_finite() || value < 1.0 {
        return None;
    }
    let repr = value.to_string().replace('.', "");
    let digit = repr.trim_start_matches('0').chars().next()?.to_digit(10)?;
    (1..=9).contains(&digit).then_some(digit as u8)
}

/// 検定対象の観測値（全シート・全セル、絶対値が1以上）
pub fn observations(workbook: &Workbook) -> Vec<f64> {
    workbook
        .sheets()
        .flat_map(|(_, sheet)| sheet.cells())
        .filter_map(parse_cell)
        .map(f64::abs)
        .filter(|v| *v >= 1.0)
        .collect()
}

/// 任意の値列に対する検定（絶対値が1未満の値は除外）
pub fn analyze_values(values: &[f64]) -> Option<BenfordResult> {
    let mut counts = [0usize; DIGITS];
    let mut total = 0usize;
    for digit in values.iter().filter_map(|v| leading_digit(v.abs())) {
        counts[(digit - 1) as usize] += 1;
        total += 1;
    }

    if total == 0 {
        return None;
    }

    let theoretical = theoretical_distribution();
    let mut actual = [0.0; DIGITS];
    for (slot, count) in actual.iter_mut().zip(counts.iter()) {
        *slot = *count as f64 / total as f64 * 100.0;
    }

    let mad = actual
        .iter()
        .zip(theoretical.iter())
        .map(|(a, t)| (a / 100.0 - t / 100.0).abs())
        .sum::<f64>()
        / DIGITS as f64;

    Some(BenfordResult {
        actual,
        theoretical,
        mad: round_to(mad, MAD_DECIMALS),
        hotspot: hotspot(&actual, &theoretical),
    })
}

/// ワークブック全体の検定（観測値が無ければ `None`）
pub fn benford(workbook: &Workbook) -> Option<BenfordResult> {
    let values = observations(workbook);
    debug!(observations = values.len(), sheets = workbook.len(), "benford pool collected");
    analyze_values(&values)
}

/// 乖離が最大の桁（同値なら小さい桁）
fn hotspot(actual: &[f64; DIGITS], theoretical: &[f64; DIGITS]) -> u8 {
    let mut best = 0;
    let mut best_gap = f64::NEG_INFINITY;
    for (i, (a, t)) in actual.iter().zip(theoretical.iter()).enumerate() {
        let gap = (a - t).abs();
        if gap > best_gap {
            best = i;
            best_gap = gap;
        }
    }
    (best + 1) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, Sheet};

    const EPS: f64 = 1e-9;

    #[test]
    fn test_theoretical_distribution() {
        let dist = theoretical_distribution();
        assert!((dist[0] - 30.10299956639812).abs() < EPS);
        assert!((dist[8] - 4.575749056067513).abs() < EPS);
        assert!((dist.iter().sum::<f64>() - 100.0).abs() < 1e-9);
        assert!(dist.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_leading_digit() {
        assert_eq!(leading_digit(1.0), Some(1));
        assert_eq!(leading_digit(9.99), Some(9));
        assert_eq!(leading_digit(1234.5), Some(1));
        assert_eq!(leading_digit(50_000.0), Some(5));
        assert_eq!(leading_digit(7e20), Some(7));
        assert_eq!(leading_digit(0.5), None);
        assert_eq!(leading_digit(f64::INFINITY), None);
    }

    #[test]
    fn test_histogram_and_mad() {
        let result = analyze_values(&[111.0, 111.0, 111.0, 211.0]).expect("結果なし");

        assert!((result.actual[0] - 75.0).abs() < EPS);
        assert!((result.actual[1] - 25.0).abs() < EPS);
        assert!(result.actual[2..].iter().all(|v| *v == 0.0));

        let theoretical = theoretical_distribution();
        let expected_mad = result
            .actual
            .iter()
            .zip(theoretical.iter())
            .map(|(a, t)| (a / 100.0 - t / 100.0).abs())
            .sum::<f64>()
            / 9.0;
        assert!((result.mad - round_to(expected_mad, 5)).abs() < EPS);
        assert!((result.mad - 0.1162).abs() < EPS);

        // 1: |75-30.1|=44.9 が最大
        assert_eq!(result.hotspot, 1);
    }

    #[test]
    fn test_hotspot_not_always_one() {
        // 全部9始まり → 桁9の乖離 95.4 が最大
        let result = analyze_values(&[9.0, 95.0, 912.0]).expect("結果なし");
        assert_eq!(result.hotspot, 9);
    }

    #[test]
    fn test_hotspot_tie_resolves_to_lowest_digit() {
        let theoretical = [10.0; DIGITS];
        let mut actual = [10.0; DIGITS];
        actual[2] = 13.0;
        actual[5] = 7.0;
        assert_eq!(hotspot(&actual, &theoretical), 3);
    }

    #[test]
    fn test_negative_values_use_absolute() {
        let result = analyze_values(&[-300.0, 3.5]).expect("結果なし");
        assert!((result.actual[2] - 100.0).abs() < EPS);
    }

    #[test]
    fn test_values_below_one_excluded() {
        assert!(analyze_values(&[0.5, 0.99, -0.2, 0.0]).is_none());
        assert!(analyze_values(&[]).is_none());
    }

    #[test]
    fn test_benford_across_all_sheets() {
        let workbook = Workbook::new()
            .with_sheet(
                "Data Sheet",
                Sheet::new(vec![vec![Cell::from("Sales"), Cell::Number(111.0), Cell::from("1,11")]]),
            )
            .with_sheet(
                "Notes",
                Sheet::new(vec![vec![Cell::from("x"), Cell::from("111"), Cell::Number(211.0)]]),
            );

        assert_eq!(observations(&workbook).len(), 4);
        let result = benford(&workbook).expect("結果なし");
        assert!((result.actual[0] - 75.0).abs() < EPS);
        assert!((result.actual[1] - 25.0).abs() < EPS);
    }

    #[test]
    fn test_benford_absent_without_numbers() {
        let workbook = Workbook::new().with_sheet(
            "Data Sheet",
            Sheet::new(vec![
                vec![Cell::from("Sales"), Cell::from("n/a"), Cell::Empty],
                vec![Cell::from("Ratio"), Cell::Number(0.25), Cell::Bool(true)],
                vec![Cell::Date(45_000.0), Cell::Error("#REF!".to_string())],
            ]),
        );
        assert!(benford(&workbook).is_none());
        assert!(benford(&Workbook::new()).is_none());
    }

    #[test]
    fn test_result_is_fully_populated() {
        let result = analyze_values(&[1.0, 22.0, 333.0, 4444.0]).expect("結果なし");
        assert!((result.actual.iter().sum::<f64>() - 100.0).abs() < 1e-9);
        assert!((1..=9).contains(&result.hotspot));
        assert!(result.mad.is_finite());
    }
}

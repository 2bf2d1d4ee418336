//! 分佈統計模組
//!
//! 在配置掃描結果上計算安全指標的百分位統計。僅統計通過約束的配置；
//! 樣本少於 10 個時整體省略：小樣本的分佈既無統計意義，
//! 也可能反推出個別配置的表現。
use crate::data_ingestion::sweep_source::SAFE_METRICS;
use crate::domain_types::{ConfigResultRow, DistributionStats};
use crate::utils::rounding::round_pct;
use std::collections::BTreeMap;

/// 計算分佈所需的最小通過樣本數
pub const MIN_SAMPLE_SIZE: usize = 10;

/// 對掃描結果計算各安全指標的分佈統計
///
/// 返回 None 表示省略（樣本不足），不是錯誤也不是部分結果。
/// 百分位採用線性插值語義，所有值捨入到 4 位小數。
pub fn summarize(rows: &[ConfigResultRow]) -> Option<BTreeMap<String, DistributionStats>> {
    let passing: Vec<&ConfigResultRow> =
        rows.iter().filter(|r| r.passed_constraints).collect();
    if passing.len() < MIN_SAMPLE_SIZE {
        return None;
    }

    let mut distributions = BTreeMap::new();
    for metric in SAFE_METRICS {
        let mut values: Vec<f64> = passing
            .iter()
            .filter_map(|r| r.metrics.get(metric).copied())
            .collect();
        // 行內可能整列缺失（直接構造的行），此時跳過該指標
        if values.is_empty() {
            continue;
        }
        values.sort_by(f64::total_cmp);

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;

        distributions.insert(
            metric.to_string(),
            DistributionStats {
                min: round_pct(values[0]),
                p10: round_pct(percentile_linear(&values, 10.0)),
                p25: round_pct(percentile_linear(&values, 25.0)),
                p50: round_pct(percentile_linear(&values, 50.0)),
                p75: round_pct(percentile_linear(&values, 75.0)),
                p90: round_pct(percentile_linear(&values, 90.0)),
                max: round_pct(values[count - 1]),
                mean: round_pct(mean),
                count,
            },
        );
    }

    Some(distributions)
}

/// 線性插值百分位
///
/// rank = p/100 * (n-1)，在相鄰樣本間按小數部分插值。
fn percentile_linear(sorted: &[f64], p: f64) -> f64 {
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn passing_row(sharpe: f64) -> ConfigResultRow {
        let mut metrics = BTreeMap::new();
        metrics.insert("sharpe_ratio".to_string(), sharpe);
        metrics.insert("pnl_pct".to_string(), sharpe * 10.0);
        metrics.insert("max_drawdown".to_string(), -sharpe);
        metrics.insert("win_rate".to_string(), 0.5);
        ConfigResultRow {
            passed_constraints: true,
            metrics,
        }
    }

    fn failing_row() -> ConfigResultRow {
        let mut row = passing_row(0.0);
        row.passed_constraints = false;
        row
    }

    #[rstest]
    #[case(&[1.0], 50.0, 1.0)]
    #[case(&[1.0, 2.0], 50.0, 1.5)]
    #[case(&[1.0, 2.0, 3.0, 4.0], 25.0, 1.75)]
    #[case(&[1.0, 2.0, 3.0, 4.0], 100.0, 4.0)]
    #[case(&[1.0, 2.0, 3.0, 4.0], 0.0, 1.0)]
    fn test_percentile_linear(#[case] values: &[f64], #[case] p: f64, #[case] expected: f64) {
        assert!((percentile_linear(values, p) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_twelve_passing_rows_median() {
        // 12 個通過行，sharpe 1..12，線性插值中位數 6.5
        let rows: Vec<ConfigResultRow> = (1..=12).map(|i| passing_row(i as f64)).collect();
        let distributions = summarize(&rows).expect("12 個樣本應產生分佈");

        let sharpe = &distributions["sharpe_ratio"];
        assert_eq!(sharpe.p50, 6.5);
        assert_eq!(sharpe.count, 12);
        assert_eq!(sharpe.min, 1.0);
        assert_eq!(sharpe.max, 12.0);
        assert_eq!(sharpe.mean, 6.5);
        assert_eq!(sharpe.p10, 2.1);
        assert_eq!(sharpe.p90, 10.9);
    }

    #[test]
    fn test_fewer_than_ten_passing_omits() {
        let mut rows: Vec<ConfigResultRow> = (1..=9).map(|i| passing_row(i as f64)).collect();
        // 未通過的行不計入樣本數
        rows.extend((0..20).map(|_| failing_row()));
        assert!(summarize(&rows).is_none());
    }

    #[test]
    fn test_only_passing_rows_counted() {
        let mut rows: Vec<ConfigResultRow> = (1..=12).map(|i| passing_row(i as f64)).collect();
        rows.push(failing_row());
        let distributions = summarize(&rows).unwrap();
        assert_eq!(distributions["sharpe_ratio"].count, 12);
    }

    #[test]
    fn test_metric_absent_from_all_rows_is_skipped() {
        // 直接構造的行可以整列缺某個指標，不應 panic
        let rows: Vec<ConfigResultRow> = (1..=10)
            .map(|i| {
                let mut row = passing_row(i as f64);
                row.metrics.remove("win_rate");
                row
            })
            .collect();
        let distributions = summarize(&rows).unwrap();
        assert!(!distributions.contains_key("win_rate"));
        assert_eq!(distributions["sharpe_ratio"].count, 10);
    }

    #[test]
    fn test_all_safe_metrics_present() {
        let rows: Vec<ConfigResultRow> = (1..=10).map(|i| passing_row(i as f64)).collect();
        let distributions = summarize(&rows).unwrap();
        for metric in SAFE_METRICS {
            assert!(distributions.contains_key(metric), "缺少指標 {}", metric);
        }
    }
}

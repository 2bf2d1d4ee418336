//! 優化掃描導入管線
//!
//! 只導入頭條指標與可選的分佈統計。參數組合取值與參數範圍
//! 永不進入持久化記錄。

use crate::data_ingestion::{load_optimization_summary, read_sweep_rows, SweepReadOutcome};
use crate::distribution::{summarize, MIN_SAMPLE_SIZE};
use crate::domain_types::OptimizationSummary;
use crate::import::backtest::to_value;
use crate::import::report::{ImportEvent, ImportReporter};
use crate::redaction::optimization_id;
use crate::storage::{collections, RecordStore};
use crate::utils::rounding::round_pct;
use crate::utils::time_utils::normalize_naive_timestamp;
use anyhow::Result;
use chrono::DateTime;
use std::path::Path;
use tracing::debug;

/// 執行優化掃描導入
pub async fn run_optimization_import(
    folder: &Path,
    store: &dyn RecordStore,
    reporter: &dyn ImportReporter,
) -> Result<()> {
    // LoadSummary
    reporter.emit(&ImportEvent::StageStarted {
        stage: "load_summary",
    });
    let doc = load_optimization_summary(folder)?;

    let name = doc.config.name.clone().unwrap_or_else(|| {
        folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "optimization".to_string())
    });
    let id = optimization_id(&name);
    let timeframe = &doc.best_result.backtest_timeframe;

    for (key, value) in &doc.config.constraints {
        debug!(constraint = %key, value = %value, "掃描約束");
    }

    // 分佈統計：可選增強，缺失或樣本不足時省略
    reporter.emit(&ImportEvent::StageStarted {
        stage: "distributions",
    });
    let distributions = match read_sweep_rows(&folder.join("results.csv"))? {
        SweepReadOutcome::MissingFile => {
            reporter.emit(&ImportEvent::DistributionsSkipped {
                reason: "未找到 results.csv".to_string(),
            });
            None
        }
        SweepReadOutcome::MissingColumns(missing) => {
            reporter.emit(&ImportEvent::DistributionsSkipped {
                reason: format!("results.csv 缺少列: {:?}", missing),
            });
            None
        }
        SweepReadOutcome::Rows(rows) => {
            let samples = rows.iter().filter(|r| r.passed_constraints).count();
            match summarize(&rows) {
                Some(stats) => {
                    reporter.emit(&ImportEvent::DistributionsComputed {
                        metrics: stats.len(),
                        samples,
                    });
                    Some(serde_json::to_string(&stats)?)
                }
                None => {
                    reporter.emit(&ImportEvent::DistributionsSkipped {
                        reason: format!(
                            "僅 {} 個通過約束的配置，少於 {} 個",
                            samples, MIN_SAMPLE_SIZE
                        ),
                    });
                    None
                }
            }
        }
    };

    let record = OptimizationSummary {
        id: id.clone(),
        name,
        run_date: parse_run_date(&doc.timestamp),
        symbol: format!("{} / {}", doc.config.strategy, doc.best_result.symbol),
        interval: doc.best_result.interval.clone(),
        total_combinations: doc.total_combinations,
        passed_constraints: doc.passed_constraints,
        best_sharpe: round_pct(doc.best_result.sharpe_ratio),
        best_roi_pct: round_pct(doc.best_result.pnl_pct),
        best_drawdown_pct: round_pct(doc.best_result.max_drawdown),
        backtest_start: date_part(&timeframe.data_start),
        backtest_end: date_part(&timeframe.data_end),
        num_candles: timeframe.num_candles,
        distributions,
    };
    let has_distributions = record.distributions.is_some();

    // Upsert：單條記錄
    reporter.emit(&ImportEvent::StageStarted { stage: "upsert" });
    store
        .upsert(collections::OPTIMIZATION_RUNS, &[to_value(&record)?])
        .await?;
    reporter.emit(&ImportEvent::BatchUpserted {
        collection: collections::OPTIMIZATION_RUNS,
        count: 1,
    });

    reporter.emit(&ImportEvent::OptimizationCompleted {
        id,
        total_combinations: doc.total_combinations,
        passed_constraints: doc.passed_constraints,
        has_distributions,
    });

    Ok(())
}

/// 解析運行時間戳；無法解析時省略而不是失敗
fn parse_run_date(timestamp: &str) -> Option<String> {
    let timestamp = timestamp.trim();
    if timestamp.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(dt.to_rfc3339());
    }
    normalize_naive_timestamp(timestamp)
}

/// 取時間戳的日曆日部分（"YYYY-MM-DD"），空字串視為缺失
fn date_part(timestamp: &str) -> Option<String> {
    timestamp.trim().get(..10).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_date() {
        assert!(parse_run_date("").is_none());
        assert!(parse_run_date("not a date").is_none());
        assert!(parse_run_date("2026-03-01T12:00:00+00:00").is_some());
        assert_eq!(
            parse_run_date("2026-03-01 12:00:00").as_deref(),
            Some("2026-03-01T12:00:00+00:00")
        );
    }

    #[test]
    fn test_date_part() {
        assert_eq!(
            date_part("2026-01-01 00:00:00").as_deref(),
            Some("2026-01-01")
        );
        assert!(date_part("").is_none());
        assert!(date_part("2026").is_none());
    }
}

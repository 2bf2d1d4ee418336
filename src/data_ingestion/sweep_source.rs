//! 掃描結果 CSV 讀取器
//!
//! 只讀取安全指標允許清單與過濾列。策略參數列即使存在也不會被觸碰：
//! 讀取按列索引定位，允許清單之外的索引根本不會被取值。

use crate::data_ingestion::error::{IngestError, IngestResult};
use crate::domain_types::ConfigResultRow;
use std::collections::BTreeMap;
use std::path::Path;

/// 安全指標允許清單，分佈統計僅在這些列上計算
pub const SAFE_METRICS: [&str; 4] = ["sharpe_ratio", "pnl_pct", "max_drawdown", "win_rate"];

/// 約束過濾列
pub const FILTER_COLUMN: &str = "passed_constraints";

/// 掃描結果讀取結果
///
/// 文件缺失與缺列不是錯誤（分佈是可選增強），由調用方決定如何報告。
#[derive(Debug)]
pub enum SweepReadOutcome {
    Rows(Vec<ConfigResultRow>),
    MissingFile,
    MissingColumns(Vec<String>),
}

/// 讀取掃描結果行
pub fn read_sweep_rows(path: &Path) -> IngestResult<SweepReadOutcome> {
    if !path.exists() {
        return Ok(SweepReadOutcome::MissingFile);
    }

    let file_name = path.display().to_string();
    let mut reader = csv::Reader::from_path(path).map_err(|err| IngestError::MalformedValue {
        file: file_name.clone(),
        line: 0,
        message: err.to_string(),
    })?;

    let headers = reader
        .headers()
        .map_err(|err| IngestError::MalformedValue {
            file: file_name.clone(),
            line: 0,
            message: err.to_string(),
        })?
        .clone();

    // 定位需要的列索引；缺任何一列則整體跳過
    let mut needed: Vec<&str> = SAFE_METRICS.to_vec();
    needed.push(FILTER_COLUMN);
    let mut indices = BTreeMap::new();
    let mut missing = Vec::new();
    for col in needed {
        match headers.iter().position(|h| h.trim() == col) {
            Some(idx) => {
                indices.insert(col.to_string(), idx);
            }
            None => missing.push(col.to_string()),
        }
    }
    if !missing.is_empty() {
        return Ok(SweepReadOutcome::MissingColumns(missing));
    }

    let filter_idx = indices[FILTER_COLUMN];
    let mut rows = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.map_err(|err| IngestError::MalformedValue {
            file: file_name.clone(),
            line: row_idx as u64 + 2,
            message: err.to_string(),
        })?;

        let passed = record
            .get(filter_idx)
            .map(|v| {
                let v = v.trim();
                v.eq_ignore_ascii_case("true") || v == "1"
            })
            .unwrap_or(false);

        let mut metrics = BTreeMap::new();
        for metric in SAFE_METRICS {
            let idx = indices[metric];
            let raw = record.get(idx).unwrap_or("").trim();
            let value: f64 = raw.parse().map_err(|_| IngestError::MalformedValue {
                file: file_name.clone(),
                line: row_idx as u64 + 2,
                message: format!("{} 不是有效數值: {:?}", metric, raw),
            })?;
            metrics.insert(metric.to_string(), value);
        }

        rows.push(ConfigResultRow {
            passed_constraints: passed,
            metrics,
        });
    }

    Ok(SweepReadOutcome::Rows(rows))
}
